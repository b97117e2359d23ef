#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_items_parent ON items(parent_id, display_order, id);
        CREATE INDEX IF NOT EXISTS idx_readings_project ON readings(project_id, display_order, id);
        CREATE INDEX IF NOT EXISTS idx_outline_reading_parent ON reading_outline(reading_id, parent_id, display_order);
        CREATE INDEX IF NOT EXISTS idx_attachments_reading ON reading_attachments(reading_id, display_order);
        CREATE INDEX IF NOT EXISTS idx_entries_reading_type ON reading_driving_questions(reading_id, type, display_order);
        CREATE INDEX IF NOT EXISTS idx_evidence_argument ON argument_evidence(argument_id, display_order);
        CREATE INDEX IF NOT EXISTS idx_anchors_project ON synthesis_anchors(project_id, reading_id);
        CREATE INDEX IF NOT EXISTS idx_anchors_tag ON synthesis_anchors(tag_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_anchors_item_link ON synthesis_anchors(item_link_id) WHERE item_link_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_anchor_tag_links_tag ON anchor_tag_links(tag_id, anchor_id);
        CREATE INDEX IF NOT EXISTS idx_project_tag_links_tag ON project_tag_links(tag_id);
        CREATE INDEX IF NOT EXISTS idx_terminology_project ON project_terminology(project_id, display_order, id);
        CREATE INDEX IF NOT EXISTS idx_terminology_refs ON terminology_references(terminology_id);
        CREATE INDEX IF NOT EXISTS idx_project_propositions_project ON project_propositions(project_id, display_order, id);
        CREATE INDEX IF NOT EXISTS idx_proposition_refs ON proposition_references(proposition_id);
"#;
