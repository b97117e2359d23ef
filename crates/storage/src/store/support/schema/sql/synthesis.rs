#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS synthesis_tags (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL UNIQUE
        );

        -- `tag_id` caches the first anchor_tag_links row (by rowid); the link table is authoritative.
        CREATE TABLE IF NOT EXISTS synthesis_anchors (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          reading_id INTEGER NOT NULL REFERENCES readings(id) ON DELETE CASCADE,
          outline_id INTEGER REFERENCES reading_outline(id) ON DELETE CASCADE,
          tag_id INTEGER REFERENCES synthesis_tags(id) ON DELETE SET NULL,
          unique_doc_id TEXT NOT NULL,
          selected_text TEXT,
          comment TEXT,
          item_link_id INTEGER REFERENCES reading_driving_questions(id) ON DELETE CASCADE,
          item_type TEXT,
          CHECK ((item_link_id IS NULL) = (item_type IS NULL))
        );

        CREATE TABLE IF NOT EXISTS anchor_tag_links (
          anchor_id INTEGER NOT NULL REFERENCES synthesis_anchors(id) ON DELETE CASCADE,
          tag_id INTEGER NOT NULL REFERENCES synthesis_tags(id) ON DELETE CASCADE,
          PRIMARY KEY (anchor_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS project_tag_links (
          project_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
          tag_id INTEGER NOT NULL REFERENCES synthesis_tags(id) ON DELETE CASCADE,
          PRIMARY KEY (project_id, tag_id)
        );
"#;
