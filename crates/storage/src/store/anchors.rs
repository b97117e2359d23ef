#![forbid(unsafe_code)]

use super::support::{
    ANCHOR_COLUMNS, ensure_changed, ensure_outline_in_reading, find_tag_by_name, load_anchor,
    project_id_for_reading_tx, query_anchors, refresh_entry_tag_cache_tx,
    replace_anchor_links_tx, require_item, require_tag, tag_from_row,
};
use super::{
    AnchorContextRow, AnchorDetails, AnchorRow, NewTextAnchor, SqliteStore, StoreError,
    TextAnchorUpdate,
};
use rt_core::{AnchorId, EntryId, EntryKind, ItemId, OutlineId, ReadingId, TagId, normalize_tag_name};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// Drops repeats while keeping first positions, then checks every tag exists.
fn resolve_tag_ids(conn: &Connection, tag_ids: &[TagId]) -> Result<Vec<TagId>, StoreError> {
    let mut unique: Vec<TagId> = Vec::with_capacity(tag_ids.len());
    for tag_id in tag_ids {
        if !unique.contains(tag_id) {
            require_tag(conn, *tag_id)?;
            unique.push(*tag_id);
        }
    }
    Ok(unique)
}

const CONTEXT_COLUMNS: &str = "a.id, a.selected_text, a.comment, a.project_id, i.name, \
     a.reading_id, r.title, r.nickname, a.outline_id, o.section_title, a.item_link_id, a.item_type";

const CONTEXT_JOINS: &str = "FROM synthesis_anchors a \
     JOIN items i ON i.id = a.project_id \
     JOIN readings r ON r.id = a.reading_id \
     LEFT JOIN reading_outline o ON o.id = a.outline_id";

const TAGGED_WITH: &str =
    "(a.tag_id = ?1 OR a.id IN (SELECT anchor_id FROM anchor_tag_links WHERE tag_id = ?1))";

fn context_from_row(row: &Row<'_>) -> rusqlite::Result<AnchorContextRow> {
    Ok(AnchorContextRow {
        id: AnchorId::new(row.get(0)?),
        selected_text: row.get(1)?,
        comment: row.get(2)?,
        project_id: ItemId::new(row.get(3)?),
        project_name: row.get(4)?,
        reading_id: ReadingId::new(row.get(5)?),
        reading_title: row.get(6)?,
        reading_nickname: row.get(7)?,
        outline_id: row.get::<_, Option<i64>>(8)?.map(OutlineId::new),
        outline_title: row.get(9)?,
        item_link_id: row.get::<_, Option<i64>>(10)?.map(EntryId::new),
        item_type: row
            .get::<_, Option<String>>(11)?
            .as_deref()
            .and_then(EntryKind::from_anchor_item_type),
    })
}

impl SqliteStore {
    /// Creates a passage anchor. The reading must belong to the project and the outline section,
    /// when given, to the reading. Every tag is recorded on the project.
    pub fn create_anchor(&mut self, anchor: &NewTextAnchor) -> Result<AnchorId, StoreError> {
        if anchor.selected_text.trim().is_empty() {
            return Err(StoreError::InvalidInput("selected text must not be empty"));
        }
        self.write("create_anchor", |tx| {
            require_item(tx, anchor.project_id)?;
            if project_id_for_reading_tx(tx, anchor.reading_id)? != anchor.project_id {
                return Err(StoreError::InvalidInput("reading belongs to another project"));
            }
            ensure_outline_in_reading(tx, anchor.outline_id, anchor.reading_id)?;
            let tag_ids = resolve_tag_ids(tx, &anchor.tag_ids)?;

            tx.execute(
                "INSERT INTO synthesis_anchors(project_id, reading_id, outline_id, unique_doc_id, \
                   selected_text, comment) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    anchor.project_id.get(),
                    anchor.reading_id.get(),
                    anchor.outline_id.map(OutlineId::get),
                    anchor.unique_doc_id,
                    anchor.selected_text,
                    anchor.comment,
                ],
            )?;
            let anchor_id = AnchorId::new(tx.last_insert_rowid());
            replace_anchor_links_tx(tx, anchor_id, anchor.project_id, &tag_ids)?;
            tracing::debug!(anchor = %anchor_id, tags = tag_ids.len(), "text anchor created");
            Ok(anchor_id)
        })
    }

    /// Replaces the passage, comment and tag set of a text anchor. Virtual anchors follow their
    /// entry's tags and are rejected here.
    pub fn update_anchor(
        &mut self,
        anchor_id: AnchorId,
        update: &TextAnchorUpdate,
    ) -> Result<(), StoreError> {
        if update.selected_text.trim().is_empty() {
            return Err(StoreError::InvalidInput("selected text must not be empty"));
        }
        self.write("update_anchor", |tx| {
            let current =
                load_anchor(tx, anchor_id)?.ok_or_else(|| StoreError::not_found("anchor", anchor_id))?;
            if current.subject.is_virtual() {
                return Err(StoreError::InvalidInput(
                    "virtual anchors are updated through their entry",
                ));
            }
            let tag_ids = resolve_tag_ids(tx, &update.tag_ids)?;
            tx.execute(
                "UPDATE synthesis_anchors SET selected_text = ?2, comment = ?3 WHERE id = ?1",
                params![anchor_id.get(), update.selected_text, update.comment],
            )?;
            replace_anchor_links_tx(tx, anchor_id, current.project_id, &tag_ids)
        })
    }

    pub fn delete_anchor(&mut self, anchor_id: AnchorId) -> Result<(), StoreError> {
        self.write("delete_anchor", |tx| {
            let entry = load_anchor(tx, anchor_id)?.and_then(|anchor| anchor.item_link_id());
            let changed = tx.execute(
                "DELETE FROM synthesis_anchors WHERE id = ?1",
                params![anchor_id.get()],
            )?;
            ensure_changed(changed, "anchor", anchor_id)?;
            if let Some(entry_id) = entry {
                refresh_entry_tag_cache_tx(tx, entry_id)?;
            }
            Ok(())
        })
    }

    /// Removes the virtual anchor of one entry, if any, and clears the entry's cached tag text.
    pub fn delete_anchors_by_item_link_id(&mut self, entry_id: EntryId) -> Result<usize, StoreError> {
        self.write("delete_anchors_by_item_link_id", |tx| {
            let removed = tx.execute(
                "DELETE FROM synthesis_anchors WHERE item_link_id = ?1",
                params![entry_id.get()],
            )?;
            refresh_entry_tag_cache_tx(tx, entry_id)?;
            Ok(removed)
        })
    }

    pub fn get_anchor(&self, anchor_id: AnchorId) -> Result<Option<AnchorRow>, StoreError> {
        load_anchor(&self.conn, anchor_id)
    }

    /// The anchor with its tags in link order and the titles it points at.
    pub fn get_anchor_details(
        &self,
        anchor_id: AnchorId,
    ) -> Result<Option<AnchorDetails>, StoreError> {
        let Some(anchor) = load_anchor(&self.conn, anchor_id)? else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name FROM anchor_tag_links l \
             JOIN synthesis_tags t ON t.id = l.tag_id \
             WHERE l.anchor_id = ?1 ORDER BY l.rowid",
        )?;
        let tags = stmt
            .query_map(params![anchor_id.get()], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let reading_title: String = self.conn.query_row(
            "SELECT title FROM readings WHERE id = ?1",
            params![anchor.reading_id.get()],
            |row| row.get(0),
        )?;
        let outline_title: Option<String> = match anchor.outline_id {
            Some(outline_id) => self
                .conn
                .query_row(
                    "SELECT section_title FROM reading_outline WHERE id = ?1",
                    params![outline_id.get()],
                    |row| row.get(0),
                )
                .optional()?,
            None => None,
        };

        Ok(Some(AnchorDetails {
            anchor,
            tags,
            reading_title,
            outline_title,
        }))
    }

    /// Text and virtual anchors of the project, by reading order then id.
    pub fn get_anchors_for_project(&self, project_id: ItemId) -> Result<Vec<AnchorRow>, StoreError> {
        let sql = format!(
            "SELECT {ANCHOR_COLUMNS} FROM synthesis_anchors a \
             JOIN readings r ON r.id = a.reading_id \
             WHERE a.project_id = ?1 \
             ORDER BY r.display_order, r.id, a.id"
        );
        query_anchors(&self.conn, &sql, params![project_id.get()])
    }

    /// Anchors carrying the tag as primary tag or through a link.
    pub fn get_anchors_for_tag(&self, tag_id: TagId) -> Result<Vec<AnchorRow>, StoreError> {
        let sql = format!(
            "SELECT {ANCHOR_COLUMNS} FROM synthesis_anchors a WHERE {TAGGED_WITH} ORDER BY a.id"
        );
        query_anchors(&self.conn, &sql, params![tag_id.get()])
    }

    pub fn get_anchors_for_tag_in_project(
        &self,
        project_id: ItemId,
        tag_id: TagId,
    ) -> Result<Vec<AnchorRow>, StoreError> {
        let sql = format!(
            "SELECT {ANCHOR_COLUMNS} FROM synthesis_anchors a \
             JOIN readings r ON r.id = a.reading_id \
             WHERE {TAGGED_WITH} AND a.project_id = ?2 \
             ORDER BY r.display_order, r.id, a.id"
        );
        query_anchors(&self.conn, &sql, params![tag_id.get(), project_id.get()])
    }

    /// Anchors of the tag with reading, section and project names, in reading then outline order.
    pub fn get_anchors_for_tag_with_context(
        &self,
        tag_id: TagId,
    ) -> Result<Vec<AnchorContextRow>, StoreError> {
        let sql = format!(
            "SELECT {CONTEXT_COLUMNS} {CONTEXT_JOINS} \
             WHERE {TAGGED_WITH} \
             ORDER BY r.display_order, r.id, o.display_order, a.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![tag_id.get()], context_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Cross-project view of one tag by name, grouped by project name.
    pub fn get_global_anchors_for_tag_name(
        &self,
        name: &str,
    ) -> Result<Vec<AnchorContextRow>, StoreError> {
        let Ok(name) = normalize_tag_name(name) else {
            return Ok(Vec::new());
        };
        let Some(tag) = find_tag_by_name(&self.conn, &name)? else {
            return Ok(Vec::new());
        };
        let sql = format!(
            "SELECT {CONTEXT_COLUMNS} {CONTEXT_JOINS} \
             WHERE {TAGGED_WITH} \
             ORDER BY i.name, i.id, r.display_order, r.id, o.display_order, a.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![tag.id.get()], context_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
