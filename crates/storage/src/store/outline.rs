#![forbid(unsafe_code)]

use super::support::{
    OUTLINE_COLUMNS, SiblingScope, ensure_changed, ensure_reading_exists, load_outline,
    outline_from_row, require_entry_kind,
};
use super::{OutlineRow, PartData, SqliteStore, StoreError};
use rt_core::{EntryId, EntryKind, OutlineId, ReadingId};
use rusqlite::{OptionalExtension, params, params_from_iter};

impl SqliteStore {
    pub fn add_outline_section(
        &mut self,
        reading_id: ReadingId,
        title: &str,
        parent_id: Option<OutlineId>,
    ) -> Result<OutlineId, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("section title must not be empty"));
        }
        self.write("add_outline_section", |tx| {
            ensure_reading_exists(tx, reading_id)?;
            if let Some(parent) = parent_id {
                match load_outline(tx, parent)? {
                    Some(section) if section.reading_id == reading_id => {}
                    Some(_) => {
                        return Err(StoreError::InvalidInput(
                            "parent section belongs to another reading",
                        ));
                    }
                    None => return Err(StoreError::not_found("outline section", parent)),
                }
            }
            let order = SiblingScope::outline(reading_id, parent_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO reading_outline(reading_id, parent_id, section_title, display_order) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![reading_id.get(), parent_id.map(OutlineId::get), title, order],
            )?;
            Ok(OutlineId::new(tx.last_insert_rowid()))
        })
    }

    /// Direct children of `parent_id` (top-level sections when `None`).
    pub fn list_outline(
        &self,
        reading_id: ReadingId,
        parent_id: Option<OutlineId>,
    ) -> Result<Vec<OutlineRow>, StoreError> {
        let (filter, mut args) = match parent_id {
            None => ("parent_id IS NULL", Vec::new()),
            Some(parent) => ("parent_id = ?2", vec![parent.get()]),
        };
        args.insert(0, reading_id.get());
        let sql = format!(
            "SELECT {OUTLINE_COLUMNS} FROM reading_outline \
             WHERE reading_id = ?1 AND {filter} ORDER BY display_order, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(args), outline_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every section of the reading in depth-first order.
    pub fn list_all_outline(&self, reading_id: ReadingId) -> Result<Vec<OutlineRow>, StoreError> {
        let mut out = Vec::new();
        let mut stack: Vec<OutlineRow> = self.list_outline(reading_id, None)?;
        stack.reverse();
        while let Some(section) = stack.pop() {
            let mut children = self.list_outline(reading_id, Some(section.id))?;
            children.reverse();
            out.push(section);
            stack.extend(children);
        }
        Ok(out)
    }

    pub fn get_outline_section(
        &self,
        outline_id: OutlineId,
    ) -> Result<Option<OutlineRow>, StoreError> {
        load_outline(&self.conn, outline_id)
    }

    pub fn rename_outline_section(
        &mut self,
        outline_id: OutlineId,
        title: &str,
    ) -> Result<(), StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("section title must not be empty"));
        }
        self.write("rename_outline_section", |tx| {
            let changed = tx.execute(
                "UPDATE reading_outline SET section_title = ?2 WHERE id = ?1",
                params![outline_id.get(), title],
            )?;
            ensure_changed(changed, "outline section", outline_id)
        })
    }

    pub fn get_outline_notes(&self, outline_id: OutlineId) -> Result<Option<String>, StoreError> {
        let notes: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT notes_html FROM reading_outline WHERE id = ?1",
                params![outline_id.get()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(notes.flatten())
    }

    pub fn update_outline_notes(
        &mut self,
        outline_id: OutlineId,
        notes_html: Option<&str>,
    ) -> Result<(), StoreError> {
        self.write("update_outline_notes", |tx| {
            let changed = tx.execute(
                "UPDATE reading_outline SET notes_html = ?2 WHERE id = ?1",
                params![outline_id.get(), notes_html],
            )?;
            ensure_changed(changed, "outline section", outline_id)
        })
    }

    /// Child sections and anchors on the section are removed with it.
    pub fn delete_outline_section(&mut self, outline_id: OutlineId) -> Result<(), StoreError> {
        self.write("delete_outline_section", |tx| {
            let changed = tx.execute(
                "DELETE FROM reading_outline WHERE id = ?1",
                params![outline_id.get()],
            )?;
            ensure_changed(changed, "outline section", outline_id)?;
            tracing::info!(outline = %outline_id, "outline section deleted");
            Ok(())
        })
    }

    pub fn update_outline_order(
        &mut self,
        reading_id: ReadingId,
        parent_id: Option<OutlineId>,
        ordered: &[OutlineId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_outline_order", |tx| {
            SiblingScope::outline(reading_id, parent_id).apply_ordering(tx, &ids)
        })
    }

    /// Sections flagged as structural parts, in outline order.
    pub fn list_parts(&self, reading_id: ReadingId) -> Result<Vec<OutlineRow>, StoreError> {
        Ok(self
            .list_all_outline(reading_id)?
            .into_iter()
            .filter(|section| section.part.is_structural)
            .collect())
    }

    pub fn get_part(&self, outline_id: OutlineId) -> Result<Option<PartData>, StoreError> {
        Ok(load_outline(&self.conn, outline_id)?.map(|section| section.part))
    }

    pub fn save_part(
        &mut self,
        reading_id: ReadingId,
        outline_id: OutlineId,
        part: &PartData,
    ) -> Result<(), StoreError> {
        self.write("save_part", |tx| {
            if let Some(question) = part.driving_question_id {
                let header = require_entry_kind(tx, question, EntryKind::DrivingQuestion)?;
                if header.reading_id != reading_id {
                    return Err(StoreError::InvalidInput(
                        "driving question belongs to another reading",
                    ));
                }
            }
            let changed = tx.execute(
                "UPDATE reading_outline SET part_function_text_plain = ?3, \
                   part_relation_text_plain = ?4, part_dependency_text_plain = ?5, \
                   part_is_structural = ?6, part_dq_id = ?7 \
                 WHERE id = ?1 AND reading_id = ?2",
                params![
                    outline_id.get(),
                    reading_id.get(),
                    part.function_text,
                    part.relation_text,
                    part.dependency_text,
                    part.is_structural as i64,
                    part.driving_question_id.map(EntryId::get),
                ],
            )?;
            ensure_changed(changed, "outline section", outline_id)
        })
    }
}
