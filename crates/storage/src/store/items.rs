#![forbid(unsafe_code)]

use super::support::{
    ITEM_COLUMNS, OUTLINE_COLUMNS, READING_COLUMNS, SiblingScope, ensure_changed, item_from_row,
    load_item, outline_from_row, reading_from_row, require_item,
};
use super::{ItemRow, NewItem, SqliteStore, StoreError};
use rt_core::{ItemId, ItemKind, OutlineId, ProjectTextField, ReadingId};
use rusqlite::{Connection, params};

const COPY_SUFFIX: &str = " (Copy)";

impl SqliteStore {
    pub fn create_item(&mut self, request: NewItem) -> Result<ItemId, StoreError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("item name must not be empty"));
        }
        self.write("create_item", |tx| {
            if let Some(parent_id) = request.parent_id {
                require_item(tx, parent_id)?;
            }
            let order = SiblingScope::items(request.parent_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO items(parent_id, type, name, display_order, is_assignment) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    request.parent_id.map(ItemId::get),
                    request.kind.as_str(),
                    name,
                    order,
                    request.is_assignment as i64,
                ],
            )?;
            Ok(ItemId::new(tx.last_insert_rowid()))
        })
    }

    pub fn get_item(&self, item_id: ItemId) -> Result<Option<ItemRow>, StoreError> {
        load_item(&self.conn, item_id)
    }

    /// Children of `parent_id` (top level when `None`), by `(display_order, id)`.
    pub fn list_items(&self, parent_id: Option<ItemId>) -> Result<Vec<ItemRow>, StoreError> {
        let (sql, args) = match parent_id {
            None => (
                format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE parent_id IS NULL \
                     ORDER BY display_order, id"
                ),
                Vec::new(),
            ),
            Some(parent) => (
                format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE parent_id = ?1 \
                     ORDER BY display_order, id"
                ),
                vec![parent.get()],
            ),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args), item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn list_classes(&self) -> Result<Vec<ItemRow>, StoreError> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE type = ?1 ORDER BY display_order, name, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![ItemKind::Class.as_str()], item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn rename_item(&mut self, item_id: ItemId, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("item name must not be empty"));
        }
        self.write("rename_item", |tx| {
            let changed = tx.execute(
                "UPDATE items SET name = ?2 WHERE id = ?1",
                params![item_id.get(), name],
            )?;
            ensure_changed(changed, "item", item_id)
        })
    }

    /// Re-parents an item and appends it after its new siblings.
    pub fn move_item(
        &mut self,
        item_id: ItemId,
        new_parent_id: Option<ItemId>,
    ) -> Result<(), StoreError> {
        self.write("move_item", |tx| {
            require_item(tx, item_id)?;
            if let Some(parent) = new_parent_id {
                require_item(tx, parent)?;
                if is_same_or_descendant(tx, parent, item_id)? {
                    return Err(StoreError::InvalidInput(
                        "an item cannot move under itself or its descendants",
                    ));
                }
            }
            let order = SiblingScope::items(new_parent_id).next_order(tx)?;
            tx.execute(
                "UPDATE items SET parent_id = ?2, display_order = ?3 WHERE id = ?1",
                params![item_id.get(), new_parent_id.map(ItemId::get), order],
            )?;
            Ok(())
        })
    }

    /// `ordered` must list every child of `parent_id` exactly once.
    pub fn update_item_order(
        &mut self,
        parent_id: Option<ItemId>,
        ordered: &[ItemId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_item_order", |tx| {
            SiblingScope::items(parent_id).apply_ordering(tx, &ids)
        })
    }

    /// Clearing the flag drops the rubric and the assignment instructions and draft.
    pub fn update_assignment_status(
        &mut self,
        project_id: ItemId,
        is_assignment: bool,
    ) -> Result<(), StoreError> {
        self.write("update_assignment_status", |tx| {
            let changed = tx.execute(
                "UPDATE items SET is_assignment = ?2 WHERE id = ?1",
                params![project_id.get(), is_assignment as i64],
            )?;
            ensure_changed(changed, "item", project_id)?;
            if !is_assignment {
                tx.execute(
                    "DELETE FROM rubric_components WHERE project_id = ?1",
                    params![project_id.get()],
                )?;
                tx.execute(
                    "UPDATE items SET assignment_instructions_text = NULL, \
                       assignment_draft_text = NULL \
                     WHERE id = ?1",
                    params![project_id.get()],
                )?;
            }
            Ok(())
        })
    }

    pub fn update_project_text_field(
        &mut self,
        project_id: ItemId,
        field: ProjectTextField,
        text: Option<&str>,
    ) -> Result<(), StoreError> {
        let sql = format!("UPDATE items SET {} = ?2 WHERE id = ?1", field.column());
        self.write("update_project_text_field", |tx| {
            let changed = tx.execute(&sql, params![project_id.get(), text])?;
            ensure_changed(changed, "item", project_id)
        })
    }

    /// Column-name variant of [`SqliteStore::update_project_text_field`] for callers holding
    /// raw names; unknown names are rejected before any statement runs.
    pub fn update_project_text_field_by_name(
        &mut self,
        project_id: ItemId,
        column: &str,
        text: Option<&str>,
    ) -> Result<(), StoreError> {
        let field = ProjectTextField::from_column(column).ok_or_else(|| {
            StoreError::InvalidField {
                field: column.to_string(),
            }
        })?;
        self.update_project_text_field(project_id, field, text)
    }

    /// Deletes the item; descendants, readings and everything hanging off them cascade.
    pub fn delete_item(&mut self, item_id: ItemId) -> Result<(), StoreError> {
        self.write("delete_item", |tx| {
            let changed = tx.execute("DELETE FROM items WHERE id = ?1", params![item_id.get()])?;
            ensure_changed(changed, "item", item_id)?;
            tracing::info!(item = %item_id, "item deleted");
            Ok(())
        })
    }

    /// Deep-copies a project's structural content under fresh ids: text fields, readings with
    /// their outline trees, rubric and instructions. Entries, anchors and tags stay behind.
    pub fn duplicate_item(&mut self, item_id: ItemId) -> Result<ItemId, StoreError> {
        self.write("duplicate_item", |tx| {
            let original = require_item(tx, item_id)?;
            let order = SiblingScope::items(original.parent_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO items(parent_id, type, name, display_order, is_assignment, \
                   project_purpose_text, project_goals_text, key_questions_text, thesis_text, \
                   insights_text, unresolved_text, assignment_instructions_text, \
                   assignment_draft_text, synthesis_notes_html) \
                 SELECT parent_id, type, name || ?2, ?3, is_assignment, \
                   project_purpose_text, project_goals_text, key_questions_text, thesis_text, \
                   insights_text, unresolved_text, assignment_instructions_text, \
                   assignment_draft_text, synthesis_notes_html \
                 FROM items WHERE id = ?1",
                params![item_id.get(), COPY_SUFFIX, order],
            )?;
            let copy_id = ItemId::new(tx.last_insert_rowid());

            let readings = copy_readings_tx(tx, item_id, copy_id)?;
            copy_rubric_tx(tx, item_id, copy_id)?;
            copy_instructions_tx(tx, item_id, copy_id)?;

            tracing::info!(source = %item_id, copy = %copy_id, readings, "item duplicated");
            Ok(copy_id)
        })
    }
}

fn is_same_or_descendant(
    conn: &Connection,
    candidate: ItemId,
    ancestor: ItemId,
) -> Result<bool, StoreError> {
    let mut cursor = Some(candidate);
    let mut hops = 0usize;
    while let Some(current) = cursor {
        if current == ancestor {
            return Ok(true);
        }
        hops += 1;
        if hops > 10_000 {
            return Err(StoreError::InvalidInput("item hierarchy contains a cycle"));
        }
        cursor = load_item(conn, current)?.and_then(|item| item.parent_id);
    }
    Ok(false)
}

fn copy_readings_tx(
    conn: &Connection,
    source_project: ItemId,
    target_project: ItemId,
) -> Result<usize, StoreError> {
    let sql = format!(
        "SELECT {READING_COLUMNS} FROM readings WHERE project_id = ?1 ORDER BY display_order, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let readings = stmt
        .query_map(params![source_project.get()], reading_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    drop(stmt);

    for (position, reading) in readings.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| StoreError::InvalidInput("too many readings"))?;
        conn.execute(
            "INSERT INTO readings(project_id, title, author, nickname, display_order, \
               zotero_item_key, published, pages, assignment, level, classification) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                target_project.get(),
                reading.title,
                reading.author,
                reading.nickname,
                position,
                reading.zotero_item_key,
                reading.published,
                reading.pages,
                reading.assignment,
                reading.level,
                reading.classification,
            ],
        )?;
        let copy_id = ReadingId::new(conn.last_insert_rowid());
        copy_outline_level_tx(conn, reading.id, copy_id, None, None)?;
    }
    Ok(readings.len())
}

/// Copies the children of `source_parent` under `target_parent`, recursing into each section.
fn copy_outline_level_tx(
    conn: &Connection,
    source_reading: ReadingId,
    target_reading: ReadingId,
    source_parent: Option<OutlineId>,
    target_parent: Option<OutlineId>,
) -> Result<(), StoreError> {
    let sections = {
        let (sql, args) = match source_parent {
            None => (
                format!(
                    "SELECT {OUTLINE_COLUMNS} FROM reading_outline \
                     WHERE reading_id = ?1 AND parent_id IS NULL ORDER BY display_order, id"
                ),
                vec![source_reading.get()],
            ),
            Some(parent) => (
                format!(
                    "SELECT {OUTLINE_COLUMNS} FROM reading_outline \
                     WHERE reading_id = ?1 AND parent_id = ?2 ORDER BY display_order, id"
                ),
                vec![source_reading.get(), parent.get()],
            ),
        };
        let mut stmt = conn.prepare(&sql)?;
        stmt.query_map(rusqlite::params_from_iter(args), outline_from_row)?
            .collect::<Result<Vec<_>, _>>()?
    };

    for section in sections {
        conn.execute(
            "INSERT INTO reading_outline(reading_id, parent_id, section_title, notes_html, \
               display_order) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                target_reading.get(),
                target_parent.map(OutlineId::get),
                section.section_title,
                section.notes_html,
                section.display_order,
            ],
        )?;
        let copy_id = OutlineId::new(conn.last_insert_rowid());
        copy_outline_level_tx(
            conn,
            source_reading,
            target_reading,
            Some(section.id),
            Some(copy_id),
        )?;
    }
    Ok(())
}

fn copy_rubric_tx(conn: &Connection, source: ItemId, target: ItemId) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO rubric_components(project_id, component_text, is_checked, display_order) \
         SELECT ?2, component_text, 0, display_order FROM rubric_components \
         WHERE project_id = ?1 ORDER BY display_order, id",
        params![source.get(), target.get()],
    )?;
    Ok(())
}

fn copy_instructions_tx(conn: &Connection, source: ItemId, target: ItemId) -> Result<(), StoreError> {
    let columns = rt_core::INSTRUCTION_COLUMNS.join(", ");
    let sql = format!(
        "INSERT INTO instructions(project_id, {columns}) \
         SELECT ?2, {columns} FROM instructions WHERE project_id = ?1"
    );
    conn.execute(&sql, params![source.get(), target.get()])?;
    Ok(())
}
