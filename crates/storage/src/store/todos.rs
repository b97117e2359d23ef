#![forbid(unsafe_code)]

use super::support::{SiblingScope, ensure_changed, require_item, todo_from_row};
use super::{SqliteStore, StoreError, TodoContent, TodoRow};
use rt_core::{ItemId, TodoId};
use rusqlite::{OptionalExtension, params};

const TODO_COLUMNS: &str =
    "id, project_id, display_name, task_html, notes_html, is_checked, display_order";

fn checked_name(content: &TodoContent) -> Result<&str, StoreError> {
    let name = content.display_name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidInput("to-do name must not be empty"));
    }
    Ok(name)
}

impl SqliteStore {
    pub fn add_todo(&mut self, project_id: ItemId, content: &TodoContent) -> Result<TodoId, StoreError> {
        let name = checked_name(content)?;
        self.write("add_todo", |tx| {
            require_item(tx, project_id)?;
            let order = SiblingScope::todos(project_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO project_todo_list(project_id, display_name, task_html, notes_html, \
                   display_order) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    project_id.get(),
                    name,
                    content.task_html,
                    content.notes_html,
                    order
                ],
            )?;
            Ok(TodoId::new(tx.last_insert_rowid()))
        })
    }

    pub fn list_todos(&self, project_id: ItemId) -> Result<Vec<TodoRow>, StoreError> {
        let sql = format!(
            "SELECT {TODO_COLUMNS} FROM project_todo_list WHERE project_id = ?1 \
             ORDER BY display_order, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![project_id.get()], todo_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_todo(&self, todo_id: TodoId) -> Result<Option<TodoRow>, StoreError> {
        let sql = format!("SELECT {TODO_COLUMNS} FROM project_todo_list WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![todo_id.get()], todo_from_row)
            .optional()?)
    }

    pub fn update_todo(&mut self, todo_id: TodoId, content: &TodoContent) -> Result<(), StoreError> {
        let name = checked_name(content)?;
        self.write("update_todo", |tx| {
            let changed = tx.execute(
                "UPDATE project_todo_list SET display_name = ?2, task_html = ?3, notes_html = ?4 \
                 WHERE id = ?1",
                params![todo_id.get(), name, content.task_html, content.notes_html],
            )?;
            ensure_changed(changed, "to-do", todo_id)
        })
    }

    pub fn set_todo_checked(&mut self, todo_id: TodoId, checked: bool) -> Result<(), StoreError> {
        self.write("set_todo_checked", |tx| {
            let changed = tx.execute(
                "UPDATE project_todo_list SET is_checked = ?2 WHERE id = ?1",
                params![todo_id.get(), checked as i64],
            )?;
            ensure_changed(changed, "to-do", todo_id)
        })
    }

    pub fn delete_todo(&mut self, todo_id: TodoId) -> Result<(), StoreError> {
        self.write("delete_todo", |tx| {
            let changed = tx.execute(
                "DELETE FROM project_todo_list WHERE id = ?1",
                params![todo_id.get()],
            )?;
            ensure_changed(changed, "to-do", todo_id)
        })
    }

    pub fn update_todo_order(
        &mut self,
        project_id: ItemId,
        ordered: &[TodoId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_todo_order", |tx| {
            SiblingScope::todos(project_id).apply_ordering(tx, &ids)
        })
    }
}
