#![forbid(unsafe_code)]

use super::support::{SiblingScope, ensure_changed, require_item, rubric_from_row};
use super::{RubricRow, SqliteStore, StoreError};
use rt_core::{ItemId, RubricId};
use rusqlite::{OptionalExtension, params};

const RUBRIC_COLUMNS: &str = "id, project_id, component_text, is_checked, display_order";

impl SqliteStore {
    pub fn add_rubric_component(
        &mut self,
        project_id: ItemId,
        text: &str,
    ) -> Result<RubricId, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput("rubric component must not be empty"));
        }
        self.write("add_rubric_component", |tx| {
            require_item(tx, project_id)?;
            let order = SiblingScope::rubric(project_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO rubric_components(project_id, component_text, display_order) \
                 VALUES (?1, ?2, ?3)",
                params![project_id.get(), text, order],
            )?;
            Ok(RubricId::new(tx.last_insert_rowid()))
        })
    }

    pub fn list_rubric_components(&self, project_id: ItemId) -> Result<Vec<RubricRow>, StoreError> {
        let sql = format!(
            "SELECT {RUBRIC_COLUMNS} FROM rubric_components WHERE project_id = ?1 \
             ORDER BY display_order, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![project_id.get()], rubric_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_rubric_component(&self, rubric_id: RubricId) -> Result<Option<RubricRow>, StoreError> {
        let sql = format!("SELECT {RUBRIC_COLUMNS} FROM rubric_components WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![rubric_id.get()], rubric_from_row)
            .optional()?)
    }

    pub fn update_rubric_component(
        &mut self,
        rubric_id: RubricId,
        text: &str,
    ) -> Result<(), StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput("rubric component must not be empty"));
        }
        self.write("update_rubric_component", |tx| {
            let changed = tx.execute(
                "UPDATE rubric_components SET component_text = ?2 WHERE id = ?1",
                params![rubric_id.get(), text],
            )?;
            ensure_changed(changed, "rubric component", rubric_id)
        })
    }

    pub fn set_rubric_component_checked(
        &mut self,
        rubric_id: RubricId,
        checked: bool,
    ) -> Result<(), StoreError> {
        self.write("set_rubric_component_checked", |tx| {
            let changed = tx.execute(
                "UPDATE rubric_components SET is_checked = ?2 WHERE id = ?1",
                params![rubric_id.get(), checked as i64],
            )?;
            ensure_changed(changed, "rubric component", rubric_id)
        })
    }

    pub fn delete_rubric_component(&mut self, rubric_id: RubricId) -> Result<(), StoreError> {
        self.write("delete_rubric_component", |tx| {
            let changed = tx.execute(
                "DELETE FROM rubric_components WHERE id = ?1",
                params![rubric_id.get()],
            )?;
            ensure_changed(changed, "rubric component", rubric_id)
        })
    }

    pub fn update_rubric_order(
        &mut self,
        project_id: ItemId,
        ordered: &[RubricId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_rubric_order", |tx| {
            SiblingScope::rubric(project_id).apply_ordering(tx, &ids)
        })
    }
}
