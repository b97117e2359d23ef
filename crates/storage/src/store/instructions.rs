#![forbid(unsafe_code)]

use super::support::require_item;
use super::{SqliteStore, StoreError};
use rt_core::{INSTRUCTION_COLUMNS, ItemId, is_instruction_column};
use rusqlite::{Connection, params, params_from_iter};
use std::collections::BTreeMap;

impl SqliteStore {
    /// Every instruction column of the project, creating the empty row on first access.
    pub fn get_or_create_instructions(
        &mut self,
        project_id: ItemId,
    ) -> Result<BTreeMap<String, String>, StoreError> {
        self.write("get_or_create_instructions", |tx| {
            require_item(tx, project_id)?;
            tx.execute(
                "INSERT OR IGNORE INTO instructions(project_id) VALUES (?1)",
                params![project_id.get()],
            )?;
            load_instructions(tx, project_id)
        })
    }

    /// Writes the given columns only; an unknown column fails the whole call before any write.
    pub fn update_instructions(
        &mut self,
        project_id: ItemId,
        values: &BTreeMap<String, String>,
    ) -> Result<(), StoreError> {
        if let Some(unknown) = values.keys().find(|key| !is_instruction_column(key)) {
            return Err(StoreError::InvalidField {
                field: unknown.clone(),
            });
        }
        if values.is_empty() {
            return Ok(());
        }

        let assignments = values
            .keys()
            .enumerate()
            .map(|(index, column)| format!("{column} = ?{}", index + 2))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE instructions SET {assignments} WHERE project_id = ?1");

        self.write("update_instructions", |tx| {
            require_item(tx, project_id)?;
            tx.execute(
                "INSERT OR IGNORE INTO instructions(project_id) VALUES (?1)",
                params![project_id.get()],
            )?;
            let mut args: Vec<rusqlite::types::Value> = Vec::with_capacity(values.len() + 1);
            args.push(project_id.get().into());
            args.extend(values.values().map(|value| value.clone().into()));
            tx.execute(&sql, params_from_iter(args))?;
            Ok(())
        })
    }
}

fn load_instructions(
    conn: &Connection,
    project_id: ItemId,
) -> Result<BTreeMap<String, String>, StoreError> {
    let sql = format!(
        "SELECT {} FROM instructions WHERE project_id = ?1",
        INSTRUCTION_COLUMNS.join(", ")
    );
    let values = conn.query_row(&sql, params![project_id.get()], |row| {
        INSTRUCTION_COLUMNS
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let value: Option<String> = row.get(index)?;
                Ok((column.to_string(), value.unwrap_or_default()))
            })
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()
    })?;
    Ok(values)
}
