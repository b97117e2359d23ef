#![forbid(unsafe_code)]

use super::support::{
    READING_COLUMNS, SiblingScope, ensure_changed, load_reading, project_id_for_reading_tx,
    reading_from_row, require_entry_kind, require_item,
};
use super::{ReadingDetails, ReadingRow, SqliteStore, StoreError};
use rt_core::{EntryId, EntryKind, ItemId, ReadingId, ReadingTextField};
use rusqlite::params;

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl SqliteStore {
    /// Appends a reading to the project and re-reads it after commit; a missing row is reported
    /// as [`StoreError::InsertVerification`].
    pub fn add_reading(
        &mut self,
        project_id: ItemId,
        details: &ReadingDetails,
    ) -> Result<ReadingId, StoreError> {
        let details = details.trimmed();
        if details.title.is_empty() {
            return Err(StoreError::InvalidInput("reading title must not be empty"));
        }

        let reading_id = self.write("add_reading", |tx| {
            require_item(tx, project_id)?;
            let order = SiblingScope::readings(project_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO readings(project_id, title, author, nickname, display_order, \
                   zotero_item_key, published, pages, assignment, level, classification) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    project_id.get(),
                    details.title,
                    non_empty(&details.author),
                    non_empty(&details.nickname),
                    order,
                    details.zotero_item_key.as_deref().and_then(non_empty),
                    non_empty(&details.published),
                    non_empty(&details.pages),
                    non_empty(&details.assignment),
                    non_empty(&details.level),
                    non_empty(&details.classification),
                ],
            )?;
            Ok(ReadingId::new(tx.last_insert_rowid()))
        })?;

        if load_reading(&self.conn, reading_id)?.is_none() {
            tracing::error!(reading = %reading_id, "reading missing right after insert");
            return Err(StoreError::InsertVerification {
                entity: "reading",
                id: reading_id.get(),
            });
        }
        Ok(reading_id)
    }

    pub fn list_readings(&self, project_id: ItemId) -> Result<Vec<ReadingRow>, StoreError> {
        let sql = format!(
            "SELECT {READING_COLUMNS} FROM readings WHERE project_id = ?1 ORDER BY display_order, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![project_id.get()], reading_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_reading(&self, reading_id: ReadingId) -> Result<Option<ReadingRow>, StoreError> {
        load_reading(&self.conn, reading_id)
    }

    pub fn project_id_for_reading(&self, reading_id: ReadingId) -> Result<ItemId, StoreError> {
        project_id_for_reading_tx(&self.conn, reading_id)
    }

    pub fn update_reading_details(
        &mut self,
        reading_id: ReadingId,
        details: &ReadingDetails,
    ) -> Result<(), StoreError> {
        let details = details.trimmed();
        if details.title.is_empty() {
            return Err(StoreError::InvalidInput("reading title must not be empty"));
        }
        self.write("update_reading_details", |tx| {
            let changed = tx.execute(
                "UPDATE readings SET title = ?2, author = ?3, nickname = ?4, zotero_item_key = ?5, \
                   published = ?6, pages = ?7, assignment = ?8, level = ?9, classification = ?10 \
                 WHERE id = ?1",
                params![
                    reading_id.get(),
                    details.title,
                    non_empty(&details.author),
                    non_empty(&details.nickname),
                    details.zotero_item_key.as_deref().and_then(non_empty),
                    non_empty(&details.published),
                    non_empty(&details.pages),
                    non_empty(&details.assignment),
                    non_empty(&details.level),
                    non_empty(&details.classification),
                ],
            )?;
            ensure_changed(changed, "reading", reading_id)
        })
    }

    /// A blank nickname clears it.
    pub fn update_reading_nickname(
        &mut self,
        reading_id: ReadingId,
        nickname: &str,
    ) -> Result<(), StoreError> {
        self.write("update_reading_nickname", |tx| {
            let changed = tx.execute(
                "UPDATE readings SET nickname = ?2 WHERE id = ?1",
                params![reading_id.get(), non_empty(nickname)],
            )?;
            ensure_changed(changed, "reading", reading_id)
        })
    }

    pub fn update_reading_text(
        &mut self,
        reading_id: ReadingId,
        field: ReadingTextField,
        html: Option<&str>,
    ) -> Result<(), StoreError> {
        let sql = format!("UPDATE readings SET {} = ?2 WHERE id = ?1", field.column());
        self.write("update_reading_text", |tx| {
            let changed = tx.execute(&sql, params![reading_id.get(), html])?;
            ensure_changed(changed, "reading", reading_id)
        })
    }

    /// Raw column-name form of [`SqliteStore::update_reading_text`].
    pub fn update_reading_field(
        &mut self,
        reading_id: ReadingId,
        column: &str,
        html: Option<&str>,
    ) -> Result<(), StoreError> {
        let field = ReadingTextField::from_column(column).ok_or_else(|| {
            StoreError::InvalidField {
                field: column.to_string(),
            }
        })?;
        self.update_reading_text(reading_id, field, html)
    }

    /// Saves the unity statement with its kind of work and the driving question it answers.
    pub fn save_reading_unity(
        &mut self,
        reading_id: ReadingId,
        unity_html: Option<&str>,
        kind_of_work: Option<&str>,
        driving_question_id: Option<EntryId>,
    ) -> Result<(), StoreError> {
        self.write("save_reading_unity", |tx| {
            if let Some(question) = driving_question_id {
                let header = require_entry_kind(tx, question, EntryKind::DrivingQuestion)?;
                if header.reading_id != reading_id {
                    return Err(StoreError::InvalidInput(
                        "driving question belongs to another reading",
                    ));
                }
            }
            let changed = tx.execute(
                "UPDATE readings SET unity_html = ?2, unity_kind_of_work = ?3, \
                   unity_driving_question_id = ?4 \
                 WHERE id = ?1",
                params![
                    reading_id.get(),
                    unity_html,
                    kind_of_work.and_then(non_empty),
                    driving_question_id.map(EntryId::get),
                ],
            )?;
            ensure_changed(changed, "reading", reading_id)
        })
    }

    /// Outline, attachments, entries and anchors of the reading go with it.
    pub fn delete_reading(&mut self, reading_id: ReadingId) -> Result<(), StoreError> {
        self.write("delete_reading", |tx| {
            let changed = tx.execute(
                "DELETE FROM readings WHERE id = ?1",
                params![reading_id.get()],
            )?;
            ensure_changed(changed, "reading", reading_id)?;
            tracing::info!(reading = %reading_id, "reading deleted");
            Ok(())
        })
    }

    pub fn update_reading_order(
        &mut self,
        project_id: ItemId,
        ordered: &[ReadingId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_reading_order", |tx| {
            SiblingScope::readings(project_id).apply_ordering(tx, &ids)
        })
    }
}
