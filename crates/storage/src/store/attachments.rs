#![forbid(unsafe_code)]

use super::support::{SiblingScope, attachment_from_row, ensure_changed, ensure_reading_exists};
use super::{AttachmentRow, SqliteStore, StoreError};
use rt_core::{AttachmentId, ReadingId};
use rusqlite::{OptionalExtension, params};

const ATTACHMENT_COLUMNS: &str = "id, reading_id, display_name, file_path, display_order";

impl SqliteStore {
    /// Records a file reference; the file itself is never read or copied.
    pub fn add_attachment(
        &mut self,
        reading_id: ReadingId,
        display_name: &str,
        file_path: &str,
    ) -> Result<AttachmentId, StoreError> {
        let display_name = display_name.trim();
        let file_path = file_path.trim();
        if display_name.is_empty() || file_path.is_empty() {
            return Err(StoreError::InvalidInput(
                "attachment needs a display name and a file path",
            ));
        }
        self.write("add_attachment", |tx| {
            ensure_reading_exists(tx, reading_id)?;
            let order = SiblingScope::attachments(reading_id).next_order(tx)?;
            tx.execute(
                "INSERT INTO reading_attachments(reading_id, display_name, file_path, display_order) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![reading_id.get(), display_name, file_path, order],
            )?;
            Ok(AttachmentId::new(tx.last_insert_rowid()))
        })
    }

    pub fn list_attachments(&self, reading_id: ReadingId) -> Result<Vec<AttachmentRow>, StoreError> {
        let sql = format!(
            "SELECT {ATTACHMENT_COLUMNS} FROM reading_attachments WHERE reading_id = ?1 \
             ORDER BY display_order, id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![reading_id.get()], attachment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_attachment(
        &self,
        attachment_id: AttachmentId,
    ) -> Result<Option<AttachmentRow>, StoreError> {
        let sql = format!("SELECT {ATTACHMENT_COLUMNS} FROM reading_attachments WHERE id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![attachment_id.get()], attachment_from_row)
            .optional()?)
    }

    pub fn rename_attachment(
        &mut self,
        attachment_id: AttachmentId,
        display_name: &str,
    ) -> Result<(), StoreError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(StoreError::InvalidInput("attachment name must not be empty"));
        }
        self.write("rename_attachment", |tx| {
            let changed = tx.execute(
                "UPDATE reading_attachments SET display_name = ?2 WHERE id = ?1",
                params![attachment_id.get(), display_name],
            )?;
            ensure_changed(changed, "attachment", attachment_id)
        })
    }

    pub fn delete_attachment(&mut self, attachment_id: AttachmentId) -> Result<(), StoreError> {
        self.write("delete_attachment", |tx| {
            let changed = tx.execute(
                "DELETE FROM reading_attachments WHERE id = ?1",
                params![attachment_id.get()],
            )?;
            ensure_changed(changed, "attachment", attachment_id)
        })
    }

    pub fn update_attachment_order(
        &mut self,
        reading_id: ReadingId,
        ordered: &[AttachmentId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_attachment_order", |tx| {
            SiblingScope::attachments(reading_id).apply_ordering(tx, &ids)
        })
    }
}
