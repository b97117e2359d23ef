#![forbid(unsafe_code)]

use super::super::StoreError;
use super::entry_columns::kind_filter;
use rt_core::{EntryId, EntryKind, ItemId, OutlineId, ReadingId, next_display_order};
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

/// Rows sharing one display-order sequence.
///
/// Appends go to `MAX(display_order) + 1` (0 for an empty scope). Gaps left by deletes are
/// tolerated because every listing orders by `(display_order, id)`.
pub(in crate::store) struct SiblingScope {
    table: &'static str,
    filter: String,
    args: Vec<Value>,
}

impl SiblingScope {
    fn new(table: &'static str, filter: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            table,
            filter: filter.into(),
            args,
        }
    }

    pub(in crate::store) fn items(parent_id: Option<ItemId>) -> Self {
        match parent_id {
            None => Self::new("items", "parent_id IS NULL", Vec::new()),
            Some(parent) => Self::new("items", "parent_id = ?", vec![Value::Integer(parent.get())]),
        }
    }

    pub(in crate::store) fn readings(project_id: ItemId) -> Self {
        Self::new(
            "readings",
            "project_id = ?",
            vec![Value::Integer(project_id.get())],
        )
    }

    pub(in crate::store) fn outline(reading_id: ReadingId, parent_id: Option<OutlineId>) -> Self {
        let reading = Value::Integer(reading_id.get());
        match parent_id {
            None => Self::new(
                "reading_outline",
                "reading_id = ? AND parent_id IS NULL",
                vec![reading],
            ),
            Some(parent) => Self::new(
                "reading_outline",
                "reading_id = ? AND parent_id = ?",
                vec![reading, Value::Integer(parent.get())],
            ),
        }
    }

    /// Driving questions order per parent; the flat kinds order per reading.
    pub(in crate::store) fn entries(
        reading_id: ReadingId,
        kind: EntryKind,
        parent_id: Option<EntryId>,
    ) -> Self {
        let reading = Value::Integer(reading_id.get());
        let kind_sql = kind_filter(kind);
        if kind != EntryKind::DrivingQuestion {
            return Self::new(
                "reading_driving_questions",
                format!("reading_id = ? AND {kind_sql}"),
                vec![reading],
            );
        }
        match parent_id {
            None => Self::new(
                "reading_driving_questions",
                format!("reading_id = ? AND parent_id IS NULL AND {kind_sql}"),
                vec![reading],
            ),
            Some(parent) => Self::new(
                "reading_driving_questions",
                format!("reading_id = ? AND parent_id = ? AND {kind_sql}"),
                vec![reading, Value::Integer(parent.get())],
            ),
        }
    }

    pub(in crate::store) fn attachments(reading_id: ReadingId) -> Self {
        Self::new(
            "reading_attachments",
            "reading_id = ?",
            vec![Value::Integer(reading_id.get())],
        )
    }

    pub(in crate::store) fn rubric(project_id: ItemId) -> Self {
        Self::new(
            "rubric_components",
            "project_id = ?",
            vec![Value::Integer(project_id.get())],
        )
    }

    /// Project-level terminology or propositions, keyed by `project_id`.
    pub(in crate::store) fn project_notes(table: &'static str, project_id: ItemId) -> Self {
        Self::new(table, "project_id = ?", vec![Value::Integer(project_id.get())])
    }

    pub(in crate::store) fn todos(project_id: ItemId) -> Self {
        Self::new(
            "project_todo_list",
            "project_id = ?",
            vec![Value::Integer(project_id.get())],
        )
    }

    pub(in crate::store) fn next_order(&self, conn: &Connection) -> Result<i64, StoreError> {
        let sql = format!(
            "SELECT MAX(display_order) FROM {} WHERE {}",
            self.table, self.filter
        );
        let current_max: Option<i64> =
            conn.query_row(&sql, params_from_iter(self.args.iter()), |row| row.get(0))?;
        Ok(next_display_order(current_max))
    }

    pub(in crate::store) fn sibling_ids(&self, conn: &Connection) -> Result<Vec<i64>, StoreError> {
        let sql = format!(
            "SELECT id FROM {} WHERE {} ORDER BY display_order, id",
            self.table, self.filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let ids = stmt
            .query_map(params_from_iter(self.args.iter()), |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Rewrites `display_order` to positions `0..n`. `ordered` must be a permutation of the
    /// whole sibling set.
    pub(in crate::store) fn apply_ordering(
        &self,
        conn: &Connection,
        ordered: &[i64],
    ) -> Result<(), StoreError> {
        let mut current = self.sibling_ids(conn)?;
        let mut given = ordered.to_vec();
        current.sort_unstable();
        given.sort_unstable();
        if current != given {
            return Err(StoreError::IncompleteOrdering {
                expected: current.len(),
                given: ordered.len(),
            });
        }

        let sql = format!("UPDATE {} SET display_order = ?1 WHERE id = ?2", self.table);
        let mut stmt = conn.prepare(&sql)?;
        for (position, id) in ordered.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StoreError::InvalidInput("ordering is too long"))?;
            stmt.execute(params![position, id])?;
        }
        Ok(())
    }
}
