#![forbid(unsafe_code)]

//! Driving questions, key terms, propositions, theories and arguments.
//!
//! Every write re-synchronizes the entry's virtual anchor with the supplied tag string in the
//! same transaction, so an entry has an anchor exactly while it carries at least one tag.

use super::support::{
    ENTRY_COLUMNS, EntryColumns, SiblingScope, VirtualSource, ensure_outline_in_reading,
    insert_entry_tx, kind_filter, project_id_for_reading_tx, query_entries, replace_evidence_tx,
    require_entry_kind, sync_virtual_anchor_tx, update_entry_columns_tx, virtual_anchor_for_entry,
};
use super::{EntryRow, QuestionLevel, SqliteStore, StoreError};
use rt_core::{EntryId, EntryKind, EntryPayload, OutlineId, ReadingId, parse_tag_list};
use rusqlite::{Connection, OptionalExtension, params};

fn payload_outline(payload: &EntryPayload) -> Option<OutlineId> {
    match payload {
        EntryPayload::DrivingQuestion(dq) => dq.outline_id,
        EntryPayload::KeyTerm(term) => term.outline_id,
        EntryPayload::Proposition(prop) => prop.outline_id,
        EntryPayload::Theory(theory) => theory.outline_id,
        EntryPayload::Argument(_) => None,
    }
}

fn is_working(payload: &EntryPayload) -> bool {
    matches!(payload, EntryPayload::DrivingQuestion(dq) if dq.is_working_question)
}

/// The driving question must exist, be a driving question and live in `reading_id`.
fn ensure_question_in_reading(
    conn: &Connection,
    question_id: EntryId,
    reading_id: ReadingId,
) -> Result<(), StoreError> {
    let header = require_entry_kind(conn, question_id, EntryKind::DrivingQuestion)?;
    if header.reading_id != reading_id {
        return Err(StoreError::InvalidInput(
            "driving question belongs to another reading",
        ));
    }
    Ok(())
}

/// Reference checks shared by add and update.
fn validate_references(
    conn: &Connection,
    reading_id: ReadingId,
    payload: &EntryPayload,
) -> Result<(), StoreError> {
    ensure_outline_in_reading(conn, payload_outline(payload), reading_id)?;
    match payload {
        EntryPayload::DrivingQuestion(dq) => {
            if let Some(parent) = dq.parent_id {
                ensure_question_in_reading(conn, parent, reading_id)?;
            }
        }
        EntryPayload::Argument(argument) => {
            if let Some(question) = argument.driving_question_id {
                ensure_question_in_reading(conn, question, reading_id)?;
            }
            for evidence in &argument.evidence {
                ensure_outline_in_reading(conn, evidence.outline_id, reading_id)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn question_parent(conn: &Connection, entry_id: EntryId) -> Result<Option<EntryId>, StoreError> {
    let parent: Option<Option<i64>> = conn
        .query_row(
            "SELECT parent_id FROM reading_driving_questions WHERE id = ?1",
            params![entry_id.get()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(parent.flatten().map(EntryId::new))
}

/// True when `candidate` is `entry_id` or one of its sub-questions.
fn is_same_or_sub_question(
    conn: &Connection,
    candidate: EntryId,
    entry_id: EntryId,
) -> Result<bool, StoreError> {
    let mut cursor = Some(candidate);
    let mut hops = 0usize;
    while let Some(current) = cursor {
        if current == entry_id {
            return Ok(true);
        }
        hops += 1;
        if hops > 10_000 {
            return Err(StoreError::InvalidInput("question hierarchy contains a cycle"));
        }
        cursor = question_parent(conn, current)?;
    }
    Ok(false)
}

fn clear_working_questions_tx(
    conn: &Connection,
    reading_id: ReadingId,
    keep: Option<EntryId>,
) -> Result<usize, StoreError> {
    let sql = format!(
        "UPDATE reading_driving_questions SET is_working_question = 0 \
         WHERE reading_id = ?1 AND is_working_question != 0 AND id IS NOT ?2 AND {}",
        kind_filter(EntryKind::DrivingQuestion)
    );
    Ok(conn.execute(&sql, params![reading_id.get(), keep.map(EntryId::get)])?)
}

fn sync_entry_tags(
    conn: &Connection,
    reading_id: ReadingId,
    entry_id: EntryId,
    payload: &EntryPayload,
    tag_names: &[String],
) -> Result<(), StoreError> {
    let source = VirtualSource {
        project_id: project_id_for_reading_tx(conn, reading_id)?,
        reading_id,
        entry_id,
        kind: payload.kind(),
        summary_source: payload.summary_source(),
    };
    sync_virtual_anchor_tx(conn, &source, tag_names)?;
    Ok(())
}

impl SqliteStore {
    /// Appends an entry of the payload's kind and tags it with the comma-separated `tags`.
    pub fn add_entry(
        &mut self,
        reading_id: ReadingId,
        payload: &EntryPayload,
        tags: &str,
    ) -> Result<EntryId, StoreError> {
        payload.validate()?;
        let tag_names = parse_tag_list(tags)?;
        let kind = payload.kind();

        self.write("add_entry", |tx| {
            project_id_for_reading_tx(tx, reading_id)?;
            validate_references(tx, reading_id, payload)?;

            let order = SiblingScope::entries(reading_id, kind, payload.parent_id()).next_order(tx)?;
            let entry_id = insert_entry_tx(tx, reading_id, order, &EntryColumns::from_payload(payload))?;

            if let EntryPayload::Argument(argument) = payload {
                replace_evidence_tx(tx, entry_id, &argument.evidence)?;
            }
            if is_working(payload) {
                clear_working_questions_tx(tx, reading_id, Some(entry_id))?;
            }
            sync_entry_tags(tx, reading_id, entry_id, payload, &tag_names)?;

            tracing::debug!(entry = %entry_id, kind = kind.anchor_item_type(), "entry added");
            Ok(entry_id)
        })
    }

    /// Overwrites the entry's fields and replaces its tag set. The stored kind must match the
    /// payload's kind; a driving question moved to another parent is appended there.
    pub fn update_entry(
        &mut self,
        entry_id: EntryId,
        payload: &EntryPayload,
        tags: &str,
    ) -> Result<(), StoreError> {
        payload.validate()?;
        let tag_names = parse_tag_list(tags)?;
        let kind = payload.kind();

        self.write("update_entry", |tx| {
            let header = require_entry_kind(tx, entry_id, kind)?;
            let reading_id = header.reading_id;
            validate_references(tx, reading_id, payload)?;

            let new_parent = payload.parent_id();
            if let Some(parent) = new_parent {
                if is_same_or_sub_question(tx, parent, entry_id)? {
                    return Err(StoreError::InvalidInput(
                        "a question cannot be nested under itself or its sub-questions",
                    ));
                }
            }

            let old_parent = question_parent(tx, entry_id)?;
            let changed =
                update_entry_columns_tx(tx, entry_id, kind, &EntryColumns::from_payload(payload))?;
            if changed == 0 {
                return Err(StoreError::not_found("entry", entry_id));
            }
            if kind == EntryKind::DrivingQuestion && old_parent != new_parent {
                let order = SiblingScope::entries(reading_id, kind, new_parent).next_order(tx)?;
                tx.execute(
                    "UPDATE reading_driving_questions SET display_order = ?2 WHERE id = ?1",
                    params![entry_id.get(), order],
                )?;
            }

            if let EntryPayload::Argument(argument) = payload {
                replace_evidence_tx(tx, entry_id, &argument.evidence)?;
            }
            if is_working(payload) {
                clear_working_questions_tx(tx, reading_id, Some(entry_id))?;
            }
            sync_entry_tags(tx, reading_id, entry_id, payload, &tag_names)
        })
    }

    pub fn get_entry(&self, entry_id: EntryId, kind: EntryKind) -> Result<Option<EntryRow>, StoreError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM reading_driving_questions WHERE id = ?1 AND {}",
            kind_filter(kind)
        );
        Ok(query_entries(&self.conn, &sql, params![entry_id.get()])?
            .into_iter()
            .next())
    }

    /// Every entry of `kind` in the reading, by `(display_order, id)`. Nested driving questions
    /// are included; see [`SqliteStore::list_driving_questions`] for one level.
    pub fn list_entries(
        &self,
        reading_id: ReadingId,
        kind: EntryKind,
    ) -> Result<Vec<EntryRow>, StoreError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM reading_driving_questions \
             WHERE reading_id = ?1 AND {} ORDER BY display_order, id",
            kind_filter(kind)
        );
        query_entries(&self.conn, &sql, params![reading_id.get()])
    }

    pub fn list_driving_questions(
        &self,
        reading_id: ReadingId,
        level: QuestionLevel,
    ) -> Result<Vec<EntryRow>, StoreError> {
        let filter = kind_filter(EntryKind::DrivingQuestion);
        match level {
            QuestionLevel::All => self.list_entries(reading_id, EntryKind::DrivingQuestion),
            QuestionLevel::TopLevel => {
                let sql = format!(
                    "SELECT {ENTRY_COLUMNS} FROM reading_driving_questions \
                     WHERE reading_id = ?1 AND parent_id IS NULL AND {filter} \
                     ORDER BY display_order, id"
                );
                query_entries(&self.conn, &sql, params![reading_id.get()])
            }
            QuestionLevel::ChildrenOf(parent) => {
                let sql = format!(
                    "SELECT {ENTRY_COLUMNS} FROM reading_driving_questions \
                     WHERE reading_id = ?1 AND parent_id = ?2 AND {filter} \
                     ORDER BY display_order, id"
                );
                query_entries(&self.conn, &sql, params![reading_id.get(), parent.get()])
            }
        }
    }

    /// Deletes the entry and its virtual anchor; sub-questions and evidence cascade.
    pub fn delete_entry(&mut self, entry_id: EntryId, kind: EntryKind) -> Result<(), StoreError> {
        self.write("delete_entry", |tx| {
            require_entry_kind(tx, entry_id, kind)?;
            if let Some(anchor_id) = virtual_anchor_for_entry(tx, entry_id)? {
                tx.execute(
                    "DELETE FROM synthesis_anchors WHERE id = ?1",
                    params![anchor_id.get()],
                )?;
            }
            tx.execute(
                "DELETE FROM reading_driving_questions WHERE id = ?1",
                params![entry_id.get()],
            )?;
            tracing::info!(entry = %entry_id, kind = kind.anchor_item_type(), "entry deleted");
            Ok(())
        })
    }

    /// Reorders one sibling set: the reading's entries of `kind`, or for driving questions the
    /// children of `parent_id`.
    pub fn update_entry_order(
        &mut self,
        reading_id: ReadingId,
        kind: EntryKind,
        parent_id: Option<EntryId>,
        ordered: &[EntryId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_entry_order", |tx| {
            SiblingScope::entries(reading_id, kind, parent_id).apply_ordering(tx, &ids)
        })
    }

    pub fn find_working_question(
        &self,
        reading_id: ReadingId,
    ) -> Result<Option<EntryRow>, StoreError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM reading_driving_questions \
             WHERE reading_id = ?1 AND is_working_question != 0 AND {} \
             ORDER BY display_order, id LIMIT 1",
            kind_filter(EntryKind::DrivingQuestion)
        );
        Ok(query_entries(&self.conn, &sql, params![reading_id.get()])?
            .into_iter()
            .next())
    }

    /// Returns how many questions lost the flag.
    pub fn clear_working_questions(&mut self, reading_id: ReadingId) -> Result<usize, StoreError> {
        self.write("clear_working_questions", |tx| {
            clear_working_questions_tx(tx, reading_id, None)
        })
    }
}
