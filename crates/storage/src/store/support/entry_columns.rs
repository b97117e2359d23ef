#![forbid(unsafe_code)]

//! Column mapping for the shared entry table.
//!
//! Every kind stores into the same physical columns; the mapping from named payload fields to
//! columns, and the `type` predicate selecting one kind, live only here.

use super::super::StoreError;
use super::super::types::EntryRow;
use rt_core::{
    Argument, ArgumentEvidence, DrivingQuestion, EntryId, EntryKind, EntryPayload, KeyTerm,
    OutlineId, Proposition, ReadingId, Theory,
};
use rusqlite::{Connection, OptionalExtension, Row, params};

const DRIVING_QUESTION_FILTER: &str =
    "(type IS NULL OR type NOT IN ('proposition', 'term', 'theory', 'argument'))";

/// SQL predicate on the unaliased `type` column selecting exactly one kind.
pub(in crate::store) fn kind_filter(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::DrivingQuestion => DRIVING_QUESTION_FILTER,
        EntryKind::KeyTerm => "type = 'term'",
        EntryKind::Proposition => "type = 'proposition'",
        EntryKind::Theory => "type = 'theory'",
        EntryKind::Argument => "type = 'argument'",
    }
}

pub(in crate::store) const ENTRY_COLUMNS: &str = "id, reading_id, display_order, parent_id, type, \
     question_text, nickname, question_category, scope, outline_id, pages, why_question, \
     is_working_question, extra_notes_text, because_text, linked_question_id, is_insight";

/// Raw column values of one entry row, in [`ENTRY_COLUMNS`] order after the first three.
#[derive(Debug, Default)]
pub(in crate::store) struct EntryColumns {
    pub(in crate::store) parent_id: Option<i64>,
    pub(in crate::store) discriminator: Option<String>,
    pub(in crate::store) question_text: Option<String>,
    pub(in crate::store) nickname: Option<String>,
    pub(in crate::store) question_category: Option<String>,
    pub(in crate::store) scope: Option<String>,
    pub(in crate::store) outline_id: Option<i64>,
    pub(in crate::store) pages: Option<String>,
    pub(in crate::store) why_question: Option<String>,
    pub(in crate::store) is_working_question: bool,
    pub(in crate::store) extra_notes_text: Option<String>,
    pub(in crate::store) because_text: Option<String>,
    pub(in crate::store) linked_question_id: Option<i64>,
    pub(in crate::store) is_insight: bool,
}

fn outline_raw(outline_id: Option<OutlineId>) -> Option<i64> {
    outline_id.map(OutlineId::get)
}

fn outline_typed(raw: Option<i64>) -> Option<OutlineId> {
    raw.map(OutlineId::new)
}

impl EntryColumns {
    pub(in crate::store) fn from_payload(payload: &EntryPayload) -> Self {
        match payload {
            EntryPayload::DrivingQuestion(dq) => Self {
                parent_id: dq.parent_id.map(EntryId::get),
                discriminator: dq.label.clone(),
                question_text: Some(dq.question_text.clone()),
                nickname: dq.nickname.clone(),
                question_category: dq.category.clone(),
                scope: dq.scope.clone(),
                outline_id: outline_raw(dq.outline_id),
                pages: dq.pages.clone(),
                why_question: dq.why_question.clone(),
                is_working_question: dq.is_working_question,
                extra_notes_text: dq.extra_notes.clone(),
                ..Self::default()
            },
            EntryPayload::KeyTerm(term) => Self {
                discriminator: Some("term".to_string()),
                question_text: Some(term.term.clone()),
                question_category: term.definition.clone(),
                nickname: term.role.clone(),
                scope: term.quote.clone(),
                outline_id: outline_raw(term.outline_id),
                pages: term.pages.clone(),
                why_question: term.notes.clone(),
                ..Self::default()
            },
            EntryPayload::Proposition(prop) => Self {
                discriminator: Some("proposition".to_string()),
                question_text: Some(prop.proposition_text.clone()),
                nickname: prop.nickname.clone(),
                outline_id: outline_raw(prop.outline_id),
                pages: prop.pages.clone(),
                why_question: prop.why_important.clone(),
                ..Self::default()
            },
            EntryPayload::Theory(theory) => Self {
                discriminator: Some("theory".to_string()),
                question_text: Some(theory.name.clone()),
                nickname: theory.author.clone(),
                scope: theory.year.clone(),
                question_category: theory.description.clone(),
                outline_id: outline_raw(theory.outline_id),
                pages: theory.pages.clone(),
                why_question: theory.purpose.clone(),
                extra_notes_text: theory.notes.clone(),
                ..Self::default()
            },
            EntryPayload::Argument(argument) => Self {
                discriminator: Some("argument".to_string()),
                question_text: Some(argument.claim_text.clone()),
                because_text: argument.because_text.clone(),
                linked_question_id: argument.driving_question_id.map(EntryId::get),
                is_insight: argument.is_insight,
                ..Self::default()
            },
        }
    }

    /// Reads columns starting at `offset` (the `parent_id` position of [`ENTRY_COLUMNS`]).
    pub(in crate::store) fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            parent_id: row.get(offset)?,
            discriminator: row.get(offset + 1)?,
            question_text: row.get(offset + 2)?,
            nickname: row.get(offset + 3)?,
            question_category: row.get(offset + 4)?,
            scope: row.get(offset + 5)?,
            outline_id: row.get(offset + 6)?,
            pages: row.get(offset + 7)?,
            why_question: row.get(offset + 8)?,
            is_working_question: row.get::<_, i64>(offset + 9)? != 0,
            extra_notes_text: row.get(offset + 10)?,
            because_text: row.get(offset + 11)?,
            linked_question_id: row.get(offset + 12)?,
            is_insight: row.get::<_, i64>(offset + 13)? != 0,
        })
    }

    pub(in crate::store) fn kind(&self) -> EntryKind {
        EntryKind::from_discriminator(self.discriminator.as_deref())
    }

    pub(in crate::store) fn into_payload(self, evidence: Vec<ArgumentEvidence>) -> EntryPayload {
        let text = self.question_text.unwrap_or_default();
        match EntryKind::from_discriminator(self.discriminator.as_deref()) {
            EntryKind::DrivingQuestion => EntryPayload::DrivingQuestion(DrivingQuestion {
                parent_id: self.parent_id.map(EntryId::new),
                question_text: text,
                nickname: self.nickname,
                label: self.discriminator,
                category: self.question_category,
                scope: self.scope,
                outline_id: outline_typed(self.outline_id),
                pages: self.pages,
                why_question: self.why_question,
                is_working_question: self.is_working_question,
                extra_notes: self.extra_notes_text,
            }),
            EntryKind::KeyTerm => EntryPayload::KeyTerm(KeyTerm {
                term: text,
                definition: self.question_category,
                role: self.nickname,
                quote: self.scope,
                outline_id: outline_typed(self.outline_id),
                pages: self.pages,
                notes: self.why_question,
            }),
            EntryKind::Proposition => EntryPayload::Proposition(Proposition {
                proposition_text: text,
                nickname: self.nickname,
                outline_id: outline_typed(self.outline_id),
                pages: self.pages,
                why_important: self.why_question,
            }),
            EntryKind::Theory => EntryPayload::Theory(Theory {
                name: text,
                author: self.nickname,
                year: self.scope,
                outline_id: outline_typed(self.outline_id),
                pages: self.pages,
                description: self.question_category,
                purpose: self.why_question,
                notes: self.extra_notes_text,
            }),
            EntryKind::Argument => EntryPayload::Argument(Argument {
                claim_text: text,
                because_text: self.because_text,
                driving_question_id: self.linked_question_id.map(EntryId::new),
                is_insight: self.is_insight,
                evidence,
            }),
        }
    }
}

pub(in crate::store) fn insert_entry_tx(
    conn: &Connection,
    reading_id: ReadingId,
    display_order: i64,
    columns: &EntryColumns,
) -> Result<EntryId, StoreError> {
    conn.execute(
        "INSERT INTO reading_driving_questions(reading_id, display_order, parent_id, type, \
         question_text, nickname, question_category, scope, outline_id, pages, why_question, \
         is_working_question, extra_notes_text, because_text, linked_question_id, is_insight) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            reading_id.get(),
            display_order,
            columns.parent_id,
            columns.discriminator,
            columns.question_text,
            columns.nickname,
            columns.question_category,
            columns.scope,
            columns.outline_id,
            columns.pages,
            columns.why_question,
            columns.is_working_question as i64,
            columns.extra_notes_text,
            columns.because_text,
            columns.linked_question_id,
            columns.is_insight as i64,
        ],
    )?;
    Ok(EntryId::new(conn.last_insert_rowid()))
}

/// Overwrites every payload column. The row's kind is fixed by the caller's filter.
pub(in crate::store) fn update_entry_columns_tx(
    conn: &Connection,
    entry_id: EntryId,
    kind: EntryKind,
    columns: &EntryColumns,
) -> Result<usize, StoreError> {
    let sql = format!(
        "UPDATE reading_driving_questions SET parent_id = ?2, type = ?3, question_text = ?4, \
         nickname = ?5, question_category = ?6, scope = ?7, outline_id = ?8, pages = ?9, \
         why_question = ?10, is_working_question = ?11, extra_notes_text = ?12, \
         because_text = ?13, linked_question_id = ?14, is_insight = ?15 \
         WHERE id = ?1 AND {}",
        kind_filter(kind)
    );
    Ok(conn.execute(
        &sql,
        params![
            entry_id.get(),
            columns.parent_id,
            columns.discriminator,
            columns.question_text,
            columns.nickname,
            columns.question_category,
            columns.scope,
            columns.outline_id,
            columns.pages,
            columns.why_question,
            columns.is_working_question as i64,
            columns.extra_notes_text,
            columns.because_text,
            columns.linked_question_id,
            columns.is_insight as i64,
        ],
    )?)
}

/// Identity of an entry row regardless of kind.
#[derive(Clone, Copy, Debug)]
pub(in crate::store) struct EntryHeader {
    pub(in crate::store) reading_id: ReadingId,
    pub(in crate::store) kind: EntryKind,
}

pub(in crate::store) fn load_entry_header(
    conn: &Connection,
    entry_id: EntryId,
) -> Result<Option<EntryHeader>, StoreError> {
    let header = conn
        .query_row(
            "SELECT reading_id, type FROM reading_driving_questions WHERE id = ?1",
            params![entry_id.get()],
            |row| {
                Ok(EntryHeader {
                    reading_id: ReadingId::new(row.get(0)?),
                    kind: EntryKind::from_discriminator(row.get::<_, Option<String>>(1)?.as_deref()),
                })
            },
        )
        .optional()?;
    Ok(header)
}

/// Loads an entry's header and checks it is of `kind`.
pub(in crate::store) fn require_entry_kind(
    conn: &Connection,
    entry_id: EntryId,
    kind: EntryKind,
) -> Result<EntryHeader, StoreError> {
    let header = load_entry_header(conn, entry_id)?
        .ok_or_else(|| StoreError::not_found("entry", entry_id))?;
    if header.kind != kind {
        return Err(StoreError::KindMismatch {
            id: entry_id.get(),
            expected: kind.anchor_item_type(),
        });
    }
    Ok(header)
}

pub(in crate::store) fn load_evidence(
    conn: &Connection,
    argument_id: EntryId,
) -> Result<Vec<ArgumentEvidence>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT outline_id, pages_text, argument_text, reading_text, role_in_argument, \
         evidence_type, status, rationale_text \
         FROM argument_evidence WHERE argument_id = ?1 ORDER BY display_order, id",
    )?;
    let evidence = stmt
        .query_map(params![argument_id.get()], |row| {
            Ok(ArgumentEvidence {
                outline_id: row.get::<_, Option<i64>>(0)?.map(OutlineId::new),
                pages_text: row.get(1)?,
                argument_text: row.get(2)?,
                reading_text: row.get(3)?,
                role_in_argument: row.get(4)?,
                evidence_type: row.get(5)?,
                status: row.get(6)?,
                rationale_text: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(evidence)
}

/// Replaces an argument's evidence rows with `evidence`, in the given order.
pub(in crate::store) fn replace_evidence_tx(
    conn: &Connection,
    argument_id: EntryId,
    evidence: &[ArgumentEvidence],
) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM argument_evidence WHERE argument_id = ?1",
        params![argument_id.get()],
    )?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO argument_evidence(argument_id, display_order, outline_id, pages_text, \
         argument_text, reading_text, role_in_argument, evidence_type, status, rationale_text) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    for (position, item) in evidence.iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| StoreError::InvalidInput("too many evidence rows"))?;
        stmt.execute(params![
            argument_id.get(),
            position,
            outline_raw(item.outline_id),
            item.pages_text,
            item.argument_text,
            item.reading_text,
            item.role_in_argument,
            item.evidence_type,
            item.status,
            item.rationale_text,
        ])?;
    }
    Ok(())
}

/// Tag names on an entry's virtual anchor, in link order.
pub(in crate::store) fn entry_tag_names(
    conn: &Connection,
    entry_id: EntryId,
) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT t.name FROM synthesis_anchors a \
         JOIN anchor_tag_links l ON l.anchor_id = a.id \
         JOIN synthesis_tags t ON t.id = l.tag_id \
         WHERE a.item_link_id = ?1 \
         ORDER BY l.rowid",
    )?;
    let names = stmt
        .query_map(params![entry_id.get()], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Maps a row selected with [`ENTRY_COLUMNS`] and attaches evidence and tags.
pub(in crate::store) fn entry_row_from_parts(
    conn: &Connection,
    id: i64,
    reading_id: i64,
    display_order: i64,
    columns: EntryColumns,
) -> Result<EntryRow, StoreError> {
    let entry_id = EntryId::new(id);
    let evidence = if columns.kind() == EntryKind::Argument {
        load_evidence(conn, entry_id)?
    } else {
        Vec::new()
    };
    Ok(EntryRow {
        id: entry_id,
        reading_id: ReadingId::new(reading_id),
        display_order,
        payload: columns.into_payload(evidence),
        tags: entry_tag_names(conn, entry_id)?,
    })
}

/// Runs a query selecting [`ENTRY_COLUMNS`] and maps every row.
pub(in crate::store) fn query_entries<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<EntryRow>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let raw = stmt
        .query_map(params, |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                EntryColumns::from_row(row, 3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    raw.into_iter()
        .map(|(id, reading_id, display_order, columns)| {
            entry_row_from_parts(conn, id, reading_id, display_order, columns)
        })
        .collect()
}

pub(in crate::store) fn ensure_reading_exists(
    conn: &Connection,
    reading_id: ReadingId,
) -> Result<(), StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM readings WHERE id = ?1",
            params![reading_id.get()],
            |row| row.get(0),
        )
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| StoreError::not_found("reading", reading_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_core::RESERVED_DISCRIMINATORS;

    #[test]
    fn driving_question_filter_excludes_every_reserved_kind() {
        let filter = kind_filter(EntryKind::DrivingQuestion);
        for reserved in RESERVED_DISCRIMINATORS {
            assert!(filter.contains(&format!("'{reserved}'")), "{reserved}");
        }
        for kind in EntryKind::ALL {
            if let Some(discriminator) = kind.discriminator() {
                assert_eq!(kind_filter(kind), format!("type = '{discriminator}'"));
            }
        }
    }

    #[test]
    fn theory_columns_round_trip() {
        let payload = EntryPayload::Theory(Theory {
            name: "Social contract".to_string(),
            author: Some("Rousseau".to_string()),
            year: Some("1762".to_string()),
            description: Some("Legitimacy from consent".to_string()),
            notes: Some("Compare Hobbes".to_string()),
            ..Theory::default()
        });
        let columns = EntryColumns::from_payload(&payload);
        assert_eq!(columns.kind(), EntryKind::Theory);
        assert_eq!(columns.nickname.as_deref(), Some("Rousseau"));
        assert_eq!(columns.into_payload(Vec::new()), payload);
    }
}
