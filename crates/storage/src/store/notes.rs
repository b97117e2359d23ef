#![forbid(unsafe_code)]

use super::support::{
    SiblingScope, ensure_changed, ensure_outline_in_reading, project_id_for_reading_tx,
    require_item,
};
use super::{
    NoteReference, NoteReferenceRow, ProjectPropositionDetails, ProjectPropositionDraft,
    ProjectPropositionSummary, ReadingStatus, SqliteStore, StoreError, TermDetails, TermDraft,
    TermSummary,
};
use rt_core::{ItemId, OutlineId, ProjectPropositionId, ReadingId, ReferenceId, TerminologyId};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;

/// Table layout of one kind of project note: the note table, its per-reading status links and
/// its references.
struct NoteTables {
    entity: &'static str,
    main: &'static str,
    name_column: &'static str,
    body_column: &'static str,
    links: &'static str,
    references: &'static str,
    owner_column: &'static str,
    addressed_column: &'static str,
    blank_name: &'static str,
}

const TERMINOLOGY: NoteTables = NoteTables {
    entity: "terminology",
    main: "project_terminology",
    name_column: "term",
    body_column: "meaning",
    links: "terminology_reading_links",
    references: "terminology_references",
    owner_column: "terminology_id",
    addressed_column: "author_address",
    blank_name: "term must not be empty",
};

const PROPOSITIONS: NoteTables = NoteTables {
    entity: "project proposition",
    main: "project_propositions",
    name_column: "display_name",
    body_column: "proposition_html",
    links: "proposition_reading_links",
    references: "proposition_references",
    owner_column: "proposition_id",
    addressed_column: "how_addressed",
    blank_name: "proposition name must not be empty",
};

struct NoteContent<'a> {
    name: &'a str,
    body: Option<&'a str>,
    statuses: &'a [ReadingStatus],
    references: &'a [NoteReference],
}

struct NoteHeader {
    project_id: ItemId,
    name: String,
    body: Option<String>,
    display_order: i64,
}

fn ensure_reading_in_project(
    conn: &Connection,
    reading_id: ReadingId,
    project_id: ItemId,
) -> Result<(), StoreError> {
    if project_id_for_reading_tx(conn, reading_id)? != project_id {
        return Err(StoreError::InvalidInput("reading belongs to another project"));
    }
    Ok(())
}

impl NoteTables {
    fn checked_name<'a>(&self, name: &'a str) -> Result<&'a str, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput(self.blank_name));
        }
        Ok(name)
    }

    fn validate_readings(
        &self,
        conn: &Connection,
        project_id: ItemId,
        content: &NoteContent<'_>,
    ) -> Result<(), StoreError> {
        for status in content.statuses {
            ensure_reading_in_project(conn, status.reading_id, project_id)?;
        }
        for reference in content.references {
            ensure_reading_in_project(conn, reference.reading_id, project_id)?;
            ensure_outline_in_reading(conn, reference.outline_id, reference.reading_id)?;
        }
        Ok(())
    }

    /// Inserts or updates the note, upserts its statuses and rewrites its references.
    fn save_tx(
        &self,
        conn: &Connection,
        project_id: ItemId,
        existing: Option<i64>,
        content: &NoteContent<'_>,
    ) -> Result<i64, StoreError> {
        require_item(conn, project_id)?;
        self.validate_readings(conn, project_id, content)?;

        let note_id = match existing {
            Some(note_id) => {
                let sql = format!(
                    "UPDATE {} SET {} = ?3, {} = ?4 WHERE id = ?1 AND project_id = ?2",
                    self.main, self.name_column, self.body_column
                );
                let changed = conn.execute(
                    &sql,
                    params![note_id, project_id.get(), content.name, content.body],
                )?;
                ensure_changed(changed, self.entity, note_id)?;
                note_id
            }
            None => {
                let order = SiblingScope::project_notes(self.main, project_id).next_order(conn)?;
                let sql = format!(
                    "INSERT INTO {}(project_id, {}, {}, display_order) VALUES (?1, ?2, ?3, ?4)",
                    self.main, self.name_column, self.body_column
                );
                conn.execute(
                    &sql,
                    params![project_id.get(), content.name, content.body, order],
                )?;
                conn.last_insert_rowid()
            }
        };

        conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1", self.references, self.owner_column),
            params![note_id],
        )?;

        let upsert = format!(
            "INSERT INTO {links}({owner}, reading_id, not_in_reading) VALUES (?1, ?2, ?3) \
             ON CONFLICT({owner}, reading_id) DO UPDATE SET not_in_reading = excluded.not_in_reading",
            links = self.links,
            owner = self.owner_column,
        );
        let mut stmt = conn.prepare(&upsert)?;
        for status in content.statuses {
            stmt.execute(params![
                note_id,
                status.reading_id.get(),
                status.not_in_reading as i64
            ])?;
        }
        drop(stmt);

        let absent: HashSet<ReadingId> = content
            .statuses
            .iter()
            .filter(|status| status.not_in_reading)
            .map(|status| status.reading_id)
            .collect();
        let insert = format!(
            "INSERT INTO {}({}, reading_id, outline_id, page_number, {}, notes) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.references, self.owner_column, self.addressed_column
        );
        let mut stmt = conn.prepare(&insert)?;
        let mut kept = 0usize;
        for reference in content
            .references
            .iter()
            .filter(|reference| !absent.contains(&reference.reading_id))
        {
            stmt.execute(params![
                note_id,
                reference.reading_id.get(),
                reference.outline_id.map(OutlineId::get),
                reference.page_number,
                reference.addressed,
                reference.notes,
            ])?;
            kept += 1;
        }

        tracing::debug!(entity = self.entity, id = note_id, references = kept, "project note saved");
        Ok(note_id)
    }

    fn list(&self, conn: &Connection, project_id: ItemId) -> Result<Vec<(i64, String)>, StoreError> {
        let sql = format!(
            "SELECT id, {} FROM {} WHERE project_id = ?1 ORDER BY display_order, id",
            self.name_column, self.main
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![project_id.get()], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn header(&self, conn: &Connection, note_id: i64) -> Result<Option<NoteHeader>, StoreError> {
        let sql = format!(
            "SELECT project_id, {}, {}, display_order FROM {} WHERE id = ?1",
            self.name_column, self.body_column, self.main
        );
        Ok(conn
            .query_row(&sql, params![note_id], |row| {
                Ok(NoteHeader {
                    project_id: ItemId::new(row.get(0)?),
                    name: row.get(1)?,
                    body: row.get(2)?,
                    display_order: row.get(3)?,
                })
            })
            .optional()?)
    }

    fn statuses(&self, conn: &Connection, note_id: i64) -> Result<Vec<ReadingStatus>, StoreError> {
        let sql = format!(
            "SELECT reading_id, not_in_reading FROM {} WHERE {} = ?1 ORDER BY reading_id",
            self.links, self.owner_column
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![note_id], |row| {
                Ok(ReadingStatus {
                    reading_id: ReadingId::new(row.get(0)?),
                    not_in_reading: row.get::<_, i64>(1)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn reference_rows(
        &self,
        conn: &Connection,
        note_id: i64,
    ) -> Result<Vec<NoteReferenceRow>, StoreError> {
        let sql = format!(
            "SELECT r.id, r.reading_id, r.outline_id, o.section_title, r.page_number, r.{}, r.notes \
             FROM {} r LEFT JOIN reading_outline o ON o.id = r.outline_id \
             WHERE r.{} = ?1 ORDER BY r.id",
            self.addressed_column, self.references, self.owner_column
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![note_id], |row| {
                Ok(NoteReferenceRow {
                    id: ReferenceId::new(row.get(0)?),
                    reading_id: ReadingId::new(row.get(1)?),
                    outline_id: row.get::<_, Option<i64>>(2)?.map(OutlineId::new),
                    section_title: row.get(3)?,
                    page_number: row.get(4)?,
                    addressed: row.get(5)?,
                    notes: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn delete_tx(&self, conn: &Connection, note_id: i64) -> Result<(), StoreError> {
        let changed = conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1", self.main),
            params![note_id],
        )?;
        ensure_changed(changed, self.entity, note_id)
    }

    fn reorder_tx(
        &self,
        conn: &Connection,
        project_id: ItemId,
        ordered: &[i64],
    ) -> Result<(), StoreError> {
        SiblingScope::project_notes(self.main, project_id).apply_ordering(conn, ordered)
    }
}

impl SqliteStore {
    /// Creates a term when `existing` is `None`, otherwise rewrites it. Statuses and references
    /// must point at readings of the project.
    pub fn save_terminology(
        &mut self,
        project_id: ItemId,
        existing: Option<TerminologyId>,
        draft: &TermDraft,
    ) -> Result<TerminologyId, StoreError> {
        let content = NoteContent {
            name: TERMINOLOGY.checked_name(&draft.term)?,
            body: draft.meaning.as_deref(),
            statuses: &draft.statuses,
            references: &draft.references,
        };
        self.write("save_terminology", |tx| {
            TERMINOLOGY
                .save_tx(tx, project_id, existing.map(TerminologyId::get), &content)
                .map(TerminologyId::new)
        })
    }

    pub fn list_terminology(&self, project_id: ItemId) -> Result<Vec<TermSummary>, StoreError> {
        Ok(TERMINOLOGY
            .list(&self.conn, project_id)?
            .into_iter()
            .map(|(id, term)| TermSummary {
                id: TerminologyId::new(id),
                term,
            })
            .collect())
    }

    pub fn get_terminology_details(
        &self,
        terminology_id: TerminologyId,
    ) -> Result<Option<TermDetails>, StoreError> {
        let id = terminology_id.get();
        let Some(header) = TERMINOLOGY.header(&self.conn, id)? else {
            return Ok(None);
        };
        Ok(Some(TermDetails {
            id: terminology_id,
            project_id: header.project_id,
            term: header.name,
            meaning: header.body,
            display_order: header.display_order,
            statuses: TERMINOLOGY.statuses(&self.conn, id)?,
            references: TERMINOLOGY.reference_rows(&self.conn, id)?,
        }))
    }

    pub fn delete_terminology(&mut self, terminology_id: TerminologyId) -> Result<(), StoreError> {
        self.write("delete_terminology", |tx| {
            TERMINOLOGY.delete_tx(tx, terminology_id.get())
        })
    }

    pub fn update_terminology_order(
        &mut self,
        project_id: ItemId,
        ordered: &[TerminologyId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_terminology_order", |tx| {
            TERMINOLOGY.reorder_tx(tx, project_id, &ids)
        })
    }

    pub fn save_project_proposition(
        &mut self,
        project_id: ItemId,
        existing: Option<ProjectPropositionId>,
        draft: &ProjectPropositionDraft,
    ) -> Result<ProjectPropositionId, StoreError> {
        let content = NoteContent {
            name: PROPOSITIONS.checked_name(&draft.display_name)?,
            body: draft.proposition_html.as_deref(),
            statuses: &draft.statuses,
            references: &draft.references,
        };
        self.write("save_project_proposition", |tx| {
            PROPOSITIONS
                .save_tx(tx, project_id, existing.map(ProjectPropositionId::get), &content)
                .map(ProjectPropositionId::new)
        })
    }

    pub fn list_project_propositions(
        &self,
        project_id: ItemId,
    ) -> Result<Vec<ProjectPropositionSummary>, StoreError> {
        Ok(PROPOSITIONS
            .list(&self.conn, project_id)?
            .into_iter()
            .map(|(id, display_name)| ProjectPropositionSummary {
                id: ProjectPropositionId::new(id),
                display_name,
            })
            .collect())
    }

    pub fn get_project_proposition_details(
        &self,
        proposition_id: ProjectPropositionId,
    ) -> Result<Option<ProjectPropositionDetails>, StoreError> {
        let id = proposition_id.get();
        let Some(header) = PROPOSITIONS.header(&self.conn, id)? else {
            return Ok(None);
        };
        Ok(Some(ProjectPropositionDetails {
            id: proposition_id,
            project_id: header.project_id,
            display_name: header.name,
            proposition_html: header.body,
            display_order: header.display_order,
            statuses: PROPOSITIONS.statuses(&self.conn, id)?,
            references: PROPOSITIONS.reference_rows(&self.conn, id)?,
        }))
    }

    pub fn delete_project_proposition(
        &mut self,
        proposition_id: ProjectPropositionId,
    ) -> Result<(), StoreError> {
        self.write("delete_project_proposition", |tx| {
            PROPOSITIONS.delete_tx(tx, proposition_id.get())
        })
    }

    pub fn update_project_proposition_order(
        &mut self,
        project_id: ItemId,
        ordered: &[ProjectPropositionId],
    ) -> Result<(), StoreError> {
        let ids: Vec<i64> = ordered.iter().map(|id| id.get()).collect();
        self.write("update_project_proposition_order", |tx| {
            PROPOSITIONS.reorder_tx(tx, project_id, &ids)
        })
    }
}
