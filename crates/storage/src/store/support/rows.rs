#![forbid(unsafe_code)]

use super::super::types::{
    AnchorRow, AttachmentRow, ItemRow, OutlineRow, PartData, ReadingRow, RubricRow, TagRow,
    TodoRow,
};
use super::super::StoreError;
use rt_core::{
    AnchorId, AnchorSubject, AttachmentId, EntryId, EntryKind, ItemId, ItemKind, OutlineId,
    ReadingId, RubricId, TagId, TodoId,
};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub(in crate::store) fn conversion_error(index: usize, message: &'static str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, message.into())
}

/// Errors with `NotFound` unless the statement touched at least one row.
pub(in crate::store) fn ensure_changed(
    changed: usize,
    entity: &'static str,
    id: impl Into<i64>,
) -> Result<(), StoreError> {
    if changed == 0 {
        return Err(StoreError::not_found(entity, id));
    }
    Ok(())
}

pub(in crate::store) const ITEM_COLUMNS: &str = "id, parent_id, type, name, display_order, \
     is_assignment, project_purpose_text, project_goals_text, key_questions_text, thesis_text, \
     insights_text, unresolved_text, assignment_instructions_text, assignment_draft_text, \
     synthesis_notes_html";

pub(in crate::store) fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
    let kind_raw: String = row.get(2)?;
    let kind = ItemKind::parse(&kind_raw).ok_or_else(|| conversion_error(2, "unknown item type"))?;
    Ok(ItemRow {
        id: ItemId::new(row.get(0)?),
        parent_id: row.get::<_, Option<i64>>(1)?.map(ItemId::new),
        kind,
        name: row.get(3)?,
        display_order: row.get(4)?,
        is_assignment: row.get::<_, i64>(5)? != 0,
        purpose: row.get(6)?,
        goals: row.get(7)?,
        key_questions: row.get(8)?,
        thesis: row.get(9)?,
        insights: row.get(10)?,
        unresolved: row.get(11)?,
        assignment_instructions: row.get(12)?,
        assignment_draft: row.get(13)?,
        synthesis_notes: row.get(14)?,
    })
}

pub(in crate::store) fn load_item(
    conn: &Connection,
    item_id: ItemId,
) -> Result<Option<ItemRow>, StoreError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![item_id.get()], item_from_row)
        .optional()?)
}

pub(in crate::store) fn require_item(
    conn: &Connection,
    item_id: ItemId,
) -> Result<ItemRow, StoreError> {
    load_item(conn, item_id)?.ok_or_else(|| StoreError::not_found("item", item_id))
}

pub(in crate::store) const READING_COLUMNS: &str = "id, project_id, title, author, nickname, \
     display_order, zotero_item_key, published, pages, assignment, level, classification, \
     reading_notes_text, propositions_html, unity_html, key_terms_html, arguments_html, gaps_html, \
     theories_html, personal_dialogue_html, elevator_abstract_html, unity_kind_of_work, \
     unity_driving_question_id";

pub(in crate::store) fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<ReadingRow> {
    Ok(ReadingRow {
        id: ReadingId::new(row.get(0)?),
        project_id: ItemId::new(row.get(1)?),
        title: row.get(2)?,
        author: row.get(3)?,
        nickname: row.get(4)?,
        display_order: row.get(5)?,
        zotero_item_key: row.get(6)?,
        published: row.get(7)?,
        pages: row.get(8)?,
        assignment: row.get(9)?,
        level: row.get(10)?,
        classification: row.get(11)?,
        reading_notes_text: row.get(12)?,
        propositions_html: row.get(13)?,
        unity_html: row.get(14)?,
        key_terms_html: row.get(15)?,
        arguments_html: row.get(16)?,
        gaps_html: row.get(17)?,
        theories_html: row.get(18)?,
        personal_dialogue_html: row.get(19)?,
        elevator_abstract_html: row.get(20)?,
        unity_kind_of_work: row.get(21)?,
        unity_driving_question_id: row.get::<_, Option<i64>>(22)?.map(EntryId::new),
    })
}

pub(in crate::store) fn load_reading(
    conn: &Connection,
    reading_id: ReadingId,
) -> Result<Option<ReadingRow>, StoreError> {
    let sql = format!("SELECT {READING_COLUMNS} FROM readings WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![reading_id.get()], reading_from_row)
        .optional()?)
}

pub(in crate::store) fn project_id_for_reading_tx(
    conn: &Connection,
    reading_id: ReadingId,
) -> Result<ItemId, StoreError> {
    conn.query_row(
        "SELECT project_id FROM readings WHERE id = ?1",
        params![reading_id.get()],
        |row| row.get::<_, i64>(0),
    )
    .optional()?
    .map(ItemId::new)
    .ok_or_else(|| StoreError::not_found("reading", reading_id))
}

pub(in crate::store) const OUTLINE_COLUMNS: &str = "id, reading_id, parent_id, section_title, \
     notes_html, display_order, part_function_text_plain, part_relation_text_plain, \
     part_dependency_text_plain, part_is_structural, part_dq_id";

pub(in crate::store) fn outline_from_row(row: &Row<'_>) -> rusqlite::Result<OutlineRow> {
    Ok(OutlineRow {
        id: OutlineId::new(row.get(0)?),
        reading_id: ReadingId::new(row.get(1)?),
        parent_id: row.get::<_, Option<i64>>(2)?.map(OutlineId::new),
        section_title: row.get(3)?,
        notes_html: row.get(4)?,
        display_order: row.get(5)?,
        part: PartData {
            function_text: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
            relation_text: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            dependency_text: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            is_structural: row.get::<_, i64>(9)? != 0,
            driving_question_id: row.get::<_, Option<i64>>(10)?.map(EntryId::new),
        },
    })
}

pub(in crate::store) fn load_outline(
    conn: &Connection,
    outline_id: OutlineId,
) -> Result<Option<OutlineRow>, StoreError> {
    let sql = format!("SELECT {OUTLINE_COLUMNS} FROM reading_outline WHERE id = ?1");
    Ok(conn
        .query_row(&sql, params![outline_id.get()], outline_from_row)
        .optional()?)
}

/// An outline reference must point at a section of the same reading.
pub(in crate::store) fn ensure_outline_in_reading(
    conn: &Connection,
    outline_id: Option<OutlineId>,
    reading_id: ReadingId,
) -> Result<(), StoreError> {
    let Some(outline_id) = outline_id else {
        return Ok(());
    };
    match load_outline(conn, outline_id)? {
        Some(section) if section.reading_id == reading_id => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "outline section belongs to another reading",
        )),
        None => Err(StoreError::not_found("outline section", outline_id)),
    }
}

pub(in crate::store) fn tag_from_row(row: &Row<'_>) -> rusqlite::Result<TagRow> {
    Ok(TagRow {
        id: TagId::new(row.get(0)?),
        name: row.get(1)?,
    })
}

pub(in crate::store) const ANCHOR_COLUMNS: &str = "a.id, a.project_id, a.reading_id, a.outline_id, \
     a.tag_id, a.unique_doc_id, a.selected_text, a.comment, a.item_link_id, a.item_type";

/// Maps an anchor row; `tag_ids` is filled in by [`load_anchor_tag_ids`].
pub(in crate::store) fn anchor_from_row(row: &Row<'_>) -> rusqlite::Result<AnchorRow> {
    let selected_text: Option<String> = row.get(6)?;
    let comment: Option<String> = row.get(7)?;
    let item_link_id: Option<i64> = row.get(8)?;
    let item_type: Option<String> = row.get(9)?;

    let subject = match (item_link_id, item_type) {
        (Some(entry_id), Some(item_type)) => AnchorSubject::Virtual {
            entry_id: EntryId::new(entry_id),
            kind: EntryKind::from_anchor_item_type(&item_type)
                .ok_or_else(|| conversion_error(9, "unknown anchor item type"))?,
            summary: selected_text.unwrap_or_default(),
        },
        _ => AnchorSubject::Text {
            selected_text: selected_text.unwrap_or_default(),
            comment,
        },
    };

    Ok(AnchorRow {
        id: AnchorId::new(row.get(0)?),
        project_id: ItemId::new(row.get(1)?),
        reading_id: ReadingId::new(row.get(2)?),
        outline_id: row.get::<_, Option<i64>>(3)?.map(OutlineId::new),
        tag_id: row.get::<_, Option<i64>>(4)?.map(TagId::new),
        unique_doc_id: row.get(5)?,
        subject,
        tag_ids: Vec::new(),
    })
}

pub(in crate::store) fn load_anchor_tag_ids(
    conn: &Connection,
    anchor_id: AnchorId,
) -> Result<Vec<TagId>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT tag_id FROM anchor_tag_links WHERE anchor_id = ?1 ORDER BY rowid",
    )?;
    let ids = stmt
        .query_map(params![anchor_id.get()], |row| row.get::<_, i64>(0))?
        .map(|id| id.map(TagId::new))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Runs an anchor query (selecting [`ANCHOR_COLUMNS`] from `synthesis_anchors a`) and attaches
/// each anchor's links.
pub(in crate::store) fn query_anchors<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<AnchorRow>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let mut anchors = stmt
        .query_map(params, anchor_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    for anchor in &mut anchors {
        anchor.tag_ids = load_anchor_tag_ids(conn, anchor.id)?;
    }
    Ok(anchors)
}

pub(in crate::store) fn load_anchor(
    conn: &Connection,
    anchor_id: AnchorId,
) -> Result<Option<AnchorRow>, StoreError> {
    let sql = format!("SELECT {ANCHOR_COLUMNS} FROM synthesis_anchors a WHERE a.id = ?1");
    Ok(query_anchors(conn, &sql, params![anchor_id.get()])?
        .into_iter()
        .next())
}

pub(in crate::store) fn rubric_from_row(row: &Row<'_>) -> rusqlite::Result<RubricRow> {
    Ok(RubricRow {
        id: RubricId::new(row.get(0)?),
        project_id: ItemId::new(row.get(1)?),
        component_text: row.get(2)?,
        is_checked: row.get::<_, i64>(3)? != 0,
        display_order: row.get(4)?,
    })
}

pub(in crate::store) fn attachment_from_row(row: &Row<'_>) -> rusqlite::Result<AttachmentRow> {
    Ok(AttachmentRow {
        id: AttachmentId::new(row.get(0)?),
        reading_id: ReadingId::new(row.get(1)?),
        display_name: row.get(2)?,
        file_path: row.get(3)?,
        display_order: row.get(4)?,
    })
}

pub(in crate::store) fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<TodoRow> {
    Ok(TodoRow {
        id: TodoId::new(row.get(0)?),
        project_id: ItemId::new(row.get(1)?),
        display_name: row.get(2)?,
        task_html: row.get(3)?,
        notes_html: row.get(4)?,
        is_checked: row.get::<_, i64>(5)? != 0,
        display_order: row.get(6)?,
    })
}
