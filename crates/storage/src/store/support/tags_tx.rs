#![forbid(unsafe_code)]

use super::super::StoreError;
use super::super::types::TagRow;
use super::entry_columns::entry_tag_names;
use super::rows::tag_from_row;
use rt_core::{EntryId, ItemId, TagId, join_tag_names};
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

pub(in crate::store) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _) if inner.code == ErrorCode::ConstraintViolation
    )
}

pub(in crate::store) fn find_tag_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<TagRow>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM synthesis_tags WHERE name = ?1",
            params![name],
            tag_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn load_tag(
    conn: &Connection,
    tag_id: TagId,
) -> Result<Option<TagRow>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM synthesis_tags WHERE id = ?1",
            params![tag_id.get()],
            tag_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn require_tag(conn: &Connection, tag_id: TagId) -> Result<TagRow, StoreError> {
    load_tag(conn, tag_id)?.ok_or_else(|| StoreError::not_found("tag", tag_id))
}

/// Resolves an already-normalized name, inserting the tag when absent. A unique-constraint
/// failure on insert means another writer won; the existing row is used.
pub(in crate::store) fn get_or_create_tag_tx(
    conn: &Connection,
    name: &str,
    project_id: Option<ItemId>,
) -> Result<TagRow, StoreError> {
    let tag = match find_tag_by_name(conn, name)? {
        Some(tag) => tag,
        None => match conn.execute("INSERT INTO synthesis_tags(name) VALUES (?1)", params![name]) {
            Ok(_) => {
                tracing::debug!(tag = name, "tag created");
                TagRow {
                    id: TagId::new(conn.last_insert_rowid()),
                    name: name.to_string(),
                }
            }
            Err(err) if is_unique_violation(&err) => match find_tag_by_name(conn, name)? {
                Some(existing) => existing,
                None => return Err(StoreError::Sql(err)),
            },
            Err(err) => return Err(StoreError::Sql(err)),
        },
    };

    if let Some(project_id) = project_id {
        link_project_tag_tx(conn, project_id, tag.id)?;
    }
    Ok(tag)
}

/// Records that `project_id` knows `tag_id`. Idempotent; links are never removed implicitly.
pub(in crate::store) fn link_project_tag_tx(
    conn: &Connection,
    project_id: ItemId,
    tag_id: TagId,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO project_tag_links(project_id, tag_id) VALUES (?1, ?2)",
        params![project_id.get(), tag_id.get()],
    )?;
    Ok(())
}

/// Rewrites the `synthesis_tags` text column of one entry from its anchor links.
pub(in crate::store) fn refresh_entry_tag_cache_tx(
    conn: &Connection,
    entry_id: EntryId,
) -> Result<(), StoreError> {
    let names = entry_tag_names(conn, entry_id)?;
    let cached = if names.is_empty() {
        None
    } else {
        Some(join_tag_names(&names))
    };
    conn.execute(
        "UPDATE reading_driving_questions SET synthesis_tags = ?2 WHERE id = ?1",
        params![entry_id.get(), cached],
    )?;
    Ok(())
}

pub(in crate::store) fn refresh_entry_tag_caches_tx(
    conn: &Connection,
    entry_ids: &[EntryId],
) -> Result<(), StoreError> {
    for entry_id in entry_ids {
        refresh_entry_tag_cache_tx(conn, *entry_id)?;
    }
    Ok(())
}

/// Entries whose virtual anchor carries `tag_id` (by link or primary tag).
pub(in crate::store) fn entries_tagged_with(
    conn: &Connection,
    tag_id: TagId,
) -> Result<Vec<EntryId>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT a.item_link_id FROM synthesis_anchors a \
         WHERE a.item_link_id IS NOT NULL \
           AND (a.tag_id = ?1 \
                OR a.id IN (SELECT anchor_id FROM anchor_tag_links WHERE tag_id = ?1)) \
         ORDER BY a.item_link_id",
    )?;
    let ids = stmt
        .query_map(params![tag_id.get()], |row| row.get::<_, i64>(0))?
        .map(|id| id.map(EntryId::new))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}
