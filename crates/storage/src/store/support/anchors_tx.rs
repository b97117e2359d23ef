#![forbid(unsafe_code)]

use super::super::StoreError;
use super::tags_tx::{get_or_create_tag_tx, link_project_tag_tx, refresh_entry_tag_cache_tx};
use rt_core::{
    AnchorId, EntryId, EntryKind, ItemId, ReadingId, TagId, virtual_anchor_doc_id,
    virtual_anchor_summary,
};
use rusqlite::{Connection, OptionalExtension, params};

/// Sets `tag_id` to the anchor's first link by insertion, or NULL when it has none.
pub(in crate::store) fn sync_primary_tag_tx(
    conn: &Connection,
    anchor_id: AnchorId,
) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE synthesis_anchors SET tag_id = \
           (SELECT l.tag_id FROM anchor_tag_links l WHERE l.anchor_id = ?1 ORDER BY l.rowid LIMIT 1) \
         WHERE id = ?1",
        params![anchor_id.get()],
    )?;
    Ok(())
}

/// [`sync_primary_tag_tx`] for every anchor whose cache disagrees with its links.
pub(in crate::store) fn sync_all_primary_tags_tx(conn: &Connection) -> Result<usize, StoreError> {
    let changed = conn.execute(
        "UPDATE synthesis_anchors SET tag_id = \
           (SELECT l.tag_id FROM anchor_tag_links l \
            WHERE l.anchor_id = synthesis_anchors.id ORDER BY l.rowid LIMIT 1) \
         WHERE tag_id IS NOT \
           (SELECT l.tag_id FROM anchor_tag_links l \
            WHERE l.anchor_id = synthesis_anchors.id ORDER BY l.rowid LIMIT 1)",
        [],
    )?;
    Ok(changed)
}

/// Replaces every link of one anchor with `tag_ids` (first one primary) and records each tag
/// on the project.
pub(in crate::store) fn replace_anchor_links_tx(
    conn: &Connection,
    anchor_id: AnchorId,
    project_id: ItemId,
    tag_ids: &[TagId],
) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM anchor_tag_links WHERE anchor_id = ?1",
        params![anchor_id.get()],
    )?;
    for tag_id in tag_ids {
        conn.execute(
            "INSERT OR IGNORE INTO anchor_tag_links(anchor_id, tag_id) VALUES (?1, ?2)",
            params![anchor_id.get(), tag_id.get()],
        )?;
        link_project_tag_tx(conn, project_id, *tag_id)?;
    }
    sync_primary_tag_tx(conn, anchor_id)
}

pub(in crate::store) fn virtual_anchor_for_entry(
    conn: &Connection,
    entry_id: EntryId,
) -> Result<Option<AnchorId>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT id FROM synthesis_anchors WHERE item_link_id = ?1",
            params![entry_id.get()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .map(AnchorId::new))
}

/// The entry a virtual anchor is derived from.
#[derive(Clone, Debug)]
pub(in crate::store) struct VirtualSource<'a> {
    pub(in crate::store) project_id: ItemId,
    pub(in crate::store) reading_id: ReadingId,
    pub(in crate::store) entry_id: EntryId,
    pub(in crate::store) kind: EntryKind,
    pub(in crate::store) summary_source: &'a str,
}

/// Makes the entry's virtual anchor match `tag_names` (already parsed and normalized).
///
/// No tags: the anchor is deleted. Otherwise the anchor is created or its summary refreshed,
/// and its links are replaced by the named tags, created on demand. The entry's cached tag text
/// is rewritten either way. Returns the anchor when one remains.
pub(in crate::store) fn sync_virtual_anchor_tx(
    conn: &Connection,
    source: &VirtualSource<'_>,
    tag_names: &[String],
) -> Result<Option<AnchorId>, StoreError> {
    let existing = virtual_anchor_for_entry(conn, source.entry_id)?;

    if tag_names.is_empty() {
        if let Some(anchor_id) = existing {
            conn.execute(
                "DELETE FROM synthesis_anchors WHERE id = ?1",
                params![anchor_id.get()],
            )?;
            tracing::debug!(entry = %source.entry_id, anchor = %anchor_id, "virtual anchor removed");
        }
        refresh_entry_tag_cache_tx(conn, source.entry_id)?;
        return Ok(None);
    }

    let summary = virtual_anchor_summary(source.kind, source.summary_source);
    let item_type = source.kind.anchor_item_type();
    let anchor_id = match existing {
        Some(anchor_id) => {
            conn.execute(
                "UPDATE synthesis_anchors SET selected_text = ?2, item_type = ?3, \
                   project_id = ?4, reading_id = ?5 \
                 WHERE id = ?1",
                params![
                    anchor_id.get(),
                    summary,
                    item_type,
                    source.project_id.get(),
                    source.reading_id.get(),
                ],
            )?;
            anchor_id
        }
        None => {
            conn.execute(
                "INSERT INTO synthesis_anchors(project_id, reading_id, item_link_id, unique_doc_id, \
                   selected_text, item_type) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    source.project_id.get(),
                    source.reading_id.get(),
                    source.entry_id.get(),
                    virtual_anchor_doc_id(source.kind, source.entry_id),
                    summary,
                    item_type,
                ],
            )?;
            let anchor_id = AnchorId::new(conn.last_insert_rowid());
            tracing::debug!(entry = %source.entry_id, anchor = %anchor_id, "virtual anchor created");
            anchor_id
        }
    };

    let mut tag_ids = Vec::with_capacity(tag_names.len());
    for name in tag_names {
        let tag = get_or_create_tag_tx(conn, name, Some(source.project_id))?;
        tag_ids.push(tag.id);
    }
    replace_anchor_links_tx(conn, anchor_id, source.project_id, &tag_ids)?;
    refresh_entry_tag_cache_tx(conn, source.entry_id)?;
    Ok(Some(anchor_id))
}

/// Deletes virtual anchors left without any tag link and returns their entries.
pub(in crate::store) fn delete_untagged_virtual_anchors_tx(
    conn: &Connection,
) -> Result<Vec<EntryId>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT a.item_link_id FROM synthesis_anchors a \
         WHERE a.item_link_id IS NOT NULL \
           AND NOT EXISTS (SELECT 1 FROM anchor_tag_links l WHERE l.anchor_id = a.id)",
    )?;
    let entries = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .map(|id| id.map(EntryId::new))
        .collect::<Result<Vec<_>, _>>()?;
    drop(stmt);

    conn.execute(
        "DELETE FROM synthesis_anchors \
         WHERE item_link_id IS NOT NULL \
           AND NOT EXISTS (SELECT 1 FROM anchor_tag_links l WHERE l.anchor_id = synthesis_anchors.id)",
        [],
    )?;
    Ok(entries)
}
