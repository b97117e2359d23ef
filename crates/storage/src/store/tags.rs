#![forbid(unsafe_code)]

use super::support::{
    delete_untagged_virtual_anchors_tx, entries_tagged_with, find_tag_by_name,
    get_or_create_tag_tx, link_project_tag_tx, load_tag, refresh_entry_tag_caches_tx,
    require_item, require_tag, sync_all_primary_tags_tx, tag_from_row,
};
use super::{SqliteStore, StoreError, TagCountRow, TagRow};
use rt_core::{ItemId, TagId, TagNameError, normalize_tag_name};
use rusqlite::params;

impl SqliteStore {
    /// Resolves `name` to a tag, creating it when absent, and records it on `project_id` when
    /// given. Returns `None` for a blank name.
    pub fn get_or_create_tag(
        &mut self,
        name: &str,
        project_id: Option<ItemId>,
    ) -> Result<Option<TagRow>, StoreError> {
        let name = match normalize_tag_name(name) {
            Ok(name) => name,
            Err(TagNameError::Empty) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        self.write("get_or_create_tag", |tx| {
            if let Some(project_id) = project_id {
                require_item(tx, project_id)?;
            }
            get_or_create_tag_tx(tx, &name, project_id).map(Some)
        })
    }

    /// Renames in place. A name held by another tag is a [`StoreError::TagNameConflict`];
    /// merging is [`SqliteStore::merge_tags`]'s job.
    pub fn rename_tag(&mut self, tag_id: TagId, new_name: &str) -> Result<TagRow, StoreError> {
        let new_name = normalize_tag_name(new_name)?;
        self.write("rename_tag", |tx| {
            let current = require_tag(tx, tag_id)?;
            if current.name == new_name {
                return Ok(current);
            }
            if let Some(existing) = find_tag_by_name(tx, &new_name)? {
                return Err(StoreError::TagNameConflict {
                    name: new_name.clone(),
                    existing_id: existing.id.get(),
                });
            }
            tx.execute(
                "UPDATE synthesis_tags SET name = ?2 WHERE id = ?1",
                params![tag_id.get(), new_name],
            )?;
            refresh_entry_tag_caches_tx(tx, &entries_tagged_with(tx, tag_id)?)?;
            tracing::info!(tag = %tag_id, from = %current.name, to = %new_name, "tag renamed");
            Ok(TagRow {
                id: tag_id,
                name: new_name.clone(),
            })
        })
    }

    pub fn list_tags(&self) -> Result<Vec<TagRow>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM synthesis_tags ORDER BY name, id")?;
        let rows = stmt
            .query_map([], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_tag(&self, tag_id: TagId) -> Result<Option<TagRow>, StoreError> {
        load_tag(&self.conn, tag_id)
    }

    pub fn get_tag_by_name(&self, name: &str) -> Result<Option<TagRow>, StoreError> {
        match normalize_tag_name(name) {
            Ok(name) => find_tag_by_name(&self.conn, &name),
            Err(_) => Ok(None),
        }
    }

    /// Every tag with the number of distinct anchors linked to it, by name.
    pub fn list_tags_with_counts(&self) -> Result<Vec<TagCountRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name, COUNT(DISTINCT l.anchor_id) \
             FROM synthesis_tags t \
             LEFT JOIN anchor_tag_links l ON l.tag_id = t.id \
             GROUP BY t.id, t.name \
             ORDER BY t.name, t.id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(TagCountRow {
                    id: TagId::new(row.get(0)?),
                    name: row.get(1)?,
                    anchor_count: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Tags known to the project: explicitly linked ones plus any used by its anchors. A linked
    /// tag with no anchors left is still listed.
    pub fn list_project_tags(&self, project_id: ItemId) -> Result<Vec<TagRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT t.id, t.name FROM synthesis_tags t \
             WHERE t.id IN (SELECT tag_id FROM project_tag_links WHERE project_id = ?1) \
                OR t.id IN (SELECT l.tag_id FROM anchor_tag_links l \
                            JOIN synthesis_anchors a ON a.id = l.anchor_id \
                            WHERE a.project_id = ?1) \
                OR t.id IN (SELECT a.tag_id FROM synthesis_anchors a \
                            WHERE a.project_id = ?1 AND a.tag_id IS NOT NULL) \
             ORDER BY t.name, t.id",
        )?;
        let rows = stmt
            .query_map(params![project_id.get()], tag_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn add_project_tag(&mut self, project_id: ItemId, tag_id: TagId) -> Result<(), StoreError> {
        self.write("add_project_tag", |tx| {
            require_item(tx, project_id)?;
            require_tag(tx, tag_id)?;
            link_project_tag_tx(tx, project_id, tag_id)
        })
    }

    /// Drops only the explicit link; the tag stays listed while project anchors still use it.
    pub fn remove_project_tag(
        &mut self,
        project_id: ItemId,
        tag_id: TagId,
    ) -> Result<bool, StoreError> {
        self.write("remove_project_tag", |tx| {
            let removed = tx.execute(
                "DELETE FROM project_tag_links WHERE project_id = ?1 AND tag_id = ?2",
                params![project_id.get(), tag_id.get()],
            )?;
            Ok(removed > 0)
        })
    }

    /// Deletes the tag but keeps anchors. Text anchors lose the link; virtual anchors whose only
    /// tag it was are removed with it.
    pub fn delete_tag(&mut self, tag_id: TagId) -> Result<(), StoreError> {
        self.write("delete_tag", |tx| {
            require_tag(tx, tag_id)?;
            let affected = entries_tagged_with(tx, tag_id)?;
            tx.execute("DELETE FROM synthesis_tags WHERE id = ?1", params![tag_id.get()])?;
            sync_all_primary_tags_tx(tx)?;
            let orphaned = delete_untagged_virtual_anchors_tx(tx)?;
            refresh_entry_tag_caches_tx(tx, &affected)?;
            tracing::info!(
                tag = %tag_id,
                virtual_anchors_removed = orphaned.len(),
                "tag deleted"
            );
            Ok(())
        })
    }

    /// Deletes the tag together with every anchor that carries it, whether as primary tag or
    /// through a link. Returns the number of anchors removed.
    pub fn delete_tag_and_anchors(&mut self, tag_id: TagId) -> Result<usize, StoreError> {
        self.write("delete_tag_and_anchors", |tx| {
            require_tag(tx, tag_id)?;
            let affected = entries_tagged_with(tx, tag_id)?;
            let anchors_removed = tx.execute(
                "DELETE FROM synthesis_anchors \
                 WHERE tag_id = ?1 \
                    OR id IN (SELECT anchor_id FROM anchor_tag_links WHERE tag_id = ?1)",
                params![tag_id.get()],
            )?;
            tx.execute(
                "DELETE FROM project_tag_links WHERE tag_id = ?1",
                params![tag_id.get()],
            )?;
            tx.execute("DELETE FROM synthesis_tags WHERE id = ?1", params![tag_id.get()])?;
            refresh_entry_tag_caches_tx(tx, &affected)?;
            tracing::info!(tag = %tag_id, anchors_removed, "tag and its anchors deleted");
            Ok(anchors_removed)
        })
    }
}
