#![forbid(unsafe_code)]

use super::support::{
    entries_tagged_with, refresh_entry_tag_caches_tx, require_tag, sync_all_primary_tags_tx,
};
use super::{SqliteStore, StoreError, TagMergeReport};
use rt_core::TagId;
use rusqlite::params;

impl SqliteStore {
    /// Folds `source` into `target` in one transaction.
    ///
    /// Anchor and project links move to the target unless the owner already links the target, in
    /// which case the source link is dropped. Moved links keep their position, so an anchor whose
    /// primary tag was the source gets the target as primary. The source tag is deleted.
    pub fn merge_tags(&mut self, source: TagId, target: TagId) -> Result<TagMergeReport, StoreError> {
        if source == target {
            return Err(StoreError::InvalidInput("cannot merge a tag into itself"));
        }
        self.write("merge_tags", |tx| {
            require_tag(tx, source)?;
            let target_row = require_tag(tx, target)?;
            let affected = entries_tagged_with(tx, source)?;

            // Anchors whose primary tag drifted from their links get the link back first.
            tx.execute(
                "INSERT OR IGNORE INTO anchor_tag_links(anchor_id, tag_id) \
                 SELECT id, tag_id FROM synthesis_anchors WHERE tag_id = ?1",
                params![source.get()],
            )?;

            let anchors_relinked = tx.execute(
                "UPDATE OR IGNORE anchor_tag_links SET tag_id = ?2 WHERE tag_id = ?1",
                params![source.get(), target.get()],
            )?;
            let duplicate_links_dropped = tx.execute(
                "DELETE FROM anchor_tag_links WHERE tag_id = ?1",
                params![source.get()],
            )?;

            tx.execute(
                "UPDATE OR IGNORE project_tag_links SET tag_id = ?2 WHERE tag_id = ?1",
                params![source.get(), target.get()],
            )?;
            tx.execute(
                "DELETE FROM project_tag_links WHERE tag_id = ?1",
                params![source.get()],
            )?;

            tx.execute(
                "UPDATE synthesis_anchors SET tag_id = ?2 WHERE tag_id = ?1",
                params![source.get(), target.get()],
            )?;
            tx.execute("DELETE FROM synthesis_tags WHERE id = ?1", params![source.get()])?;

            sync_all_primary_tags_tx(tx)?;
            refresh_entry_tag_caches_tx(tx, &affected)?;

            tracing::info!(
                source = %source,
                target = %target,
                anchors_relinked,
                duplicate_links_dropped,
                "tags merged"
            );
            Ok(TagMergeReport {
                source,
                target: target_row,
                anchors_relinked,
                duplicate_links_dropped,
            })
        })
    }
}
