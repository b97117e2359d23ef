#![forbid(unsafe_code)]

use super::{
    GlobalGraph, GlobalTag, GraphProject, GraphReading, ProjectGraph, ProjectGraphFull,
    ProjectTagEdge, ReadingTagEdge, SqliteStore, StoreError, VirtualAnchorEdge,
};
use rt_core::{AnchorId, EntryId, EntryKind, ItemId, ItemKind, ReadingId, TagId};
use rusqlite::params;

/// Every (anchor, tag) pair, whether recorded as a link or only as the primary tag.
const ANCHOR_TAG_PAIRS: &str = "SELECT anchor_id, tag_id FROM anchor_tag_links \
     UNION SELECT id, tag_id FROM synthesis_anchors WHERE tag_id IS NOT NULL";

impl SqliteStore {
    fn graph_readings(&self, project_id: ItemId) -> Result<Vec<GraphReading>, StoreError> {
        Ok(self
            .list_readings(project_id)?
            .into_iter()
            .map(|reading| GraphReading {
                name: reading.display_name().to_string(),
                id: reading.id,
                title: reading.title,
                author: reading.author,
            })
            .collect())
    }

    fn text_anchor_edges(&self, project_id: ItemId) -> Result<Vec<ReadingTagEdge>, StoreError> {
        let sql = format!(
            "SELECT DISTINCT a.reading_id, p.tag_id FROM synthesis_anchors a \
             JOIN ({ANCHOR_TAG_PAIRS}) p ON p.anchor_id = a.id \
             WHERE a.project_id = ?1 AND a.item_link_id IS NULL \
             ORDER BY a.reading_id, p.tag_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let edges = stmt
            .query_map(params![project_id.get()], |row| {
                Ok(ReadingTagEdge {
                    reading_id: ReadingId::new(row.get(0)?),
                    tag_id: TagId::new(row.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    /// Readings and tags of one project, linked by text anchors only.
    pub fn project_graph(&self, project_id: ItemId) -> Result<ProjectGraph, StoreError> {
        Ok(ProjectGraph {
            readings: self.graph_readings(project_id)?,
            tags: self.list_project_tags(project_id)?,
            edges: self.text_anchor_edges(project_id)?,
        })
    }

    /// [`SqliteStore::project_graph`] plus one row per (virtual anchor, tag) with the kind of the
    /// entry behind the anchor.
    pub fn project_graph_full(&self, project_id: ItemId) -> Result<ProjectGraphFull, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, a.reading_id, l.tag_id, a.item_link_id, q.type, a.selected_text \
             FROM synthesis_anchors a \
             JOIN reading_driving_questions q ON q.id = a.item_link_id \
             LEFT JOIN anchor_tag_links l ON l.anchor_id = a.id \
             WHERE a.project_id = ?1 AND a.item_link_id IS NOT NULL \
             ORDER BY a.id, l.rowid",
        )?;
        let virtual_anchors = stmt
            .query_map(params![project_id.get()], |row| {
                Ok(VirtualAnchorEdge {
                    anchor_id: AnchorId::new(row.get(0)?),
                    reading_id: ReadingId::new(row.get(1)?),
                    tag_id: row.get::<_, Option<i64>>(2)?.map(TagId::new),
                    item_link_id: EntryId::new(row.get(3)?),
                    kind: EntryKind::from_discriminator(row.get::<_, Option<String>>(4)?.as_deref()),
                    summary: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectGraphFull {
            readings: self.graph_readings(project_id)?,
            tags: self.list_project_tags(project_id)?,
            edges: self.text_anchor_edges(project_id)?,
            virtual_anchors,
        })
    }

    /// All tags and projects, with (project, tag) edges taken from anchors rather than the
    /// project link table.
    pub fn global_graph(&self) -> Result<GlobalGraph, StoreError> {
        let tags_sql = format!(
            "SELECT t.id, t.name, COUNT(DISTINCT a.project_id) \
             FROM synthesis_tags t \
             LEFT JOIN ({ANCHOR_TAG_PAIRS}) p ON p.tag_id = t.id \
             LEFT JOIN synthesis_anchors a ON a.id = p.anchor_id \
             GROUP BY t.id, t.name \
             ORDER BY t.name, t.id"
        );
        let mut stmt = self.conn.prepare(&tags_sql)?;
        let tags = stmt
            .query_map([], |row| {
                Ok(GlobalTag {
                    id: TagId::new(row.get(0)?),
                    name: row.get(1)?,
                    project_count: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM items WHERE type = ?1 ORDER BY name, id")?;
        let projects = stmt
            .query_map(params![ItemKind::Project.as_str()], |row| {
                Ok(GraphProject {
                    id: ItemId::new(row.get(0)?),
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let edges_sql = format!(
            "SELECT DISTINCT a.project_id, p.tag_id FROM synthesis_anchors a \
             JOIN ({ANCHOR_TAG_PAIRS}) p ON p.anchor_id = a.id \
             ORDER BY a.project_id, p.tag_id"
        );
        let mut stmt = self.conn.prepare(&edges_sql)?;
        let edges = stmt
            .query_map([], |row| {
                Ok(ProjectTagEdge {
                    project_id: ItemId::new(row.get(0)?),
                    tag_id: TagId::new(row.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GlobalGraph {
            tags,
            projects,
            edges,
        })
    }
}
