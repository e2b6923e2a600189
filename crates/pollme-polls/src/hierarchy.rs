//! Genre and sample-data hierarchies.

use crate::error::{Error, Result};
use crate::model::{Genre, SampleData, SampleNode};
use crate::service::{required, PollService};
use crate::tree::{build_forest, take_subtree, TreeNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Input for adding a genre.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGenre {
    pub name: String,
    #[serde(default)]
    pub parent: Option<u64>,
}

/// Input for adding a sample tree node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSampleNode {
    #[serde(default)]
    pub datarow: Option<u64>,
    #[serde(default)]
    pub parent: Option<u64>,
}

/// A sample tree node as served: the node's data row under `parent`, and
/// its nested children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleTree {
    pub id: u64,
    pub level: u32,
    pub parent: Option<SampleData>,
    pub children: Vec<SampleTree>,
}

impl SampleTree {
    fn from_node(node: TreeNode<SampleNode>, rows: &HashMap<u64, SampleData>) -> Self {
        Self {
            id: node.item.id,
            level: node.level,
            parent: node.item.datarow.and_then(|pk| rows.get(&pk).cloned()),
            children: node
                .children
                .into_iter()
                .map(|child| Self::from_node(child, rows))
                .collect(),
        }
    }
}

impl PollService {
    // ========== Genres ==========

    /// All genres as a forest, siblings ordered by name.
    pub fn genres(&self) -> Result<Vec<TreeNode<Genre>>> {
        let genres = self.store().all_genres()?;
        Ok(build_forest(genres, |g| g.name.clone()))
    }

    /// Add a genre under an optional parent.
    pub fn add_genre(&self, input: NewGenre) -> Result<Genre> {
        let name = required("name", &input.name)?;
        if self.store().all_genres()?.iter().any(|g| g.name == name) {
            return Err(Error::DuplicateGenre(name));
        }
        if let Some(parent) = input.parent {
            self.store()
                .get_genre(parent)?
                .ok_or(Error::GenreNotFound(parent))?;
        }

        let genre = Genre {
            id: self.store().generate_id()?,
            name,
            parent_id: input.parent,
        };
        self.store().put_genre(&genre)?;

        info!(genre_id = genre.id, name = %genre.name, "Genre added");
        Ok(genre)
    }

    /// Delete a genre together with its descendants.
    pub fn delete_genre(&self, id: u64) -> Result<()> {
        let subtree = take_subtree(self.genres()?, id).ok_or(Error::GenreNotFound(id))?;
        let ids = subtree.ids();
        self.store().delete_genres(&ids)?;

        info!(genre_id = id, removed = ids.len(), "Genre deleted");
        Ok(())
    }

    // ========== Sample data ==========

    /// Store a sample data row under a fresh primary key.
    pub fn add_sample_data(&self, mut row: SampleData) -> Result<SampleData> {
        row.pk_id = self.store().generate_id()?;
        self.store().put_sample_data(&row)?;

        info!(pk_id = row.pk_id, "Sample data added");
        Ok(row)
    }

    /// Add a sample tree node linking an optional data row.
    pub fn add_sample_node(&self, input: NewSampleNode) -> Result<SampleNode> {
        if let Some(pk_id) = input.datarow {
            self.store()
                .get_sample_data(pk_id)?
                .ok_or(Error::SampleDataNotFound(pk_id))?;
        }
        if let Some(parent) = input.parent {
            self.store()
                .get_sample_node(parent)?
                .ok_or(Error::SampleNodeNotFound(parent))?;
        }

        let node = SampleNode {
            id: self.store().generate_id()?,
            datarow: input.datarow,
            parent_id: input.parent,
        };
        self.store().put_sample_node(&node)?;

        info!(node_id = node.id, "Sample node added");
        Ok(node)
    }

    /// The root nodes (level 0) with their nested children.
    pub fn sample_roots(&self) -> Result<Vec<SampleTree>> {
        self.sample_tree(None)
    }

    /// The tree under `root` including the root itself, or every tree when
    /// no root is given.
    pub fn sample_tree(&self, root: Option<u64>) -> Result<Vec<SampleTree>> {
        let forest = build_forest(self.store().all_sample_nodes()?, |n| n.datarow);
        let forest = match root {
            None => forest,
            Some(id) => vec![take_subtree(forest, id).ok_or(Error::SampleNodeNotFound(id))?],
        };

        let rows = self.sample_rows(&forest)?;
        Ok(forest
            .into_iter()
            .map(|node| SampleTree::from_node(node, &rows))
            .collect())
    }

    fn sample_rows(&self, forest: &[TreeNode<SampleNode>]) -> Result<HashMap<u64, SampleData>> {
        let mut rows = HashMap::new();
        let mut pending: Vec<&TreeNode<SampleNode>> = forest.iter().collect();
        while let Some(node) = pending.pop() {
            if let Some(pk_id) = node.item.datarow {
                if let Some(row) = self.store().get_sample_data(pk_id)? {
                    rows.insert(pk_id, row);
                }
            }
            pending.extend(node.children.iter());
        }
        Ok(rows)
    }
}
