//! Parent-linked records assembled into nested trees.

use crate::model::{Genre, SampleNode};
use serde::Serialize;
use std::collections::HashMap;

/// A record linked to an optional parent of the same type.
pub trait TreeRecord {
    /// Id of this node.
    fn node_id(&self) -> u64;

    /// Id of the parent node; `None` for roots.
    fn parent_id(&self) -> Option<u64>;
}

impl TreeRecord for Genre {
    fn node_id(&self) -> u64 {
        self.id
    }

    fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }
}

impl TreeRecord for SampleNode {
    fn node_id(&self) -> u64 {
        self.id
    }

    fn parent_id(&self) -> Option<u64> {
        self.parent_id
    }
}

/// A record with its depth and nested children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,
    /// Depth below the root, roots being level 0.
    pub level: u32,
    pub children: Vec<TreeNode<T>>,
}

impl<T: TreeRecord> TreeNode<T> {
    /// Ids of this node and all its descendants, depth first.
    pub fn ids(&self) -> Vec<u64> {
        let mut ids = vec![self.item.node_id()];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }
}

/// Build the forest of all records, siblings ordered by `sort_key`.
///
/// Records whose parent is missing are unreachable and left out.
pub fn build_forest<T, K, F>(records: Vec<T>, sort_key: F) -> Vec<TreeNode<T>>
where
    T: TreeRecord,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut by_parent: HashMap<Option<u64>, Vec<T>> = HashMap::new();
    for record in records {
        by_parent.entry(record.parent_id()).or_default().push(record);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|record| sort_key(record));
    }
    attach(&mut by_parent, None, 0)
}

// Each parent's children are taken out of the map once, so a cycle ends the walk.
fn attach<T: TreeRecord>(
    by_parent: &mut HashMap<Option<u64>, Vec<T>>,
    parent: Option<u64>,
    level: u32,
) -> Vec<TreeNode<T>> {
    let siblings = by_parent.remove(&parent).unwrap_or_default();
    siblings
        .into_iter()
        .map(|item| {
            let children = attach(by_parent, Some(item.node_id()), level + 1);
            TreeNode {
                item,
                level,
                children,
            }
        })
        .collect()
}

/// Take the subtree rooted at `id` out of a forest.
pub fn take_subtree<T: TreeRecord>(forest: Vec<TreeNode<T>>, id: u64) -> Option<TreeNode<T>> {
    for node in forest {
        if node.item.node_id() == id {
            return Some(node);
        }
        if let Some(found) = take_subtree(node.children, id) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(id: u64, name: &str, parent_id: Option<u64>) -> Genre {
        Genre {
            id,
            name: name.to_string(),
            parent_id,
        }
    }

    fn names(nodes: &[TreeNode<Genre>]) -> Vec<&str> {
        nodes.iter().map(|n| n.item.name.as_str()).collect()
    }

    fn catalog() -> Vec<Genre> {
        vec![
            genre(1, "Rock", None),
            genre(2, "Jazz", None),
            genre(3, "Punk", Some(1)),
            genre(4, "Grunge", Some(1)),
            genre(5, "Hardcore", Some(3)),
        ]
    }

    #[test]
    fn test_forest_orders_siblings() {
        let forest = build_forest(catalog(), |g| g.name.clone());

        assert_eq!(names(&forest), vec!["Jazz", "Rock"]);
        let rock = &forest[1];
        assert_eq!(rock.level, 0);
        assert_eq!(names(&rock.children), vec!["Grunge", "Punk"]);
        assert_eq!(rock.children[1].children[0].item.name, "Hardcore");
        assert_eq!(rock.children[1].children[0].level, 2);
    }

    #[test]
    fn test_orphans_are_dropped() {
        let forest = build_forest(vec![genre(1, "Lost", Some(99))], |g| g.name.clone());
        assert!(forest.is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        let records = vec![genre(1, "A", Some(2)), genre(2, "B", Some(1))];
        assert!(build_forest(records, |g| g.id).is_empty());
    }

    #[test]
    fn test_take_subtree() {
        let forest = build_forest(catalog(), |g| g.name.clone());
        let punk = take_subtree(forest, 3).unwrap();

        assert_eq!(punk.level, 1);
        assert_eq!(punk.ids(), vec![3, 5]);

        let forest = build_forest(catalog(), |g| g.name.clone());
        assert!(take_subtree(forest, 99).is_none());
    }
}
