//! Adjacency-list to nested tree conversion for menu hierarchies.
//!
//! Both directions run iteratively, so arbitrarily deep hierarchies never
//! grow the call stack.

use std::collections::{HashMap, HashSet, VecDeque};

use rolegrid_core::AppResult;
use serde::{Deserialize, Serialize};

use crate::ids::MenuId;
use crate::menu::MenuNode;

/// Flat record that can be placed into a tree by parent id.
pub trait TreeRecord {
    /// Returns the record identifier.
    fn record_id(&self) -> MenuId;

    /// Returns the parent identifier.
    fn record_parent_id(&self) -> MenuId;

    /// Returns the label rendered as the node title.
    fn record_label(&self) -> &str;
}

impl TreeRecord for MenuNode {
    fn record_id(&self) -> MenuId {
        self.id()
    }

    fn record_parent_id(&self) -> MenuId {
        self.parent_id()
    }

    fn record_label(&self) -> &str {
        self.label().as_str()
    }
}

/// Nested tree node rendered by permission pickers.
///
/// Cloning, comparing and dropping run iteratively. Serialization recurses
/// once per level; bound it with [`tree_depth`].
#[derive(Debug, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    key: String,
    title: String,
    children: Vec<TreeNode>,
}

impl TreeNode {
    /// Returns the node key, the menu id rendered as a string.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the node title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns child nodes in input order.
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    /// Parses the key back into a menu identifier.
    pub fn menu_id(&self) -> AppResult<MenuId> {
        MenuId::parse_key(self.key.as_str())
    }
}

impl Clone for TreeNode {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            children: map_tree(&self.children, |node, children| Self {
                key: node.key.clone(),
                title: node.title.clone(),
                children,
            }),
        }
    }
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.key != right.key
                || left.title != right.title
                || left.children.len() != right.children.len()
            {
                return false;
            }

            pending.extend(left.children.iter().zip(right.children.iter()));
        }

        true
    }
}

// Default drop glue recurses once per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Flattened tree entry carrying its parent id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTreeEntry {
    /// Node identifier.
    pub menu_id: MenuId,
    /// Parent identifier.
    pub parent_id: MenuId,
    /// Node title.
    pub title: String,
}

impl TreeRecord for FlatTreeEntry {
    fn record_id(&self) -> MenuId {
        self.menu_id
    }

    fn record_parent_id(&self) -> MenuId {
        self.parent_id
    }

    fn record_label(&self) -> &str {
        self.title.as_str()
    }
}

/// Builds a forest from flat records, starting at `root_parent_id`.
///
/// Children keep their input order. Records whose parent chain never reaches
/// the root (orphans, cycles) are dropped. When an id occurs more than once,
/// only the first occurrence reached from the root is kept. A record whose id
/// equals `root_parent_id` is ignored.
#[must_use]
pub fn build_tree<R: TreeRecord>(records: &[R], root_parent_id: MenuId) -> Vec<TreeNode> {
    let mut children_by_parent: HashMap<MenuId, Vec<usize>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.record_id() == root_parent_id {
            continue;
        }

        children_by_parent
            .entry(record.record_parent_id())
            .or_default()
            .push(index);
    }

    let mut visited: HashSet<MenuId> = HashSet::new();
    let mut accepted_children: HashMap<MenuId, Vec<MenuId>> = HashMap::new();
    let mut reached: Vec<usize> = Vec::new();
    let mut queue = VecDeque::from([root_parent_id]);

    while let Some(parent_id) = queue.pop_front() {
        let Some(indices) = children_by_parent.get(&parent_id) else {
            continue;
        };

        for &index in indices {
            let menu_id = records[index].record_id();
            if !visited.insert(menu_id) {
                continue;
            }

            accepted_children
                .entry(parent_id)
                .or_default()
                .push(menu_id);
            reached.push(index);
            queue.push_back(menu_id);
        }
    }

    // Breadth-first order places every child after its parent, so walking it
    // backwards assembles leaves first.
    let mut assembled: HashMap<MenuId, TreeNode> = HashMap::with_capacity(reached.len());
    for &index in reached.iter().rev() {
        let record = &records[index];
        let menu_id = record.record_id();
        let children = take_children(&mut assembled, accepted_children.remove(&menu_id));

        assembled.insert(
            menu_id,
            TreeNode {
                key: menu_id.key(),
                title: record.record_label().to_owned(),
                children,
            },
        );
    }

    take_children(&mut assembled, accepted_children.remove(&root_parent_id))
}

fn take_children(
    assembled: &mut HashMap<MenuId, TreeNode>,
    child_ids: Option<Vec<MenuId>>,
) -> Vec<TreeNode> {
    child_ids
        .unwrap_or_default()
        .into_iter()
        .filter_map(|child_id| assembled.remove(&child_id))
        .collect()
}

/// Flattens a forest in pre-order, tagging every entry with its parent id.
///
/// Feeding the result back into [`build_tree`] with the same root rebuilds
/// the same forest.
pub fn flatten_tree(roots: &[TreeNode], root_parent_id: MenuId) -> AppResult<Vec<FlatTreeEntry>> {
    let mut entries = Vec::new();
    let mut pending: Vec<(&TreeNode, MenuId)> = roots
        .iter()
        .rev()
        .map(|node| (node, root_parent_id))
        .collect();

    while let Some((node, parent_id)) = pending.pop() {
        let menu_id = node.menu_id()?;
        entries.push(FlatTreeEntry {
            menu_id,
            parent_id,
            title: node.title.clone(),
        });

        pending.extend(node.children.iter().rev().map(|child| (child, menu_id)));
    }

    Ok(entries)
}

/// Returns every key of the forest in pre-order.
#[must_use]
pub fn tree_keys(roots: &[TreeNode]) -> Vec<String> {
    let mut keys = Vec::new();
    let mut pending: Vec<&TreeNode> = roots.iter().rev().collect();

    while let Some(node) = pending.pop() {
        keys.push(node.key.clone());
        pending.extend(node.children.iter().rev());
    }

    keys
}

/// Rebuilds a forest bottom-up, handing every node its already mapped
/// children in order.
pub fn map_tree<T>(roots: &[TreeNode], mut map: impl FnMut(&TreeNode, Vec<T>) -> T) -> Vec<T> {
    enum Step<'a> {
        Enter(&'a TreeNode),
        Exit(&'a TreeNode),
    }

    let mut steps: Vec<Step<'_>> = roots.iter().rev().map(Step::Enter).collect();
    let mut mapped: Vec<T> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(node) => {
                steps.push(Step::Exit(node));
                steps.extend(node.children.iter().rev().map(Step::Enter));
            }
            Step::Exit(node) => {
                let first_child = mapped.len().saturating_sub(node.children.len());
                let children = mapped.split_off(first_child);
                mapped.push(map(node, children));
            }
        }
    }

    mapped
}

/// Returns the number of levels of the forest, 0 when empty.
#[must_use]
pub fn tree_depth(roots: &[TreeNode]) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&TreeNode, usize)> = roots.iter().map(|node| (node, 1)).collect();

    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        pending.extend(node.children.iter().map(|child| (child, depth + 1)));
    }

    deepest
}
