// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fmt;

use crate::errors::TreeError;

/// Ordered child indices locating a node relative to the root.
/// The root's path is the empty sequence.
pub type TreePath = Vec<usize>;

/// Stable opaque identifier assigned to every node at creation time.
/// Transient view state (collapse flags, cursor) is keyed by this, never
/// by a node's position or name, so renames and sibling inserts do not
/// shift state onto the wrong node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A tag node. `children` present means container, `data` present means
/// leaf. The model does not forbid both being set, but every operation
/// and every view treats the two as mutually exclusive, and `add_child`
/// converts a leaf into a container by clearing `data`.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub children: Option<Vec<TreeNode>>,
    pub data: Option<String>,
}

impl TreeNode {
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, Vec::len)
    }
}

/// One field of a partial update. Distinguishes "leave unchanged" from
/// "remove the field" from "set the field", so a patch never conflates
/// not-specified with explicitly-cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldPatch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> FieldPatch<T> {
    fn apply(self, slot: &mut Option<T>) {
        match self {
            FieldPatch::Keep => {}
            FieldPatch::Clear => *slot = None,
            FieldPatch::Set(value) => *slot = Some(value),
        }
    }
}

/// A sparse set of field assignments merged into one addressed node.
/// `name` is set-only: nodes always carry a label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub name: Option<String>,
    pub data: FieldPatch<String>,
    pub children: FieldPatch<Vec<TreeNode>>,
}

impl NodePatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn set_data(value: impl Into<String>) -> Self {
        Self {
            data: FieldPatch::Set(value.into()),
            ..Self::default()
        }
    }

    /// Turn a leaf into a container: install `children`, drop `data`.
    pub fn into_container(children: Vec<TreeNode>) -> Self {
        Self {
            children: FieldPatch::Set(children),
            data: FieldPatch::Clear,
            ..Self::default()
        }
    }
}

/// Owns the single canonical tree and the id counter. All mutation goes
/// through path-addressed operations that validate the path before
/// touching anything, so a rejected update leaves the tree untouched.
#[derive(Debug)]
pub struct TreeStore {
    root: TreeNode,
    next_id: u64,
}

impl TreeStore {
    /// A fresh session: a root container with an empty child list.
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut store = Self {
            root: TreeNode {
                id: NodeId(0),
                name: String::new(),
                children: Some(Vec::new()),
                data: None,
            },
            next_id: 0,
        };
        store.root.id = store.alloc_id();
        store.root.name = root_name.into();
        store
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Walk `children[path[0]].children[path[1]]...` from the root.
    pub fn resolve(&self, path: &[usize]) -> Result<&TreeNode, TreeError> {
        let mut node = &self.root;
        for (depth, &index) in path.iter().enumerate() {
            node = node
                .children
                .as_deref()
                .and_then(|children| children.get(index))
                .ok_or_else(|| TreeError::InvalidPath {
                    path: path.to_vec(),
                    depth,
                })?;
        }
        Ok(node)
    }

    fn resolve_mut(&mut self, path: &[usize]) -> Result<&mut TreeNode, TreeError> {
        let mut node = &mut self.root;
        for (depth, &index) in path.iter().enumerate() {
            node = node
                .children
                .as_deref_mut()
                .and_then(|children| children.get_mut(index))
                .ok_or_else(|| TreeError::InvalidPath {
                    path: path.to_vec(),
                    depth,
                })?;
        }
        Ok(node)
    }

    /// Merge `patch` into the node at `path`. The path is resolved in
    /// full before any field is written, and the mutation happens through
    /// the exclusive borrow of that one node: untouched subtrees are
    /// never copied and no observer can see a half-applied patch.
    pub fn update(&mut self, path: &[usize], patch: NodePatch) -> Result<(), TreeError> {
        let node = self.resolve_mut(path)?;
        if let Some(name) = patch.name {
            node.name = name;
        }
        patch.data.apply(&mut node.data);
        patch.children.apply(&mut node.children);
        Ok(())
    }

    /// Append a fresh child under the node at `path`, converting a leaf
    /// target into a container (its data value is discarded). Returns the
    /// new child's id so the caller can move focus onto it.
    pub fn add_child(
        &mut self,
        path: &[usize],
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.resolve(path)?;
        let id = self.alloc_id();
        let child = TreeNode {
            id,
            name: name.into(),
            children: None,
            data: Some(data.into()),
        };
        let node = self.resolve_mut(path)?;
        if node.data.is_some() {
            node.data = None;
            node.children = Some(vec![child]);
        } else {
            node.children.get_or_insert_with(Vec::new).push(child);
        }
        Ok(id)
    }

    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        fn walk(node: &TreeNode, id: NodeId) -> Option<&TreeNode> {
            if node.id == id {
                return Some(node);
            }
            node.children
                .as_deref()
                .into_iter()
                .flatten()
                .find_map(|child| walk(child, id))
        }
        walk(&self.root, id)
    }

    /// Positional path of the node with `id`, recomputed against the
    /// current tree. Ids survive structural edits; positions do not.
    pub fn find_path(&self, id: NodeId) -> Option<TreePath> {
        fn walk(node: &TreeNode, id: NodeId, path: &mut TreePath) -> bool {
            if node.id == id {
                return true;
            }
            if let Some(children) = &node.children {
                for (index, child) in children.iter().enumerate() {
                    path.push(index);
                    if walk(child, id, path) {
                        return true;
                    }
                    path.pop();
                }
            }
            false
        }
        let mut path = TreePath::new();
        walk(&self.root, id, &mut path).then_some(path)
    }

    /// Like [`find_path`](Self::find_path), but an absent id is an error
    /// the caller can log or surface.
    pub fn path_of(&self, id: NodeId) -> Result<TreePath, TreeError> {
        self.find_path(id).ok_or(TreeError::UnknownNode { id })
    }

    pub fn node_count(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            1 + node
                .children
                .as_deref()
                .into_iter()
                .flatten()
                .map(count)
                .sum::<usize>()
        }
        count(&self.root)
    }
}
