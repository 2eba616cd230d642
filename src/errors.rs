// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

use crate::tree::{NodeId, TreePath};

/// Failures of path-addressed tree operations. The store validates before
/// mutating, so any of these leaves the canonical tree exactly as it was.
#[derive(Debug, Error, PartialEq)]
pub enum TreeError {
    #[error("path {path:?} does not resolve: step {depth} walks off the tree")]
    InvalidPath { path: TreePath, depth: usize },

    #[error("no node with id {id} in the current tree")]
    UnknownNode { id: NodeId },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize tree: {0}")]
    Serialize(#[from] serde_json::Error),
}
