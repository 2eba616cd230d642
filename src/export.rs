// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use clipboard::{ClipboardContext, ClipboardProvider};
use serde::Serialize;
use tracing::warn;

use crate::errors::ExportError;
use crate::tree::TreeNode;

/// Minimal projection of a node for export. Field declaration order is
/// the key order in the emitted JSON; absent fields are omitted entirely,
/// and nothing else (ids, view state) ever appears in the output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ExportNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

pub fn clean(node: &TreeNode) -> ExportNode {
    ExportNode {
        name: node.name.clone(),
        children: node
            .children
            .as_deref()
            .map(|children| children.iter().map(clean).collect()),
        data: node.data.clone(),
    }
}

/// Pretty-printed JSON snapshot of the tree rooted at `node`.
pub fn to_json(node: &TreeNode) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&clean(node))?)
}

/// Best-effort clipboard write. The export is already on screen by the
/// time this runs, so failure only downgrades the status wording.
pub fn copy_to_clipboard(text: &str) -> bool {
    match ClipboardContext::new() {
        Ok(mut ctx) => match ctx.set_contents(text.to_string()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                false
            }
        },
        Err(e) => {
            warn!("Clipboard unavailable: {}", e);
            false
        }
    }
}
