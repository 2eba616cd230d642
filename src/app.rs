// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::Stdout;
use std::time::Duration;

use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event;
use ratatui::prelude::Rect;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::config::Settings;
use crate::export;
use crate::tree::{NodeId, NodePatch, TreeStore};
use crate::tui::layout::{calculate_layout, LayoutContext};
use crate::tui::tree::TreeViewState;
use crate::tui::{events, view};

/// Modal input state. Edit modes address their target by stable id, so
/// the mode survives any re-render and never points at the wrong node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AppMode {
    #[default]
    Normal,
    EditName {
        id: NodeId,
        draft: String,
    },
    EditData {
        id: NodeId,
    },
    Help,
}

pub struct App {
    pub settings: Settings,
    pub store: TreeStore,
    pub view_state: TreeViewState,
    pub mode: AppMode,

    /// Last export snapshot, shown in a panel until dismissed.
    pub export_panel: Option<String>,
    /// One-line feedback in the footer.
    pub status: Option<String>,

    pub should_quit: bool,
    pub needs_redraw: bool,
    pub screen_area: Rect,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let store = TreeStore::new(settings.root_name.clone());
        let mut view_state = TreeViewState::new();
        view_state.cursor = Some(store.root().id);
        Self {
            settings,
            store,
            view_state,
            mode: AppMode::Normal,
            export_panel: None,
            status: None,
            should_quit: false,
            needs_redraw: true,
            screen_area: Rect::default(),
        }
    }

    /// Synchronous event loop: draw when dirty, then block (with a
    /// timeout) on the next terminal event. Everything runs on this one
    /// thread; a gesture fully mutates the store before the next event
    /// is read.
    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let size = terminal.size()?;
        self.screen_area = Rect::new(0, 0, size.width, size.height);

        while !self.should_quit {
            if self.needs_redraw {
                terminal.draw(|f| view::draw(f, self))?;
                self.needs_redraw = false;
            }
            if event::poll(Duration::from_millis(250))? {
                let ev = event::read()?;
                events::handle_event(ev, self);
            }
        }
        info!("Session ended, tree discarded");
        Ok(())
    }

    /// Rows the tree panel can show at the current screen size.
    pub fn tree_viewport_height(&self) -> usize {
        let ctx = LayoutContext::new(self.screen_area, self.export_panel.is_some());
        let plan = calculate_layout(self.screen_area, &ctx);
        plan.tree.height.saturating_sub(2) as usize
    }

    pub fn toggle_collapse_at_cursor(&mut self) {
        if let Some(id) = self.view_state.cursor {
            self.view_state.toggle_collapsed(id);
        }
    }

    pub fn begin_rename(&mut self) {
        if let Some(id) = self.view_state.cursor {
            if let Some(node) = self.store.find(id) {
                self.mode = AppMode::EditName {
                    id,
                    draft: node.name.clone(),
                };
            }
        }
    }

    /// Commit the rename draft: trimmed, non-empty drafts hit the store;
    /// whitespace-only drafts are discarded silently. Either way the
    /// edit session ends.
    pub fn commit_rename(&mut self) {
        if let AppMode::EditName { id, draft } = std::mem::take(&mut self.mode) {
            let trimmed = draft.trim();
            if trimmed.is_empty() {
                return;
            }
            match self.store.path_of(id) {
                Ok(path) => {
                    if let Err(e) = self.store.update(&path, NodePatch::rename(trimmed)) {
                        warn!("Rename rejected: {}", e);
                    }
                }
                Err(e) => warn!("Rename target vanished: {}", e),
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn begin_data_edit(&mut self) {
        if let Some(id) = self.view_state.cursor {
            if self.store.find(id).is_some_and(|node| node.has_data()) {
                self.mode = AppMode::EditData { id };
            }
        }
    }

    /// Data edits commit on every keystroke; there is no draft buffer
    /// and no separate save step.
    pub fn data_insert(&mut self, id: NodeId, ch: char) {
        self.mutate_data(id, |value| value.push(ch));
    }

    pub fn data_backspace(&mut self, id: NodeId) {
        self.mutate_data(id, |value| {
            value.pop();
        });
    }

    fn mutate_data(&mut self, id: NodeId, f: impl FnOnce(&mut String)) {
        let Some(node) = self.store.find(id) else {
            warn!("Data edit target {} vanished", id);
            self.mode = AppMode::Normal;
            return;
        };
        let mut value = node.data.clone().unwrap_or_default();
        f(&mut value);
        match self.store.path_of(id) {
            Ok(path) => {
                if let Err(e) = self.store.update(&path, NodePatch::set_data(value)) {
                    warn!("Data edit rejected: {}", e);
                }
            }
            Err(e) => {
                warn!("Data edit target vanished: {}", e);
                self.mode = AppMode::Normal;
            }
        }
    }

    /// Append the default child under the cursor node. A leaf target
    /// becomes a container (its data value is discarded), and the parent
    /// is forced open so the new child is visible and focused.
    pub fn add_child_at_cursor(&mut self) {
        let Some(id) = self.view_state.cursor else {
            return;
        };
        let path = match self.store.path_of(id) {
            Ok(path) => path,
            Err(e) => {
                warn!("Add child target vanished: {}", e);
                return;
            }
        };
        match self.store.add_child(
            &path,
            self.settings.child_name.clone(),
            self.settings.child_data.clone(),
        ) {
            Ok(child_id) => {
                self.view_state.expand(id);
                self.view_state.cursor = Some(child_id);
                info!("Added node {} under {}", child_id, id);
            }
            Err(e) => {
                warn!("Add child failed: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    /// Serialize the current tree, show it in the export panel and, when
    /// enabled, copy it to the clipboard. The clipboard write happens
    /// after the snapshot is captured and its failure only changes the
    /// status wording.
    pub fn export(&mut self) {
        match export::to_json(self.store.root()) {
            Ok(json) => {
                let copied = self.settings.copy_on_export && export::copy_to_clipboard(&json);
                self.status = Some(if copied {
                    "Exported JSON copied to clipboard".to_string()
                } else {
                    "Exported JSON shown below".to_string()
                });
                self.export_panel = Some(json);
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.status = Some(format!("Export failed: {}", e));
            }
        }
    }

    pub fn dismiss_overlays(&mut self) {
        self.export_panel = None;
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let settings = Settings {
            copy_on_export: false,
            ..Settings::default()
        };
        let mut app = App::new(settings);
        app.screen_area = Rect::new(0, 0, 80, 24);
        app
    }

    /// An id no node of `app` carries.
    fn foreign_id(app: &App) -> NodeId {
        let mut other = TreeStore::new("other");
        let mut last = other.root().id;
        for _ in 0..=app.store.node_count() {
            last = other.add_child(&[], "x", "y").unwrap();
        }
        last
    }

    #[test]
    fn test_new_app_focuses_root() {
        let app = test_app();
        assert_eq!(app.view_state.cursor, Some(app.store.root().id));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.export_panel.is_none());
    }

    #[test]
    fn test_rename_commit_trims_whitespace() {
        let mut app = test_app();
        let root_id = app.store.root().id;
        app.mode = AppMode::EditName {
            id: root_id,
            draft: "  Fruits  ".to_string(),
        };
        app.commit_rename();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.root().name, "Fruits");
    }

    #[test]
    fn test_rename_whitespace_only_draft_is_discarded() {
        let mut app = test_app();
        let root_id = app.store.root().id;
        app.mode = AppMode::EditName {
            id: root_id,
            draft: "   ".to_string(),
        };
        app.commit_rename();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.root().name, "root");
    }

    #[test]
    fn test_rename_cancel_keeps_prior_name_for_next_session() {
        let mut app = test_app();
        app.begin_rename();
        if let AppMode::EditName { draft, .. } = &mut app.mode {
            draft.push_str("garbage");
        }
        app.cancel_edit();
        assert_eq!(app.store.root().name, "root");

        // A fresh edit session starts from the committed name.
        app.begin_rename();
        assert!(
            matches!(&app.mode, AppMode::EditName { draft, .. } if draft == "root"),
            "draft reinitializes from the canonical name"
        );
    }

    #[test]
    fn test_data_edit_commits_every_keystroke() {
        let mut app = test_app();
        app.add_child_at_cursor();
        let child_id = app.view_state.cursor.unwrap();

        app.data_insert(child_id, '!');
        assert_eq!(
            app.store.find(child_id).unwrap().data.as_deref(),
            Some("New Data!")
        );

        app.data_backspace(child_id);
        app.data_backspace(child_id);
        assert_eq!(
            app.store.find(child_id).unwrap().data.as_deref(),
            Some("New Dat")
        );
    }

    #[test]
    fn test_begin_data_edit_requires_a_data_node() {
        let mut app = test_app();
        // Cursor on the root container: no data field to edit.
        app.begin_data_edit();
        assert_eq!(app.mode, AppMode::Normal);

        app.add_child_at_cursor();
        app.begin_data_edit();
        assert!(matches!(app.mode, AppMode::EditData { .. }));
    }

    #[test]
    fn test_add_child_reveals_and_focuses_new_node() {
        let mut app = test_app();
        let root_id = app.store.root().id;
        app.view_state.collapsed.insert(root_id);

        app.add_child_at_cursor();

        assert!(!app.view_state.is_collapsed(root_id));
        let child_id = app.view_state.cursor.unwrap();
        let child = app.store.find(child_id).unwrap();
        assert_eq!(child.name, "New Child");
        assert_eq!(child.data.as_deref(), Some("New Data"));
    }

    #[test]
    fn test_add_child_converts_focused_leaf() {
        let mut app = test_app();
        app.add_child_at_cursor();
        // Cursor is now on the leaf; adding again converts it.
        let leaf_id = app.view_state.cursor.unwrap();
        app.add_child_at_cursor();

        let converted = app.store.find(leaf_id).unwrap();
        assert!(converted.data.is_none());
        assert_eq!(converted.child_count(), 1);
    }

    #[test]
    fn test_export_populates_panel_and_status() {
        let mut app = test_app();
        app.export();
        let json = app.export_panel.as_deref().unwrap();
        assert!(json.contains("\"name\": \"root\""));
        assert_eq!(app.status.as_deref(), Some("Exported JSON shown below"));

        // Exporting the unchanged tree again yields identical text.
        let first = json.to_string();
        app.export();
        assert_eq!(app.export_panel.as_deref(), Some(first.as_str()));
    }

    #[test]
    fn test_dismiss_clears_overlays() {
        let mut app = test_app();
        app.export();
        app.dismiss_overlays();
        assert!(app.export_panel.is_none());
        assert!(app.status.is_none());
    }

    #[test]
    fn test_stale_data_edit_target_falls_back_to_normal() {
        let mut app = test_app();
        let stale = foreign_id(&app);
        app.mode = AppMode::EditData { id: stale };
        app.data_insert(stale, 'x');
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_viewport_height_accounts_for_export_panel() {
        let mut app = test_app();
        let without_panel = app.tree_viewport_height();
        app.export();
        let with_panel = app.tree_viewport_height();
        assert!(with_panel < without_panel);
    }
}
