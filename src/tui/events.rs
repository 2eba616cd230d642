// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use ratatui::crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use ratatui::prelude::Rect;

use crate::app::{App, AppMode};
use crate::tree::NodeId;
use crate::tui::tree::{apply_nav, NavAction};

pub fn handle_event(event: CrosstermEvent, app: &mut App) {
    if let CrosstermEvent::Resize(w, h) = &event {
        app.screen_area = Rect::new(0, 0, *w, *h);
        app.needs_redraw = true;
        return;
    }

    let CrosstermEvent::Key(key) = event else {
        return;
    };
    // Windows terminals deliver Release events too.
    if key.kind != KeyEventKind::Press {
        return;
    }

    match app.mode {
        AppMode::Help => handle_help_key(key, app),
        AppMode::EditName { .. } => handle_edit_name_key(key, app),
        AppMode::EditData { id } => handle_edit_data_key(key, app, id),
        AppMode::Normal => handle_normal_key(key, app),
    }
    app.needs_redraw = true;
}

fn handle_help_key(key: KeyEvent, app: &mut App) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.mode = AppMode::Normal;
    }
}

fn handle_edit_name_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => app.commit_rename(),
        KeyCode::Backspace => {
            if let AppMode::EditName { draft, .. } = &mut app.mode {
                draft.pop();
            }
        }
        KeyCode::Char(c) => {
            if let AppMode::EditName { draft, .. } = &mut app.mode {
                draft.push(c);
            }
        }
        _ => {}
    }
}

fn handle_edit_data_key(key: KeyEvent, app: &mut App, id: NodeId) {
    match key.code {
        // The value is already committed keystroke by keystroke; Enter
        // and Esc only leave the mode.
        KeyCode::Esc | KeyCode::Enter => app.cancel_edit(),
        KeyCode::Backspace => app.data_backspace(id),
        KeyCode::Char(c) => app.data_insert(id, c),
        _ => {}
    }
}

fn handle_normal_key(key: KeyEvent, app: &mut App) {
    let viewport_height = app.tree_viewport_height();
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Down | KeyCode::Char('j') => {
            apply_nav(
                &mut app.view_state,
                app.store.root(),
                NavAction::Down,
                viewport_height,
            );
        }
        KeyCode::Up | KeyCode::Char('k') => {
            apply_nav(
                &mut app.view_state,
                app.store.root(),
                NavAction::Up,
                viewport_height,
            );
        }
        KeyCode::Left | KeyCode::Char('h') => {
            apply_nav(
                &mut app.view_state,
                app.store.root(),
                NavAction::Left,
                viewport_height,
            );
        }
        KeyCode::Right | KeyCode::Char('l') => {
            apply_nav(
                &mut app.view_state,
                app.store.root(),
                NavAction::Right,
                viewport_height,
            );
        }

        KeyCode::Char(' ') | KeyCode::Tab => app.toggle_collapse_at_cursor(),
        KeyCode::Enter | KeyCode::Char('r') => app.begin_rename(),
        KeyCode::Char('e') => app.begin_data_edit(),
        KeyCode::Char('a') => app.add_child_at_cursor(),
        KeyCode::Char('y') => app.export(),
        KeyCode::Char('?') => app.mode = AppMode::Help,
        KeyCode::Esc => app.dismiss_overlays(),
        _ => {}
    }
}
