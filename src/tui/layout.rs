// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use ratatui::prelude::*;

pub const MIN_WIDTH: u16 = 30;
pub const MIN_HEIGHT: u16 = 8;
pub const EXPORT_PANEL_HEIGHT: u16 = 12;

#[derive(Default, Debug)]
pub struct LayoutPlan {
    pub tree: Rect,
    pub export: Option<Rect>,
    pub footer: Rect,
    pub warning_message: Option<String>,
}

pub struct LayoutContext {
    pub width: u16,
    pub height: u16,
    pub export_visible: bool,
}

impl LayoutContext {
    pub fn new(area: Rect, export_visible: bool) -> Self {
        Self {
            width: area.width,
            height: area.height,
            export_visible,
        }
    }
}

pub fn calculate_layout(area: Rect, ctx: &LayoutContext) -> LayoutPlan {
    let mut plan = LayoutPlan::default();

    if ctx.width < MIN_WIDTH || ctx.height < MIN_HEIGHT {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
        plan.tree = chunks[0];
        plan.footer = chunks[1];
        plan.warning_message = Some("Window too small".to_string());
        return plan;
    }

    if ctx.export_visible {
        // Never let the export panel squeeze the tree below half the frame.
        let export_height = EXPORT_PANEL_HEIGHT.min(ctx.height / 2);
        let chunks = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(export_height),
            Constraint::Length(1),
        ])
        .split(area);
        plan.tree = chunks[0];
        plan.export = Some(chunks[1]);
        plan.footer = chunks[2];
    } else {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
        plan.tree = chunks[0];
        plan.footer = chunks[1];
    }

    plan
}
