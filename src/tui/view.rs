// SPDX-FileCopyrightText: 2025 The tagtree Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, AppMode};
use crate::theme;
use crate::tui::layout::{calculate_layout, LayoutContext};
use crate::tui::tree::{self, RowItem};

static APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    let ctx = LayoutContext::new(area, app.export_panel.is_some());
    let plan = calculate_layout(area, &ctx);

    draw_tree_panel(f, app, plan.tree);
    if let (Some(export_area), Some(json)) = (plan.export, app.export_panel.as_deref()) {
        draw_export_panel(f, json, export_area);
    }
    draw_footer(f, app, plan.footer, plan.warning_message.as_deref());

    if app.mode == AppMode::Help {
        draw_help_popup(f);
    }
}

fn draw_tree_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            format!(" tagtree v{} ", APP_VERSION),
            Style::default().fg(theme::MAUVE),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));
    let inner_height = area.height.saturating_sub(2) as usize;

    let rows = tree::flatten_visible(app.store.root(), &app.view_state);
    let slice = tree::window(&rows, app.view_state.top_offset, inner_height);
    let lines: Vec<Line> = slice.iter().map(|row| render_row(app, row)).collect();

    let paragraph = Paragraph::new(lines).block(block);
    f.render_widget(paragraph, area);
}

fn render_row(app: &App, row: &RowItem<'_>) -> Line<'static> {
    let indent = " ".repeat(row.depth * app.settings.indent_width as usize);
    let marker = if row.node.is_container() {
        if row.is_collapsed {
            "▸ "
        } else {
            "▾ "
        }
    } else {
        "• "
    };

    let mut spans = vec![
        Span::raw(indent),
        Span::styled(marker, Style::default().fg(theme::LAVENDER)),
    ];

    match &app.mode {
        AppMode::EditName { id, draft } if *id == row.node.id => {
            spans.push(Span::styled(
                format!("{draft}▏"),
                Style::default()
                    .fg(theme::YELLOW)
                    .add_modifier(Modifier::UNDERLINED),
            ));
        }
        _ => {
            let name_style = if row.is_cursor {
                Style::default().fg(theme::MAUVE).bold()
            } else if row.node.is_container() {
                Style::default().fg(theme::BLUE)
            } else {
                Style::default().fg(theme::TEXT)
            };
            spans.push(Span::styled(row.node.name.clone(), name_style));
        }
    }

    if row.is_collapsed && row.node.is_container() {
        spans.push(Span::styled(
            format!(" ({})", row.node.child_count()),
            Style::default().fg(theme::SUBTEXT0),
        ));
    }

    // The data value is part of the collapsible content; the header
    // above stays visible either way.
    if !row.is_collapsed {
        if let Some(data) = &row.node.data {
            spans.push(Span::styled(": ", Style::default().fg(theme::SUBTEXT0)));
            let editing = matches!(&app.mode, AppMode::EditData { id } if *id == row.node.id);
            if editing {
                spans.push(Span::styled(
                    format!("{data}▏"),
                    Style::default().fg(theme::YELLOW),
                ));
            } else {
                spans.push(Span::styled(
                    data.clone(),
                    Style::default().fg(theme::SUBTEXT1),
                ));
            }
        }
    }

    let mut line = Line::from(spans);
    if row.is_cursor {
        line = line.style(Style::default().bg(theme::SURFACE0));
    }
    line
}

fn draw_export_panel(f: &mut Frame, json: &str, area: Rect) {
    let block = Block::default()
        .title(Span::styled(
            " Exported JSON ",
            Style::default().fg(theme::GREEN),
        ))
        .title_bottom(
            Line::from(Span::styled(
                " Esc to dismiss ",
                Style::default().fg(theme::SUBTEXT1),
            ))
            .right_aligned(),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE1));

    let paragraph = Paragraph::new(json.to_string())
        .style(Style::default().fg(theme::TEXT))
        .block(block);
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect, warning: Option<&str>) {
    if let Some(msg) = warning {
        f.render_widget(
            Paragraph::new(msg).style(Style::default().fg(theme::RED).bg(theme::SURFACE0)),
            area,
        );
        return;
    }

    let line = match &app.mode {
        AppMode::EditName { .. } => Line::from(Span::styled(
            " renaming: Enter save · Esc cancel (empty name discards) ",
            Style::default().fg(theme::PEACH),
        )),
        AppMode::EditData { .. } => Line::from(Span::styled(
            " editing data: every keystroke saves · Enter/Esc done ",
            Style::default().fg(theme::PEACH),
        )),
        _ => {
            if let Some(status) = &app.status {
                Line::from(Span::styled(
                    format!(" {status} "),
                    Style::default().fg(theme::GREEN),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        " ↑↓ move  ←→ fold  a add  r rename  e data  y export  ? help  q quit ",
                        Style::default().fg(theme::SUBTEXT1),
                    ),
                    Span::styled(
                        format!(" {} nodes", app.store.node_count()),
                        Style::default().fg(theme::SUBTEXT0),
                    ),
                ])
            }
        }
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_help_popup(f: &mut Frame) {
    const POPUP_WIDTH: u16 = 52;
    const POPUP_HEIGHT: u16 = 16;
    let area = f.area();
    let width = POPUP_WIDTH.min(area.width);
    let height = POPUP_HEIGHT.min(area.height);
    let vertical_chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .split(area);
    let area = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(width),
        Constraint::Min(0),
    ])
    .split(vertical_chunks[1])[1];

    f.render_widget(Clear, area);

    let bindings: &[(&str, &str)] = &[
        ("↑/k ↓/j", "move the cursor"),
        ("←/h", "collapse, or jump to the parent"),
        ("→/l", "expand, or descend to the first child"),
        ("Space/Tab", "toggle collapse"),
        ("Enter/r", "rename the focused node"),
        ("e", "edit the focused node's data value"),
        ("a", "add a child (a leaf becomes a container)"),
        ("y", "export JSON to panel and clipboard"),
        ("Esc", "dismiss panels / cancel an edit"),
        ("q / Ctrl-C", "quit"),
    ];

    let mut text = vec![Line::from("")];
    for (keys, action) in bindings {
        text.push(Line::from(vec![
            Span::styled(format!("  {keys:<12}"), Style::default().fg(theme::YELLOW)),
            Span::styled((*action).to_string(), Style::default().fg(theme::TEXT)),
        ]));
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "[Press Esc to close]",
        Style::default().fg(theme::SUBTEXT1),
    )));

    let block = Block::default()
        .title(Span::styled(" Keys ", Style::default().fg(theme::PEACH)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SURFACE2));
    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}
