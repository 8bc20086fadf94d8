//! Reusable TUI components.

use chrono::{DateTime, Utc};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::history::session_label;
use crate::model::TitleCard;
use crate::util::ago;

use super::state::{AppState, Panel};

/// Render the continue-reading shelf strip.
///
/// Cards are positioned from the carousel's scroll offset; the carousel is
/// also fed the freshly measured viewport and card width here, which is
/// the TUI's equivalent of a layout/resize observer.
pub fn render_shelf(f: &mut Frame, area: Rect, app: &mut AppState) {
    let focused = app.focus == Panel::Shelf;
    let border_style = if focused {
        app.theme.border_focused_style()
    } else {
        app.theme.border_style()
    };

    let auto = if app
        .shelf
        .auto_scroll_running(std::time::Instant::now())
    {
        " ~ "
    } else {
        ""
    };
    let title = format!(" Continue Reading {auto}");
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Layout feedback for the state machine.
    app.shelf_area = Some(inner);
    app.shelf.set_viewport(f32::from(inner.width));
    let card_width = app.shelf.card_stride() - app.shelf.options().card_gap;
    app.shelf.set_card_width(card_width);

    if app.shelf.items().is_empty() {
        let empty = Paragraph::new("Nothing on the shelf yet.").style(app.theme.dim_style());
        f.render_widget(empty, inner);
        return;
    }

    let now = Utc::now();
    for (slot, x) in app.shelf.visible_slots() {
        let Some(card) = app.shelf.item_at(slot) else {
            continue;
        };

        // Clip cards partially off either edge.
        let left = x.max(0.0) as u16;
        let right = ((x + card_width).min(f32::from(inner.width))).max(0.0) as u16;
        if right <= left {
            continue;
        }
        let card_area = Rect {
            x: inner.x + left,
            y: inner.y,
            width: right - left,
            height: inner.height,
        };
        render_card(f, card_area, card, now, &app.theme);
    }
}

/// Render one shelf card.
fn render_card(
    f: &mut Frame,
    area: Rect,
    card: &TitleCard,
    now: DateTime<Utc>,
    theme: &super::theme::Theme,
) {
    let chapter = card
        .latest_chapter
        .map_or_else(String::new, |n| format!("Ch. {n}"));

    let lines = vec![
        Line::from(Span::styled(
            truncate(&card.name, area.width as usize),
            Style::default().fg(theme.primary),
        )),
        Line::from(Span::raw(chapter)),
        Line::from(Span::styled(
            ago(card.last_read_at, now),
            theme.dim_style(),
        )),
    ];

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style()),
    );
    f.render_widget(widget, area);
}

/// Render the grouped reading-history panel.
pub fn render_history(f: &mut Frame, area: Rect, app: &mut AppState) {
    let focused = app.focus == Panel::History;
    let border_style = if focused {
        app.theme.border_focused_style()
    } else {
        app.theme.border_style()
    };

    let block = Block::default()
        .title(" Reading History ")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.loading && app.view.groups().is_empty() {
        f.render_widget(
            Paragraph::new("Loading history...").style(app.theme.dim_style()),
            inner,
        );
        return;
    }
    if app.view.groups().is_empty() {
        f.render_widget(
            Paragraph::new("No titles read in the last month.").style(app.theme.dim_style()),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;

    for (index, group) in app.view.groups().iter().enumerate() {
        let is_selected = index == app.selected;
        if is_selected {
            selected_line = lines.len();
        }

        let expanded = app.view.is_expanded(&group.title_id);
        let marker = if expanded { "v" } else { ">" };
        let loading = if app.view.is_loading(&group.title_id) {
            "  (loading...)"
        } else {
            ""
        };

        let header_style = if is_selected {
            app.theme.selection_style()
        } else {
            Style::default().fg(app.theme.foreground)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {}", group.display_name()), header_style),
            Span::styled(
                format!(
                    "  {} chapters - {}{loading}",
                    group.chapters_read(),
                    ago(group.last_read_at, now)
                ),
                app.theme.dim_style(),
            ),
        ]));

        if expanded {
            for session in app.view.sessions(&group.title_id) {
                lines.push(Line::from(vec![
                    Span::raw("    "),
                    Span::raw(session_label(&session.chapters)),
                    Span::styled(
                        format!("  {}", ago(session.last_read_at(), now)),
                        app.theme.dim_style(),
                    ),
                ]));
            }
        }
    }

    // Keep the cursor's line in view.
    let height = inner.height as usize;
    if selected_line < app.history_scroll {
        app.history_scroll = selected_line;
    } else if height > 0 && selected_line >= app.history_scroll + height {
        app.history_scroll = selected_line + 1 - height;
    }

    let visible: Vec<Line> = lines
        .into_iter()
        .skip(app.history_scroll)
        .take(height)
        .collect();
    f.render_widget(Paragraph::new(visible), inner);
}

/// Render the status bar.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let left = match (&app.status_message, app.navigator.last()) {
        (Some(message), _) => message.clone(),
        (None, Some(route)) => format!("-> {}", route.path()),
        (None, None) => String::new(),
    };
    let right = format!(
        "{} titles | Tab switch - Enter open - e expand - d delete - q quit",
        app.view.groups().len()
    );

    let padding = (area.width as usize)
        .saturating_sub(left.len() + right.len())
        .max(1);
    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(app.theme.foreground)),
        Span::raw(" ".repeat(padding)),
        Span::styled(right, app.theme.dim_style()),
    ]);

    f.render_widget(Paragraph::new(vec![line]), area);
}

/// Render the delete-confirmation modal.
pub fn render_confirm(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(intent) = &app.confirm else {
        return;
    };
    let name = app
        .view
        .group(&intent.title_id)
        .map_or(intent.title_id.as_str(), |g| g.display_name());

    let width = area.width.saturating_sub(8).clamp(20, 60).min(area.width);
    let modal = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + (area.height / 2).saturating_sub(2),
        width,
        height: 4.min(area.height),
    };

    let lines = vec![
        Line::from(format!("Remove all history for \"{name}\"?")),
        Line::from(Span::styled("y to confirm, n to cancel", app.theme.dim_style())),
    ];

    f.render_widget(Clear, modal);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .border_style(app.theme.error_style()),
        ),
        modal,
    );
}

/// Truncate a string to fit a width, with an ellipsis.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out: String = s.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer name", 8), "a longe…");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
