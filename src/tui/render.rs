use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::model::data_item::DataItem;
use crate::model::doc::Doc;
use crate::model::screen::FlexDirection;
use crate::ops::compose::{SectionView, compose};

use super::app::{App, PromptKind, View};

fn direction(flex: FlexDirection) -> Direction {
    match flex {
        FlexDirection::Row => Direction::Horizontal,
        FlexDirection::Column => Direction::Vertical,
    }
}

fn fill(flex: f64) -> Constraint {
    Constraint::Fill((flex.max(1.0)) as u16)
}

/// Cut a string to the given display width
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for c in s.chars() {
        if out.width() + 2 > max {
            out.push('…');
            return out;
        }
        out.push(c);
    }
    out
}

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_tab_bar(frame, app, chunks[0]);

    match app.view {
        View::Library => render_library(frame, app, chunks[1]),
        View::Screen(_) => render_screen(frame, app, chunks[1]),
    }

    render_status_row(frame, app, chunks[2]);

    if app.quiz_open {
        render_quiz_popup(frame, app, area);
    }
}

// ---------------------------------------------------------------------------
// Tab bar
// ---------------------------------------------------------------------------

fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = Style::default()
        .fg(theme.highlight)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(theme.dim);

    let mut spans = vec![Span::styled(
        " Library ",
        if app.view == View::Library { active } else { inactive },
    )];
    for (idx, doc) in app.screens.iter().enumerate() {
        spans.push(Span::styled("· ", Style::default().fg(theme.border)));
        let name = if doc.data.name.is_empty() { "(unnamed)" } else { &doc.data.name };
        spans.push(Span::styled(
            format!(" {} ", name),
            if app.view == View::Screen(idx) { active } else { inactive },
        ));
    }
    if let Some(user) = &app.session.user_email {
        spans.push(Span::styled(
            format!("  — {}", user),
            Style::default().fg(theme.dim),
        ));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            "─".repeat(area.width as usize),
            Style::default().fg(theme.border),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

// ---------------------------------------------------------------------------
// Library view
// ---------------------------------------------------------------------------

fn item_lines(doc: &Doc<DataItem>, app: &App, max_width: usize) -> Line<'static> {
    let theme = &app.theme;
    let item = &doc.data;
    let mut spans = vec![Span::styled(
        format!("[{}] ", item.kind.name()),
        Style::default().fg(theme.dim),
    )];
    let body = match &item.field1 {
        Some(title) => format!("{} · {}", title, item.field2.display()),
        None => item.field2.display(),
    };
    spans.push(Span::styled(
        truncate(&body, max_width),
        Style::default().fg(theme.text),
    ));
    for tag in &item.tags {
        spans.push(Span::styled(
            format!(" #{}", tag),
            Style::default().fg(theme.tag),
        ));
    }
    Line::from(spans)
}

fn render_library(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" all items ", Style::default().fg(theme.text_bright)));
    let inner_width = area.width.saturating_sub(4) as usize;

    let lines: Vec<Line> = if app.items.is_empty() {
        vec![Line::from(Span::styled(
            "no items yet — add one with `mn add`",
            Style::default().fg(theme.dim),
        ))]
    } else {
        app.items
            .iter()
            .skip(app.library_scroll)
            .map(|doc| item_lines(doc, app, inner_width))
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

// ---------------------------------------------------------------------------
// Screen view
// ---------------------------------------------------------------------------

fn render_screen(frame: &mut Frame, app: &App, area: Rect) {
    let Some(tree) = app.visible_tree() else {
        return;
    };
    let view = compose(tree, &app.items);
    let editing = app.edit.is_some();

    let row_areas = Layout::default()
        .direction(direction(view.flex_direction))
        .constraints(
            view.rows_columns
                .iter()
                .map(|rc| fill(rc.flex))
                .collect::<Vec<_>>(),
        )
        .split(area);

    for (row_idx, (rc, rc_area)) in view.rows_columns.iter().zip(row_areas.iter()).enumerate() {
        let section_areas = Layout::default()
            .direction(direction(rc.flex_direction))
            .constraints(
                rc.sections
                    .iter()
                    .map(|s| fill(s.section.flex))
                    .collect::<Vec<_>>(),
            )
            .split(*rc_area);

        for (section_idx, (section, s_area)) in
            rc.sections.iter().zip(section_areas.iter()).enumerate()
        {
            let selected = editing && row_idx == app.sel_row && section_idx == app.sel_section;
            render_section(frame, app, section, rc.name, *s_area, selected);
        }
    }
}

fn render_section(
    frame: &mut Frame,
    app: &App,
    section: &SectionView,
    row_name: &str,
    area: Rect,
    selected: bool,
) {
    let theme = &app.theme;

    let mut title = String::from(" ");
    if !row_name.is_empty() {
        title.push_str(row_name);
        title.push_str(" / ");
    }
    if !section.section.name.is_empty() {
        title.push_str(&section.section.name);
        title.push(' ');
    }
    if section.section.tags.is_empty() {
        title.push_str("(all) ");
    } else {
        for tag in &section.section.tags {
            title.push('#');
            title.push_str(tag);
            title.push(' ');
        }
    }

    let border_style = if selected {
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            truncate(&title, area.width.saturating_sub(2) as usize),
            Style::default().fg(theme.text_bright),
        ));

    let inner_width = area.width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();

    // Aggregation series first, when every matched item is numeric
    if let Some(series) = &section.series {
        let max = series.iter().map(|s| s.value.abs()).fold(0.0, f64::max);
        for slice in series {
            let bar_len = if max > 0.0 {
                ((slice.value.abs() / max) * 12.0).round() as usize
            } else {
                0
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<12} ", truncate(&slice.label, 12)),
                    Style::default().fg(theme.tag),
                ),
                Span::styled("▇".repeat(bar_len.max(1)), Style::default().fg(theme.good)),
                Span::styled(
                    format!(" {}", slice.value),
                    Style::default().fg(theme.text),
                ),
            ]));
        }
        lines.push(Line::default());
    }

    if section.items.is_empty() {
        lines.push(Line::from(Span::styled(
            "no matching items",
            Style::default().fg(theme.dim),
        )));
    } else {
        for doc in &section.items {
            lines.push(item_lines(doc, app, inner_width));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

// ---------------------------------------------------------------------------
// Status row / prompt
// ---------------------------------------------------------------------------

fn prompt_label(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::NewScreen => "new screen name",
        PromptKind::RenameRowColumn => "row/column name",
        PromptKind::RenameSection => "section name",
        PromptKind::SectionTags => "section tags (space-separated)",
        PromptKind::QuizTags => "quiz tags (space-separated)",
    }
}

fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let line = if let Some(prompt) = &app.prompt {
        Line::from(vec![
            Span::styled(
                format!(" {}: ", prompt_label(prompt.kind)),
                Style::default().fg(theme.highlight),
            ),
            Span::styled(prompt.buffer.clone(), Style::default().fg(theme.text_bright)),
            Span::styled("▏", Style::default().fg(theme.highlight)),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {}", status),
            Style::default().fg(theme.highlight),
        ))
    } else {
        let hints = if app.quiz_open {
            " y pass · n fail · space next · t tags · esc close"
        } else if app.edit.is_some() {
            " arrows select · a/A add · x/X remove · f/F flip · n/N/t rename/tags · s save · esc cancel"
        } else {
            " tab screens · e edit · c new screen · z quiz · d theme · q quit"
        };
        Line::from(Span::styled(hints, Style::default().fg(theme.dim)))
    };

    frame.render_widget(Paragraph::new(line), area);
}

// ---------------------------------------------------------------------------
// Quiz popup
// ---------------------------------------------------------------------------

/// Centered popup rect: `percent` of the area in each dimension
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

fn render_quiz_popup(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let popup = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.highlight))
        .title(Span::styled(
            " quiz ",
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme.background));

    let mut lines: Vec<Line> = Vec::new();

    let scope = if app.quiz.selected_tags.is_empty() {
        Span::styled("no tags selected — press t", Style::default().fg(theme.dim))
    } else {
        Span::styled(
            app.quiz
                .selected_tags
                .iter()
                .map(|t| format!("#{t}"))
                .collect::<Vec<_>>()
                .join(" "),
            Style::default().fg(theme.tag),
        )
    };
    lines.push(Line::from(vec![
        Span::styled("scope: ", Style::default().fg(theme.dim)),
        scope,
    ]));
    lines.push(Line::default());

    match &app.quiz.current {
        Some(doc) => {
            if let Some(title) = &doc.data.field1 {
                lines.push(Line::from(Span::styled(
                    title.clone(),
                    Style::default()
                        .fg(theme.text_bright)
                        .add_modifier(Modifier::BOLD),
                )));
            }
            lines.push(Line::from(Span::styled(
                doc.data.field2.display(),
                Style::default().fg(theme.text),
            )));
            lines.push(Line::default());
            let ok = doc.data.quizz_ok.unwrap_or(0);
            let ko = doc.data.quizz_ko.unwrap_or(0);
            lines.push(Line::from(vec![
                Span::styled(format!("{ok} pass"), Style::default().fg(theme.good)),
                Span::styled(" / ", Style::default().fg(theme.dim)),
                Span::styled(format!("{ko} fail"), Style::default().fg(theme.bad)),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "no questions match the selected tags",
            Style::default().fg(theme.dim),
        ))),
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        popup,
    );
}
