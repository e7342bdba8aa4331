use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem as ListRow, ListState, Paragraph};

use super::app::{App, MessageType, Mode};
use super::layout::{AppLayout, list_height_for, preview_mode_for};
use super::preview::{PreviewLine, SpanStyle, render_preview};
use crate::models::{ListItem, Role};
use crate::utils::{format_relative_timestamp, strip_ansi_codes};

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const RED: Color = Color::Rgb(239, 68, 68);
const AMBER: Color = Color::Rgb(245, 158, 11);
const SKY: Color = Color::Rgb(56, 189, 248);
const BAR_BG: Color = Color::Rgb(24, 24, 27);

const PROJECT_WIDTH: usize = 20;
const SUMMARY_WIDTH: usize = 120;

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = AppLayout::new(area, list_height_for(area.height));

    render_search_line(frame, layout.search_area, app);
    render_info_line(frame, layout.info_area, app);
    render_list(frame, layout.list_area, app);
    render_preview_pane(frame, layout.preview_area, app);
}

fn render_search_line(frame: &mut Frame, area: Rect, app: &App) {
    let line = match (app.mode(), app.pending_delete()) {
        (Mode::ConfirmingDelete { .. }, Some(item)) => Line::from(vec![
            Span::styled(
                format!("Delete conversation {}? ", item.conversation.session_id),
                Style::default().fg(RED).add_modifier(Modifier::BOLD),
            ),
            Span::styled("(y/n)", Style::default().fg(BRIGHT)),
        ]),
        _ => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(EMERALD).add_modifier(Modifier::BOLD)),
            Span::raw(app.query().to_string()),
            Span::styled("█", Style::default().fg(MUTED)),
        ]),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_info_line(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(status) = app.status_message() {
        let fg = match status.message_type {
            MessageType::Success => EMERALD,
            MessageType::Error => RED,
        };
        (format!(" {} ", status.text), Style::default().fg(fg).bg(BAR_BG))
    } else if app.is_confirming() {
        (" y: delete transcript | n/Esc: cancel ".to_string(), Style::default().fg(BRIGHT).bg(BAR_BG))
    } else {
        let mut parts = vec![format!("{}/{} conversations", app.filtered_len(), app.items().len())];
        if app.filtered_len() > 0 {
            parts.push(format!("{}/{}", app.cursor() + 1, app.filtered_len()));
        }
        parts.push("Enter: resume".to_string());
        parts.push("Ctrl+D: delete".to_string());
        parts.push("Ctrl+Y: copy".to_string());
        parts.push("Esc: quit".to_string());
        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(BAR_BG))
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_list(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(" Conversations ");

    if app.filtered_len() == 0 {
        let message = if app.items().is_empty() {
            "No conversations left"
        } else {
            "No conversations match"
        };
        let paragraph = Paragraph::new(message).style(Style::default().fg(MUTED)).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<ListRow> = app.filtered_items().map(|item| ListRow::new(list_row(item))).collect();
    let list = List::new(rows)
        .block(block)
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(app.cursor()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// One list row: activity, project, message count, opening prompt
fn list_row(item: &ListItem) -> String {
    let conversation = &item.conversation;
    let summary = conversation
        .user_messages()
        .next()
        .map(|m| strip_ansi_codes(&m.text))
        .and_then(|text| text.lines().find(|l| !l.trim().is_empty()).map(str::to_string))
        .unwrap_or_else(|| "(no prompt)".to_string());

    format!(
        "{:>9}  {:<width$}  {:>4} msgs  {}",
        format_relative_timestamp(&conversation.last_timestamp),
        truncate(conversation.project_name(), PROJECT_WIDTH),
        conversation.messages.len(),
        truncate(summary.trim(), SUMMARY_WIDTH),
        width = PROJECT_WIDTH
    )
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn render_preview_pane(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(" Preview ");

    let content = match app.selected() {
        Some(item) => {
            let rows = usize::from(block.inner(area).height);
            let mode = preview_mode_for(rows as u16);
            let lines =
                render_preview(&item.conversation, app.query(), rows, app.preview_scroll(), mode);
            Text::from(lines.iter().map(to_line).collect::<Vec<_>>())
        }
        None => Text::from("No conversation selected"),
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn to_line(line: &PreviewLine) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|span| Span::styled(span.text.clone(), span_style(span.style)))
            .collect::<Vec<_>>(),
    )
}

fn span_style(style: SpanStyle) -> Style {
    match style {
        SpanStyle::Plain => Style::default(),
        SpanStyle::HeaderKey => Style::default().fg(MUTED),
        SpanStyle::Role { role, matched } => {
            let fg = match role {
                Role::User => EMERALD,
                Role::Assistant => SKY,
            };
            let base = Style::default().fg(fg).add_modifier(Modifier::BOLD);
            if matched { base.add_modifier(Modifier::REVERSED) } else { base }
        }
        SpanStyle::Timestamp => Style::default().fg(MUTED),
        SpanStyle::Highlight => Style::default().fg(Color::Black).bg(AMBER),
        SpanStyle::CodeFrame => Style::default().fg(MUTED),
        SpanStyle::Code => Style::default().fg(SKY),
        SpanStyle::Skipped => Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        SpanStyle::Truncated => Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
    }
}
