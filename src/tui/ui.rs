use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::app::{App, Focus};
use crate::models::ToolCategory;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Main panels
            Constraint::Length(3), // Status line
            Constraint::Length(3), // Keyboard shortcuts
        ])
        .split(frame.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[0]);

    let editor_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(main_chunks[1]);

    render_tool_list(frame, app, main_chunks[0]);
    render_input(frame, app, editor_chunks[0]);
    render_output(frame, app, editor_chunks[1]);
    render_status(frame, app, chunks[1]);
    render_shortcuts(frame, app, chunks[2]);
}

fn category_color(category: ToolCategory) -> Color {
    match category {
        ToolCategory::Encoding => Color::Green,
        ToolCategory::Formatting => Color::Yellow,
        ToolCategory::Protocol => Color::Magenta,
        ToolCategory::Text => Color::Blue,
        ToolCategory::Cryptography => Color::Red,
        ToolCategory::Other => Color::Gray,
    }
}

fn render_tool_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Tools")
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL);

    let state = app.store.state();
    let items: Vec<ListItem> = if state.loading_tools {
        vec![ListItem::new(Span::styled(
            "Loading...",
            Style::default().fg(Color::Gray).italic(),
        ))]
    } else if let Some(ref error) = state.tools_error {
        vec![ListItem::new(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        ))]
    } else if state.tools.is_empty() {
        vec![ListItem::new(Span::styled(
            "No tools. Press r to reload.",
            Style::default().fg(Color::Gray).italic(),
        ))]
    } else {
        state
            .tools
            .iter()
            .enumerate()
            .map(|(i, tool)| {
                let mut style = Style::default();
                if Some(i) == app.selected_index {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                let marker = if app.current_tool_id().as_deref() == Some(tool.id.as_str()) {
                    "▶ "
                } else {
                    "  "
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style.fg(Color::Cyan)),
                    Span::styled(tool.name.clone(), style.fg(Color::White)),
                    Span::styled(
                        format!(" ({:?})", tool.category).to_lowercase(),
                        style.fg(category_color(tool.category)),
                    ),
                ]))
                .style(style)
            })
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.focus == Focus::Input;
    let title = match app.current_tool_id() {
        Some(id) => format!("Input: {} [{}]", id, app.current_mode()),
        None => "Input".to_string(),
    };

    let border_style = if editing {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = match app.store.state().current_state() {
        Some(state) if !state.input.is_empty() => {
            let mut text = state.input.clone();
            if editing {
                text.push('▏');
            }
            Text::from(text)
        }
        Some(_) => Text::from(Span::styled(
            if editing { "▏" } else { "Press i to edit input." },
            Style::default().fg(Color::Gray).italic(),
        )),
        None => Text::from(Span::styled(
            "Select a tool and press Enter.",
            Style::default().fg(Color::Gray).italic(),
        )),
    };

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_output(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Output")
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL);

    let content = match app.store.state().current_state() {
        Some(state) if state.processing => Text::from(Span::styled(
            "Processing...",
            Style::default().fg(Color::Yellow).italic(),
        )),
        // Errors render in place of output.
        Some(state) => match &state.error {
            Some(error) => Text::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )),
            None if state.output.is_empty() => Text::from(Span::styled(
                "No output yet. Press p to process.",
                Style::default().fg(Color::Gray).italic(),
            )),
            None => Text::from(state.output.clone()),
        },
        None => Text::from(Span::styled(
            "No tool open.",
            Style::default().fg(Color::Gray).italic(),
        )),
    };

    let paragraph = Paragraph::new(content).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = Line::from(vec![
        Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("server: {}", app.api_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_shortcuts(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts: &[(&str, &str)] = match app.focus {
        Focus::Tools => &[
            ("▲▼", "Navigate"),
            ("⏎", "Open"),
            ("i", "Edit"),
            ("m", "Mode"),
            ("p", "Process"),
            ("c", "Clear"),
            ("r", "Reload"),
            ("s", "Sync settings"),
            ("t", "Theme"),
            ("q", "Quit"),
        ],
        Focus::Input => &[
            ("Esc", "Done"),
            ("⏎", "Newline"),
            ("Ctrl+P", "Process"),
        ],
    };

    let spans: Vec<Span> = shortcuts
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(
                    format!(" {} ", key),
                    Style::default().fg(Color::Cyan).bold(),
                ),
                Span::styled(format!("{} ", desc), Style::default().fg(Color::White)),
                Span::raw("| "),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(paragraph, area);
}
