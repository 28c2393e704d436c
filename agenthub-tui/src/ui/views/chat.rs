use agenthub_core::Sender;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::events::InputMode;
use crate::theme::Theme;
use crate::ui::layout::MainLayout;

pub struct ChatView;

impl ChatView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let columns = MainLayout::create_two_column_layout(area, 30);
        Self::render_chat_list(frame, columns[0], app);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(columns[1]);
        Self::render_messages(frame, rows[0], app);
        render_input(frame, rows[1], app, "Message");
    }

    fn render_chat_list(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let chats = app.data.agents.agent_chats();
        let active_id = app.data.agents.active_chat().map(|c| c.id.as_str());

        let items: Vec<ListItem> = chats
            .iter()
            .map(|chat| {
                let is_active = Some(chat.id.as_str()) == active_id;
                let marker = if is_active { "▶ " } else { "  " };
                let title_style = if is_active {
                    Style::default()
                        .fg(theme.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.foreground())
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(theme.accent())),
                        Span::styled(chat.title.clone(), title_style),
                    ]),
                    Line::from(Span::styled(
                        format!("  {}", chat.ts),
                        Style::default().fg(theme.foreground_dim()),
                    )),
                ])
            })
            .collect();

        let agent_name = app
            .data
            .agents
            .current_agent()
            .map(|a| a.name.as_str())
            .unwrap_or("no agent");
        let border = if app.state.focus == Focus::List {
            theme.accent()
        } else {
            theme.border()
        };

        let list = List::new(items).block(
            Block::default()
                .title(format!(" Chats · {} ", agent_name))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(list, area);
    }

    fn render_messages(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let (title, lines) = match app.data.agents.active_chat() {
            Some(chat) => {
                let lines = chat
                    .messages
                    .iter()
                    .flat_map(|m| message_lines(theme, m.from, &m.text))
                    .collect();
                (format!(" {} ", chat.title), lines)
            }
            None => (
                " New chat ".to_string(),
                vec![Line::from(Span::styled(
                    "Press m and type a message to start a new chat.",
                    Style::default().fg(theme.foreground_dim()),
                ))],
            ),
        };

        let mut lines: Vec<Line> = lines;
        if let Some(error) = &app.data.agents.requests.send_message.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.error()),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.state.scroll, 0))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border()))
                    .style(Style::default().bg(theme.surface())),
            );
        frame.render_widget(paragraph, area);
    }
}

/// Sender label line, the text, then a blank separator.
pub fn message_lines(theme: &dyn Theme, from: Sender, text: &str) -> Vec<Line<'static>> {
    let (label, color) = match from {
        Sender::User => ("You", theme.accent()),
        Sender::Agent => ("Agent", theme.accent_secondary()),
    };

    let mut lines = vec![Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(text.lines().map(|l| {
        Line::from(Span::styled(
            format!("  {}", l),
            Style::default().fg(theme.foreground()),
        ))
    }));
    lines.push(Line::from(""));
    lines
}

/// Message line shared by the Chat and Tasks views.
pub fn render_input(frame: &mut Frame, area: Rect, app: &App, title: &str) {
    let theme = app.current_theme();
    let editing = app.event_handler.input_mode() == InputMode::Editing;

    let (text, style) = if editing {
        (
            format!("{}▏", app.input),
            Style::default().fg(theme.foreground()),
        )
    } else if app.input.is_empty() {
        (
            "Press m to type".to_string(),
            Style::default().fg(theme.foreground_dim()),
        )
    } else {
        (app.input.clone(), Style::default().fg(theme.foreground_dim()))
    };

    let border = if editing { theme.accent() } else { theme.border() };
    let input = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.surface())),
    );
    frame.render_widget(input, area);
}
