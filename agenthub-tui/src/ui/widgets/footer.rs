use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, View};
use crate::events::InputMode;

pub struct Footer;

impl Footer {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        let spans: Vec<Span> = Self::keybinds(app)
            .iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(
                        format!(" {key}"),
                        Style::default()
                            .fg(theme.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(":{desc} "),
                        Style::default().fg(theme.foreground_dim()),
                    ),
                ]
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface())),
            chunks[0],
        );

        let (status, color) = match (&app.status_message, app.data.error()) {
            (Some(message), _) => (message.as_str(), theme.foreground_dim()),
            (None, Some(error)) => (error, theme.error()),
            (None, None) => ("Ready", theme.foreground_dim()),
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(status, Style::default().fg(color))))
                .alignment(Alignment::Right)
                .style(Style::default().bg(theme.surface())),
            chunks[1],
        );
    }

    fn keybinds(app: &App) -> &'static [(&'static str, &'static str)] {
        match app.event_handler.input_mode() {
            InputMode::Editing => &[("Enter", "Send"), ("Esc", "Stop typing")],
            InputMode::Form => &[
                ("Tab", "Next"),
                ("←/→", "Choose"),
                ("Enter", "Save"),
                ("Esc", "Cancel"),
            ],
            InputMode::Dialog => &[("y", "Yes"), ("n", "No"), ("Tab", "Switch")],
            InputMode::Normal => match app.current_view {
                View::Agents => &[
                    ("q", "Quit"),
                    ("h/l", "Focus"),
                    ("n", "New"),
                    ("i/a/f", "Add"),
                    ("x", "Delete"),
                    ("t", "Theme"),
                ],
                View::Chat => &[
                    ("q", "Quit"),
                    ("j/k", "Chats"),
                    ("m", "Message"),
                    ("n", "New chat"),
                    ("t", "Theme"),
                ],
                View::Tasks => &[
                    ("q", "Quit"),
                    ("Enter", "Open"),
                    ("n", "New"),
                    ("m", "Message"),
                    ("c", "Cancel"),
                    ("r", "Refresh"),
                ],
                View::Help => &[("q", "Quit"), ("Tab", "Next View"), ("t", "Theme")],
            },
        }
    }
}
