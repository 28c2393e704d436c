use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::theme::Theme;
use crate::ui::layout::MainLayout;

pub const KEYBINDS: &[(&str, &str)] = &[
    ("q", "Quit"),
    ("Tab / Shift+Tab", "Next / previous view"),
    ("1-4", "Jump to view"),
    ("j k / ↓ ↑", "Move in list"),
    ("h l / ← →", "Switch focus"),
    ("g / G", "Top / bottom"),
    ("Enter", "Select"),
    ("m", "Type a message"),
    ("n", "New agent, chat or task"),
    ("i / a / f", "Add instruction, app, resource"),
    ("x", "Delete selected"),
    ("c", "Cancel stream"),
    ("r", "Refresh"),
    ("t / T", "Toggle / reset theme"),
    ("?", "Help"),
];

const VIEWS: &[(&str, &str)] = &[
    (
        "1 Agents",
        "Agent roster with the instructions, apps and resources of the active agent",
    ),
    (
        "2 Chat",
        "Conversations with the active agent. Sending without an open chat starts one",
    ),
    (
        "3 Tasks",
        "Backend tasks, their agents and the streamed reply of the main agent",
    ),
    ("4 Help", "This screen"),
];

pub struct HelpView;

impl HelpView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let columns = MainLayout::create_two_column_layout(area, 50);

        let keys = KEYBINDS
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<18}", key),
                        Style::default()
                            .fg(theme.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*desc, Style::default().fg(theme.foreground())),
                ])
            })
            .collect::<Vec<_>>();
        frame.render_widget(panel(theme, " Keys ", keys), columns[0]);

        let views = VIEWS
            .iter()
            .flat_map(|(title, desc)| {
                [
                    Line::from(Span::styled(
                        format!("  {}", title),
                        Style::default()
                            .fg(theme.accent())
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("    {}", desc),
                        Style::default().fg(theme.foreground_dim()),
                    )),
                    Line::from(""),
                ]
            })
            .collect::<Vec<_>>();
        frame.render_widget(panel(theme, " Views ", views), columns[1]);
    }
}

fn panel<'a>(theme: &dyn Theme, title: &'a str, lines: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.surface())),
    )
}
