use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Header;

impl Header {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(26),
            ])
            .split(area);

        let logo = Paragraph::new(Line::from(vec![
            Span::styled("◆ ", Style::default().fg(theme.accent())),
            Span::styled(
                "Agenthub ",
                Style::default()
                    .fg(theme.foreground())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("v{}", VERSION),
                Style::default().fg(theme.foreground_dim()),
            ),
        ]))
        .style(Style::default().bg(theme.background()));
        frame.render_widget(logo, chunks[0]);

        let titles: Vec<Line> = View::all()
            .iter()
            .enumerate()
            .map(|(i, v)| Line::from(format!("{} {}", i + 1, v.name())))
            .collect();
        let tabs = Tabs::new(titles)
            .style(
                Style::default()
                    .fg(theme.foreground_dim())
                    .bg(theme.background()),
            )
            .highlight_style(
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD),
            )
            .select(app.current_view.index())
            .divider(Span::raw(" │ "));
        frame.render_widget(tabs, chunks[1]);

        let loading = app.data.loading_state();
        let mut right = vec![Span::styled(
            app.theme_manager.mode().label(),
            Style::default().fg(theme.foreground_dim()),
        )];
        if app.data.is_streaming() {
            right.push(Span::styled(
                format!(" {}", spinner_frame(app.tick)),
                Style::default().fg(theme.accent()),
            ));
        } else if !loading.indicator().is_empty() {
            let color = if loading.is_error() {
                theme.error()
            } else {
                theme.success()
            };
            right.push(Span::styled(
                format!(" {}", loading.indicator()),
                Style::default().fg(color),
            ));
        }

        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        right.push(Span::styled(
            format!("  {}", time),
            Style::default().fg(theme.foreground_dim()),
        ));

        let status = Paragraph::new(Line::from(right))
            .alignment(Alignment::Right)
            .style(Style::default().bg(theme.background()));
        frame.render_widget(status, chunks[2]);
    }
}

pub fn spinner_frame(tick: u64) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    FRAMES[(tick as usize) % FRAMES.len()]
}
