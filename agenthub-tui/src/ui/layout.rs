use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::app::{App, View};
use crate::ui::views::{AgentsView, ChatView, HelpView, TasksView};
use crate::ui::widgets::{Footer, Header};

pub struct MainLayout;

impl MainLayout {
    pub fn render(frame: &mut Frame, app: &App) {
        let theme = app.current_theme();
        let size = frame.area();

        frame.render_widget(
            Block::default().style(
                Style::default()
                    .bg(theme.background())
                    .fg(theme.foreground()),
            ),
            size,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(size);

        Header::render(frame, chunks[0], app);

        let content_area = chunks[1].inner(Margin::new(1, 0));
        match app.current_view {
            View::Agents => AgentsView::render(frame, content_area, app),
            View::Chat => ChatView::render(frame, content_area, app),
            View::Tasks => TasksView::render(frame, content_area, app),
            View::Help => HelpView::render(frame, content_area, app),
        }

        Footer::render(frame, chunks[2], app);

        if let Some(form) = &app.form {
            form.render(frame, size, theme);
        }

        if let Some(dialog) = &app.dialog_state.dialog {
            dialog.render(frame, size, theme);
        }
    }

    pub fn create_two_column_layout(area: Rect, left_percent: u16) -> Vec<Rect> {
        let left = left_percent.min(100);
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(left),
                Constraint::Percentage(100 - left),
            ])
            .split(area)
            .to_vec()
    }
}
