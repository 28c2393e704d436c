use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Confirm,
    Cancel,
}

impl DialogButton {
    pub fn other(&self) -> Self {
        match self {
            DialogButton::Confirm => DialogButton::Cancel,
            DialogButton::Cancel => DialogButton::Confirm,
        }
    }
}

/// Yes/no prompt. Destructive dialogs start on Cancel and draw in the error
/// color.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    title: String,
    message: String,
    selected: DialogButton,
    confirm_label: String,
    cancel_label: String,
    destructive: bool,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            selected: DialogButton::Cancel,
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            destructive: false,
        }
    }

    pub fn danger(title: impl Into<String>, message: impl Into<String>) -> Self {
        let mut dialog = Self::new(title, message).with_confirm_label("Delete");
        dialog.destructive = true;
        dialog
    }

    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_destructive(&self) -> bool {
        self.destructive
    }

    pub fn selected(&self) -> DialogButton {
        self.selected
    }

    pub fn switch(&mut self) {
        self.selected = self.selected.other();
    }

    pub fn calculate_area(&self, screen: Rect) -> Rect {
        let width = 54u16.min(screen.width.saturating_sub(4));
        let height = 9u16.min(screen.height.saturating_sub(4));

        let x = screen.x + (screen.width.saturating_sub(width)) / 2;
        let y = screen.y + (screen.height.saturating_sub(height)) / 2;

        Rect::new(x, y, width, height)
    }

    pub fn render(&self, frame: &mut Frame, screen: Rect, theme: &dyn Theme) {
        let area = self.calculate_area(screen);
        frame.render_widget(Clear, area);

        let border_color = if self.destructive {
            theme.error()
        } else {
            theme.accent()
        };
        let icon = if self.destructive { "⚠" } else { "?" };

        let block = Block::default()
            .title(format!(" {} {} ", icon, self.title))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(theme.surface()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        let message = Paragraph::new(self.message.as_str())
            .style(Style::default().fg(theme.foreground()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let active = |color| {
            Style::default()
                .fg(theme.background())
                .bg(color)
                .add_modifier(Modifier::BOLD)
        };
        let confirm_color = if self.destructive {
            theme.error()
        } else {
            theme.accent()
        };

        let (cancel_style, confirm_style) = match self.selected {
            DialogButton::Cancel => (
                active(theme.foreground()),
                Style::default().fg(confirm_color),
            ),
            DialogButton::Confirm => (
                Style::default().fg(theme.foreground_dim()),
                active(confirm_color),
            ),
        };

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {} (n) ", self.cancel_label),
                cancel_style,
            )))
            .alignment(Alignment::Center),
            buttons[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(" {} (y) ", self.confirm_label),
                confirm_style,
            )))
            .alignment(Alignment::Center),
            buttons[1],
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    Pending,
    Confirmed,
    Cancelled,
}

/// Open confirm dialog plus the outcome of the last one that closed.
pub struct DialogState {
    pub dialog: Option<ConfirmDialog>,
    result: DialogResult,
}

impl DialogState {
    pub fn new() -> Self {
        Self {
            dialog: None,
            result: DialogResult::Pending,
        }
    }

    pub fn show(&mut self, dialog: ConfirmDialog) {
        self.dialog = Some(dialog);
        self.result = DialogResult::Pending;
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn confirm(&mut self) {
        if self.dialog.take().is_some() {
            self.result = DialogResult::Confirmed;
        }
    }

    pub fn cancel(&mut self) {
        if self.dialog.take().is_some() {
            self.result = DialogResult::Cancelled;
        }
    }

    pub fn switch(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.switch();
        }
    }

    pub fn execute_selected(&mut self) {
        match self.dialog.as_ref().map(|d| d.selected()) {
            Some(DialogButton::Confirm) => self.confirm(),
            Some(DialogButton::Cancel) => self.cancel(),
            None => {}
        }
    }

    pub fn take_result(&mut self) -> DialogResult {
        std::mem::replace(&mut self.result, DialogResult::Pending)
    }
}

impl Default for DialogState {
    fn default() -> Self {
        Self::new()
    }
}
