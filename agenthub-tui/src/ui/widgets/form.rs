use agenthub_core::{
    AppForm, ConnectorType, FileType, FormError, InstructionForm, NewAgent, NewApp,
    NewInstruction, NewResource, ResourceForm,
};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Agent,
    Instruction,
    App,
    Resource,
    Task,
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Agent => "New agent",
            FormKind::Instruction => "Add instruction",
            FormKind::App => "Add app",
            FormKind::Resource => "Add resource",
            FormKind::Task => "New task",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutput {
    Agent(NewAgent),
    Instruction(NewInstruction),
    App(NewApp),
    Resource(NewResource),
    Task {
        title: String,
        description: String,
        user_message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Secret,
    Connector,
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    kind: FieldKind,
}

impl FormField {
    fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            kind: FieldKind::Text,
        }
    }

    fn connector_field(key: &'static str) -> Self {
        let kind = if ConnectorType::is_secret(key) {
            FieldKind::Secret
        } else {
            FieldKind::Text
        };
        Self {
            key,
            label: ConnectorType::field_label(key),
            value: String::new(),
            kind,
        }
    }

    fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Secret => "•".repeat(self.value.chars().count()),
            _ => self.value.clone(),
        }
    }
}

/// Modal form for creating agents, tasks and agent settings.
///
/// Text is kept raw while editing; `submit` runs the core form rules and
/// reports the first violation as a message shown inside the dialog.
#[derive(Debug, Clone)]
pub struct FormDialog {
    kind: FormKind,
    fields: Vec<FormField>,
    focused: usize,
    connector: ConnectorType,
    pub error: Option<String>,
}

impl FormDialog {
    pub fn new(kind: FormKind) -> Self {
        let fields = match kind {
            FormKind::Agent => vec![
                FormField::text("name", "Name"),
                FormField::text("role", "Role"),
                FormField::text("desc", "Description"),
            ],
            FormKind::Instruction => vec![
                FormField::text("title", "Title"),
                FormField::text("description", "Instruction"),
            ],
            FormKind::App => Vec::new(),
            FormKind::Resource => {
                let defaults: Vec<String> = FileType::all()
                    .iter()
                    .filter(|t| t.checked_by_default())
                    .map(|t| t.to_string())
                    .collect();
                let mut types = FormField::text("types", "File types");
                types.value = defaults.join(", ");
                vec![
                    FormField::text("name", "Name"),
                    FormField::text("folder", "Folder"),
                    FormField::text("files", "Files (comma separated)"),
                    types,
                ]
            }
            FormKind::Task => vec![
                FormField::text("title", "Title"),
                FormField::text("description", "Description"),
                FormField::text("user_message", "Message"),
            ],
        };

        let mut dialog = Self {
            kind,
            fields,
            focused: 0,
            connector: ConnectorType::Email,
            error: None,
        };
        if kind == FormKind::App {
            dialog.rebuild_app_fields(String::new());
        }
        dialog
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn connector(&self) -> ConnectorType {
        self.connector
    }

    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            if field.kind != FieldKind::Connector {
                field.value.push(c);
                self.error = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// Cycles the connector when it is focused. Other connectors' fields are
    /// cleared by rebuilding.
    pub fn cycle_connector(&mut self, forward: bool) {
        if self.kind != FormKind::App || self.fields[self.focused].kind != FieldKind::Connector {
            return;
        }

        let all = ConnectorType::all();
        let index = all.iter().position(|c| *c == self.connector).unwrap_or(0);
        let next = if forward {
            (index + 1) % all.len()
        } else {
            (index + all.len() - 1) % all.len()
        };
        self.connector = all[next];

        let title = self.value("title").to_string();
        self.rebuild_app_fields(title);
    }

    fn rebuild_app_fields(&mut self, title: String) {
        let mut title_field = FormField::text("title", "Title");
        title_field.value = title;

        self.fields = vec![
            title_field,
            FormField {
                key: "connector",
                label: "Connector",
                value: String::new(),
                kind: FieldKind::Connector,
            },
        ];
        self.fields.extend(
            self.connector
                .fields()
                .iter()
                .map(|key| FormField::connector_field(*key)),
        );
    }

    pub fn submit(&mut self) -> Result<FormOutput, FormError> {
        let result = self.build();
        self.error = result.as_ref().err().map(|e| e.to_string());
        result
    }

    fn build(&self) -> Result<FormOutput, FormError> {
        match self.kind {
            FormKind::Agent => {
                let name = required(self.value("name"), "Name")?;
                let role = required(self.value("role"), "Role")?;
                let desc = self.value("desc").trim();
                Ok(FormOutput::Agent(NewAgent {
                    name,
                    role,
                    desc: (!desc.is_empty()).then(|| desc.to_string()),
                    ..Default::default()
                }))
            }
            FormKind::Instruction => {
                let form = InstructionForm {
                    title: self.value("title").to_string(),
                    description: self.value("description").to_string(),
                };
                form.submit().map(FormOutput::Instruction)
            }
            FormKind::App => {
                let mut form = AppForm::new();
                form.title = self.value("title").to_string();
                form.set_connector(self.connector);
                for key in self.connector.fields() {
                    form.set_field(key, self.value(key));
                }
                form.submit().map(FormOutput::App)
            }
            FormKind::Resource => {
                let mut form = ResourceForm::new();
                form.name = self.value("name").to_string();
                form.folder = self.value("folder").trim().to_string();

                let wanted: Vec<String> = self
                    .value("types")
                    .split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect();
                for file_type in FileType::all() {
                    form.set_checked(*file_type, wanted.contains(&file_type.to_string()));
                }

                form.add_files(
                    self.value("files")
                        .split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty()),
                );
                form.submit().map(FormOutput::Resource)
            }
            FormKind::Task => Ok(FormOutput::Task {
                title: required(self.value("title"), "Title")?,
                description: self.value("description").trim().to_string(),
                user_message: required(self.value("user_message"), "Message")?,
            }),
        }
    }

    pub fn render(&self, frame: &mut Frame, screen: Rect, theme: &dyn Theme) {
        let width = 64u16.min(screen.width.saturating_sub(4));
        let height = (self.fields.len() as u16 * 2 + 6).min(screen.height.saturating_sub(2));
        let area = Rect::new(
            screen.x + screen.width.saturating_sub(width) / 2,
            screen.y + screen.height.saturating_sub(height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.kind.title()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent()))
            .style(Style::default().bg(theme.surface()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focused;
            let label_style = if focused {
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.foreground_dim())
            };
            lines.push(Line::from(Span::styled(field.label, label_style)));

            let value = match field.kind {
                FieldKind::Connector => format!("◀ {} ▶", self.connector.label()),
                _ if focused => format!("{}▏", field.display_value()),
                _ => field.display_value(),
            };
            lines.push(Line::from(Span::styled(
                format!("  {}", value),
                Style::default().fg(theme.foreground()),
            )));
        }

        lines.push(Line::from(""));
        match &self.error {
            Some(error) => lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(theme.error()),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Tab next field · Enter save · Esc cancel",
                Style::default().fg(theme.foreground_dim()),
            ))),
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(trimmed.to_string())
}
