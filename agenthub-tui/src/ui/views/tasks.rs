use agenthub_core::{AgentKind, TaskStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::chat::{message_lines, render_input};
use crate::app::{App, Focus};
use crate::theme::Theme;
use crate::ui::layout::MainLayout;
use crate::ui::widgets::spinner_frame;

pub struct TasksView;

impl TasksView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let columns = MainLayout::create_two_column_layout(area, 40);
        Self::render_task_table(frame, columns[0], app);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(columns[1]);
        Self::render_agents_line(frame, rows[0], app);
        Self::render_conversation(frame, rows[1], app);
        render_input(frame, rows[2], app, "Message the main agent");
    }

    fn render_task_table(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let tasks = &app.data.tasks.tasks;
        let focused = app.state.focus == Focus::List;
        let selected = app.state.task_index.min(tasks.len().saturating_sub(1));
        let active = app.data.tasks.active_task_id.as_deref();

        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("Task"),
            Cell::from("Status"),
        ])
        .style(
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let is_selected = focused && i == selected;
                let marker = if is_selected {
                    "▶"
                } else if Some(task.id.as_str()) == active {
                    "●"
                } else {
                    " "
                };
                let status = if app.data.tasks.is_streaming(&task.id) {
                    format!("{} streaming", spinner_frame(app.tick))
                } else {
                    task.status.to_string()
                };
                let row_style = if is_selected {
                    Style::default().bg(theme.selection()).fg(theme.foreground())
                } else {
                    Style::default().fg(theme.foreground())
                };

                Row::new(vec![
                    Cell::from(Span::styled(marker, Style::default().fg(theme.accent()))),
                    Cell::from(task.title.clone()),
                    Cell::from(Span::styled(
                        status,
                        Style::default().fg(status_color(theme, task.status)),
                    )),
                ])
                .style(row_style)
            })
            .collect();

        let title = if app.data.tasks.loading {
            " Tasks (loading…) ".to_string()
        } else {
            format!(" Tasks ({}) ", tasks.len())
        };
        let border = if focused { theme.accent() } else { theme.border() };

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Min(12),
                Constraint::Length(14),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(table, area);
    }

    fn render_agents_line(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let lines = match app.data.tasks.current_task() {
            Some(task) => {
                let agents: Vec<Span> = task
                    .agents
                    .iter()
                    .flat_map(|agent| {
                        let color = match agent.kind {
                            AgentKind::Main => theme.accent(),
                            AgentKind::Sub => theme.accent_secondary(),
                        };
                        [
                            Span::styled(agent.name.clone(), Style::default().fg(color)),
                            Span::styled(
                                format!(" ({})  ", agent.status),
                                Style::default().fg(theme.foreground_dim()),
                            ),
                        ]
                    })
                    .collect();
                vec![
                    Line::from(Span::styled(
                        task.description.clone(),
                        Style::default().fg(theme.foreground_dim()),
                    )),
                    if agents.is_empty() {
                        Line::from(Span::styled(
                            "No agents yet",
                            Style::default().fg(theme.foreground_dim()),
                        ))
                    } else {
                        Line::from(agents)
                    },
                ]
            }
            None => vec![Line::from(Span::styled(
                "Select a task with Enter or press n to create one.",
                Style::default().fg(theme.foreground_dim()),
            ))],
        };

        let title = app
            .data
            .tasks
            .current_task()
            .map(|t| format!(" {} ", t.title))
            .unwrap_or_else(|| " Task ".to_string());

        let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border()))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(panel, area);
    }

    fn render_conversation(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let focused = app.state.focus == Focus::Detail;

        let mut lines: Vec<Line> = app
            .data
            .tasks
            .active_chat()
            .iter()
            .flat_map(|m| message_lines(theme, m.from, &m.text))
            .collect();

        if let Some(task_id) = app.data.tasks.active_task_id.as_deref() {
            let progress = app.data.tasks.progress(task_id);
            if progress.is_streaming || !progress.response.is_empty() {
                let label = if progress.is_streaming {
                    format!("Agent {}", spinner_frame(app.tick))
                } else {
                    "Agent".to_string()
                };
                lines.push(Line::from(Span::styled(
                    label,
                    Style::default()
                        .fg(theme.accent_secondary())
                        .add_modifier(Modifier::ITALIC),
                )));
                lines.extend(progress.response.lines().map(|l| {
                    Line::from(Span::styled(
                        format!("  {}", l),
                        Style::default().fg(theme.foreground_dim()),
                    ))
                }));
            }
            if let Some(error) = progress.error {
                lines.push(Line::from(Span::styled(
                    error,
                    Style::default().fg(theme.error()),
                )));
            }
        }

        if lines.is_empty() {
            lines.push(Line::from(Span::styled(
                "No messages yet",
                Style::default().fg(theme.foreground_dim()),
            )));
        }

        let border = if focused { theme.accent() } else { theme.border() };
        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((app.state.scroll, 0))
            .block(
                Block::default()
                    .title(" Conversation ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .style(Style::default().bg(theme.surface())),
            );
        frame.render_widget(panel, area);
    }
}

fn status_color(theme: &dyn Theme, status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => theme.warning(),
        TaskStatus::InProgress => theme.info(),
        TaskStatus::Completed => theme.success(),
    }
}
