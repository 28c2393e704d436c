use agenthub_core::{Agent, SettingItem, SettingKind};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Focus};
use crate::ui::layout::MainLayout;

/// Settings of an agent in display order: instructions, apps, resources.
pub fn setting_rows(agent: &Agent) -> Vec<(SettingKind, &SettingItem)> {
    let Some(settings) = agent.settings.as_ref() else {
        return Vec::new();
    };
    [SettingKind::Instruction, SettingKind::App, SettingKind::Resource]
        .into_iter()
        .flat_map(|kind| settings.list(kind).iter().map(move |item| (kind, item)))
        .collect()
}

pub struct AgentsView;

impl AgentsView {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let columns = MainLayout::create_two_column_layout(area, 40);
        Self::render_agents_table(frame, columns[0], app);
        Self::render_settings(frame, columns[1], app);
    }

    fn render_agents_table(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let agents = &app.data.agents.agents;
        let selected = app.state.agent_index.min(agents.len().saturating_sub(1));
        let focused = app.state.focus == Focus::List;

        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("Agent"),
            Cell::from("Role"),
        ])
        .style(
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                let is_selected = focused && i == selected;
                let is_active = agent.id == app.data.agents.active_agent_id;
                let marker = match (is_selected, is_active) {
                    (true, _) => "▶",
                    (false, true) => "●",
                    _ => " ",
                };
                let name = if agent.fixed {
                    format!("{} 🔒", agent.name)
                } else {
                    agent.name.clone()
                };
                let row_style = if is_selected {
                    Style::default().bg(theme.selection()).fg(theme.foreground())
                } else {
                    Style::default().fg(theme.foreground())
                };

                Row::new(vec![
                    Cell::from(Span::styled(marker, Style::default().fg(theme.accent()))),
                    Cell::from(Span::styled(
                        name,
                        if is_active {
                            Style::default().add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        },
                    )),
                    Cell::from(Span::styled(
                        agent.role.clone(),
                        Style::default().fg(theme.foreground_dim()),
                    )),
                ])
                .style(row_style)
            })
            .collect();

        let border = if focused { theme.accent() } else { theme.border() };
        let title = if app.data.agents.requests.agents.is_loading {
            " Agents (loading…) ".to_string()
        } else {
            format!(" Agents ({}) ", agents.len())
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Min(14),
                Constraint::Percentage(45),
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

    fn render_settings(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();
        let focused = app.state.focus == Focus::Detail;
        let border = if focused { theme.accent() } else { theme.border() };

        let Some(agent) = app.data.agents.current_agent() else {
            let empty = Paragraph::new("No active agent")
                .style(Style::default().fg(theme.foreground_dim()))
                .block(
                    Block::default()
                        .title(" Settings ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                );
            frame.render_widget(empty, area);
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                agent.name.clone(),
                Style::default()
                    .fg(theme.foreground())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                agent.desc.clone().unwrap_or_else(|| agent.role.clone()),
                Style::default().fg(theme.foreground_dim()),
            )),
        ];

        let rows = setting_rows(agent);
        let selected = app.state.setting_index.min(rows.len().saturating_sub(1));
        let mut last_kind = None;

        for (i, (kind, item)) in rows.iter().enumerate() {
            if last_kind != Some(*kind) {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    section_title(*kind),
                    Style::default()
                        .fg(theme.accent_secondary())
                        .add_modifier(Modifier::BOLD),
                )));
                last_kind = Some(*kind);
            }

            let is_selected = focused && i == selected;
            let mut style = Style::default().fg(theme.foreground());
            if item.is_new {
                style = style.bg(theme.highlight());
            }
            if is_selected {
                style = style.bg(theme.selection()).add_modifier(Modifier::BOLD);
            }

            let mut spans = vec![
                Span::styled(
                    if is_selected { "▶ " } else { "  " },
                    Style::default().fg(theme.accent()),
                ),
                Span::styled(item.title.clone(), style),
            ];
            if let Some(note) = &item.note {
                spans.push(Span::styled(
                    format!("  {}", note),
                    Style::default().fg(theme.foreground_dim()),
                ));
            }
            lines.push(Line::from(spans));
        }

        if rows.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "No settings yet. Press i, a or f to add one.",
                Style::default().fg(theme.foreground_dim()),
            )));
        }

        let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" Settings ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(theme.surface())),
        );
        frame.render_widget(panel, area);
    }
}

fn section_title(kind: SettingKind) -> &'static str {
    match kind {
        SettingKind::Instruction => "Instructions",
        SettingKind::App => "Apps",
        SettingKind::Resource => "Resources",
    }
}
