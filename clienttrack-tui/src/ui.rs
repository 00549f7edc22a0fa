//! UI rendering with Ratatui.
//!
//! Design: minimal black and white aesthetic. No colored borders.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use clienttrack_core::models::FollowUp;

use crate::app::{App, Screen};

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &App) {
    // Main layout: content area + status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar (single line, no border)
        ])
        .split(frame.area());

    match app.screen {
        Screen::Login => render_form(frame, app, chunks[0], " sign in "),
        Screen::Signup => render_form(frame, app, chunks[0], " sign up "),
        Screen::AddLead => render_form(frame, app, chunks[0], " new lead "),
        Screen::AddNote => render_form(frame, app, chunks[0], " follow-up note "),
        Screen::Leads => render_leads(frame, app, chunks[0]),
        Screen::Projects => render_projects(frame, app, chunks[0]),
        Screen::Dashboard => render_dashboard(frame, app, chunks[0]),
        Screen::Profile => render_profile(frame, app, chunks[0]),
    }

    render_status(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect, title: &str) {
    let mut lines: Vec<Line> = app
        .form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let shown = if field.masked {
                "•".repeat(field.value.chars().count())
            } else {
                field.value.clone()
            };
            let style = if i == app.form.active {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("  {}: ", field.label)),
                Span::styled(shown, style),
            ])
        })
        .collect();

    if app.screen == Screen::AddLead {
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Source: "),
            Span::styled(
                app.source.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (←/→ to change)", Style::default().add_modifier(Modifier::DIM)),
        ]));
    }

    let form = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(form, area);
}

fn render_leads(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .leads
        .iter()
        .enumerate()
        .map(|(i, lead)| {
            let style = if i == app.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(format!(
                "  {} · {} · follow up {}",
                lead.client_name,
                lead.source.as_str(),
                lead.follow_up_date.format("%Y-%m-%d"),
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().title(" leads ").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_projects(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .projects
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i == app.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            ListItem::new(format!(
                "  {} [{}] · {:.0} · due {} · {} notes",
                p.project.client_name,
                p.project.status.as_str(),
                p.project.revenue,
                p.project.expected_time.format("%Y-%m-%d"),
                p.follow_up_notes.len(),
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(Block::default().title(" projects ").borders(Borders::ALL));
    frame.render_widget(list, area);
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(dashboard) = &app.dashboard {
        lines.push(Line::from(vec![
            Span::raw("  Expected revenue: "),
            Span::styled(
                format!("{:.0}", dashboard.expected_revenue),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::raw(format!(
            "  Leads: {}   Projects: {}",
            dashboard.leads_count, dashboard.projects_count
        )));
        let counts = &dashboard.projects_by_status;
        lines.push(Line::raw(format!(
            "  in progress {} · on hold {} · partially completed {} · completed {}",
            counts.in_progress, counts.on_hold, counts.partially_completed, counts.completed
        )));
        lines.push(Line::raw(""));
        lines.push(Line::raw("  Today's follow-ups:"));

        if dashboard.follow_ups.is_empty() {
            lines.push(Line::styled(
                "    nothing due today",
                Style::default().add_modifier(Modifier::DIM),
            ));
        }
        for item in &dashboard.follow_ups {
            let (kind, name) = match item {
                FollowUp::Lead(lead) => ("lead", lead.client_name.as_str()),
                FollowUp::Project(p) => ("project", p.project.client_name.as_str()),
            };
            lines.push(Line::raw(format!(
                "    {} · {} · {}",
                item.due().format("%H:%M"),
                kind,
                name,
            )));
        }
    } else {
        lines.push(Line::styled(
            "  loading…",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    let dashboard =
        Paragraph::new(lines).block(Block::default().title(" dashboard ").borders(Borders::ALL));
    frame.render_widget(dashboard, area);
}

fn render_profile(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match &app.session {
        Some(session) => vec![
            Line::raw(""),
            Line::from(Span::styled(
                format!("  {}", session.user.name),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(format!("  {}", session.user.email)),
        ],
        None => vec![Line::raw("  not signed in")],
    };

    let profile =
        Paragraph::new(lines).block(Block::default().title(" profile ").borders(Borders::ALL));
    frame.render_widget(profile, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let status_text = if let Some(ref message) = app.status {
        Line::from(vec![Span::styled(
            message.as_str(),
            Style::default().add_modifier(Modifier::DIM),
        )])
    } else {
        hints(app.screen)
    };

    let status = Paragraph::new(status_text);
    frame.render_widget(status, area);
}

fn hints(screen: Screen) -> Line<'static> {
    let spans = match screen {
        Screen::Login => vec![
            key("enter"),
            Span::raw(" sign in  "),
            key("ctrl+n"),
            Span::raw(" sign up  "),
            key("esc"),
            Span::raw(" quit"),
        ],
        Screen::Signup => vec![
            key("enter"),
            Span::raw(" create account  "),
            key("esc"),
            Span::raw(" back"),
        ],
        Screen::Leads => vec![
            key("a"),
            Span::raw(" add  "),
            key("c"),
            Span::raw(" convert  "),
            key("d"),
            Span::raw(" delete  "),
            key("tab"),
            Span::raw(" projects  "),
            key("esc"),
            Span::raw(" quit"),
        ],
        Screen::AddLead | Screen::AddNote => vec![
            key("enter"),
            Span::raw(" save  "),
            key("esc"),
            Span::raw(" cancel"),
        ],
        Screen::Projects => vec![
            key("s"),
            Span::raw(" status  "),
            key("n"),
            Span::raw(" note  "),
            key("tab"),
            Span::raw(" dashboard  "),
            key("esc"),
            Span::raw(" quit"),
        ],
        Screen::Dashboard => vec![
            key("r"),
            Span::raw(" refresh  "),
            key("tab"),
            Span::raw(" profile  "),
            key("esc"),
            Span::raw(" quit"),
        ],
        Screen::Profile => vec![
            key("enter"),
            Span::raw(" logout  "),
            key("tab"),
            Span::raw(" leads  "),
            key("esc"),
            Span::raw(" quit"),
        ],
    };
    Line::from(spans)
}

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::default().add_modifier(Modifier::BOLD))
}
