//! Application state for the ClientTrack terminal client.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use uuid::Uuid;

use clienttrack_core::models::{
    CreateLeadInput, DashboardSummary, Lead, LeadSource, LoginInput, ProjectStatus,
    ProjectWithNotes, SignupInput,
};

use crate::client::ApiClient;
use crate::session::{self, Session};

/// How often the dashboard re-fetches while it is on display.
pub const DASHBOARD_REFRESH: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Leads,
    AddLead,
    Projects,
    AddNote,
    Dashboard,
    Profile,
}

/// A labelled text field in one of the forms.
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

impl Field {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    fn masked(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }
}

#[derive(Default)]
pub struct Form {
    pub fields: Vec<Field>,
    pub active: usize,
}

impl Form {
    fn new(fields: Vec<Field>) -> Self {
        Self { fields, active: 0 }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.active = (self.active + self.fields.len() - 1) % self.fields.len();
        }
    }

    fn push(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.push(c);
        }
    }

    fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.active) {
            field.value.pop();
        }
    }

    fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.as_str()).unwrap_or("")
    }
}

/// Application state.
pub struct App {
    pub client: ApiClient,
    pub screen: Screen,
    pub session: Option<Session>,
    pub leads: Vec<Lead>,
    pub projects: Vec<ProjectWithNotes>,
    pub dashboard: Option<DashboardSummary>,
    pub selected: usize,
    pub form: Form,
    /// Source picked on the add-lead form (cycled with left/right).
    pub source: LeadSource,
    /// Project receiving the note being typed.
    pub note_project: Option<Uuid>,
    /// One-line status/error surface.
    pub status: Option<String>,
    pub should_quit: bool,
    dashboard_fetched_at: Option<Instant>,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            screen: Screen::Login,
            session: None,
            leads: Vec::new(),
            projects: Vec::new(),
            dashboard: None,
            selected: 0,
            form: login_form(),
            source: LeadSource::Linkedin,
            note_project: None,
            status: None,
            should_quit: false,
            dashboard_fetched_at: None,
        }
    }

    /// Restore a saved session and load the first screen.
    pub fn bootstrap(&mut self) {
        if let Some(saved) = session::load() {
            self.client.set_token(&saved.token);
            self.session = Some(saved);
            self.enter(Screen::Leads);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.screen {
            Screen::Login => self.handle_login_key(key),
            Screen::Signup => self.handle_signup_key(key),
            Screen::AddLead => self.handle_add_lead_key(key),
            Screen::AddNote => self.handle_add_note_key(key),
            Screen::Leads | Screen::Projects | Screen::Dashboard | Screen::Profile => {
                self.handle_list_key(key)
            }
        }
    }

    /// Re-fetch the dashboard when it has been on display for a while.
    pub fn tick(&mut self) {
        if self.screen != Screen::Dashboard {
            return;
        }
        let stale = self
            .dashboard_fetched_at
            .map(|at| at.elapsed() >= DASHBOARD_REFRESH)
            .unwrap_or(true);
        if stale {
            self.refresh_dashboard();
        }
    }

    // ---- key handling ----

    fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form = signup_form();
                self.status = None;
                self.screen = Screen::Signup;
            }
            KeyCode::Enter => self.submit_login(),
            _ => self.handle_form_key(key),
        }
    }

    fn handle_signup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.form = login_form();
                self.status = None;
                self.screen = Screen::Login;
            }
            KeyCode::Enter => self.submit_signup(),
            _ => self.handle_form_key(key),
        }
    }

    fn handle_add_lead_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.enter(Screen::Leads),
            KeyCode::Enter => self.submit_lead(),
            KeyCode::Left => self.source = prev_source(self.source),
            KeyCode::Right => self.source = next_source(self.source),
            _ => self.handle_form_key(key),
        }
    }

    fn handle_add_note_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.enter(Screen::Projects),
            KeyCode::Enter => self.submit_note(),
            _ => self.handle_form_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.push(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.enter(next_screen(self.screen)),
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('r') => self.refresh_current(),
            KeyCode::Char('a') if self.screen == Screen::Leads => {
                self.form = add_lead_form();
                self.source = LeadSource::Linkedin;
                self.status = None;
                self.screen = Screen::AddLead;
            }
            KeyCode::Char('d') if self.screen == Screen::Leads => self.delete_selected_lead(),
            KeyCode::Char('c') if self.screen == Screen::Leads => self.convert_selected_lead(),
            KeyCode::Char('s') if self.screen == Screen::Projects => self.cycle_selected_status(),
            KeyCode::Char('n') if self.screen == Screen::Projects => self.start_note(),
            KeyCode::Enter if self.screen == Screen::Profile => self.logout(),
            _ => {}
        }
    }

    // ---- navigation ----

    fn enter(&mut self, screen: Screen) {
        self.screen = screen;
        self.selected = 0;
        self.status = None;
        self.refresh_current();
    }

    fn refresh_current(&mut self) {
        match self.screen {
            Screen::Leads => self.refresh_leads(),
            Screen::Projects => self.refresh_projects(),
            Screen::Dashboard => self.refresh_dashboard(),
            _ => {}
        }
    }

    fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    fn select_next(&mut self) {
        let len = match self.screen {
            Screen::Leads => self.leads.len(),
            Screen::Projects => self.projects.len(),
            _ => 0,
        };
        if self.selected < len.saturating_sub(1) {
            self.selected += 1;
        }
    }

    // ---- data ----

    fn refresh_leads(&mut self) {
        match self.client.leads() {
            Ok(leads) => {
                self.leads = leads;
                self.selected = self.selected.min(self.leads.len().saturating_sub(1));
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn refresh_projects(&mut self) {
        match self.client.projects() {
            Ok(projects) => {
                self.projects = projects;
                self.selected = self.selected.min(self.projects.len().saturating_sub(1));
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn refresh_dashboard(&mut self) {
        match self.client.dashboard() {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.dashboard_fetched_at = Some(Instant::now());
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    // ---- actions ----

    fn submit_login(&mut self) {
        let input = LoginInput {
            email: self.form.value(0).trim().to_string(),
            password: self.form.value(1).to_string(),
        };
        match self.client.login(&input) {
            Ok(auth) => self.start_session(auth.token, auth.user),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn submit_signup(&mut self) {
        let input = SignupInput {
            name: self.form.value(0).trim().to_string(),
            email: self.form.value(1).trim().to_string(),
            password: self.form.value(2).to_string(),
        };
        match self.client.signup(&input) {
            Ok(auth) => self.start_session(auth.token, auth.user),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn start_session(&mut self, token: String, user: clienttrack_core::models::UserProfile) {
        let session = Session { token, user };
        if let Err(err) = session::save(&session) {
            self.status = Some(format!("session not saved: {err}"));
        }
        self.client.set_token(&session.token);
        self.session = Some(session);
        self.enter(Screen::Leads);
    }

    fn submit_lead(&mut self) {
        let input = match self.parse_lead_form() {
            Ok(input) => input,
            Err(err) => {
                self.status = Some(err.to_string());
                return;
            }
        };
        match self.client.create_lead(&input) {
            Ok(_) => self.enter(Screen::Leads),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn parse_lead_form(&self) -> Result<CreateLeadInput> {
        let estimated_revenue: f64 = self
            .form
            .value(3)
            .trim()
            .parse()
            .context("estimated revenue must be a number")?;

        Ok(CreateLeadInput {
            client_name: self.form.value(0).trim().to_string(),
            contact_details: self.form.value(1).trim().to_string(),
            source: self.source,
            description: self.form.value(2).trim().to_string(),
            estimated_revenue,
            expected_time: parse_date(self.form.value(4))?,
            follow_up_date: parse_date(self.form.value(5))?,
            notes: self.form.value(6).trim().to_string(),
        })
    }

    fn delete_selected_lead(&mut self) {
        let Some(lead) = self.leads.get(self.selected) else {
            return;
        };
        match self.client.delete_lead(lead.id) {
            Ok(()) => {
                self.status = Some(format!("deleted lead for {}", lead.client_name));
                self.refresh_leads();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn convert_selected_lead(&mut self) {
        let Some(lead) = self.leads.get(self.selected) else {
            return;
        };
        match self.client.convert_lead(lead.id) {
            Ok(project) => {
                self.status = Some(format!("converted {} to a project", project.project.client_name));
                self.refresh_leads();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn cycle_selected_status(&mut self) {
        let Some(project) = self.projects.get(self.selected) else {
            return;
        };
        let next = next_status(project.project.status);
        match self.client.set_project_status(project.project.id, next) {
            Ok(updated) => {
                self.status = Some(format!(
                    "{} is now {}",
                    updated.project.client_name,
                    updated.project.status.as_str()
                ));
                self.refresh_projects();
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn start_note(&mut self) {
        let Some(project) = self.projects.get(self.selected) else {
            return;
        };
        self.note_project = Some(project.project.id);
        self.form = Form::new(vec![Field::new("Note")]);
        self.status = None;
        self.screen = Screen::AddNote;
    }

    fn submit_note(&mut self) {
        let Some(project_id) = self.note_project.take() else {
            self.screen = Screen::Projects;
            return;
        };
        let note = self.form.value(0).trim().to_string();
        if note.is_empty() {
            self.status = Some("note must not be empty".into());
            self.note_project = Some(project_id);
            return;
        }
        match self.client.add_note(project_id, &note) {
            Ok(_) => self.enter(Screen::Projects),
            Err(err) => {
                self.status = Some(err.to_string());
                self.note_project = Some(project_id);
            }
        }
    }

    fn logout(&mut self) {
        if let Err(err) = session::clear() {
            self.status = Some(err.to_string());
        }
        self.client.clear_token();
        self.session = None;
        self.leads.clear();
        self.projects.clear();
        self.dashboard = None;
        self.form = login_form();
        self.screen = Screen::Login;
    }
}

fn login_form() -> Form {
    Form::new(vec![Field::new("Email"), Field::masked("Password")])
}

fn signup_form() -> Form {
    Form::new(vec![
        Field::new("Name"),
        Field::new("Email"),
        Field::masked("Password"),
    ])
}

fn add_lead_form() -> Form {
    Form::new(vec![
        Field::new("Client name"),
        Field::new("Contact details"),
        Field::new("Description"),
        Field::new("Estimated revenue"),
        Field::new("Expected date (YYYY-MM-DD)"),
        Field::new("Follow-up date (YYYY-MM-DD)"),
        Field::new("Notes"),
    ])
}

fn parse_date(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .context("dates must be YYYY-MM-DD")?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

fn next_screen(screen: Screen) -> Screen {
    match screen {
        Screen::Leads => Screen::Projects,
        Screen::Projects => Screen::Dashboard,
        Screen::Dashboard => Screen::Profile,
        _ => Screen::Leads,
    }
}

pub fn next_status(status: ProjectStatus) -> ProjectStatus {
    match status {
        ProjectStatus::InProgress => ProjectStatus::OnHold,
        ProjectStatus::OnHold => ProjectStatus::PartiallyCompleted,
        ProjectStatus::PartiallyCompleted => ProjectStatus::Completed,
        ProjectStatus::Completed => ProjectStatus::InProgress,
    }
}

fn next_source(source: LeadSource) -> LeadSource {
    match source {
        LeadSource::Linkedin => LeadSource::Instagram,
        LeadSource::Instagram => LeadSource::Unstop,
        LeadSource::Unstop => LeadSource::X,
        LeadSource::X => LeadSource::Linkedin,
    }
}

fn prev_source(source: LeadSource) -> LeadSource {
    match source {
        LeadSource::Linkedin => LeadSource::X,
        LeadSource::Instagram => LeadSource::Linkedin,
        LeadSource::Unstop => LeadSource::Instagram,
        LeadSource::X => LeadSource::Unstop,
    }
}
