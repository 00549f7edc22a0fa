//! HTTP client wrapper.
//!
//! Thin layer over `reqwest::blocking` that knows the server's base URL and
//! attaches the bearer token to every authenticated request.

use anyhow::{anyhow, Result};
use clienttrack_core::models::{
    AuthResponse, CreateLeadInput, DashboardSummary, Lead, LoginInput, ProjectStatus,
    ProjectWithNotes, SignupInput,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    // ---- auth ----

    pub fn signup(&self, input: &SignupInput) -> Result<AuthResponse> {
        self.post("/auth/signup", input)
    }

    pub fn login(&self, input: &LoginInput) -> Result<AuthResponse> {
        self.post("/auth/login", input)
    }

    // ---- leads ----

    pub fn leads(&self) -> Result<Vec<Lead>> {
        self.get("/leads")
    }

    pub fn create_lead(&self, input: &CreateLeadInput) -> Result<Lead> {
        self.post("/leads", input)
    }

    pub fn delete_lead(&self, id: Uuid) -> Result<()> {
        let _: Value = self.delete(&format!("/leads/{id}"))?;
        Ok(())
    }

    // ---- projects ----

    pub fn projects(&self) -> Result<Vec<ProjectWithNotes>> {
        self.get("/projects")
    }

    pub fn set_project_status(&self, id: Uuid, status: ProjectStatus) -> Result<ProjectWithNotes> {
        self.put(&format!("/projects/{id}"), &json!({ "status": status }))
    }

    pub fn add_note(&self, id: Uuid, note: &str) -> Result<ProjectWithNotes> {
        self.post(&format!("/projects/{id}/notes"), &json!({ "note": note }))
    }

    pub fn convert_lead(&self, lead_id: Uuid) -> Result<ProjectWithNotes> {
        self.post(&format!("/projects/convert/{lead_id}"), &json!({}))
    }

    pub fn dashboard(&self) -> Result<DashboardSummary> {
        self.get("/projects/dashboard")
    }

    // ---- plumbing ----

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.get(self.url(path)))
    }

    fn post<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        self.send(self.http.post(self.url(path)).json(body))
    }

    fn put<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        self.send(self.http.put(self.url(path)).json(body))
    }

    fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.http.delete(self.url(path)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send<T: DeserializeOwned>(&self, request: reqwest::blocking::RequestBuilder) -> Result<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json()?);
        }

        // Surface the server's {"error"} / {"message"} body when present
        let message = response
            .json::<Value>()
            .ok()
            .and_then(|body| {
                body.get("error")
                    .or_else(|| body.get("message"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.to_string());

        Err(anyhow!(message))
    }
}
