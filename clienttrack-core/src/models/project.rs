use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lead::LeadSource;

/// A converted, in-progress or completed engagement record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub client_name: String,
    pub contact_details: String,
    pub source: LeadSource,
    pub description: String,
    pub status: ProjectStatus,
    pub revenue: f64,
    pub expected_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    InProgress,
    OnHold,
    PartiallyCompleted,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::PartiallyCompleted => "partially_completed",
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Self::InProgress),
            "on_hold" => Some(Self::OnHold),
            "partially_completed" => Some(Self::PartiallyCompleted),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A dated note appended to a project after a follow-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpNote {
    pub id: Uuid,
    pub project_id: Uuid,
    pub note: String,
    pub date: DateTime<Utc>,
}

/// A project with its follow-up notes inlined, as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithNotes {
    #[serde(flatten)]
    pub project: Project,
    pub follow_up_notes: Vec<FollowUpNote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub client_name: String,
    pub contact_details: String,
    pub source: LeadSource,
    pub description: String,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    pub revenue: f64,
    pub expected_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProjectInput {
    pub client_name: Option<String>,
    pub contact_details: Option<String>,
    pub source: Option<LeadSource>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub revenue: Option<f64>,
    pub expected_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFollowUpNoteInput {
    pub note: String,
}
