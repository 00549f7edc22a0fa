use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lead::Lead;
use super::project::ProjectWithNotes;

/// A date-triggered reminder: either a lead due for a follow-up or a
/// still-open project reaching its expected completion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FollowUp {
    Lead(Lead),
    Project(ProjectWithNotes),
}

impl FollowUp {
    /// The date that put this item on the feed.
    pub fn due(&self) -> DateTime<Utc> {
        match self {
            Self::Lead(lead) => lead.follow_up_date,
            Self::Project(project) => project.project.expected_time,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub in_progress: usize,
    pub on_hold: usize,
    pub partially_completed: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub follow_ups: Vec<FollowUp>,
    pub expected_revenue: f64,
    pub leads_count: usize,
    pub projects_count: usize,
    pub projects_by_status: StatusCounts,
}
