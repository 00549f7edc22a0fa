use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An unconverted prospective client record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub client_name: String,
    pub contact_details: String,
    pub source: LeadSource,
    pub description: String,
    pub estimated_revenue: f64,
    pub expected_time: DateTime<Utc>,
    pub follow_up_date: DateTime<Utc>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Where the client was found. Shared by leads and the projects they
/// convert into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Linkedin,
    Instagram,
    Unstop,
    X,
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
            Self::Unstop => "unstop",
            Self::X => "x",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "linkedin" => Some(Self::Linkedin),
            "instagram" => Some(Self::Instagram),
            "unstop" => Some(Self::Unstop),
            "x" => Some(Self::X),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeadInput {
    pub client_name: String,
    pub contact_details: String,
    pub source: LeadSource,
    pub description: String,
    pub estimated_revenue: f64,
    pub expected_time: DateTime<Utc>,
    pub follow_up_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}
