//! SQLite access layer.
//!
//! A single [`Database`] handle wraps the connection and exposes every
//! operation the transports need. All lead/project operations take the
//! owning freelancer's id and scope their queries by it; a row owned by
//! someone else behaves exactly like a missing row.

mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::models::{
    CreateLeadInput, CreateProjectInput, FollowUpNote, Lead, LeadSource, Project, ProjectStatus,
    ProjectWithNotes, UpdateProjectInput, User,
};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at the per-user data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("dev", "rocket-tycoon", "clienttrack")
            .context("could not resolve a data directory")?;
        std::fs::create_dir_all(dirs.data_dir())?;
        Self::open(dirs.data_dir().join("clienttrack.db"))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        tracing::debug!("opening database at {}", path.as_ref().display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Apply the schema. Idempotent; safe to call on every startup.
    pub fn migrate(&self) -> Result<()> {
        tracing::debug!("applying schema");
        self.conn()?.execute_batch(schema::SCHEMA)?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("database lock poisoned"))
    }

    // ---- users ----

    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.conn()?.execute(
            "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
                ts(user.created_at),
                ts(user.updated_at),
            ],
        )?;

        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn()?
            .query_row(
                "SELECT id, name, email, password_hash, created_at, updated_at
                 FROM users WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn()?
            .query_row(
                "SELECT id, name, email, password_hash, created_at, updated_at
                 FROM users WHERE email = ?1",
                params![email],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    // ---- leads ----

    pub fn create_lead(&self, freelancer_id: Uuid, input: CreateLeadInput) -> Result<Lead> {
        let now = Utc::now();
        let lead = Lead {
            id: Uuid::new_v4(),
            freelancer_id,
            client_name: input.client_name,
            contact_details: input.contact_details,
            source: input.source,
            description: input.description,
            estimated_revenue: input.estimated_revenue,
            expected_time: input.expected_time,
            follow_up_date: input.follow_up_date,
            notes: input.notes,
            created_at: now,
            updated_at: now,
        };

        self.conn()?.execute(
            "INSERT INTO leads (id, freelancer_id, client_name, contact_details, source,
                                description, estimated_revenue, expected_time, follow_up_date,
                                notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                lead.id.to_string(),
                lead.freelancer_id.to_string(),
                lead.client_name,
                lead.contact_details,
                lead.source.as_str(),
                lead.description,
                lead.estimated_revenue,
                ts(lead.expected_time),
                ts(lead.follow_up_date),
                lead.notes,
                ts(lead.created_at),
                ts(lead.updated_at),
            ],
        )?;

        Ok(lead)
    }

    /// The freelancer's leads, newest first.
    pub fn get_leads(&self, freelancer_id: Uuid) -> Result<Vec<Lead>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, freelancer_id, client_name, contact_details, source, description,
                    estimated_revenue, expected_time, follow_up_date, notes, created_at, updated_at
             FROM leads WHERE freelancer_id = ?1
             ORDER BY created_at DESC",
        )?;
        let leads = stmt
            .query_map(params![freelancer_id.to_string()], row_to_lead)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leads)
    }

    pub fn get_lead(&self, freelancer_id: Uuid, id: Uuid) -> Result<Option<Lead>> {
        let lead = self
            .conn()?
            .query_row(
                "SELECT id, freelancer_id, client_name, contact_details, source, description,
                        estimated_revenue, expected_time, follow_up_date, notes, created_at, updated_at
                 FROM leads WHERE id = ?1 AND freelancer_id = ?2",
                params![id.to_string(), freelancer_id.to_string()],
                row_to_lead,
            )
            .optional()?;
        Ok(lead)
    }

    /// Returns false when the lead does not exist or belongs to someone else.
    pub fn delete_lead(&self, freelancer_id: Uuid, id: Uuid) -> Result<bool> {
        let deleted = self.conn()?.execute(
            "DELETE FROM leads WHERE id = ?1 AND freelancer_id = ?2",
            params![id.to_string(), freelancer_id.to_string()],
        )?;
        Ok(deleted > 0)
    }

    // ---- projects ----

    pub fn create_project(
        &self,
        freelancer_id: Uuid,
        input: CreateProjectInput,
    ) -> Result<ProjectWithNotes> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            freelancer_id,
            client_name: input.client_name,
            contact_details: input.contact_details,
            source: input.source,
            description: input.description,
            status: input.status.unwrap_or(ProjectStatus::InProgress),
            revenue: input.revenue,
            expected_time: input.expected_time,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        insert_project(&conn, &project)?;

        Ok(ProjectWithNotes {
            project,
            follow_up_notes: Vec::new(),
        })
    }

    /// The freelancer's projects, newest first, each with its follow-up notes.
    pub fn get_projects(&self, freelancer_id: Uuid) -> Result<Vec<ProjectWithNotes>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, freelancer_id, client_name, contact_details, source, description,
                    status, revenue, expected_time, created_at, updated_at
             FROM projects WHERE freelancer_id = ?1
             ORDER BY created_at DESC",
        )?;
        let projects = stmt
            .query_map(params![freelancer_id.to_string()], row_to_project)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        projects
            .into_iter()
            .map(|project| {
                let follow_up_notes = notes_for_project(&conn, project.id)?;
                Ok(ProjectWithNotes {
                    project,
                    follow_up_notes,
                })
            })
            .collect()
    }

    pub fn get_project(&self, freelancer_id: Uuid, id: Uuid) -> Result<Option<ProjectWithNotes>> {
        let conn = self.conn()?;
        fetch_project(&conn, freelancer_id, id)
    }

    /// Partial update; absent fields keep their value. Returns the updated
    /// project, or None when it does not exist or belongs to someone else.
    pub fn update_project(
        &self,
        freelancer_id: Uuid,
        id: Uuid,
        input: UpdateProjectInput,
    ) -> Result<Option<ProjectWithNotes>> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE projects SET
                 client_name = COALESCE(?1, client_name),
                 contact_details = COALESCE(?2, contact_details),
                 source = COALESCE(?3, source),
                 description = COALESCE(?4, description),
                 status = COALESCE(?5, status),
                 revenue = COALESCE(?6, revenue),
                 expected_time = COALESCE(?7, expected_time),
                 updated_at = ?8
             WHERE id = ?9 AND freelancer_id = ?10",
            params![
                input.client_name,
                input.contact_details,
                input.source.map(|s| s.as_str()),
                input.description,
                input.status.map(|s| s.as_str()),
                input.revenue,
                input.expected_time.map(ts),
                ts(Utc::now()),
                id.to_string(),
                freelancer_id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        fetch_project(&conn, freelancer_id, id)
    }

    /// Append a dated follow-up note. Returns the project with its notes,
    /// or None when the project is missing or foreign.
    pub fn create_note_for_project(
        &self,
        freelancer_id: Uuid,
        project_id: Uuid,
        note: &str,
    ) -> Result<Option<ProjectWithNotes>> {
        let conn = self.conn()?;
        if fetch_project(&conn, freelancer_id, project_id)?.is_none() {
            return Ok(None);
        }

        conn.execute(
            "INSERT INTO follow_up_notes (id, project_id, note, date)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                Uuid::new_v4().to_string(),
                project_id.to_string(),
                note,
                ts(Utc::now()),
            ],
        )?;

        fetch_project(&conn, freelancer_id, project_id)
    }

    /// Convert a lead into a project: copy the contact fields, carry the
    /// estimated revenue over, and delete the lead. Runs in a transaction so
    /// the lead is consumed exactly once. Returns None when the lead is
    /// missing or foreign.
    pub fn convert_lead(
        &self,
        freelancer_id: Uuid,
        lead_id: Uuid,
    ) -> Result<Option<ProjectWithNotes>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let lead = tx
            .query_row(
                "SELECT id, freelancer_id, client_name, contact_details, source, description,
                        estimated_revenue, expected_time, follow_up_date, notes, created_at, updated_at
                 FROM leads WHERE id = ?1 AND freelancer_id = ?2",
                params![lead_id.to_string(), freelancer_id.to_string()],
                row_to_lead,
            )
            .optional()?;

        let Some(lead) = lead else {
            return Ok(None);
        };

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            freelancer_id,
            client_name: lead.client_name,
            contact_details: lead.contact_details,
            source: lead.source,
            description: lead.description,
            status: ProjectStatus::InProgress,
            revenue: lead.estimated_revenue,
            expected_time: lead.expected_time,
            created_at: now,
            updated_at: now,
        };
        insert_project(&tx, &project)?;

        tx.execute("DELETE FROM leads WHERE id = ?1", params![lead_id.to_string()])?;
        tx.commit()?;

        tracing::debug!(lead = %lead_id, project = %project.id, "converted lead");

        Ok(Some(ProjectWithNotes {
            project,
            follow_up_notes: Vec::new(),
        }))
    }
}

fn insert_project(conn: &Connection, project: &Project) -> Result<()> {
    conn.execute(
        "INSERT INTO projects (id, freelancer_id, client_name, contact_details, source,
                               description, status, revenue, expected_time, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            project.id.to_string(),
            project.freelancer_id.to_string(),
            project.client_name,
            project.contact_details,
            project.source.as_str(),
            project.description,
            project.status.as_str(),
            project.revenue,
            ts(project.expected_time),
            ts(project.created_at),
            ts(project.updated_at),
        ],
    )?;
    Ok(())
}

fn fetch_project(
    conn: &Connection,
    freelancer_id: Uuid,
    id: Uuid,
) -> Result<Option<ProjectWithNotes>> {
    let project = conn
        .query_row(
            "SELECT id, freelancer_id, client_name, contact_details, source, description,
                    status, revenue, expected_time, created_at, updated_at
             FROM projects WHERE id = ?1 AND freelancer_id = ?2",
            params![id.to_string(), freelancer_id.to_string()],
            row_to_project,
        )
        .optional()?;

    match project {
        Some(project) => {
            let follow_up_notes = notes_for_project(conn, project.id)?;
            Ok(Some(ProjectWithNotes {
                project,
                follow_up_notes,
            }))
        }
        None => Ok(None),
    }
}

fn notes_for_project(conn: &Connection, project_id: Uuid) -> Result<Vec<FollowUpNote>> {
    let mut stmt = conn.prepare(
        "SELECT id, project_id, note, date FROM follow_up_notes
         WHERE project_id = ?1 ORDER BY date ASC",
    )?;
    let notes = stmt
        .query_map(params![project_id.to_string()], |row| {
            Ok(FollowUpNote {
                id: uuid_col(row, 0)?,
                project_id: uuid_col(row, 1)?,
                note: row.get(2)?,
                date: datetime_col(row, 3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(notes)
}

// Timestamps are stored as RFC 3339 TEXT with fixed-width precision so the
// lexicographic ORDER BY matches chronological order.
fn ts(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: datetime_col(row, 4)?,
        updated_at: datetime_col(row, 5)?,
    })
}

fn row_to_lead(row: &Row) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: uuid_col(row, 0)?,
        freelancer_id: uuid_col(row, 1)?,
        client_name: row.get(2)?,
        contact_details: row.get(3)?,
        source: source_col(row, 4)?,
        description: row.get(5)?,
        estimated_revenue: row.get(6)?,
        expected_time: datetime_col(row, 7)?,
        follow_up_date: datetime_col(row, 8)?,
        notes: row.get(9)?,
        created_at: datetime_col(row, 10)?,
        updated_at: datetime_col(row, 11)?,
    })
}

fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
    let status: String = row.get(6)?;
    let status = ProjectStatus::from_str(&status)
        .ok_or_else(|| conversion_err(6, format!("unknown status: {status}")))?;

    Ok(Project {
        id: uuid_col(row, 0)?,
        freelancer_id: uuid_col(row, 1)?,
        client_name: row.get(2)?,
        contact_details: row.get(3)?,
        source: source_col(row, 4)?,
        description: row.get(5)?,
        status,
        revenue: row.get(7)?,
        expected_time: datetime_col(row, 8)?,
        created_at: datetime_col(row, 9)?,
        updated_at: datetime_col(row, 10)?,
    })
}

fn uuid_col(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|err| conversion_err(idx, err.to_string()))
}

fn datetime_col(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| conversion_err(idx, err.to_string()))
}

fn source_col(row: &Row, idx: usize) -> rusqlite::Result<LeadSource> {
    let raw: String = row.get(idx)?;
    LeadSource::from_str(&raw).ok_or_else(|| conversion_err(idx, format!("unknown source: {raw}")))
}

fn conversion_err(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        message.into(),
    )
}
