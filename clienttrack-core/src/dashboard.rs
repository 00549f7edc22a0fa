//! Dashboard aggregation.
//!
//! A pure, single-pass transformation over a freelancer's leads and
//! projects: today's follow-up feed, the expected revenue of open projects,
//! and a status histogram. Callers fetch the collections and pass `now`;
//! nothing here touches the database or the clock.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::models::{
    DashboardSummary, FollowUp, Lead, ProjectStatus, ProjectWithNotes, StatusCounts,
};

/// The UTC calendar day containing `now`: midnight inclusive to the next
/// midnight exclusive.
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Build the dashboard summary for one freelancer.
///
/// The follow-up feed contains leads whose follow-up date falls within
/// today's window and non-completed projects whose expected completion time
/// does, merged and sorted ascending by that date. Completed projects are
/// excluded from both the feed and the revenue sum.
pub fn aggregate(
    leads: &[Lead],
    projects: &[ProjectWithNotes],
    now: DateTime<Utc>,
) -> DashboardSummary {
    let (start, end) = day_window(now);
    let in_window = |date: DateTime<Utc>| date >= start && date < end;

    let mut follow_ups: Vec<FollowUp> = leads
        .iter()
        .filter(|lead| in_window(lead.follow_up_date))
        .cloned()
        .map(FollowUp::Lead)
        .chain(
            projects
                .iter()
                .filter(|p| p.project.status != ProjectStatus::Completed)
                .filter(|p| in_window(p.project.expected_time))
                .cloned()
                .map(FollowUp::Project),
        )
        .collect();
    follow_ups.sort_by_key(FollowUp::due);

    let expected_revenue = projects
        .iter()
        .filter(|p| p.project.status != ProjectStatus::Completed)
        .map(|p| p.project.revenue)
        .sum();

    let mut projects_by_status = StatusCounts::default();
    for p in projects {
        match p.project.status {
            ProjectStatus::InProgress => projects_by_status.in_progress += 1,
            ProjectStatus::OnHold => projects_by_status.on_hold += 1,
            ProjectStatus::PartiallyCompleted => projects_by_status.partially_completed += 1,
            ProjectStatus::Completed => projects_by_status.completed += 1,
        }
    }

    DashboardSummary {
        follow_ups,
        expected_revenue,
        leads_count: leads.len(),
        projects_count: projects.len(),
        projects_by_status,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use uuid::Uuid;

    use super::*;
    use crate::models::{LeadSource, Project};

    fn lead(follow_up_date: DateTime<Utc>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            freelancer_id: Uuid::new_v4(),
            client_name: "Acme".into(),
            contact_details: "acme@example.com".into(),
            source: LeadSource::Linkedin,
            description: "landing page".into(),
            estimated_revenue: 500.0,
            expected_time: follow_up_date,
            follow_up_date,
            notes: String::new(),
            created_at: follow_up_date,
            updated_at: follow_up_date,
        }
    }

    fn project(status: ProjectStatus, revenue: f64, expected_time: DateTime<Utc>) -> ProjectWithNotes {
        ProjectWithNotes {
            project: Project {
                id: Uuid::new_v4(),
                freelancer_id: Uuid::new_v4(),
                client_name: "Acme".into(),
                contact_details: "acme@example.com".into(),
                source: LeadSource::Instagram,
                description: "app build".into(),
                status,
                revenue,
                expected_time,
                created_at: expected_time,
                updated_at: expected_time,
            },
            follow_up_notes: Vec::new(),
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn window_is_midnight_to_midnight() {
        let (start, end) = day_window(noon());
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn feed_contains_only_items_due_today() {
        let now = noon();
        let (start, end) = day_window(now);

        let leads = vec![
            lead(start),                       // midnight, inclusive
            lead(end - Duration::seconds(1)),  // last second of the day
            lead(end),                         // next midnight, excluded
            lead(start - Duration::seconds(1)),
        ];
        let projects = vec![
            project(ProjectStatus::InProgress, 100.0, now),
            project(ProjectStatus::Completed, 100.0, now), // done, never surfaces
            project(ProjectStatus::OnHold, 100.0, end + Duration::days(3)),
        ];

        let summary = aggregate(&leads, &projects, now);
        assert_eq!(summary.follow_ups.len(), 3);
    }

    #[test]
    fn feed_is_sorted_ascending_by_due_date() {
        let now = noon();
        let (start, _) = day_window(now);

        let leads = vec![lead(start + Duration::hours(18)), lead(start + Duration::hours(2))];
        let projects = vec![project(ProjectStatus::InProgress, 0.0, start + Duration::hours(9))];

        let summary = aggregate(&leads, &projects, now);
        let due: Vec<_> = summary.follow_ups.iter().map(FollowUp::due).collect();
        assert_eq!(
            due,
            vec![
                start + Duration::hours(2),
                start + Duration::hours(9),
                start + Duration::hours(18),
            ]
        );
    }

    #[test]
    fn revenue_excludes_completed_projects() {
        let now = noon();
        let projects = vec![
            project(ProjectStatus::InProgress, 1000.0, now),
            project(ProjectStatus::PartiallyCompleted, 250.0, now),
            project(ProjectStatus::Completed, 9999.0, now),
        ];

        let summary = aggregate(&[], &projects, now);
        assert_eq!(summary.expected_revenue, 1250.0);
    }

    #[test]
    fn counts_and_histogram() {
        let now = noon();
        let leads = vec![lead(now), lead(now + Duration::days(7))];
        let projects = vec![
            project(ProjectStatus::InProgress, 0.0, now),
            project(ProjectStatus::InProgress, 0.0, now),
            project(ProjectStatus::Completed, 0.0, now),
        ];

        let summary = aggregate(&leads, &projects, now);
        assert_eq!(summary.leads_count, 2);
        assert_eq!(summary.projects_count, 3);
        assert_eq!(summary.projects_by_status.in_progress, 2);
        assert_eq!(summary.projects_by_status.on_hold, 0);
        assert_eq!(summary.projects_by_status.partially_completed, 0);
        assert_eq!(summary.projects_by_status.completed, 1);
    }
}
