//! Shortages service: loads a consistent snapshot and runs the overlap engine

use chrono::{DateTime, Utc};

use crate::{
    engine::{compute_shortages, Booking, ShortagePolicy},
    error::AppResult,
    models::{
        project::Project,
        shortage::{ProjectShortage, ShortageScope},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ShortagesService {
    repository: Repository,
    policy: ShortagePolicy,
}

impl ShortagesService {
    pub fn new(repository: Repository, policy: ShortagePolicy) -> Self {
        Self { repository, policy }
    }

    /// Shortage status of every selected project.
    ///
    /// Demand is summed over every project overlapping the hull of the
    /// selection, so bookings just outside a queried window still count.
    pub async fn report(&self, scope: ShortageScope) -> AppResult<Vec<ProjectShortage>> {
        let selected = match scope {
            ShortageScope::Project(id) => vec![self.repository.projects.get_by_id(id).await?],
            ShortageScope::Range { from, to } => {
                self.repository.projects.list_overlapping(from, to).await?
            }
        };
        let Some((hull_start, hull_end)) = hull(&selected) else {
            return Ok(Vec::new());
        };

        let universe = self
            .repository
            .projects
            .list_overlapping(Some(hull_start), Some(hull_end))
            .await?;
        let ids: Vec<i32> = universe.iter().map(|p| p.id).collect();
        let mut demand = self.repository.project_items.demand_for_projects(&ids).await?;

        let mut equipment_ids: Vec<i32> = demand
            .values()
            .flat_map(|lines| lines.keys().copied())
            .collect();
        equipment_ids.sort_unstable();
        equipment_ids.dedup();
        let stock = self.repository.equipment.stock_for(&equipment_ids).await?;

        let bookings: Vec<Booking> = universe
            .into_iter()
            .map(|p| Booking {
                id: p.id,
                status: p.status,
                start: p.usage_start,
                end: p.usage_end,
                demand: demand.remove(&p.id).unwrap_or_default(),
            })
            .collect();

        let mut details = compute_shortages(&bookings, &stock, &self.policy)?;
        let report: Vec<ProjectShortage> = selected
            .iter()
            .map(|p| ProjectShortage::new(p.id, details.remove(&p.id).unwrap_or_default()))
            .collect();

        tracing::info!(
            projects = report.len(),
            short = report.iter().filter(|r| r.shortage).count(),
            "shortages computed"
        );
        Ok(report)
    }
}

fn hull(projects: &[Project]) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = projects.iter().map(|p| p.usage_start).min()?;
    let end = projects.iter().map(|p| p.usage_end).max()?;
    Some((start, end))
}
