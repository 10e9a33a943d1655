//! Overlap-based stock shortage detection.
//!
//! A booking is short on a piece of equipment when the summed demand of every
//! booking whose usage window overlaps it (itself included) is strictly
//! greater than the equipment's total stock. Windows are half-open, so a
//! booking ending at 10:00 does not overlap one starting at 10:00.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{project::ProjectStatus, shortage::ShortageDetail},
};

/// Whether cancelled bookings still hold stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledPolicy {
    #[default]
    Exclude,
    Include,
}

impl CancelledPolicy {
    pub fn counts(&self, status: ProjectStatus) -> bool {
        match self {
            CancelledPolicy::Exclude => status != ProjectStatus::Cancelled,
            CancelledPolicy::Include => true,
        }
    }
}

/// What to do with demand for equipment that has no stock record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEquipmentPolicy {
    /// Treat the stock as unlimited: the line never causes a shortage
    #[default]
    Unlimited,
    /// Fail the whole computation
    Reject,
}

/// Which bookings carry the shortage when a window is over capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingPolicy {
    /// Every booking whose own overlapping demand exceeds stock
    #[default]
    PerBooking,
    /// Only the highest-id booking of each over-capacity overlap set
    LatestInCluster,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShortagePolicy {
    pub cancelled: CancelledPolicy,
    pub unknown_equipment: UnknownEquipmentPolicy,
    pub marking: MarkingPolicy,
}

/// One booking as seen by the shortage computation
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i32,
    pub status: ProjectStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Equipment id -> summed quantity
    pub demand: BTreeMap<i32, i32>,
}

#[derive(Debug, Clone)]
pub struct EquipmentStock {
    pub name: String,
    pub total_quantity: i32,
}

/// Half-open interval overlap test
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Ids of the bookings demanding `equipment_id` whose windows overlap `target`,
/// `target` itself included when it demands the equipment.
pub fn overlapping_ids(bookings: &[Booking], target: &Booking, equipment_id: i32) -> Vec<i32> {
    bookings
        .iter()
        .filter(|o| o.demand.get(&equipment_id).is_some_and(|q| *q > 0))
        .filter(|o| overlaps(o.start, o.end, target.start, target.end))
        .map(|o| o.id)
        .collect()
}

/// Compute shortage details for every booking.
///
/// The returned map has one entry per input booking; bookings that are not
/// short (or not counted under the cancelled policy) map to an empty list.
pub fn compute_shortages(
    bookings: &[Booking],
    stock: &BTreeMap<i32, EquipmentStock>,
    policy: &ShortagePolicy,
) -> AppResult<BTreeMap<i32, Vec<ShortageDetail>>> {
    let mut result: BTreeMap<i32, Vec<ShortageDetail>> =
        bookings.iter().map(|b| (b.id, Vec::new())).collect();

    let counted: Vec<&Booking> = bookings
        .iter()
        .filter(|b| policy.cancelled.counts(b.status))
        .collect();

    let equipment_ids: BTreeSet<i32> = counted
        .iter()
        .flat_map(|b| b.demand.iter().filter(|(_, q)| **q > 0).map(|(e, _)| *e))
        .collect();

    for equipment_id in equipment_ids {
        let Some(equipment) = stock.get(&equipment_id) else {
            match policy.unknown_equipment {
                UnknownEquipmentPolicy::Unlimited => {
                    tracing::debug!(equipment_id, "no stock record; treating as unlimited");
                    continue;
                }
                UnknownEquipmentPolicy::Reject => {
                    return Err(AppError::Reference(format!(
                        "Equipment {} has no stock record",
                        equipment_id
                    )));
                }
            }
        };

        let mut users: Vec<(&Booking, i64)> = counted
            .iter()
            .filter_map(|b| {
                b.demand
                    .get(&equipment_id)
                    .filter(|q| **q > 0)
                    .map(|q| (*b, i64::from(*q)))
            })
            .collect();
        users.sort_by_key(|(b, _)| (b.start, b.id));

        let capacity = i64::from(equipment.total_quantity);

        for (booking, _) in &users {
            let mut total = 0i64;
            let mut latest = booking.id;

            // Sorted by start: nothing past the first start >= booking.end can overlap
            for (other, quantity) in users.iter().take_while(|(o, _)| o.start < booking.end) {
                if other.end > booking.start {
                    total += quantity;
                    latest = latest.max(other.id);
                }
            }

            if total <= capacity {
                continue;
            }

            let marked = match policy.marking {
                MarkingPolicy::PerBooking => booking.id,
                MarkingPolicy::LatestInCluster => latest,
            };

            let details = result.entry(marked).or_default();
            match details.iter_mut().find(|d| d.equipment_id == equipment_id) {
                Some(existing) => {
                    existing.max_overlapping_demand = existing.max_overlapping_demand.max(total)
                }
                None => details.push(ShortageDetail {
                    equipment_id,
                    name: equipment.name.clone(),
                    total_quantity: equipment.total_quantity,
                    max_overlapping_demand: total,
                }),
            }
        }
    }

    Ok(result)
}
