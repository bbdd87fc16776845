//! Milestone events and year-based interpolation

use bevy::math::DVec3;

use crate::trajectory::error::{Result, TrajectoryError};

/// Default radius used by the details panel to decide an event is "near"
pub const DEFAULT_EVENT_THRESHOLD_KM: f64 = 1e9;

/// A named point of interest along the trajectory
#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneEvent {
    pub year: i32,
    pub label: String,
    /// Position in km
    pub position: DVec3,
}

impl MilestoneEvent {
    pub fn new(year: i32, label: impl Into<String>, position: DVec3) -> Self {
        Self {
            year,
            label: label.into(),
            position,
        }
    }
}

/// Result of a year search: the interpolated position and the pair it came from
#[derive(Clone, Debug, PartialEq)]
pub struct YearFix {
    pub year: f64,
    pub position: DVec3,
    /// Interpolation parameter within the bracketing pair
    pub t: f64,
    pub before: MilestoneEvent,
    pub after: MilestoneEvent,
}

/// Read-only, ordered collection of milestones
#[derive(Clone, Debug, Default)]
pub struct EventCatalog {
    events: Vec<MilestoneEvent>,
}

impl EventCatalog {
    pub fn new(events: Vec<MilestoneEvent>) -> Self {
        Self { events }
    }

    /// Built-in Voyager 1 milestones
    pub fn voyager() -> Self {
        Self::new(vec![
            MilestoneEvent::new(1979, "Jupiter Flyby", DVec3::new(7.78e8, 0.0, 0.0)),
            MilestoneEvent::new(1980, "Saturn Flyby", DVec3::new(1.43e9, 5e7, 0.0)),
            MilestoneEvent::new(1990, "Family Portrait", DVec3::new(6e9, 1e9, 0.0)),
            MilestoneEvent::new(
                2012,
                "Entered Interstellar Space",
                DVec3::new(1.8e10, 2e9, 1e9),
            ),
            MilestoneEvent::new(2025, "Current Position", DVec3::new(2.4e10, 3e9, 1.5e9)),
        ])
    }

    /// Events in source order. Not guaranteed to be chronological.
    pub fn load(&self) -> &[MilestoneEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MilestoneEvent> {
        self.events.get(index)
    }

    pub fn first(&self) -> Option<&MilestoneEvent> {
        self.events.first()
    }

    pub fn last(&self) -> Option<&MilestoneEvent> {
        self.events.last()
    }

    /// Chronological copy; events sharing a year keep their source order.
    pub fn sorted_by_year(&self) -> EventCatalog {
        let mut events = self.events.clone();
        events.sort_by_key(|e| e.year);
        Self { events }
    }

    /// First event in catalog order whose distance to `position` is below
    /// `threshold_km`. This is not necessarily the closest event.
    pub fn find_nearest(&self, position: DVec3, threshold_km: f64) -> Option<&MilestoneEvent> {
        self.events
            .iter()
            .find(|e| e.position.distance(position) < threshold_km)
    }

    /// Globally closest event regardless of distance
    pub fn find_closest(&self, position: DVec3) -> Option<&MilestoneEvent> {
        self.events.iter().min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        })
    }

    /// Linearly interpolate the position at `year` between the two
    /// chronologically adjacent milestones.
    ///
    /// Works on a chronological view of the catalog, so source order does
    /// not matter. A pair sharing the same year resolves to the earlier
    /// event's position instead of dividing by zero.
    pub fn interpolate_at_year(&self, year: f64) -> Result<YearFix> {
        let sorted = self.sorted_by_year();
        let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
            return Err(TrajectoryError::EmptyCatalog);
        };
        let (min, max) = (first.year, last.year);
        if !year.is_finite() || year < min as f64 || year > max as f64 {
            return Err(TrajectoryError::OutOfRange { year, min, max });
        }

        // Exact milestone years return the stored coordinate untouched
        if let Some(exact) = sorted.events.iter().find(|e| e.year as f64 == year) {
            return Ok(YearFix {
                year,
                position: exact.position,
                t: 0.0,
                before: exact.clone(),
                after: exact.clone(),
            });
        }

        let pair = sorted
            .events
            .windows(2)
            .find(|w| w[0].year as f64 <= year && year <= w[1].year as f64);
        let Some([before, after]) = pair else {
            // Unreachable for a finite year inside [min, max]
            return Err(TrajectoryError::OutOfRange { year, min, max });
        };

        let span = (after.year - before.year) as f64;
        let (t, position) = if span == 0.0 {
            (0.0, before.position)
        } else {
            let t = (year - before.year as f64) / span;
            (t, before.position + (after.position - before.position) * t)
        };

        Ok(YearFix {
            year,
            position,
            t,
            before: before.clone(),
            after: after.clone(),
        })
    }
}
