//! Spatial samples for density and flow rendering.
//!
//! This module provides:
//! - `EventFilter`: an event-kind set with a composable period pre-filter
//! - Point samples (action locations) for heatmap binning
//! - Vector samples (start/end pairs) for movement arrows
//!
//! Extraction is skip-based: an event missing the needed coordinate simply
//! contributes nothing. Vectors are only emitted when both endpoints are
//! present on the same event, so start and end counts cannot diverge.

use crate::models::{Event, EventKind, Location, Target};
use serde::{Deserialize, Serialize};

/// Match phase pre-filter on the event minute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    Full,
    /// Minute 45 and earlier, stoppage time included by the provider's clock.
    FirstHalf,
    /// Strictly after minute 45.
    SecondHalf,
}

impl Period {
    pub fn contains(&self, minute: u32) -> bool {
        match self {
            Period::Full => true,
            Period::FirstHalf => minute <= 45,
            Period::SecondHalf => minute > 45,
        }
    }
}

/// Which events a sample is drawn from. The period check runs before the
/// kind check and composes with any kind set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Accepted event kinds; empty accepts every kind.
    kinds: Vec<EventKind>,
    period: Period,
}

impl EventFilter {
    /// Accept every event kind over the full match.
    pub fn any() -> Self {
        Self {
            kinds: Vec::new(),
            period: Period::Full,
        }
    }

    /// Accept a single event kind over the full match.
    pub fn kind(kind: EventKind) -> Self {
        Self {
            kinds: vec![kind],
            period: Period::Full,
        }
    }

    /// Accept a set of event kinds (e.g. passes and carries for combined
    /// movement) over the full match.
    pub fn kinds(kinds: impl Into<Vec<EventKind>>) -> Self {
        Self {
            kinds: kinds.into(),
            period: Period::Full,
        }
    }

    /// Restrict the filter to one match phase.
    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn accepts(&self, event: &Event) -> bool {
        if !self.period.contains(event.minute) {
            return false;
        }
        self.kinds.is_empty() || self.kinds.contains(&event.kind())
    }
}

/// A directed movement sample. Both endpoints are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementVector {
    pub start: Location,
    pub end: Location,
}

/// Locations of the entity's accepted events across the given match event
/// sets. Events without a well-formed location are skipped.
pub fn point_sample<'a, I>(target: &Target, match_events: I, filter: &EventFilter) -> Vec<Location>
where
    I: IntoIterator<Item = &'a [Event]>,
{
    let mut points = Vec::new();
    for events in match_events {
        points.extend(
            accepted(target, events, filter)
                .filter_map(|e| e.location)
                .filter(Location::is_well_formed),
        );
    }
    points
}

/// Start/end pairs of the entity's accepted events. An event contributes a
/// vector only when both its location and its destination are present and
/// well-formed.
pub fn vector_sample<'a, I>(
    target: &Target,
    match_events: I,
    filter: &EventFilter,
) -> Vec<MovementVector>
where
    I: IntoIterator<Item = &'a [Event]>,
{
    let mut vectors = Vec::new();
    for events in match_events {
        vectors.extend(accepted(target, events, filter).filter_map(|e| {
            let start = e.location?;
            let end = e.end_location()?;
            (start.is_well_formed() && end.is_well_formed())
                .then_some(MovementVector { start, end })
        }));
    }
    vectors
}

/// Owned copy of one match's events narrowed by target and filter.
pub fn filter_events(events: &[Event], target: Option<&Target>, filter: &EventFilter) -> Vec<Event> {
    events
        .iter()
        .filter(|e| target.map_or(true, |t| t.matches_event(e)) && filter.accepts(e))
        .cloned()
        .collect()
}

fn accepted<'a>(
    target: &'a Target,
    events: &'a [Event],
    filter: &'a EventFilter,
) -> impl Iterator<Item = &'a Event> {
    events
        .iter()
        .filter(move |e| target.matches_event(e) && filter.accepts(e))
}
