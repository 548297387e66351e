//! Session state: dish list, image cache, and job flags.
//!
//! All fields are owned by [`SessionManager`](crate::manager::SessionManager)
//! behind a single `RwLock`; nothing here is shared directly. The
//! presentation layer only ever sees a [`SessionSnapshot`].

use std::collections::HashMap;

use serde::Serialize;

use platelens_core::artifact::ImageArtifact;
use platelens_core::dish::Dish;
use platelens_core::types::{DishId, Timestamp};

/// Per-dish in-flight flags.
///
/// Both default to false and return to false when the corresponding
/// operation settles, whether it succeeded or failed.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct JobState {
    pub generating: bool,
    pub editing: bool,
}

impl JobState {
    /// True when no job is in flight for the dish.
    pub fn idle(self) -> bool {
        !self.generating && !self.editing
    }
}

/// Mutable state for one browser session.
#[derive(Default)]
pub(crate) struct SessionState {
    /// Parsed dishes in menu order. Replaced wholesale on parse.
    pub dishes: Vec<Dish>,
    /// Most recent artifact per dish. New artifacts overwrite.
    pub images: HashMap<DishId, ImageArtifact>,
    /// In-flight flags per dish. Entries appear lazily.
    pub jobs: HashMap<DishId, JobState>,
    /// True while a parse call is in flight.
    pub parsing: bool,
    /// True while a generate-all run is in progress.
    pub batch_in_progress: bool,
    /// The single current user-visible error, if any. The most recent
    /// failure from any operation replaces the previous value.
    pub last_error: Option<String>,
    /// When the current dish list was parsed.
    pub parsed_at: Option<Timestamp>,
}

impl SessionState {
    /// Clear dishes, images, and jobs. Called when a new parse begins;
    /// job entries vanish with the dishes that owned them.
    pub fn clear_entities(&mut self) {
        self.dishes.clear();
        self.images.clear();
        self.jobs.clear();
        self.parsed_at = None;
    }

    /// Job flags for a dish, inserting the idle default if absent.
    pub fn job_mut(&mut self, id: DishId) -> &mut JobState {
        self.jobs.entry(id).or_default()
    }

    /// Look up a dish by id.
    pub fn dish(&self, id: DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }

    /// Record `err` as the current user-visible error.
    pub fn record_error(&mut self, err: &crate::error::SessionError) {
        self.last_error = Some(err.to_string());
    }

    /// Build a read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            dishes: self.dishes.clone(),
            images: self
                .images
                .iter()
                .map(|(id, artifact)| (*id, artifact.as_data_uri().to_string()))
                .collect(),
            jobs: self.jobs.clone(),
            parsing: self.parsing,
            batch_in_progress: self.batch_in_progress,
            last_error: self.last_error.clone(),
            parsed_at: self.parsed_at,
        }
    }
}

/// Read-only view of session state, serialized for the presentation
/// layer on every poll.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub dishes: Vec<Dish>,
    /// Image data URIs keyed by dish id, ready for `<img src>`.
    pub images: HashMap<DishId, String>,
    pub jobs: HashMap<DishId, JobState>,
    pub parsing: bool,
    pub batch_in_progress: bool,
    pub last_error: Option<String>,
    pub parsed_at: Option<Timestamp>,
}
