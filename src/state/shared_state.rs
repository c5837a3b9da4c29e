use std::sync::Arc;
use axum::BoxError;
use chrono::Utc;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::broadcast::Sender;
use tokio::sync::Mutex;
use crate::domain::coordinate::Coordinate;
use crate::domain::form_state::{FormState, FormVisibility, MetricField};
use crate::domain::workout::{Workout, WorkoutVec};
use crate::domain::workout_draft::{DraftError, ValidDraft, WorkoutDraft};
use crate::map::map_adapter::MapAdapter;
use crate::map::map_command::MapCommand;
use crate::service::workout_service::WorkoutService;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("no position selected, click the map first")]
    FormHidden,
    #[error(transparent)]
    Invalid(#[from] DraftError),
    #[error("failed to persist workouts: {0}")]
    Storage(BoxError)
}

/// State shared between the axum handlers: the application controller.
/// It exclusively owns the workout collection and the form state machine.
pub struct SharedState {
    pub service: WorkoutService,
    pub map: MapAdapter,
    pub tx_term: Sender<()>, // Broadcast sender used to inform the SSE handlers about server termination
    workouts: WorkoutVec,
    form: FormState
}

pub type MutexSharedState = Arc<Mutex<SharedState>>;

impl SharedState {
    /// Restores the persisted collection (full replacement of the empty
    /// in-memory one) and starts with a hidden form.
    pub fn new(mut service: WorkoutService,
               map: MapAdapter,
               tx_term: Sender<()>) -> Result<MutexSharedState, BoxError> {
        let workouts = service.load()?.unwrap_or_default();
        info!("Restored {} workouts from storage", workouts.len());
        Ok(Arc::new(Mutex::new(Self {
            service,
            map,
            tx_term,
            workouts,
            form: FormState::new()
        })))
    }

    /// Geolocation resolved: center the map and render the stored markers
    pub fn handle_position(&mut self, coords: Coordinate) {
        info!("User position is {:?}", coords);
        self.map.init_view(coords);
        for workout in &self.workouts {
            self.map.place_marker(workout);
        }
    }

    /// Geolocation denied, absent or timed out: the map stays uninitialized
    /// for the session, the console shows its own notice
    pub fn handle_position_error(&mut self) {
        warn!("Geolocation unavailable, map disabled for this session");
    }

    /// Map-background click: capture the coordinate and reveal the form.
    /// Clicks arriving before a map exists are ignored.
    pub fn handle_map_click(&mut self, coords: Coordinate) -> FormVisibility {
        if !self.map.is_ready() {
            debug!("Map click before map initialization, ignored");
            return self.form.visibility();
        }
        self.form.reveal(coords);
        self.form.visibility()
    }

    /// Kind-selector toggle: switches the active metric field only
    pub fn handle_kind_change(&mut self, field: MetricField) -> MetricField {
        self.form.set_active_field(field);
        self.form.active_field()
    }

    /// Form submission. On success the workout is appended, its marker
    /// placed, the form hidden and the full collection persisted before
    /// returning. On failure nothing changes and the form stays open.
    pub fn submit_draft(&mut self, draft: &WorkoutDraft) -> Result<Workout, SubmitError> {
        let coords = self.form.pending().ok_or(SubmitError::FormHidden)?;
        let workout = match draft.validate()? {
            ValidDraft::Running { distance, duration, cadence } =>
                Workout::running(coords, distance, duration, cadence, Utc::now()),
            ValidDraft::Cycling { distance, duration, elevation } =>
                Workout::cycling(coords, distance, duration, elevation, Utc::now())
        };

        self.workouts.push(workout.clone());
        self.map.place_marker(&workout);
        self.form.hide();
        self.service.save(&self.workouts).map_err(SubmitError::Storage)?;
        Ok(workout)
    }

    /// List-item click: recenter the map on the matching workout.
    /// An identifier miss is a no-op, never an error.
    pub fn focus_workout(&mut self, id: &str) -> bool {
        match self.workouts.iter().find(|workout| workout.id == id) {
            Some(workout) => {
                self.map.pan_to(workout.coords);
                true
            }
            None => {
                debug!("No workout with id {}, ignore focus request", id);
                false
            }
        }
    }

    pub fn workouts(&self) -> &WorkoutVec {
        &self.workouts
    }

    pub fn form_visibility(&self) -> FormVisibility {
        self.form.visibility()
    }

    /// Backlog for a fresh SSE subscriber
    pub fn replay_commands(&self) -> Vec<MapCommand> {
        self.map.replay_commands(&self.workouts)
    }
}
