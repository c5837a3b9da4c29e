use serde::{Deserialize, Serialize};
use crate::domain::coordinate::Coordinate;

/// Visibility of the workout entry form
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FormVisibility {
    Hidden,
    AwaitingDetails
}

/// Which kind-specific input is active in the form
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum MetricField {
    Cadence,
    Elevation
}

/// State machine over the workout entry form. Invariant: a pending
/// coordinate exists if and only if the form is awaiting details.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    visibility: FormVisibility,
    active_field: MetricField,
    pending: Option<Coordinate>
}

impl FormState {
    pub fn new() -> Self {
        Self {
            visibility: FormVisibility::Hidden,
            active_field: MetricField::Cadence,
            pending: None
        }
    }

    /// Map-background click: capture the clicked coordinate and open the form
    pub fn reveal(&mut self, coords: Coordinate) {
        self.visibility = FormVisibility::AwaitingDetails;
        self.pending = Some(coords);
    }

    /// Successful submission: drop the pending coordinate and close the form
    pub fn hide(&mut self) {
        self.visibility = FormVisibility::Hidden;
        self.pending = None;
    }

    /// Kind-selector toggle, not a visibility transition
    pub fn set_active_field(&mut self, field: MetricField) {
        self.active_field = field;
    }

    pub fn visibility(&self) -> FormVisibility {
        self.visibility
    }

    pub fn active_field(&self) -> MetricField {
        self.active_field
    }

    pub fn pending(&self) -> Option<Coordinate> {
        self.pending
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}
