use serde::Deserialize;
use thiserror::Error;

/// Raw form payload as posted by the console. All numeric fields arrive as
/// uninterpreted input strings; parsing and validation happen here, in the
/// controller path, never in the workout model.
#[derive(Clone, Deserialize, Debug)]
pub struct WorkoutDraft {
    pub kind: String,
    pub distance: String,
    pub duration: String,
    #[serde(default)]
    pub cadence: String,
    #[serde(default)]
    pub elevation: String
}

#[derive(Error, Debug, PartialEq)]
pub enum DraftError {
    #[error("unknown workout kind '{0}'")]
    UnknownKind(String),
    #[error("{0} must be a number")]
    NotNumeric(&'static str),
    #[error("{0} must be a positive number")]
    NotPositive(&'static str)
}

/// Outcome of a successful validation, ready for workout construction
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ValidDraft {
    Running { distance: f64, duration: f64, cadence: f64 },
    Cycling { distance: f64, duration: f64, elevation: f64 }
}

impl WorkoutDraft {
    /// Every numeric field must parse as a finite number and be strictly
    /// positive, for both kinds and for the kind-specific metric alike.
    pub fn validate(&self) -> Result<ValidDraft, DraftError> {
        let distance = positive("distance", &self.distance)?;
        let duration = positive("duration", &self.duration)?;
        match self.kind.as_str() {
            "running" => {
                let cadence = positive("cadence", &self.cadence)?;
                Ok(ValidDraft::Running { distance, duration, cadence })
            }
            "cycling" => {
                let elevation = positive("elevation", &self.elevation)?;
                Ok(ValidDraft::Cycling { distance, duration, elevation })
            }
            other => Err(DraftError::UnknownKind(String::from(other)))
        }
    }
}

fn positive(field: &'static str, raw: &str) -> Result<f64, DraftError> {
    let value = raw.trim().parse::<f64>().map_err(|_| DraftError::NotNumeric(field))?;
    if !value.is_finite() {
        return Err(DraftError::NotNumeric(field));
    }
    if value <= 0.0 {
        return Err(DraftError::NotPositive(field));
    }
    Ok(value)
}
