use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::coordinate::Coordinate;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December"
];

/// Kind-specific raw and derived fields. The discriminator is serialized
/// inline with the record, so a loaded record keeps its variant.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WorkoutMetrics {
    Running { cadence: f64, pace: f64 },
    Cycling { elevation: f64, speed: f64 }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Workout {
    pub id: String,
    pub coords: Coordinate,
    pub distance: f64, // kilometers
    pub duration: f64, // minutes
    pub started_at: DateTime<Utc>,
    pub description: String,
    #[serde(flatten)]
    pub metrics: WorkoutMetrics
}

pub type WorkoutVec = Vec<Workout>;

impl Workout {
    /// Inputs are expected to be validated by the caller
    pub fn running(coords: Coordinate, distance: f64, duration: f64, cadence: f64,
                   started_at: DateTime<Utc>) -> Self {
        let pace = duration / distance;
        Self::assemble(coords, distance, duration, started_at, WorkoutMetrics::Running { cadence, pace })
    }

    pub fn cycling(coords: Coordinate, distance: f64, duration: f64, elevation: f64,
                   started_at: DateTime<Utc>) -> Self {
        let speed = distance / duration / 60.0;
        Self::assemble(coords, distance, duration, started_at, WorkoutMetrics::Cycling { elevation, speed })
    }

    fn assemble(coords: Coordinate, distance: f64, duration: f64,
                started_at: DateTime<Utc>, metrics: WorkoutMetrics) -> Self {
        let description = describe(kind_label(&metrics), started_at);
        Self {
            id: Uuid::new_v4().to_string(),
            coords,
            distance,
            duration,
            started_at,
            description,
            metrics
        }
    }

    /// Recomputes the derived metric from distance and duration. Applied
    /// after a load from storage so stored derived values are never trusted.
    pub fn rederive(&mut self) {
        self.metrics = match self.metrics {
            WorkoutMetrics::Running { cadence, .. } =>
                WorkoutMetrics::Running { cadence, pace: self.duration / self.distance },
            WorkoutMetrics::Cycling { elevation, .. } =>
                WorkoutMetrics::Cycling { elevation, speed: self.distance / self.duration / 60.0 }
        };
    }

    /// Lowercase kind name, also used as CSS class suffix
    pub fn kind_name(&self) -> &'static str {
        match self.metrics {
            WorkoutMetrics::Running { .. } => "running",
            WorkoutMetrics::Cycling { .. } => "cycling"
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self.metrics {
            WorkoutMetrics::Running { .. } => "🏃‍♂️",
            WorkoutMetrics::Cycling { .. } => "🚴‍♀️"
        }
    }
}

fn kind_label(metrics: &WorkoutMetrics) -> &'static str {
    match metrics {
        WorkoutMetrics::Running { .. } => "Running",
        WorkoutMetrics::Cycling { .. } => "Cycling"
    }
}

fn describe(kind: &str, date: DateTime<Utc>) -> String {
    format!("{} on {} {}", kind, MONTH_NAMES[date.month0() as usize], date.day())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use crate::domain::coordinate::Coordinate;
    use crate::domain::workout::{Workout, WorkoutMetrics};

    impl Workout {
        /// Running workout with a fixed identifier for lookup tests
        pub fn dummy(id: &str, lat: f64, lng: f64) -> Self {
            let date = Utc.with_ymd_and_hms(2024, 4, 3, 17, 30, 0).unwrap();
            let mut workout = Workout::running(Coordinate::new(lat, lng), 5.0, 30.0, 150.0, date);
            workout.id = String::from(id);
            workout
        }
    }

    #[test]
    fn test_running_pace() {
        let date = Utc.with_ymd_and_hms(2024, 4, 3, 17, 30, 0).unwrap();
        let workout = Workout::running(Coordinate::new(52.5, 13.4), 5.0, 30.0, 150.0, date);
        assert_eq!(workout.metrics, WorkoutMetrics::Running { cadence: 150.0, pace: 6.0 });
    }

    #[test]
    fn test_cycling_speed() {
        let date = Utc.with_ymd_and_hms(2024, 4, 3, 17, 30, 0).unwrap();
        let workout = Workout::cycling(Coordinate::new(40.0, -73.0), 20.0, 60.0, 400.0, date);
        assert_eq!(workout.metrics, WorkoutMetrics::Cycling { elevation: 400.0, speed: 20.0 / 60.0 / 60.0 });
    }

    #[test]
    fn test_description() {
        let date = Utc.with_ymd_and_hms(2024, 4, 3, 17, 30, 0).unwrap();
        let running = Workout::running(Coordinate::new(52.5, 13.4), 5.0, 30.0, 150.0, date);
        assert_eq!(running.description, "Running on April 3");

        let date = Utc.with_ymd_and_hms(2023, 12, 31, 8, 0, 0).unwrap();
        let cycling = Workout::cycling(Coordinate::new(52.5, 13.4), 20.0, 60.0, 400.0, date);
        assert_eq!(cycling.description, "Cycling on December 31");
    }

    #[test]
    fn test_unique_ids() {
        let date = Utc.with_ymd_and_hms(2024, 4, 3, 17, 30, 0).unwrap();
        let one = Workout::running(Coordinate::new(52.5, 13.4), 5.0, 30.0, 150.0, date);
        let two = Workout::running(Coordinate::new(52.5, 13.4), 5.0, 30.0, 150.0, date);
        assert_ne!(one.id, two.id);
    }

    #[test]
    fn test_serde_keeps_variant() {
        let workout = Workout::dummy("id1", 52.5, 13.4);
        let json = serde_json::to_string(&workout).unwrap();
        assert!(json.contains(r#""kind":"running""#));
        assert!(json.contains(r#""cadence":150.0"#));

        let parsed: Workout = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, workout);
    }

    #[test]
    fn test_rederive_overwrites_stored_metric() {
        let mut workout = Workout::dummy("id1", 52.5, 13.4);
        workout.metrics = WorkoutMetrics::Running { cadence: 150.0, pace: 999.0 };
        workout.rederive();
        assert_eq!(workout.metrics, WorkoutMetrics::Running { cadence: 150.0, pace: 6.0 });
    }
}
