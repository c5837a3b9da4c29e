use serde::{Deserialize, Serialize};
use crate::domain::workout::{Workout, WorkoutMetrics};

/// A workout record together with its rendered list item, as returned to
/// the console for list rendering
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct WorkoutView {
    pub workout: Workout,
    pub list_item: String
}

impl WorkoutView {
    pub fn new(workout: Workout) -> Self {
        let list_item = list_item(&workout);
        Self { workout, list_item }
    }
}

/// Renders the list entry of a workout. Distance, duration and the raw
/// kind metric are printed as entered, derived metrics with one decimal.
pub fn list_item(workout: &Workout) -> String {
    let mut html = format!(
        r#"<li class="workout workout--{kind}" data-id="{id}">
  <h2 class="workout__title">{description}</h2>
  <div class="workout__details">
    <span class="workout__icon">{emoji}</span>
    <span class="workout__value">{distance}</span>
    <span class="workout__unit">km</span>
  </div>
  <div class="workout__details">
    <span class="workout__icon">⏱</span>
    <span class="workout__value">{duration}</span>
    <span class="workout__unit">min</span>
  </div>"#,
        kind = workout.kind_name(),
        id = workout.id,
        description = workout.description,
        emoji = workout.emoji(),
        distance = workout.distance,
        duration = workout.duration
    );

    match workout.metrics {
        WorkoutMetrics::Running { cadence, pace } => {
            html.push_str(&format!(
                r#"
  <div class="workout__details">
    <span class="workout__icon">⚡️</span>
    <span class="workout__value">{pace:.1}</span>
    <span class="workout__unit">min/km</span>
  </div>
  <div class="workout__details">
    <span class="workout__icon">🦶🏼</span>
    <span class="workout__value">{cadence}</span>
    <span class="workout__unit">spm</span>
  </div>"#
            ));
        }
        WorkoutMetrics::Cycling { elevation, speed } => {
            html.push_str(&format!(
                r#"
  <div class="workout__details">
    <span class="workout__icon">⚡️</span>
    <span class="workout__value">{speed:.1}</span>
    <span class="workout__unit">km/h</span>
  </div>
  <div class="workout__details">
    <span class="workout__icon">⛰</span>
    <span class="workout__value">{elevation}</span>
    <span class="workout__unit">m</span>
  </div>"#
            ));
        }
    }

    html.push_str("\n</li>");
    html
}
