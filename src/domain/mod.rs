pub mod coordinate;
pub mod form_state;
pub mod workout;
pub mod workout_draft;
