pub mod workout_service;
