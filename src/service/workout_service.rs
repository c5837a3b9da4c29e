use axum::BoxError;
use log::{debug, info};
use rusqlite::Connection;
use crate::database::storage_table::StorageTable;
use crate::domain::workout::WorkoutVec;

/// Fixed storage key of the serialized workout collection
const WORKOUTS_KEY: &str = "workouts";

pub struct WorkoutService {
    connection: Connection
}

impl WorkoutService {
    pub fn new(db_path: &str) -> Result<Self, rusqlite::Error> {
        let connection = Connection::open(db_path)?;
        StorageTable::create_table(&connection)?;
        Ok(Self { connection })
    }

    /// Serializes the full ordered collection and overwrites the slot.
    /// There are no partial or incremental writes.
    pub fn save(&mut self, workouts: &WorkoutVec) -> Result<(), BoxError> {
        info!("Persist {} workouts", workouts.len());
        let value = serde_json::to_string(workouts)?;
        let tx = self.connection.transaction()?;
        StorageTable::upsert(&tx, WORKOUTS_KEY, &value)?;
        tx.commit()?;
        Ok(())
    }

    /// Reads the slot. An absent slot means "nothing stored yet" and yields
    /// None. Derived metrics of loaded records are recomputed instead of
    /// trusting the stored values.
    pub fn load(&mut self) -> Result<Option<WorkoutVec>, BoxError> {
        let tx = self.connection.transaction()?;
        let value = StorageTable::select(&tx, WORKOUTS_KEY)?;
        tx.commit()?;
        match value {
            Some(value) => {
                let mut workouts: WorkoutVec = serde_json::from_str(&value)?;
                for workout in workouts.iter_mut() {
                    workout.rederive();
                }
                debug!("Loaded {} workouts from storage", workouts.len());
                Ok(Some(workouts))
            }
            None => Ok(None)
        }
    }
}
