use log::debug;
use tokio::sync::broadcast::{Receiver, Sender};
use crate::domain::coordinate::Coordinate;
use crate::domain::workout::Workout;
use crate::map::map_command::MapCommand;

// Map configuration is fixed, not user-tunable
pub const DEFAULT_ZOOM: u8 = 13;
pub const PAN_DURATION_SECS: f32 = 1.0;
pub const TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Wraps the interactive map widget in the console. Commands are broadcast
/// to the SSE subscribers; the click callback is the map-click REST route.
/// Until a center point exists (geolocation resolved) the adapter is not
/// ready and marker and pan commands are skipped.
pub struct MapAdapter {
    tx_map: Sender<MapCommand>,
    center: Option<Coordinate>
}

impl MapAdapter {
    pub fn new(tx_map: Sender<MapCommand>) -> Self {
        Self { tx_map, center: None }
    }

    pub fn subscribe(&self) -> Receiver<MapCommand> {
        self.tx_map.subscribe()
    }

    pub fn is_ready(&self) -> bool {
        self.center.is_some()
    }

    /// Centers the view on the user position at the default zoom level
    pub fn init_view(&mut self, center: Coordinate) {
        self.center = Some(center);
        self.publish(Self::init_command(center));
    }

    pub fn place_marker(&self, workout: &Workout) {
        if !self.is_ready() {
            debug!("Map not initialized, skip marker for workout {}", workout.id);
            return;
        }
        self.publish(Self::marker_command(workout));
    }

    pub fn pan_to(&self, coords: Coordinate) {
        if !self.is_ready() {
            debug!("Map not initialized, skip pan");
            return;
        }
        self.publish(Self::pan_command(coords));
    }

    /// Commands a fresh SSE subscriber needs to reconstruct the current map:
    /// the view followed by one marker per stored workout
    pub fn replay_commands(&self, workouts: &[Workout]) -> Vec<MapCommand> {
        match self.center {
            Some(center) => {
                let mut commands = vec![Self::init_command(center)];
                commands.extend(workouts.iter().map(Self::marker_command));
                commands
            }
            None => Vec::new()
        }
    }

    fn init_command(center: Coordinate) -> MapCommand {
        MapCommand::InitView {
            center,
            zoom: DEFAULT_ZOOM,
            tile_url: String::from(TILE_URL),
            attribution: String::from(ATTRIBUTION)
        }
    }

    fn marker_command(workout: &Workout) -> MapCommand {
        MapCommand::PlaceMarker {
            coords: workout.coords,
            popup_text: format!("{} {}", workout.emoji(), workout.description),
            popup_class: format!("{}-popup", workout.kind_name())
        }
    }

    fn pan_command(coords: Coordinate) -> MapCommand {
        MapCommand::PanTo {
            center: coords,
            zoom: DEFAULT_ZOOM,
            duration_secs: PAN_DURATION_SECS
        }
    }

    fn publish(&self, command: MapCommand) {
        // Without subscribers there is no console to update
        if self.tx_map.receiver_count() > 0 {
            if let Err(error) = self.tx_map.send(command) {
                debug!("No SSE subscriber took the map command: {}", error);
            }
        }
    }
}
