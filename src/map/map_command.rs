use serde::{Deserialize, Serialize};
use crate::domain::coordinate::Coordinate;

/// Commands executed by the map widget in the console. Delivered over the
/// SSE event stream.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum MapCommand {
    /// Create the map view centered on the user position
    InitView {
        center: Coordinate,
        zoom: u8,
        tile_url: String,
        attribution: String
    },
    /// Place a workout marker with its bound popup. The popup never
    /// auto-closes and is styled by the per-kind class.
    PlaceMarker {
        coords: Coordinate,
        popup_text: String,
        popup_class: String
    },
    /// Animated recenter on a workout coordinate
    PanTo {
        center: Coordinate,
        zoom: u8,
        duration_secs: f32
    }
}
