pub const EVENTS: &str = "/events";

pub const POSITION: &str = "/position";
pub const POSITION_ERROR: &str = "/position/error";
pub const MAP_CLICK: &str = "/map/click";
pub const FORM_KIND: &str = "/form/kind";

pub const WORKOUTS: &str = "/workouts";
pub const WORKOUT_FOCUS: &str = "/workouts/:id/focus";

pub struct StaticDir {
    pub rest_path: &'static str,
    pub file_path: &'static str
}

pub const CONSOLE_DIR: StaticDir = StaticDir { rest_path: "/console", file_path: "console" };
