pub mod http_server;
pub mod rest_handlers;
pub mod rest_paths;
pub mod timing_layer;
pub mod workout_html;
