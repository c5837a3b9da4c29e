use axum::Router;
use axum::http::Method;
use axum::response::Redirect;
use axum::routing::{get, post, put};
use log::{debug, info};
use tokio::net::TcpListener;
use tokio::sync::broadcast::Receiver;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use crate::rest::rest_handlers::{create_workout_handler, events_handler, focus_handler,
                                 form_kind_handler, map_click_handler, position_error_handler,
                                 position_handler, workouts_handler};
use crate::rest::rest_paths::{StaticDir, EVENTS, FORM_KIND, MAP_CLICK, POSITION, POSITION_ERROR,
                              WORKOUTS, WORKOUT_FOCUS};
use crate::rest::timing_layer::TimingLayer;
use crate::state::shared_state::MutexSharedState;

pub fn build_router(state: MutexSharedState, console_dir: &StaticDir) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(Any);

    let console_path = console_dir.rest_path;

    Router::new()
        .route(EVENTS, get(events_handler))
        .route(POSITION, post(position_handler))
        .route(POSITION_ERROR, post(position_error_handler))
        .route(MAP_CLICK, post(map_click_handler))
        .route(FORM_KIND, put(form_kind_handler))
        .route(WORKOUTS, get(workouts_handler).post(create_workout_handler))
        .route(WORKOUT_FOCUS, post(focus_handler))
        .route("/", get(move || async move { Redirect::permanent(console_path) }))
        .nest_service(console_dir.rest_path, ServeDir::new(console_dir.file_path))
        .layer(ServiceBuilder::new().layer(cors))
        .layer(ServiceBuilder::new().layer(TimingLayer))
        .with_state(state)
}

pub fn spawn_http_server(
    listener: TcpListener,
    state: MutexSharedState,
    mut rx_term: Receiver<()>,
    console_dir: &StaticDir) -> JoinHandle<()> {
    info!("Spawn HTTP server");

    let router = build_router(state, console_dir);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                rx_term.recv().await.unwrap();
                debug!("Termination signal received, leave HTTP server");
            })
            .await
            .unwrap() // Panic accepted
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use crate::domain::coordinate::Coordinate;
    use crate::domain::form_state::{FormVisibility, MetricField};
    use crate::domain::workout::WorkoutMetrics;
    use crate::map::map_command::MapCommand;
    use crate::rest::rest_paths::{CONSOLE_DIR, FORM_KIND, MAP_CLICK, POSITION, WORKOUTS};
    use crate::rest::workout_html::WorkoutView;
    use crate::state::shared_state::{MutexSharedState, SharedState};

    fn create_server(state: MutexSharedState) -> TestServer {
        TestServer::new(crate::rest::http_server::build_router(state, &CONSOLE_DIR)).unwrap()
    }

    #[tokio::test]
    async fn test_record_cycling_workout() {
        let state = SharedState::dummy();
        let mut rx = state.lock().await.map.subscribe();
        let server = create_server(state.clone());

        server.post(POSITION)
            .json(&json!({"lat": 52.5, "lng": 13.4}))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert!(matches!(rx.try_recv().unwrap(), MapCommand::InitView { .. }));

        let visibility = server.post(MAP_CLICK)
            .json(&json!({"lat": 40.0, "lng": -73.0}))
            .await
            .json::<FormVisibility>();
        assert_eq!(visibility, FormVisibility::AwaitingDetails);

        let response = server.post(WORKOUTS)
            .json(&json!({"kind": "cycling", "distance": "20", "duration": "60", "elevation": "400"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let view = response.json::<WorkoutView>();
        assert_eq!(view.workout.coords, Coordinate::new(40.0, -73.0));
        assert_eq!(view.workout.metrics,
                   WorkoutMetrics::Cycling { elevation: 400.0, speed: 20.0 / 60.0 / 60.0 });
        assert!(view.list_item.contains("🚴‍♀️"));
        assert!(view.list_item.contains(r#"<span class="workout__value">400</span>"#));
        assert!(view.list_item.contains(r#"<span class="workout__unit">m</span>"#));

        // The marker was placed at the clicked position
        match rx.try_recv().unwrap() {
            MapCommand::PlaceMarker { coords, popup_text, .. } => {
                assert_eq!(coords, Coordinate::new(40.0, -73.0));
                assert!(popup_text.starts_with("🚴‍♀️"));
            }
            other => panic!("Unexpected command {:?}", other)
        }

        // One record in the list, one record in storage
        let views = server.get(WORKOUTS).await.json::<Vec<WorkoutView>>();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].workout.id, view.workout.id);

        let mut guard = state.lock().await;
        let stored = guard.service.load().unwrap().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, view.workout.id);
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let state = SharedState::dummy();
        let server = create_server(state);

        server.post(POSITION).json(&json!({"lat": 52.5, "lng": 13.4})).await
            .assert_status(StatusCode::NO_CONTENT);
        server.post(MAP_CLICK).json(&json!({"lat": 40.0, "lng": -73.0})).await
            .assert_status(StatusCode::OK);

        let response = server.post(WORKOUTS)
            .json(&json!({"kind": "running", "distance": "-5", "duration": "30", "cadence": "150"}))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.text(), "distance must be a positive number");

        let views = server.get(WORKOUTS).await.json::<Vec<WorkoutView>>();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_map_click_conflicts() {
        let state = SharedState::dummy();
        let server = create_server(state);

        let response = server.post(WORKOUTS)
            .json(&json!({"kind": "running", "distance": "5", "duration": "30", "cadence": "150"}))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_kind_toggle() {
        let state = SharedState::dummy();
        let server = create_server(state);

        let field = server.put(FORM_KIND).json(&json!({"kind": "cycling"})).await
            .json::<MetricField>();
        assert_eq!(field, MetricField::Elevation);

        server.put(FORM_KIND).json(&json!({"kind": "rowing"})).await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_focus_unknown_id_is_silent() {
        let state = SharedState::dummy();
        let server = create_server(state);

        server.post("/workouts/missing/focus").await
            .assert_status(StatusCode::NO_CONTENT);
    }
}
