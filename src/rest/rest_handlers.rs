use axum::{BoxError, Error, Json};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::Sse;
use axum::response::sse::Event;
use axum_macros::debug_handler;
use futures::Stream;
use log::{debug, info, warn};
use serde::Deserialize;
use tokio::sync::broadcast::Receiver;
use crate::domain::coordinate::Coordinate;
use crate::domain::form_state::{FormVisibility, MetricField};
use crate::domain::workout_draft::WorkoutDraft;
use crate::map::map_command::MapCommand;
use crate::rest::workout_html::WorkoutView;
use crate::state::shared_state::{MutexSharedState, SubmitError};

fn internal_server_error(error: BoxError) -> StatusCode {
    warn!("{}", error);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// SSE stream of map commands. A fresh subscriber first receives the
/// backlog that reconstructs the current map (view plus stored markers),
/// then live commands until server termination.
#[debug_handler]
pub async fn events_handler(State(state): State<MutexSharedState>, uri: Uri)
    -> Result<Sse<impl Stream<Item = Result<Event, Error>>>, StatusCode> {
    debug!("Enter {uri}");
    let (backlog, mut receiver) = subscribe_with_backlog(&state).await;
    let mut rx_term = subscribe_term(&state).await;
    let stream = async_stream::stream! {
        for command in backlog {
            yield Event::default().json_data(command);
        }
        loop {
            tokio::select! {
                item = receiver.recv() => {
                    yield Event::default().json_data(item.unwrap());
                }
                _ = rx_term.recv() => {
                    debug!("Termination signal received, leave SSE handler");
                    return;
                }
            }
        }
    };
    Ok(Sse::new(stream))
}

#[debug_handler]
pub async fn position_handler(State(state): State<MutexSharedState>, uri: Uri,
                              Json(coords): Json<Coordinate>) -> StatusCode {
    debug!("Enter {uri}");
    let mut guard = state.lock().await;
    guard.handle_position(coords);
    StatusCode::NO_CONTENT
}

#[debug_handler]
pub async fn position_error_handler(State(state): State<MutexSharedState>, uri: Uri) -> StatusCode {
    debug!("Enter {uri}");
    let mut guard = state.lock().await;
    guard.handle_position_error();
    StatusCode::NO_CONTENT
}

#[debug_handler]
pub async fn map_click_handler(State(state): State<MutexSharedState>, uri: Uri,
                               Json(coords): Json<Coordinate>) -> Json<FormVisibility> {
    debug!("Enter {uri}");
    let mut guard = state.lock().await;
    Json(guard.handle_map_click(coords))
}

#[derive(Deserialize, Debug)]
pub struct KindSelection {
    kind: String
}

#[debug_handler]
pub async fn form_kind_handler(State(state): State<MutexSharedState>, uri: Uri,
                               Json(selection): Json<KindSelection>)
    -> Result<Json<MetricField>, (StatusCode, String)> {
    debug!("Enter {uri}");
    let field = match selection.kind.as_str() {
        "running" => MetricField::Cadence,
        "cycling" => MetricField::Elevation,
        other => {
            return Err((StatusCode::UNPROCESSABLE_ENTITY,
                        format!("unknown workout kind '{other}'")))
        }
    };
    let mut guard = state.lock().await;
    Ok(Json(guard.handle_kind_change(field)))
}

#[debug_handler]
pub async fn workouts_handler(State(state): State<MutexSharedState>, uri: Uri) -> Json<Vec<WorkoutView>> {
    debug!("Enter {uri}");
    let guard = state.lock().await;
    let views = guard.workouts().iter().cloned().map(WorkoutView::new).collect();
    Json(views)
}

#[debug_handler]
pub async fn create_workout_handler(State(state): State<MutexSharedState>, uri: Uri,
                                    Json(draft): Json<WorkoutDraft>)
    -> Result<(StatusCode, Json<WorkoutView>), (StatusCode, String)> {
    debug!("Enter {uri}");
    let mut guard = state.lock().await;
    match guard.submit_draft(&draft) {
        Ok(workout) => Ok((StatusCode::CREATED, Json(WorkoutView::new(workout)))),
        Err(error @ SubmitError::FormHidden) => {
            info!("Rejected workout submission: {}", error);
            Err((StatusCode::CONFLICT, error.to_string()))
        }
        Err(SubmitError::Invalid(error)) => {
            info!("Rejected workout draft: {}", error);
            Err((StatusCode::UNPROCESSABLE_ENTITY, error.to_string()))
        }
        Err(SubmitError::Storage(error)) => {
            Err((internal_server_error(error), String::from("failed to persist workouts")))
        }
    }
}

/// Identifier misses are silently ignored, the response does not differ
#[debug_handler]
pub async fn focus_handler(State(state): State<MutexSharedState>, uri: Uri,
                           Path(id): Path<String>) -> StatusCode {
    debug!("Enter {uri}");
    let mut guard = state.lock().await;
    guard.focus_workout(&id);
    StatusCode::NO_CONTENT
}

async fn subscribe_with_backlog(state: &MutexSharedState) -> (Vec<MapCommand>, Receiver<MapCommand>) {
    let guard = state.lock().await;
    let receiver = guard.map.subscribe();
    (guard.replay_commands(), receiver)
}

async fn subscribe_term(state: &MutexSharedState) -> Receiver<()> {
    let guard = state.lock().await;
    guard.tx_term.subscribe()
}
