use axum::{
    extract::{Path, State},
    Json,
};

use shared::api::{EventTypeResponse, ListEventTypesResponse};

use crate::error::{ApiError, ApiResult};
use crate::store::AppState;

pub async fn list_event_types(
    State(state): State<AppState>,
) -> ApiResult<Json<ListEventTypesResponse>> {
    let event_types: Vec<EventTypeResponse> = state
        .store
        .list_event_types()
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    let total = event_types.len();
    Ok(Json(ListEventTypesResponse { event_types, total }))
}

pub async fn get_event_type(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<EventTypeResponse>> {
    let event_type = state
        .store
        .event_type_by_slug(&slug)
        .await
        .ok_or_else(|| ApiError::not_found("Event type"))?;

    Ok(Json(event_type.into()))
}
