use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::{data, ApiResult};
use crate::{
    models::{LinenItem, LinenItemFilter, LinenItemMetadata, MovementType},
    state::AppState,
    store::Store,
};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub linen_type_id: Uuid,
    pub room_id: Option<Uuid>,
    #[serde(flatten)]
    pub metadata: LinenItemMetadata,
}

#[derive(Debug, Deserialize)]
pub struct MoveForm {
    pub to_room_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotesForm {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DamagedQuery {
    pub linen_type_id: Option<Uuid>,
}

pub async fn list_items<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Query(filter): Query<LinenItemFilter>,
) -> ApiResult<Vec<LinenItem>> {
    state.current_user(&cookies, &headers)?;
    data(state.registry.list(&filter).await?)
}

pub async fn register_item<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<RegisterForm>,
) -> ApiResult<LinenItem> {
    state.current_user(&cookies, &headers)?;
    data(
        state
            .registry
            .register(form.linen_type_id, form.room_id, form.metadata)
            .await?,
    )
}

pub async fn item_detail<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<LinenItem> {
    state.current_user(&cookies, &headers)?;
    data(state.registry.get(id).await?)
}

pub async fn move_item<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<MoveForm>,
) -> ApiResult<LinenItem> {
    let user = state.current_user(&cookies, &headers)?;
    data(
        state
            .registry
            .move_item(id, form.to_room_id, form.movement_type, user.id, form.notes)
            .await?,
    )
}

pub async fn discard_item<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<NotesForm>,
) -> ApiResult<LinenItem> {
    let user = state.current_user(&cookies, &headers)?;
    data(state.registry.discard(id, user.id, form.notes).await?)
}

pub async fn repair_item<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<NotesForm>,
) -> ApiResult<LinenItem> {
    let user = state.current_user(&cookies, &headers)?;
    data(state.registry.repair(id, user.id, form.notes).await?)
}

pub async fn damaged_items<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Query(query): Query<DamagedQuery>,
) -> ApiResult<Vec<LinenItem>> {
    state.current_user(&cookies, &headers)?;
    data(state.registry.damaged(query.linen_type_id).await?)
}

pub async fn awaiting_collection<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Vec<LinenItem>> {
    state.current_user(&cookies, &headers)?;
    data(state.registry.awaiting_collection(room_id).await?)
}
