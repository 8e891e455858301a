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
    models::{
        CreateLinenType, CreateRoom, LinenType, Room, RoomFilter, RoomLinenConfig, RoomStatus,
        RoomType, UpdateLinenType, UpdateRoom,
    },
    state::AppState,
    store::Store,
};

#[derive(Debug, Deserialize)]
pub struct RoomStatusForm {
    pub status: RoomStatus,
}

#[derive(Debug, Deserialize)]
pub struct RequirementForm {
    pub room_type: RoomType,
    pub linen_type_id: Uuid,
    pub quantity: i32,
}

// Linen types

pub async fn list_linen_types<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
) -> ApiResult<Vec<LinenType>> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.linen_types().await?)
}

pub async fn create_linen_type<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<CreateLinenType>,
) -> ApiResult<LinenType> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.create_linen_type(form).await?)
}

pub async fn update_linen_type<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<UpdateLinenType>,
) -> ApiResult<LinenType> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.update_linen_type(id, form).await?)
}

// Rooms

pub async fn list_rooms<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Query(filter): Query<RoomFilter>,
) -> ApiResult<Vec<Room>> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.rooms(&filter).await?)
}

pub async fn create_room<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<CreateRoom>,
) -> ApiResult<Room> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.create_room(form).await?)
}

pub async fn room_detail<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<Room> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.room(id).await?)
}

pub async fn update_room<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<UpdateRoom>,
) -> ApiResult<Room> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.update_room(id, form).await?)
}

pub async fn update_room_status<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<RoomStatusForm>,
) -> ApiResult<Room> {
    state.current_user(&cookies, &headers)?;
    data(state.catalog.update_room_status(id, form.status).await?)
}

// Room linen configuration

pub async fn room_config<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(room_type): Path<RoomType>,
) -> ApiResult<Vec<RoomLinenConfig>> {
    state.current_user(&cookies, &headers)?;
    data(state.room_config.all_requirements(room_type).await?)
}

pub async fn set_requirement<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<RequirementForm>,
) -> ApiResult<RoomLinenConfig> {
    state.current_user(&cookies, &headers)?;
    data(
        state
            .room_config
            .set_requirement(form.room_type, form.linen_type_id, form.quantity)
            .await?,
    )
}
