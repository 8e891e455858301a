use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::{data, ApiResult};
use crate::{
    models::{Destination, Laundry, LaundryStatus},
    services::{CollectOutcome, DeliverOutcome, WashOutcome},
    state::AppState,
    store::Store,
};

#[derive(Debug, Deserialize)]
pub struct CollectForm {
    pub room_id: Uuid,
    pub item_ids: Vec<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WashForm {
    pub laundry_ids: Vec<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeliverForm {
    pub laundry_ids: Vec<Uuid>,
    pub destination: Destination,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LaundryQuery {
    pub status: Option<LaundryStatus>,
}

pub async fn list_laundry<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Query(query): Query<LaundryQuery>,
) -> ApiResult<Vec<Laundry>> {
    state.current_user(&cookies, &headers)?;
    data(state.laundry.list(query.status).await?)
}

pub async fn collect<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<CollectForm>,
) -> ApiResult<CollectOutcome> {
    let user = state.current_user(&cookies, &headers)?;
    data(
        state
            .laundry
            .collect(form.room_id, &form.item_ids, user.id, form.notes)
            .await?,
    )
}

pub async fn register_wash<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<WashForm>,
) -> ApiResult<WashOutcome> {
    let user = state.current_user(&cookies, &headers)?;
    data(
        state
            .laundry
            .register_wash(&form.laundry_ids, user.id, form.notes)
            .await?,
    )
}

pub async fn deliver<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Json(form): Json<DeliverForm>,
) -> ApiResult<DeliverOutcome> {
    let user = state.current_user(&cookies, &headers)?;
    data(
        state
            .laundry
            .deliver(&form.laundry_ids, form.destination, user.id, form.notes)
            .await?,
    )
}
