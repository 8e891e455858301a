use axum::{
    extract::{Query, State},
    http::HeaderMap,
};
use tower_cookies::Cookies;

use super::{data, ApiResult};
use crate::{
    models::{LinenMovement, MovementFilter},
    state::AppState,
    store::Store,
};

pub async fn list_movements<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Query(filter): Query<MovementFilter>,
) -> ApiResult<Vec<LinenMovement>> {
    state.current_user(&cookies, &headers)?;
    data(state.ledger.list(&filter).await?)
}
