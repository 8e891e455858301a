use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use tower_cookies::Cookies;
use uuid::Uuid;

use super::{data, ApiResult};
use crate::{
    models::{
        ChecklistDetail, ChecklistItem, ChecklistItemStatus, CompletedChecklist,
        InitializeOutcome, RoomCleaningChecklist, StartedChecklist,
    },
    services::UpdateChecklistItem,
    state::AppState,
    store::Store,
};

#[derive(Debug, Deserialize)]
pub struct InitializeForm {
    pub room_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistItemForm {
    pub status: ChecklistItemStatus,
    pub condition_notes: Option<String>,
    pub replacement_item_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteForm {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemForm {
    pub linen_type_id: Uuid,
    pub linen_item_id: Uuid,
}

pub async fn start<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(room_id): Path<Uuid>,
) -> ApiResult<StartedChecklist> {
    let user = state.current_user(&cookies, &headers)?;
    data(state.checklists.start(room_id, user.id).await?)
}

pub async fn current_for_room<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(room_id): Path<Uuid>,
) -> ApiResult<Option<RoomCleaningChecklist>> {
    state.current_user(&cookies, &headers)?;
    data(state.checklists.in_progress_for_room(room_id).await?)
}

pub async fn detail<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(checklist_id): Path<Uuid>,
) -> ApiResult<ChecklistDetail> {
    state.current_user(&cookies, &headers)?;
    data(state.checklists.get(checklist_id).await?)
}

pub async fn initialize<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(checklist_id): Path<Uuid>,
    Json(form): Json<InitializeForm>,
) -> ApiResult<InitializeOutcome> {
    state.current_user(&cookies, &headers)?;
    data(state.checklists.initialize(checklist_id, form.room_id).await?)
}

pub async fn update_item<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(form): Json<ChecklistItemForm>,
) -> ApiResult<ChecklistItem> {
    let user = state.current_user(&cookies, &headers)?;
    let input = UpdateChecklistItem {
        item_id,
        status: form.status,
        condition_notes: form.condition_notes,
        replacement_item_id: form.replacement_item_id,
    };
    data(state.checklists.update_item(input, user.id).await?)
}

pub async fn add_item<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(checklist_id): Path<Uuid>,
    Json(form): Json<AddItemForm>,
) -> ApiResult<ChecklistItem> {
    let user = state.current_user(&cookies, &headers)?;
    data(
        state
            .checklists
            .add_item(checklist_id, form.linen_type_id, form.linen_item_id, user.id)
            .await?,
    )
}

pub async fn complete<S: Store>(
    State(state): State<AppState<S>>,
    cookies: Cookies,
    headers: HeaderMap,
    Path(checklist_id): Path<Uuid>,
    Json(form): Json<CompleteForm>,
) -> ApiResult<CompletedChecklist> {
    let user = state.current_user(&cookies, &headers)?;
    data(state.checklists.complete(checklist_id, form.notes, user.id).await?)
}
