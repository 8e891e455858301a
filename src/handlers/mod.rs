pub mod catalog;
pub mod checklist;
pub mod laundry;
pub mod linen;
pub mod movements;

use axum::Json;
use serde::Serialize;

use crate::error::AppError;

/// Success envelope: `{ "data": ... }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub type ApiResult<T> = Result<Json<DataResponse<T>>, AppError>;

pub fn data<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(DataResponse { data }))
}
