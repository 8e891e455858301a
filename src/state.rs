use std::sync::Arc;

use axum::http::HeaderMap;
use tower_cookies::Cookies;

use crate::error::AppError;
use crate::middleware::{get_current_user, CurrentUser};
use crate::services::{
    CatalogService, ChecklistService, LaundryService, LedgerService, RegistryService,
    RoomConfigService,
};
use crate::store::Store;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState<S> {
    pub catalog: CatalogService<S>,
    pub registry: RegistryService<S>,
    pub ledger: LedgerService<S>,
    pub laundry: LaundryService<S>,
    pub room_config: RoomConfigService<S>,
    pub checklists: ChecklistService<S>,
    jwt_secret: Arc<str>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            catalog: CatalogService::new(store.clone()),
            registry: RegistryService::new(store.clone()),
            ledger: LedgerService::new(store.clone()),
            laundry: LaundryService::new(store.clone()),
            room_config: RoomConfigService::new(store.clone()),
            checklists: ChecklistService::new(store),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// The acting user of a request, or `Unauthorized`.
    pub fn current_user(&self, cookies: &Cookies, headers: &HeaderMap) -> Result<CurrentUser, AppError> {
        get_current_user(cookies, headers, &self.jwt_secret).ok_or(AppError::Unauthorized)
    }
}
