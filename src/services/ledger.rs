//! Append-only movement ledger.
//!
//! Every state change of a linen item records one movement inside the same
//! transaction as the change. Nothing reads the ledger back for correctness.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, StoreError};
use crate::models::{LinenMovement, MovementFilter, MovementType};
use crate::store::{Store, StoreTx};

/// Appends one movement within `tx`.
pub(crate) async fn record<T: StoreTx>(
    tx: &mut T,
    linen_item_id: Uuid,
    from_room_id: Option<Uuid>,
    to_room_id: Option<Uuid>,
    movement_type: MovementType,
    user_id: Uuid,
    notes: Option<String>,
) -> Result<LinenMovement, StoreError> {
    let movement = LinenMovement {
        id: Uuid::new_v4(),
        linen_item_id,
        from_room_id,
        to_room_id,
        movement_type,
        user_id,
        notes,
        created_at: Utc::now(),
    };
    tx.insert_movement(&movement).await?;
    Ok(movement)
}

#[derive(Clone)]
pub struct LedgerService<S> {
    store: S,
}

impl<S: Store> LedgerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &MovementFilter) -> Result<Vec<LinenMovement>, AppError> {
        let mut tx = self.store.begin().await?;
        let movements = tx.list_movements(filter).await?;
        Ok(movements)
    }
}
