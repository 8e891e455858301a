//! Linen item registry: identity, status and location of every item.

use chrono::Utc;
use uuid::Uuid;

use super::ledger;
use crate::error::{AppError, StoreError};
use crate::models::{
    LinenCondition, LinenItem, LinenItemFilter, LinenItemMetadata, LinenStatus, MovementType,
};
use crate::store::{Store, StoreTx};

/// Status an item takes after a manual movement of the given type.
pub fn status_after(movement_type: MovementType, current: LinenStatus) -> LinenStatus {
    match movement_type {
        MovementType::Entry => LinenStatus::Clean,
        MovementType::Exit => LinenStatus::Dirty,
        MovementType::Wash => LinenStatus::InWash,
        MovementType::Discard => LinenStatus::Discarded,
        MovementType::Transfer => current,
    }
}

/// Writes a new status and room for `item`, guarded on its current status.
pub(crate) async fn relocate<T: StoreTx>(
    tx: &mut T,
    item: &LinenItem,
    status: LinenStatus,
    room_id: Option<Uuid>,
) -> Result<LinenItem, StoreError> {
    let mut updated = item.clone();
    updated.status = status;
    updated.room_id = room_id;
    updated.updated_at = Utc::now();
    tx.update_linen_item(&updated, item.status).await?;
    Ok(updated)
}

pub(crate) async fn load_item<T: StoreTx>(tx: &mut T, id: Uuid) -> Result<LinenItem, AppError> {
    tx.linen_item(id).await?.ok_or(AppError::NotFound("Linen item"))
}

#[derive(Clone)]
pub struct RegistryService<S> {
    store: S,
}

impl<S: Store> RegistryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Registers a new physical item: clean when placed in a room, stocked otherwise.
    pub async fn register(
        &self,
        linen_type_id: Uuid,
        room_id: Option<Uuid>,
        metadata: LinenItemMetadata,
    ) -> Result<LinenItem, AppError> {
        let mut tx = self.store.begin().await?;

        tx.linen_type(linen_type_id)
            .await?
            .ok_or(AppError::NotFound("Linen type"))?;
        if let Some(room_id) = room_id {
            tx.room(room_id).await?.ok_or(AppError::NotFound("Room"))?;
        }

        let now = Utc::now();
        let item = LinenItem {
            id: Uuid::new_v4(),
            linen_type_id,
            room_id,
            status: if room_id.is_some() { LinenStatus::Clean } else { LinenStatus::Stocked },
            condition: LinenCondition::Excellent,
            description: metadata.description,
            purchase_date: metadata.purchase_date,
            supplier_tax_id: metadata.supplier_tax_id,
            invoice_number: metadata.invoice_number,
            last_wash_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        tx.insert_linen_item(&item).await?;
        tx.commit().await?;

        log::info!("registered linen item {} ({})", item.id, item.status);
        Ok(item)
    }

    pub async fn move_item(
        &self,
        item_id: Uuid,
        to_room_id: Option<Uuid>,
        movement_type: MovementType,
        acting_user: Uuid,
        notes: Option<String>,
    ) -> Result<LinenItem, AppError> {
        let mut tx = self.store.begin().await?;
        let item = load_item(&mut tx, item_id).await?;

        if item.status == LinenStatus::Discarded {
            return Err(AppError::invalid_state("Discarded items cannot be moved"));
        }
        let status = status_after(movement_type, item.status);
        if status.forbids_room() && to_room_id.is_some() {
            return Err(AppError::invalid_state(format!(
                "A {} item cannot be placed in a room",
                status
            )));
        }
        if let Some(room_id) = to_room_id {
            tx.room(room_id).await?.ok_or(AppError::NotFound("Room"))?;
        }

        let moved = relocate(&mut tx, &item, status, to_room_id).await?;
        ledger::record(
            &mut tx,
            item.id,
            item.room_id,
            to_room_id,
            movement_type,
            acting_user,
            notes,
        )
        .await?;
        tx.commit().await?;

        log::info!(
            "moved linen item {} ({:?}): {:?} -> {:?}, now {}",
            item.id,
            movement_type,
            item.room_id,
            to_room_id,
            moved.status
        );
        Ok(moved)
    }

    /// Takes an item out of circulation for good. Any status may be discarded.
    pub async fn discard(
        &self,
        item_id: Uuid,
        acting_user: Uuid,
        notes: Option<String>,
    ) -> Result<LinenItem, AppError> {
        let mut tx = self.store.begin().await?;
        let item = load_item(&mut tx, item_id).await?;

        let mut discarded = item.clone();
        discarded.status = LinenStatus::Discarded;
        discarded.room_id = None;
        discarded.notes = notes.clone();
        discarded.updated_at = Utc::now();
        tx.update_linen_item(&discarded, item.status).await?;

        ledger::record(
            &mut tx,
            item.id,
            item.room_id,
            None,
            MovementType::Discard,
            acting_user,
            Some(notes.unwrap_or_else(|| "Item permanently discarded".to_string())),
        )
        .await?;
        tx.commit().await?;

        log::info!("discarded linen item {}", item.id);
        Ok(discarded)
    }

    /// Returns a damaged item to stock in good condition.
    pub async fn repair(
        &self,
        item_id: Uuid,
        acting_user: Uuid,
        notes: Option<String>,
    ) -> Result<LinenItem, AppError> {
        let mut tx = self.store.begin().await?;
        let item = load_item(&mut tx, item_id).await?;

        if item.status != LinenStatus::Damaged {
            return Err(AppError::invalid_state("Item is not damaged"));
        }

        let mut repaired = item.clone();
        repaired.status = LinenStatus::Stocked;
        repaired.condition = LinenCondition::Good;
        repaired.room_id = None;
        repaired.notes = notes.clone();
        repaired.updated_at = Utc::now();
        tx.update_linen_item(&repaired, item.status).await?;

        ledger::record(
            &mut tx,
            item.id,
            item.room_id,
            None,
            MovementType::Entry,
            acting_user,
            Some(notes.unwrap_or_else(|| "Item repaired and returned to stock".to_string())),
        )
        .await?;
        tx.commit().await?;

        log::info!("repaired linen item {}", item.id);
        Ok(repaired)
    }

    pub async fn get(&self, item_id: Uuid) -> Result<LinenItem, AppError> {
        let mut tx = self.store.begin().await?;
        load_item(&mut tx, item_id).await
    }

    pub async fn list(&self, filter: &LinenItemFilter) -> Result<Vec<LinenItem>, AppError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_linen_items(filter).await?)
    }

    pub async fn damaged(&self, linen_type_id: Option<Uuid>) -> Result<Vec<LinenItem>, AppError> {
        let filter = LinenItemFilter {
            linen_type_id,
            status: Some(LinenStatus::Damaged),
            ..Default::default()
        };
        self.list(&filter).await
    }

    /// Dirty items still sitting in a room, waiting to be collected.
    pub async fn awaiting_collection(&self, room_id: Uuid) -> Result<Vec<LinenItem>, AppError> {
        let filter = LinenItemFilter {
            room_id: Some(room_id),
            status: Some(LinenStatus::Dirty),
            ..Default::default()
        };
        self.list(&filter).await
    }
}
