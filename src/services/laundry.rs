//! Laundry cycle tracker: collected -> washed -> delivered.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{ledger, registry};
use crate::error::AppError;
use crate::models::{Destination, Laundry, LaundryStatus, LinenItem, LinenStatus, MovementType};
use crate::store::{Store, StoreTx};

#[derive(Debug, Serialize)]
pub struct CollectOutcome {
    pub collected: usize,
    pub laundry: Vec<Laundry>,
}

#[derive(Debug, Serialize)]
pub struct WashOutcome {
    pub washed: usize,
    pub laundry: Vec<Laundry>,
}

#[derive(Debug, Serialize)]
pub struct DeliverOutcome {
    pub delivered: usize,
    pub destination: Destination,
    pub laundry: Vec<Laundry>,
}

/// Puts `item` into the wash pipeline within `tx`.
///
/// A laundry row is opened unless the item already has one; the `wash`
/// movement is always recorded. Returns the opened row, if any.
pub(crate) async fn send_to_wash<T: StoreTx>(
    tx: &mut T,
    item: &LinenItem,
    from_room_id: Option<Uuid>,
    acting_user: Uuid,
    notes: Option<String>,
) -> Result<Option<Laundry>, AppError> {
    registry::relocate(tx, item, LinenStatus::InWash, None).await?;

    let opened = match tx.open_laundry_for_item(item.id).await? {
        Some(_) => None,
        None => {
            let laundry = Laundry::collected(item.id, acting_user, notes.clone());
            tx.insert_laundry(&laundry).await?;
            Some(laundry)
        }
    };

    ledger::record(
        tx,
        item.id,
        from_room_id,
        None,
        MovementType::Wash,
        acting_user,
        notes,
    )
    .await?;
    Ok(opened)
}

fn dedup(ids: &[Uuid], what: &str) -> Result<Vec<Uuid>, AppError> {
    if ids.is_empty() {
        return Err(AppError::validation(format!("Select at least one {}", what)));
    }
    Ok(ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect())
}

#[derive(Clone)]
pub struct LaundryService<S> {
    store: S,
}

impl<S: Store> LaundryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn collect(
        &self,
        room_id: Uuid,
        item_ids: &[Uuid],
        acting_user: Uuid,
        notes: Option<String>,
    ) -> Result<CollectOutcome, AppError> {
        let ids = dedup(item_ids, "item to collect")?;
        let mut tx = self.store.begin().await?;

        tx.room(room_id).await?.ok_or(AppError::NotFound("Room"))?;
        let items = tx.linen_items_by_ids(&ids).await?;
        if items.is_empty() {
            return Err(AppError::PartialSelection("linen items"));
        }

        let mut opened = Vec::with_capacity(items.len());
        for item in &items {
            if item.status == LinenStatus::Discarded {
                return Err(AppError::invalid_state(format!(
                    "Linen item {} is discarded",
                    item.id
                )));
            }
            if tx.open_laundry_for_item(item.id).await?.is_some() {
                return Err(AppError::invalid_state(format!(
                    "Linen item {} is already in the laundry",
                    item.id
                )));
            }
            if let Some(laundry) =
                send_to_wash(&mut tx, item, Some(room_id), acting_user, notes.clone()).await?
            {
                opened.push(laundry);
            }
        }
        tx.commit().await?;

        log::info!("collected {} linen items from room {}", opened.len(), room_id);
        Ok(CollectOutcome { collected: opened.len(), laundry: opened })
    }

    /// Marks collected rows as washed. Rows in any other status, and rows whose
    /// item has since been discarded, are skipped.
    pub async fn register_wash(
        &self,
        laundry_ids: &[Uuid],
        acting_user: Uuid,
        notes: Option<String>,
    ) -> Result<WashOutcome, AppError> {
        let ids = dedup(laundry_ids, "laundry row to wash")?;
        let mut tx = self.store.begin().await?;

        let eligible = tx.laundry_by_ids(&ids, LaundryStatus::Collected).await?;
        if eligible.is_empty() {
            return Err(AppError::PartialSelection("collected laundry"));
        }

        let now = Utc::now();
        let mut washed = Vec::with_capacity(eligible.len());
        for row in eligible {
            let item = registry::load_item(&mut tx, row.linen_item_id).await?;
            if item.status == LinenStatus::Discarded {
                log::warn!("skipping laundry row {}: linen item {} is discarded", row.id, item.id);
                continue;
            }

            let mut updated = row.clone();
            updated.status = LaundryStatus::Washed;
            updated.washed_at = Some(now);
            updated.washed_by = Some(acting_user);
            updated.notes = notes.clone().or(row.notes);
            updated.updated_at = now;
            tx.update_laundry(&updated, LaundryStatus::Collected).await?;

            let mut clean = item.clone();
            clean.status = LinenStatus::Clean;
            clean.last_wash_date = Some(now);
            clean.updated_at = now;
            tx.update_linen_item(&clean, item.status).await?;

            washed.push(updated);
        }
        if washed.is_empty() {
            return Err(AppError::PartialSelection("collected laundry"));
        }
        tx.commit().await?;

        log::info!("registered wash for {} laundry rows", washed.len());
        Ok(WashOutcome { washed: washed.len(), laundry: washed })
    }

    /// Delivers washed rows to a room or back to stock. Rows in any other
    /// status, and rows whose item has since been discarded, are skipped.
    pub async fn deliver(
        &self,
        laundry_ids: &[Uuid],
        destination: Destination,
        acting_user: Uuid,
        notes: Option<String>,
    ) -> Result<DeliverOutcome, AppError> {
        let ids = dedup(laundry_ids, "laundry row to deliver")?;
        let mut tx = self.store.begin().await?;

        if let Destination::Room(room_id) = destination {
            tx.room(room_id).await?.ok_or(AppError::NotFound("Room"))?;
        }
        let eligible = tx.laundry_by_ids(&ids, LaundryStatus::Washed).await?;
        if eligible.is_empty() {
            return Err(AppError::PartialSelection("washed laundry"));
        }

        let (status, room_id) = match destination {
            Destination::Stock => (LinenStatus::Stocked, None),
            Destination::Room(room_id) => (LinenStatus::Clean, Some(room_id)),
        };

        let now = Utc::now();
        let mut delivered = Vec::with_capacity(eligible.len());
        for row in eligible {
            let item = registry::load_item(&mut tx, row.linen_item_id).await?;
            if item.status == LinenStatus::Discarded {
                log::warn!("skipping laundry row {}: linen item {} is discarded", row.id, item.id);
                continue;
            }

            let mut updated = row.clone();
            updated.status = LaundryStatus::Delivered;
            updated.delivered_at = Some(now);
            updated.delivered_by = Some(acting_user);
            updated.notes = notes.clone().or(row.notes);
            updated.updated_at = now;
            tx.update_laundry(&updated, LaundryStatus::Washed).await?;

            registry::relocate(&mut tx, &item, status, room_id).await?;
            ledger::record(
                &mut tx,
                item.id,
                None,
                room_id,
                MovementType::Entry,
                acting_user,
                notes.clone(),
            )
            .await?;

            delivered.push(updated);
        }
        if delivered.is_empty() {
            return Err(AppError::PartialSelection("washed laundry"));
        }
        tx.commit().await?;

        log::info!("delivered {} laundry rows to {:?}", delivered.len(), destination);
        Ok(DeliverOutcome { delivered: delivered.len(), destination, laundry: delivered })
    }

    pub async fn list(&self, status: Option<LaundryStatus>) -> Result<Vec<Laundry>, AppError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_laundry(status).await?)
    }
}
