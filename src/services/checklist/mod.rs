//! Room cleaning checklists.
//!
//! A checklist reconciles what a room should hold (its linen configuration)
//! with what the cleaner actually finds. Per-item outcomes and completion
//! push their consequences into the registry, the ledger and the laundry
//! pipeline inside the same transaction.

mod seed;

pub use seed::{plan_seed, SeedEntry};

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::laundry::send_to_wash;
use super::ledger;
use super::registry::{load_item, relocate};
use crate::error::{AppError, StoreError};
use crate::models::{
    ChecklistDetail, ChecklistItem, ChecklistItemStatus, ChecklistStatus, CompletedChecklist,
    CompletionWarnings, InitializeOutcome, LinenItem, LinenStatus, MovementType,
    RoomCleaningChecklist, RoomStatus, StartedChecklist,
};
use crate::store::{Store, StoreTx};

const DIRTY_NOTE: &str = "Item marked dirty during cleaning";
const COLLECTED_ON_COMPLETION_NOTE: &str = "Item collected when cleaning was completed";
const DAMAGED_NOTE: &str = "Item damaged during cleaning";
const REPLACEMENT_NOTE: &str = "Replacement during cleaning";
const ADDED_NOTE: &str = "Added during cleaning";

/// Observed outcome for one checklist entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateChecklistItem {
    pub item_id: Uuid,
    pub status: ChecklistItemStatus,
    pub condition_notes: Option<String>,
    pub replacement_item_id: Option<Uuid>,
}

fn ensure_open(checklist: &RoomCleaningChecklist) -> Result<(), AppError> {
    match checklist.status {
        ChecklistStatus::Completed => Err(AppError::invalid_state("Checklist is already completed")),
        ChecklistStatus::Cancelled => Err(AppError::invalid_state("Checklist was cancelled")),
        ChecklistStatus::Pending | ChecklistStatus::InProgress => Ok(()),
    }
}

fn ensure_in_circulation(item: &LinenItem) -> Result<(), AppError> {
    if item.status == LinenStatus::Discarded {
        return Err(AppError::invalid_state(format!(
            "Linen item {} has been discarded",
            item.id
        )));
    }
    Ok(())
}

async fn load_checklist<T: StoreTx>(
    tx: &mut T,
    id: Uuid,
) -> Result<RoomCleaningChecklist, AppError> {
    tx.checklist(id).await?.ok_or(AppError::NotFound("Checklist"))
}

#[derive(Clone)]
pub struct ChecklistService<S> {
    store: S,
}

impl<S: Store> ChecklistService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Opens a cleaning session for the room, or returns the one in progress.
    pub async fn start(&self, room_id: Uuid, acting_user: Uuid) -> Result<StartedChecklist, AppError> {
        let mut tx = self.store.begin().await?;
        let room = tx.room(room_id).await?.ok_or(AppError::NotFound("Room"))?;
        let room_config = tx.room_linen_config(room.room_type).await?;

        if let Some(checklist) = tx.checklist_in_progress(room_id).await? {
            return Ok(StartedChecklist { checklist, room_config, created: false });
        }

        let now = Utc::now();
        let checklist = RoomCleaningChecklist {
            id: Uuid::new_v4(),
            room_id,
            user_id: acting_user,
            status: ChecklistStatus::InProgress,
            started_at: now,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };

        let inserted = tx.insert_checklist(&checklist).await;
        match inserted {
            Ok(()) => {
                tx.commit().await?;
                log::info!("started checklist {} for room {}", checklist.id, room.number);
                Ok(StartedChecklist { checklist, room_config, created: true })
            }
            Err(StoreError::Conflict(_)) => {
                // Lost the race against a concurrent start; hand back the winner.
                drop(tx);
                let mut tx = self.store.begin().await?;
                let checklist = tx
                    .checklist_in_progress(room_id)
                    .await?
                    .ok_or(AppError::NotFound("Checklist"))?;
                Ok(StartedChecklist { checklist, room_config, created: false })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Seeds the checklist from the room's contents and configuration.
    ///
    /// Only entries not yet represented are created, so repeated calls
    /// converge on the same set.
    pub async fn initialize(
        &self,
        checklist_id: Uuid,
        room_id: Uuid,
    ) -> Result<InitializeOutcome, AppError> {
        let mut tx = self.store.begin().await?;
        let checklist = load_checklist(&mut tx, checklist_id).await?;
        let room = tx.room(room_id).await?.ok_or(AppError::NotFound("Room"))?;
        if checklist.room_id != room.id {
            return Err(AppError::validation("Checklist does not belong to this room"));
        }
        ensure_open(&checklist)?;

        let existing = tx.checklist_items(checklist.id).await?;
        let room_items = tx.linen_items_in_room(room.id).await?;
        let requirements = tx.room_linen_config(room.room_type).await?;

        let now = Utc::now();
        let created: Vec<ChecklistItem> = plan_seed(&existing, &room_items, &requirements)
            .into_iter()
            .map(|entry| ChecklistItem {
                id: Uuid::new_v4(),
                checklist_id: checklist.id,
                linen_item_id: entry.linen_item_id,
                linen_type_id: entry.linen_type_id,
                status: entry.status,
                condition_notes: None,
                replacement_item_id: None,
                created_at: now,
                updated_at: now,
            })
            .collect();

        if !created.is_empty() {
            tx.insert_checklist_items(&created).await?;
            tx.commit().await?;
            log::info!(
                "seeded {} entries into checklist {} (room {})",
                created.len(),
                checklist.id,
                room.number
            );
        }

        Ok(InitializeOutcome {
            items_created: created.len(),
            current_items_count: room_items.len(),
            existing_items_count: existing.len(),
        })
    }

    /// Records the observed outcome of one entry and applies it to the item.
    pub async fn update_item(
        &self,
        input: UpdateChecklistItem,
        acting_user: Uuid,
    ) -> Result<ChecklistItem, AppError> {
        let mut tx = self.store.begin().await?;
        let mut entry = tx
            .checklist_item(input.item_id)
            .await?
            .ok_or(AppError::NotFound("Checklist item"))?;
        let checklist = load_checklist(&mut tx, entry.checklist_id).await?;
        ensure_open(&checklist)?;

        let room_id = checklist.room_id;
        let notes = input.condition_notes.clone();

        match (input.status, entry.linen_item_id) {
            (ChecklistItemStatus::Replaced, linked) => {
                let replacement_id = input.replacement_item_id.ok_or_else(|| {
                    AppError::invalid_state("A replacement item is required to mark an entry replaced")
                })?;
                if linked == Some(replacement_id) {
                    return Err(AppError::validation(
                        "The replacement must be a different item",
                    ));
                }
                let replacement = tx
                    .linen_item(replacement_id)
                    .await?
                    .ok_or(AppError::NotFound("Replacement item"))?;
                if matches!(replacement.status, LinenStatus::Discarded | LinenStatus::InWash) {
                    return Err(AppError::invalid_state(format!(
                        "A {} item cannot be used as a replacement",
                        replacement.status
                    )));
                }

                if let Some(original_id) = linked {
                    let original = load_item(&mut tx, original_id).await?;
                    if original.status == LinenStatus::InWash {
                        return Err(AppError::invalid_state(format!(
                            "Linen item {} is in the wash and cannot be replaced",
                            original.id
                        )));
                    }
                    if original.status != LinenStatus::Discarded {
                        relocate(&mut tx, &original, LinenStatus::Damaged, None).await?;
                        ledger::record(
                            &mut tx,
                            original.id,
                            Some(room_id),
                            None,
                            MovementType::Discard,
                            acting_user,
                            Some(DAMAGED_NOTE.to_string()),
                        )
                        .await?;
                    }
                }

                relocate(&mut tx, &replacement, LinenStatus::Clean, Some(room_id)).await?;
                ledger::record(
                    &mut tx,
                    replacement.id,
                    None,
                    Some(room_id),
                    MovementType::Entry,
                    acting_user,
                    Some(REPLACEMENT_NOTE.to_string()),
                )
                .await?;

                entry.linen_item_id = Some(replacement.id);
                entry.replacement_item_id = Some(replacement.id);
            }
            (ChecklistItemStatus::Absent, Some(item_id)) => {
                let item = load_item(&mut tx, item_id).await?;
                ensure_in_circulation(&item)?;
                relocate(&mut tx, &item, LinenStatus::Dirty, None).await?;
                entry.replacement_item_id = None;
            }
            (ChecklistItemStatus::Damaged, Some(item_id)) => {
                let item = load_item(&mut tx, item_id).await?;
                ensure_in_circulation(&item)?;
                relocate(&mut tx, &item, LinenStatus::Damaged, item.room_id).await?;
                entry.replacement_item_id = None;
            }
            (ChecklistItemStatus::Dirty, Some(item_id)) => {
                let item = load_item(&mut tx, item_id).await?;
                ensure_in_circulation(&item)?;
                let note = notes.clone().unwrap_or_else(|| DIRTY_NOTE.to_string());
                send_to_wash(&mut tx, &item, Some(room_id), acting_user, Some(note)).await?;
                entry.replacement_item_id = None;
            }
            (ChecklistItemStatus::Damaged | ChecklistItemStatus::Dirty, None) => {
                return Err(AppError::invalid_state(
                    "Entry has no linen item to mark; add one to the checklist first",
                ));
            }
            (ChecklistItemStatus::Present | ChecklistItemStatus::Absent, _) => {
                entry.replacement_item_id = None;
            }
        }

        entry.status = input.status;
        entry.condition_notes = notes;
        entry.updated_at = Utc::now();
        tx.update_checklist_item(&entry).await?;
        tx.commit().await?;

        log::info!(
            "checklist {} entry {} marked {:?}",
            checklist.id,
            entry.id,
            entry.status
        );
        Ok(entry)
    }

    /// Closes the session, sweeping dirty and damaged items out of the room.
    pub async fn complete(
        &self,
        checklist_id: Uuid,
        notes: Option<String>,
        acting_user: Uuid,
    ) -> Result<CompletedChecklist, AppError> {
        let mut tx = self.store.begin().await?;
        let mut checklist = load_checklist(&mut tx, checklist_id).await?;
        ensure_open(&checklist)?;

        let entries = tx.checklist_items(checklist.id).await?;
        let count = |status: ChecklistItemStatus| entries.iter().filter(|e| e.status == status).count();
        let missing = count(ChecklistItemStatus::Absent);
        let damaged = count(ChecklistItemStatus::Damaged);
        let dirty = count(ChecklistItemStatus::Dirty);

        for entry in entries.iter().filter(|e| e.status == ChecklistItemStatus::Dirty) {
            let Some(item_id) = entry.linen_item_id else { continue };
            let Some(item) = tx.linen_item(item_id).await? else { continue };
            if item.room_id.is_none() || item.status == LinenStatus::Discarded {
                continue;
            }
            let note = entry
                .condition_notes
                .clone()
                .unwrap_or_else(|| COLLECTED_ON_COMPLETION_NOTE.to_string());
            send_to_wash(&mut tx, &item, Some(checklist.room_id), acting_user, Some(note)).await?;
        }

        for entry in entries.iter().filter(|e| e.status == ChecklistItemStatus::Damaged) {
            let Some(item_id) = entry.linen_item_id else { continue };
            let Some(item) = tx.linen_item(item_id).await? else { continue };
            if item.status == LinenStatus::Discarded {
                continue;
            }
            relocate(&mut tx, &item, LinenStatus::Damaged, None).await?;
            ledger::record(
                &mut tx,
                item.id,
                Some(checklist.room_id),
                None,
                MovementType::Discard,
                acting_user,
                Some(
                    entry
                        .condition_notes
                        .clone()
                        .unwrap_or_else(|| DAMAGED_NOTE.to_string()),
                ),
            )
            .await?;
        }

        let now = Utc::now();
        checklist.status = ChecklistStatus::Completed;
        checklist.completed_at = Some(now);
        checklist.notes = notes;
        checklist.updated_at = now;
        tx.update_checklist(&checklist).await?;

        let room_released = missing == 0 && damaged == 0 && dirty == 0;
        if room_released {
            let mut room = tx
                .room(checklist.room_id)
                .await?
                .ok_or(AppError::NotFound("Room"))?;
            room.status = RoomStatus::Available;
            room.updated_at = now;
            tx.update_room(&room).await?;
        }
        tx.commit().await?;

        log::info!(
            "completed checklist {} ({} missing, {} damaged, {} dirty, room released: {})",
            checklist.id,
            missing,
            damaged,
            dirty,
            room_released
        );
        Ok(CompletedChecklist {
            checklist,
            warnings: CompletionWarnings { missing_items: missing, damaged_items: damaged },
            room_released,
        })
    }

    /// Fills an absent entry of the given type with a physical item brought into the room.
    pub async fn add_item(
        &self,
        checklist_id: Uuid,
        linen_type_id: Uuid,
        linen_item_id: Uuid,
        acting_user: Uuid,
    ) -> Result<ChecklistItem, AppError> {
        let mut tx = self.store.begin().await?;
        let checklist = load_checklist(&mut tx, checklist_id).await?;
        ensure_open(&checklist)?;

        let entries = tx.checklist_items(checklist.id).await?;
        if entries.iter().any(|e| e.linen_item_id == Some(linen_item_id)) {
            return Err(AppError::validation(
                "Linen item is already on this checklist",
            ));
        }
        // Unlinked placeholders go first.
        let mut entry = entries
            .iter()
            .filter(|e| e.linen_type_id == linen_type_id && e.status == ChecklistItemStatus::Absent)
            .min_by_key(|e| e.linen_item_id.is_some())
            .cloned()
            .ok_or(AppError::NotFound("Checklist item"))?;

        let item = load_item(&mut tx, linen_item_id).await?;
        if item.linen_type_id != linen_type_id {
            return Err(AppError::validation("Linen item is of a different type"));
        }
        if matches!(item.status, LinenStatus::Discarded | LinenStatus::InWash) {
            return Err(AppError::invalid_state(format!(
                "A {} item cannot be placed in a room",
                item.status
            )));
        }

        relocate(&mut tx, &item, LinenStatus::Clean, Some(checklist.room_id)).await?;
        ledger::record(
            &mut tx,
            item.id,
            None,
            Some(checklist.room_id),
            MovementType::Entry,
            acting_user,
            Some(ADDED_NOTE.to_string()),
        )
        .await?;

        entry.linen_item_id = Some(item.id);
        entry.status = ChecklistItemStatus::Present;
        entry.updated_at = Utc::now();
        tx.update_checklist_item(&entry).await?;
        tx.commit().await?;

        log::info!("added linen item {} to checklist {}", item.id, checklist.id);
        Ok(entry)
    }

    pub async fn get(&self, checklist_id: Uuid) -> Result<ChecklistDetail, AppError> {
        let mut tx = self.store.begin().await?;
        let checklist = load_checklist(&mut tx, checklist_id).await?;
        let items = tx.checklist_items(checklist.id).await?;
        let current_room_items = tx.linen_items_in_room(checklist.room_id).await?;
        Ok(ChecklistDetail { checklist, items, current_room_items })
    }

    pub async fn in_progress_for_room(
        &self,
        room_id: Uuid,
    ) -> Result<Option<RoomCleaningChecklist>, AppError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.checklist_in_progress(room_id).await?)
    }
}
