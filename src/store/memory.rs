//! In-memory store used by the test suites.
//!
//! A transaction holds the store lock for its whole lifetime and works on a
//! private copy of the tables, so transactions are fully serialized and an
//! uncommitted transaction leaves no trace. The same uniqueness rules as the
//! PostgreSQL schema are enforced on insert.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::error::StoreError;
use crate::models::{
    ChecklistItem, ChecklistStatus, Laundry, LaundryStatus, LinenItem, LinenItemFilter,
    LinenMovement, LinenStatus, LinenType, MovementFilter, Room, RoomCleaningChecklist,
    RoomFilter, RoomLinenConfig, RoomType,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    linen_types: Vec<LinenType>,
    rooms: Vec<Room>,
    room_linen_config: Vec<RoomLinenConfig>,
    linen_items: Vec<LinenItem>,
    movements: Vec<LinenMovement>,
    laundry: Vec<Laundry>,
    checklists: Vec<RoomCleaningChecklist>,
    checklist_items: Vec<ChecklistItem>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx { guard, working })
    }
}

fn replace<T, F>(rows: &mut [T], matches: F, row: &T, what: &str) -> Result<(), StoreError>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    match rows.iter_mut().find(|r| matches(r)) {
        Some(slot) => {
            *slot = row.clone();
            Ok(())
        }
        None => Err(StoreError::Conflict(format!("{} no longer exists", what))),
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(self) -> Result<(), StoreError> {
        let MemoryTx { mut guard, working } = self;
        *guard = working;
        Ok(())
    }

    async fn insert_linen_type(&mut self, linen_type: &LinenType) -> Result<(), StoreError> {
        self.working.linen_types.push(linen_type.clone());
        Ok(())
    }

    async fn update_linen_type(&mut self, linen_type: &LinenType) -> Result<(), StoreError> {
        replace(
            &mut self.working.linen_types,
            |t| t.id == linen_type.id,
            linen_type,
            "linen type",
        )
    }

    async fn linen_type(&mut self, id: Uuid) -> Result<Option<LinenType>, StoreError> {
        Ok(self.working.linen_types.iter().find(|t| t.id == id).cloned())
    }

    async fn list_linen_types(&mut self) -> Result<Vec<LinenType>, StoreError> {
        let mut types = self.working.linen_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    async fn insert_room(&mut self, room: &Room) -> Result<(), StoreError> {
        if self.working.rooms.iter().any(|r| r.number == room.number) {
            return Err(StoreError::Conflict(format!("room number {} is taken", room.number)));
        }
        self.working.rooms.push(room.clone());
        Ok(())
    }

    async fn update_room(&mut self, room: &Room) -> Result<(), StoreError> {
        if self
            .working
            .rooms
            .iter()
            .any(|r| r.id != room.id && r.number == room.number)
        {
            return Err(StoreError::Conflict(format!("room number {} is taken", room.number)));
        }
        replace(&mut self.working.rooms, |r| r.id == room.id, room, "room")
    }

    async fn room(&mut self, id: Uuid) -> Result<Option<Room>, StoreError> {
        Ok(self.working.rooms.iter().find(|r| r.id == id).cloned())
    }

    async fn room_by_number(&mut self, number: &str) -> Result<Option<Room>, StoreError> {
        Ok(self.working.rooms.iter().find(|r| r.number == number).cloned())
    }

    async fn list_rooms(&mut self, filter: &RoomFilter) -> Result<Vec<Room>, StoreError> {
        let mut rooms: Vec<Room> = self
            .working
            .rooms
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        rooms.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(rooms)
    }

    async fn room_linen_config(
        &mut self,
        room_type: RoomType,
    ) -> Result<Vec<RoomLinenConfig>, StoreError> {
        Ok(self
            .working
            .room_linen_config
            .iter()
            .filter(|c| c.room_type == room_type)
            .cloned()
            .collect())
    }

    async fn upsert_room_linen_config(
        &mut self,
        config: &RoomLinenConfig,
    ) -> Result<RoomLinenConfig, StoreError> {
        let existing = self
            .working
            .room_linen_config
            .iter_mut()
            .find(|c| c.room_type == config.room_type && c.linen_type_id == config.linen_type_id);
        match existing {
            Some(row) => {
                row.quantity = config.quantity;
                row.updated_at = config.updated_at;
                Ok(row.clone())
            }
            None => {
                self.working.room_linen_config.push(config.clone());
                Ok(config.clone())
            }
        }
    }

    async fn insert_linen_item(&mut self, item: &LinenItem) -> Result<(), StoreError> {
        self.working.linen_items.push(item.clone());
        Ok(())
    }

    async fn linen_item(&mut self, id: Uuid) -> Result<Option<LinenItem>, StoreError> {
        Ok(self.working.linen_items.iter().find(|i| i.id == id).cloned())
    }

    async fn linen_items_by_ids(&mut self, ids: &[Uuid]) -> Result<Vec<LinenItem>, StoreError> {
        Ok(self
            .working
            .linen_items
            .iter()
            .filter(|i| ids.contains(&i.id))
            .cloned()
            .collect())
    }

    async fn linen_items_in_room(&mut self, room_id: Uuid) -> Result<Vec<LinenItem>, StoreError> {
        Ok(self
            .working
            .linen_items
            .iter()
            .filter(|i| i.room_id == Some(room_id))
            .cloned()
            .collect())
    }

    async fn list_linen_items(
        &mut self,
        filter: &LinenItemFilter,
    ) -> Result<Vec<LinenItem>, StoreError> {
        Ok(self
            .working
            .linen_items
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn update_linen_item(
        &mut self,
        item: &LinenItem,
        expected: LinenStatus,
    ) -> Result<(), StoreError> {
        replace(
            &mut self.working.linen_items,
            |i| i.id == item.id && i.status == expected,
            item,
            "linen item in the expected status",
        )
    }

    async fn insert_movement(&mut self, movement: &LinenMovement) -> Result<(), StoreError> {
        self.working.movements.push(movement.clone());
        Ok(())
    }

    async fn list_movements(
        &mut self,
        filter: &MovementFilter,
    ) -> Result<Vec<LinenMovement>, StoreError> {
        // Reverse first so equal timestamps keep newest-first order after the stable sort.
        let mut movements: Vec<LinenMovement> = self
            .working
            .movements
            .iter()
            .rev()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        movements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        movements.truncate(usize::try_from(filter.limit()).unwrap_or(usize::MAX));
        Ok(movements)
    }

    async fn insert_laundry(&mut self, laundry: &Laundry) -> Result<(), StoreError> {
        let open = self
            .working
            .laundry
            .iter()
            .any(|l| l.linen_item_id == laundry.linen_item_id && l.status.is_open());
        if open && laundry.status.is_open() {
            return Err(StoreError::Conflict(format!(
                "linen item {} already has an open laundry cycle",
                laundry.linen_item_id
            )));
        }
        self.working.laundry.push(laundry.clone());
        Ok(())
    }

    async fn open_laundry_for_item(
        &mut self,
        linen_item_id: Uuid,
    ) -> Result<Option<Laundry>, StoreError> {
        Ok(self
            .working
            .laundry
            .iter()
            .find(|l| l.linen_item_id == linen_item_id && l.status.is_open())
            .cloned())
    }

    async fn laundry_by_ids(
        &mut self,
        ids: &[Uuid],
        status: LaundryStatus,
    ) -> Result<Vec<Laundry>, StoreError> {
        Ok(self
            .working
            .laundry
            .iter()
            .filter(|l| ids.contains(&l.id) && l.status == status)
            .cloned()
            .collect())
    }

    async fn update_laundry(
        &mut self,
        laundry: &Laundry,
        expected: LaundryStatus,
    ) -> Result<(), StoreError> {
        replace(
            &mut self.working.laundry,
            |l| l.id == laundry.id && l.status == expected,
            laundry,
            "laundry row in the expected status",
        )
    }

    async fn list_laundry(
        &mut self,
        status: Option<LaundryStatus>,
    ) -> Result<Vec<Laundry>, StoreError> {
        let mut rows: Vec<Laundry> = self
            .working
            .laundry
            .iter()
            .filter(|l| status.map_or(true, |s| l.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.collected_at.cmp(&b.collected_at));
        Ok(rows)
    }

    async fn insert_checklist(
        &mut self,
        checklist: &RoomCleaningChecklist,
    ) -> Result<(), StoreError> {
        let busy = self.working.checklists.iter().any(|c| {
            c.room_id == checklist.room_id && c.status == ChecklistStatus::InProgress
        });
        if busy && checklist.status == ChecklistStatus::InProgress {
            return Err(StoreError::Conflict(format!(
                "room {} already has a checklist in progress",
                checklist.room_id
            )));
        }
        self.working.checklists.push(checklist.clone());
        Ok(())
    }

    async fn update_checklist(
        &mut self,
        checklist: &RoomCleaningChecklist,
    ) -> Result<(), StoreError> {
        replace(
            &mut self.working.checklists,
            |c| c.id == checklist.id,
            checklist,
            "checklist",
        )
    }

    async fn checklist(&mut self, id: Uuid) -> Result<Option<RoomCleaningChecklist>, StoreError> {
        Ok(self.working.checklists.iter().find(|c| c.id == id).cloned())
    }

    async fn checklist_in_progress(
        &mut self,
        room_id: Uuid,
    ) -> Result<Option<RoomCleaningChecklist>, StoreError> {
        Ok(self
            .working
            .checklists
            .iter()
            .find(|c| c.room_id == room_id && c.status == ChecklistStatus::InProgress)
            .cloned())
    }

    async fn insert_checklist_items(&mut self, items: &[ChecklistItem]) -> Result<(), StoreError> {
        self.working.checklist_items.extend_from_slice(items);
        Ok(())
    }

    async fn update_checklist_item(&mut self, item: &ChecklistItem) -> Result<(), StoreError> {
        replace(
            &mut self.working.checklist_items,
            |i| i.id == item.id,
            item,
            "checklist item",
        )
    }

    async fn checklist_item(&mut self, id: Uuid) -> Result<Option<ChecklistItem>, StoreError> {
        Ok(self.working.checklist_items.iter().find(|i| i.id == id).cloned())
    }

    async fn checklist_items(
        &mut self,
        checklist_id: Uuid,
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        Ok(self
            .working
            .checklist_items
            .iter()
            .filter(|i| i.checklist_id == checklist_id)
            .cloned()
            .collect())
    }
}
