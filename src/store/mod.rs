//! Transactional storage seam for every service.
//!
//! A [`StoreTx`] is one atomic unit of work: nothing it writes is visible to
//! other transactions until [`StoreTx::commit`] returns, and dropping it
//! without committing discards every write.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{
    ChecklistItem, Laundry, LaundryStatus, LinenItem, LinenItemFilter, LinenMovement,
    LinenStatus, LinenType, MovementFilter, Room, RoomCleaningChecklist, RoomFilter,
    RoomLinenConfig, RoomType,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

#[async_trait]
pub trait StoreTx: Send {
    async fn commit(self) -> Result<(), StoreError>;

    async fn insert_linen_type(&mut self, linen_type: &LinenType) -> Result<(), StoreError>;
    async fn update_linen_type(&mut self, linen_type: &LinenType) -> Result<(), StoreError>;
    async fn linen_type(&mut self, id: Uuid) -> Result<Option<LinenType>, StoreError>;
    async fn list_linen_types(&mut self) -> Result<Vec<LinenType>, StoreError>;

    /// Fails with `Conflict` when the room number is taken.
    async fn insert_room(&mut self, room: &Room) -> Result<(), StoreError>;
    async fn update_room(&mut self, room: &Room) -> Result<(), StoreError>;
    async fn room(&mut self, id: Uuid) -> Result<Option<Room>, StoreError>;
    async fn room_by_number(&mut self, number: &str) -> Result<Option<Room>, StoreError>;
    async fn list_rooms(&mut self, filter: &RoomFilter) -> Result<Vec<Room>, StoreError>;

    async fn room_linen_config(
        &mut self,
        room_type: RoomType,
    ) -> Result<Vec<RoomLinenConfig>, StoreError>;
    /// Inserts or replaces the quantity for `(room_type, linen_type_id)`.
    async fn upsert_room_linen_config(
        &mut self,
        config: &RoomLinenConfig,
    ) -> Result<RoomLinenConfig, StoreError>;

    async fn insert_linen_item(&mut self, item: &LinenItem) -> Result<(), StoreError>;
    async fn linen_item(&mut self, id: Uuid) -> Result<Option<LinenItem>, StoreError>;
    async fn linen_items_by_ids(&mut self, ids: &[Uuid]) -> Result<Vec<LinenItem>, StoreError>;
    /// Items currently assigned to the room, oldest first.
    async fn linen_items_in_room(&mut self, room_id: Uuid) -> Result<Vec<LinenItem>, StoreError>;
    async fn list_linen_items(
        &mut self,
        filter: &LinenItemFilter,
    ) -> Result<Vec<LinenItem>, StoreError>;
    /// Writes `item` only if the stored row still carries `expected` status.
    async fn update_linen_item(
        &mut self,
        item: &LinenItem,
        expected: LinenStatus,
    ) -> Result<(), StoreError>;

    async fn insert_movement(&mut self, movement: &LinenMovement) -> Result<(), StoreError>;
    /// Newest first, truncated to the filter limit.
    async fn list_movements(
        &mut self,
        filter: &MovementFilter,
    ) -> Result<Vec<LinenMovement>, StoreError>;

    /// Fails with `Conflict` when the item already has an open laundry row.
    async fn insert_laundry(&mut self, laundry: &Laundry) -> Result<(), StoreError>;
    async fn open_laundry_for_item(
        &mut self,
        linen_item_id: Uuid,
    ) -> Result<Option<Laundry>, StoreError>;
    async fn laundry_by_ids(
        &mut self,
        ids: &[Uuid],
        status: LaundryStatus,
    ) -> Result<Vec<Laundry>, StoreError>;
    async fn update_laundry(
        &mut self,
        laundry: &Laundry,
        expected: LaundryStatus,
    ) -> Result<(), StoreError>;
    /// Oldest collection first.
    async fn list_laundry(
        &mut self,
        status: Option<LaundryStatus>,
    ) -> Result<Vec<Laundry>, StoreError>;

    /// Fails with `Conflict` when the room already has an in-progress checklist.
    async fn insert_checklist(&mut self, checklist: &RoomCleaningChecklist)
        -> Result<(), StoreError>;
    async fn update_checklist(&mut self, checklist: &RoomCleaningChecklist)
        -> Result<(), StoreError>;
    async fn checklist(&mut self, id: Uuid) -> Result<Option<RoomCleaningChecklist>, StoreError>;
    async fn checklist_in_progress(
        &mut self,
        room_id: Uuid,
    ) -> Result<Option<RoomCleaningChecklist>, StoreError>;

    async fn insert_checklist_items(&mut self, items: &[ChecklistItem]) -> Result<(), StoreError>;
    async fn update_checklist_item(&mut self, item: &ChecklistItem) -> Result<(), StoreError>;
    async fn checklist_item(&mut self, id: Uuid) -> Result<Option<ChecklistItem>, StoreError>;
    /// Items of one checklist in creation order.
    async fn checklist_items(
        &mut self,
        checklist_id: Uuid,
    ) -> Result<Vec<ChecklistItem>, StoreError>;
}
