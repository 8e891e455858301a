pub mod catalog;
pub mod checklist;
pub mod laundry;
pub mod ledger;
pub mod registry;
pub mod room_config;

pub use catalog::CatalogService;
pub use checklist::{ChecklistService, UpdateChecklistItem};
pub use laundry::{CollectOutcome, DeliverOutcome, LaundryService, WashOutcome};
pub use ledger::LedgerService;
pub use registry::RegistryService;
pub use room_config::RoomConfigService;

#[cfg(test)]
pub(crate) mod fixtures {
    //! Row builders that bypass the services to set up test state directly.

    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::{
        Laundry, LinenCategory, LinenCondition, LinenItem, LinenMovement, LinenStatus, LinenType,
        MovementFilter, Room, RoomLinenConfig, RoomStatus, RoomType,
    };
    use crate::store::{MemoryStore, Store, StoreTx};

    pub async fn linen_type(store: &MemoryStore, name: &str) -> LinenType {
        let now = Utc::now();
        let linen_type = LinenType {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            category: LinenCategory::Bed,
            unit: "unit".to_string(),
            min_stock: 0,
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        let mut tx = store.begin().await.unwrap();
        tx.insert_linen_type(&linen_type).await.unwrap();
        tx.commit().await.unwrap();
        linen_type
    }

    pub async fn room(store: &MemoryStore, number: &str, room_type: RoomType) -> Room {
        let now = Utc::now();
        let room = Room {
            id: Uuid::new_v4(),
            number: number.to_string(),
            floor: 1,
            block: None,
            room_type,
            status: RoomStatus::Cleaning,
            capacity: 2,
            description: None,
            created_at: now,
            updated_at: now,
        };
        let mut tx = store.begin().await.unwrap();
        tx.insert_room(&room).await.unwrap();
        tx.commit().await.unwrap();
        room
    }

    pub async fn requirement(
        store: &MemoryStore,
        room_type: RoomType,
        linen_type_id: Uuid,
        quantity: i32,
    ) {
        let now = Utc::now();
        let config = RoomLinenConfig {
            id: Uuid::new_v4(),
            room_type,
            linen_type_id,
            quantity,
            created_at: now,
            updated_at: now,
        };
        let mut tx = store.begin().await.unwrap();
        tx.upsert_room_linen_config(&config).await.unwrap();
        tx.commit().await.unwrap();
    }

    pub async fn item(
        store: &MemoryStore,
        linen_type_id: Uuid,
        room_id: Option<Uuid>,
        status: LinenStatus,
    ) -> LinenItem {
        let now = Utc::now();
        let item = LinenItem {
            id: Uuid::new_v4(),
            linen_type_id,
            room_id,
            status,
            condition: LinenCondition::Excellent,
            description: None,
            purchase_date: None,
            supplier_tax_id: None,
            invoice_number: None,
            last_wash_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let mut tx = store.begin().await.unwrap();
        tx.insert_linen_item(&item).await.unwrap();
        tx.commit().await.unwrap();
        item
    }

    pub async fn item_row(store: &MemoryStore, id: Uuid) -> LinenItem {
        let mut tx = store.begin().await.unwrap();
        tx.linen_item(id).await.unwrap().unwrap()
    }

    pub async fn room_row(store: &MemoryStore, id: Uuid) -> Room {
        let mut tx = store.begin().await.unwrap();
        tx.room(id).await.unwrap().unwrap()
    }

    /// Every movement, oldest first.
    pub async fn movements(store: &MemoryStore) -> Vec<LinenMovement> {
        let mut tx = store.begin().await.unwrap();
        let filter = MovementFilter { limit: Some(i64::MAX), ..Default::default() };
        let mut rows = tx.list_movements(&filter).await.unwrap();
        rows.reverse();
        rows
    }

    pub async fn laundry(store: &MemoryStore) -> Vec<Laundry> {
        let mut tx = store.begin().await.unwrap();
        tx.list_laundry(None).await.unwrap()
    }

    pub async fn all_items(store: &MemoryStore) -> Vec<LinenItem> {
        let mut tx = store.begin().await.unwrap();
        tx.list_linen_items(&Default::default()).await.unwrap()
    }
}
