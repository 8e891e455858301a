//! Reference data: linen types and rooms.

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    CreateLinenType, CreateRoom, LinenType, Room, RoomFilter, RoomStatus, UpdateLinenType,
    UpdateRoom,
};
use crate::store::{Store, StoreTx};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct CatalogService<S> {
    store: S,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_linen_type(&self, input: CreateLinenType) -> Result<LinenType, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        let min_stock = input.min_stock.unwrap_or(0);
        if min_stock < 0 {
            return Err(AppError::validation("Minimum stock cannot be negative"));
        }

        let now = Utc::now();
        let linen_type = LinenType {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            category: input.category,
            unit: non_empty(input.unit).unwrap_or_else(|| "unit".to_string()),
            min_stock,
            image_url: non_empty(input.image_url),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.store.begin().await?;
        tx.insert_linen_type(&linen_type).await?;
        tx.commit().await?;

        log::info!("created linen type {} ({})", linen_type.name, linen_type.id);
        Ok(linen_type)
    }

    pub async fn update_linen_type(
        &self,
        id: Uuid,
        input: UpdateLinenType,
    ) -> Result<LinenType, AppError> {
        let mut tx = self.store.begin().await?;
        let mut linen_type = tx
            .linen_type(id)
            .await?
            .ok_or(AppError::NotFound("Linen type"))?;

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Name is required"));
            }
            linen_type.name = name;
        }
        if let Some(description) = input.description {
            linen_type.description = Some(description);
        }
        if let Some(category) = input.category {
            linen_type.category = category;
        }
        if let Some(unit) = non_empty(input.unit) {
            linen_type.unit = unit;
        }
        if let Some(min_stock) = input.min_stock {
            if min_stock < 0 {
                return Err(AppError::validation("Minimum stock cannot be negative"));
            }
            linen_type.min_stock = min_stock;
        }
        if let Some(image_url) = input.image_url {
            linen_type.image_url = non_empty(Some(image_url));
        }
        linen_type.updated_at = Utc::now();

        tx.update_linen_type(&linen_type).await?;
        tx.commit().await?;
        Ok(linen_type)
    }

    pub async fn linen_types(&self) -> Result<Vec<LinenType>, AppError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_linen_types().await?)
    }

    pub async fn create_room(&self, input: CreateRoom) -> Result<Room, AppError> {
        if input.number.trim().is_empty() {
            return Err(AppError::validation("Room number is required"));
        }
        if input.floor < 0 || input.capacity <= 0 {
            return Err(AppError::validation("Floor and capacity must be positive"));
        }

        let mut tx = self.store.begin().await?;
        if tx.room_by_number(&input.number).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A room with number {} already exists",
                input.number
            )));
        }

        let now = Utc::now();
        let room = Room {
            id: Uuid::new_v4(),
            number: input.number,
            floor: input.floor,
            block: non_empty(input.block),
            room_type: input.room_type,
            status: RoomStatus::Available,
            capacity: input.capacity,
            description: input.description,
            created_at: now,
            updated_at: now,
        };
        tx.insert_room(&room).await?;
        tx.commit().await?;

        log::info!("created room {} ({})", room.number, room.id);
        Ok(room)
    }

    pub async fn update_room(&self, id: Uuid, input: UpdateRoom) -> Result<Room, AppError> {
        let mut tx = self.store.begin().await?;
        let mut room = tx.room(id).await?.ok_or(AppError::NotFound("Room"))?;

        if let Some(number) = input.number {
            if number.trim().is_empty() {
                return Err(AppError::validation("Room number is required"));
            }
            room.number = number;
        }
        if let Some(floor) = input.floor {
            room.floor = floor;
        }
        if let Some(block) = input.block {
            room.block = non_empty(Some(block));
        }
        if let Some(room_type) = input.room_type {
            room.room_type = room_type;
        }
        if let Some(capacity) = input.capacity {
            if capacity <= 0 {
                return Err(AppError::validation("Capacity must be positive"));
            }
            room.capacity = capacity;
        }
        if let Some(description) = input.description {
            room.description = Some(description);
        }
        room.updated_at = Utc::now();

        tx.update_room(&room).await?;
        tx.commit().await?;
        Ok(room)
    }

    pub async fn update_room_status(&self, id: Uuid, status: RoomStatus) -> Result<Room, AppError> {
        let mut tx = self.store.begin().await?;
        let mut room = tx.room(id).await?.ok_or(AppError::NotFound("Room"))?;
        room.status = status;
        room.updated_at = Utc::now();
        tx.update_room(&room).await?;
        tx.commit().await?;

        log::info!("room {} is now {:?}", room.number, status);
        Ok(room)
    }

    pub async fn room(&self, id: Uuid) -> Result<Room, AppError> {
        let mut tx = self.store.begin().await?;
        tx.room(id).await?.ok_or(AppError::NotFound("Room"))
    }

    pub async fn rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, AppError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_rooms(filter).await?)
    }
}
