use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{RoomLinenConfig, RoomType};
use crate::store::{Store, StoreTx};

#[derive(Clone)]
pub struct RoomConfigService<S> {
    store: S,
}

impl<S: Store> RoomConfigService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Required count of one linen type in a room type; zero when unconfigured.
    pub async fn required_quantity(
        &self,
        room_type: RoomType,
        linen_type_id: Uuid,
    ) -> Result<i32, AppError> {
        let requirements = self.all_requirements(room_type).await?;
        Ok(requirements
            .iter()
            .find(|c| c.linen_type_id == linen_type_id)
            .map_or(0, |c| c.quantity))
    }

    pub async fn all_requirements(
        &self,
        room_type: RoomType,
    ) -> Result<Vec<RoomLinenConfig>, AppError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.room_linen_config(room_type).await?)
    }

    pub async fn set_requirement(
        &self,
        room_type: RoomType,
        linen_type_id: Uuid,
        quantity: i32,
    ) -> Result<RoomLinenConfig, AppError> {
        if quantity < 0 {
            return Err(AppError::validation("Quantity cannot be negative"));
        }
        let mut tx = self.store.begin().await?;
        tx.linen_type(linen_type_id)
            .await?
            .ok_or(AppError::NotFound("Linen type"))?;

        let now = Utc::now();
        let config = RoomLinenConfig {
            id: Uuid::new_v4(),
            room_type,
            linen_type_id,
            quantity,
            created_at: now,
            updated_at: now,
        };
        let stored = tx.upsert_room_linen_config(&config).await?;
        tx.commit().await?;

        log::info!(
            "room type {:?} now requires {} of linen type {}",
            room_type,
            quantity,
            linen_type_id
        );
        Ok(stored)
    }
}
