use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Entry,
    Exit,
    Wash,
    Discard,
    Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinenMovement {
    pub id: Uuid,
    pub linen_item_id: Uuid,
    pub from_room_id: Option<Uuid>,
    pub to_room_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub user_id: Uuid,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    pub movement_type: Option<MovementType>,
    /// Matches either endpoint of the movement.
    pub room_id: Option<Uuid>,
    pub limit: Option<i64>,
}

impl MovementFilter {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.filter(|l| *l > 0).unwrap_or(Self::DEFAULT_LIMIT)
    }

    pub fn matches(&self, movement: &LinenMovement) -> bool {
        let type_ok = self.movement_type.map_or(true, |t| movement.movement_type == t);
        let room_ok = self.room_id.map_or(true, |room| {
            movement.from_room_id == Some(room) || movement.to_room_id == Some(room)
        });
        type_ok && room_ok
    }
}
