use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Single,
    Double,
    Triple,
    Suite,
    Master,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
    Reserved,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: Uuid,
    pub number: String,
    pub floor: i32,
    pub block: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub status: RoomStatus,
    pub capacity: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Required quantity of one linen type for every room of a given type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomLinenConfig {
    pub id: Uuid,
    pub room_type: RoomType,
    pub linen_type_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub number: String,
    pub floor: i32,
    pub block: Option<String>,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub capacity: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoom {
    pub number: Option<String>,
    pub floor: Option<i32>,
    pub block: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,
    pub capacity: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    #[serde(rename = "type")]
    pub room_type: Option<RoomType>,
    pub floor: Option<i32>,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        self.status.map_or(true, |s| room.status == s)
            && self.room_type.map_or(true, |t| room.room_type == t)
            && self.floor.map_or(true, |f| room.floor == f)
    }
}
