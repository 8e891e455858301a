use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "laundry_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LaundryStatus {
    Collected,
    Washing,
    Washed,
    Delivered,
}

impl LaundryStatus {
    pub fn is_open(self) -> bool {
        self != LaundryStatus::Delivered
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Laundry {
    pub id: Uuid,
    pub linen_item_id: Uuid,
    pub status: LaundryStatus,
    pub collected_at: DateTime<Utc>,
    pub washed_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub collected_by: Uuid,
    pub washed_by: Option<Uuid>,
    pub delivered_by: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Laundry {
    pub fn collected(linen_item_id: Uuid, collected_by: Uuid, notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            linen_item_id,
            status: LaundryStatus::Collected,
            collected_at: now,
            washed_at: None,
            delivered_at: None,
            collected_by,
            washed_by: None,
            delivered_by: None,
            notes,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Where washed linen is delivered: back to stock or into a room.
///
/// On the wire this is either the literal `"STOCK"` or a room id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Stock,
    Room(Uuid),
}

impl Destination {
    pub const STOCK: &'static str = "STOCK";

    pub fn room_id(self) -> Option<Uuid> {
        match self {
            Destination::Stock => None,
            Destination::Room(id) => Some(id),
        }
    }
}

impl Serialize for Destination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Destination::Stock => serializer.serialize_str(Self::STOCK),
            Destination::Room(id) => serializer.serialize_str(&id.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Destination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.eq_ignore_ascii_case(Self::STOCK) {
            return Ok(Destination::Stock);
        }
        Uuid::parse_str(&raw)
            .map(Destination::Room)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_parses_stock_sentinel_and_room_ids() {
        let stock: Destination = serde_json::from_str("\"STOCK\"").unwrap();
        assert_eq!(stock, Destination::Stock);

        let id = Uuid::new_v4();
        let room: Destination = serde_json::from_str(&format!("\"{}\"", id)).unwrap();
        assert_eq!(room, Destination::Room(id));
        assert_eq!(room.room_id(), Some(id));

        assert!(serde_json::from_str::<Destination>("\"laundry\"").is_err());
    }
}
