use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "linen_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinenCategory {
    Bed,
    Bath,
    Table,
    Decor,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "linen_item_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinenStatus {
    Clean,
    Dirty,
    InWash,
    Damaged,
    Stocked,
    Discarded,
}

impl LinenStatus {
    /// Statuses that place the item outside of any room.
    pub fn forbids_room(self) -> bool {
        matches!(self, LinenStatus::InWash | LinenStatus::Stocked | LinenStatus::Discarded)
    }
}

impl std::fmt::Display for LinenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinenStatus::Clean => write!(f, "clean"),
            LinenStatus::Dirty => write!(f, "dirty"),
            LinenStatus::InWash => write!(f, "in_wash"),
            LinenStatus::Damaged => write!(f, "damaged"),
            LinenStatus::Stocked => write!(f, "stocked"),
            LinenStatus::Discarded => write!(f, "discarded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "linen_item_condition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinenCondition {
    Excellent,
    Good,
    Regular,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinenType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: LinenCategory,
    pub unit: String,
    pub min_stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LinenItem {
    pub id: Uuid,
    pub linen_type_id: Uuid,
    pub room_id: Option<Uuid>,
    pub status: LinenStatus,
    pub condition: LinenCondition,
    pub description: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub supplier_tax_id: Option<String>,
    pub invoice_number: Option<String>,
    pub last_wash_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinenItem {
    /// Whether the status/room pair describes a physically possible location.
    pub fn location_is_consistent(&self) -> bool {
        !(self.status.forbids_room() && self.room_id.is_some())
    }
}

/// Purchase and descriptive data supplied when an item is registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinenItemMetadata {
    pub description: Option<String>,
    pub purchase_date: Option<DateTime<Utc>>,
    pub supplier_tax_id: Option<String>,
    pub invoice_number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinenType {
    pub name: String,
    pub description: Option<String>,
    pub category: LinenCategory,
    pub unit: Option<String>,
    pub min_stock: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLinenType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<LinenCategory>,
    pub unit: Option<String>,
    pub min_stock: Option<i32>,
    // An empty string clears the stored image.
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinenItemFilter {
    pub linen_type_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub status: Option<LinenStatus>,
    pub search: Option<String>,
}

impl LinenItemFilter {
    pub fn matches(&self, item: &LinenItem) -> bool {
        if self.linen_type_id.is_some_and(|id| item.linen_type_id != id) {
            return false;
        }
        if self.room_id.is_some_and(|id| item.room_id != Some(id)) {
            return false;
        }
        if self.status.is_some_and(|status| item.status != status) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                item.id.to_string().contains(&needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}
