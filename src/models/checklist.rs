use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::{LinenItem, RoomLinenConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cleaning_checklist_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "checklist_item_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItemStatus {
    Present,
    Absent,
    Damaged,
    Replaced,
    Dirty,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomCleaningChecklist {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub status: ChecklistStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One expected-or-observed linen slot of a checklist.
///
/// `linen_item_id` is `None` for placeholders seeded from the room
/// configuration that have not been matched to a physical item.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub checklist_id: Uuid,
    pub linen_item_id: Option<Uuid>,
    pub linen_type_id: Uuid,
    pub status: ChecklistItemStatus,
    pub condition_notes: Option<String>,
    pub replacement_item_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StartedChecklist {
    pub checklist: RoomCleaningChecklist,
    pub room_config: Vec<RoomLinenConfig>,
    /// False when an in-progress checklist already existed and was returned.
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct ChecklistDetail {
    pub checklist: RoomCleaningChecklist,
    pub items: Vec<ChecklistItem>,
    pub current_room_items: Vec<LinenItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InitializeOutcome {
    pub items_created: usize,
    pub current_items_count: usize,
    pub existing_items_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionWarnings {
    pub missing_items: usize,
    pub damaged_items: usize,
}

#[derive(Debug, Serialize)]
pub struct CompletedChecklist {
    pub checklist: RoomCleaningChecklist,
    pub warnings: CompletionWarnings,
    pub room_released: bool,
}
