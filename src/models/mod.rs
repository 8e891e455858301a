pub mod checklist;
pub mod laundry;
pub mod linen;
pub mod movement;
pub mod room;

pub use checklist::{
    ChecklistDetail, ChecklistItem, ChecklistItemStatus, ChecklistStatus, CompletedChecklist,
    CompletionWarnings, InitializeOutcome, RoomCleaningChecklist, StartedChecklist,
};
pub use laundry::{Destination, Laundry, LaundryStatus};
pub use linen::{
    CreateLinenType, LinenCategory, LinenCondition, LinenItem, LinenItemFilter,
    LinenItemMetadata, LinenStatus, LinenType, UpdateLinenType,
};
pub use movement::{LinenMovement, MovementFilter, MovementType};
pub use room::{CreateRoom, Room, RoomFilter, RoomLinenConfig, RoomStatus, RoomType, UpdateRoom};
