//! Checklist seeding plan.
//!
//! Computes which checklist entries are still missing for a room, given what
//! the checklist already holds. Running the plan against its own output
//! yields nothing new.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{ChecklistItem, ChecklistItemStatus, LinenItem, LinenStatus, RoomLinenConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedEntry {
    pub linen_item_id: Option<Uuid>,
    pub linen_type_id: Uuid,
    pub status: ChecklistItemStatus,
}

pub fn plan_seed(
    existing: &[ChecklistItem],
    room_items: &[LinenItem],
    requirements: &[RoomLinenConfig],
) -> Vec<SeedEntry> {
    let represented: HashSet<Uuid> = existing.iter().filter_map(|e| e.linen_item_id).collect();

    let mut counted: HashMap<Uuid, i64> = HashMap::new();
    for entry in existing {
        *counted.entry(entry.linen_type_id).or_default() += 1;
    }

    let mut plan = Vec::new();
    for item in room_items.iter().filter(|i| !represented.contains(&i.id)) {
        let status = if item.status == LinenStatus::Damaged {
            ChecklistItemStatus::Damaged
        } else {
            ChecklistItemStatus::Present
        };
        plan.push(SeedEntry {
            linen_item_id: Some(item.id),
            linen_type_id: item.linen_type_id,
            status,
        });
        *counted.entry(item.linen_type_id).or_default() += 1;
    }

    for requirement in requirements {
        let already = counted.get(&requirement.linen_type_id).copied().unwrap_or(0);
        let missing = (i64::from(requirement.quantity) - already).max(0);
        for _ in 0..missing {
            plan.push(SeedEntry {
                linen_item_id: None,
                linen_type_id: requirement.linen_type_id,
                status: ChecklistItemStatus::Absent,
            });
        }
    }

    plan
}
