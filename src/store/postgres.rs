use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use super::{Store, StoreTx};
use crate::database::Database;
use crate::error::StoreError;
use crate::models::{
    ChecklistItem, Laundry, LaundryStatus, LinenItem, LinenItemFilter, LinenMovement,
    LinenStatus, LinenType, MovementFilter, Room, RoomCleaningChecklist, RoomFilter,
    RoomLinenConfig, RoomType,
};

#[derive(Clone)]
pub struct PgStore {
    pool: Database,
}

impl PgStore {
    pub fn new(pool: Database) -> Self {
        Self { pool }
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, StoreError> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx })
    }
}

fn unique_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(message()),
        _ => StoreError::Database(err),
    }
}

fn guarded(rows_affected: u64, what: &str) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(StoreError::Conflict(format!("{} changed concurrently", what)));
    }
    Ok(())
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn insert_linen_type(&mut self, linen_type: &LinenType) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO linen_types (id, name, description, category, unit, min_stock, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(linen_type.id)
        .bind(&linen_type.name)
        .bind(&linen_type.description)
        .bind(linen_type.category)
        .bind(&linen_type.unit)
        .bind(linen_type.min_stock)
        .bind(&linen_type.image_url)
        .bind(linen_type.created_at)
        .bind(linen_type.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_linen_type(&mut self, linen_type: &LinenType) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE linen_types
            SET name = $2, description = $3, category = $4, unit = $5, min_stock = $6,
                image_url = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(linen_type.id)
        .bind(&linen_type.name)
        .bind(&linen_type.description)
        .bind(linen_type.category)
        .bind(&linen_type.unit)
        .bind(linen_type.min_stock)
        .bind(&linen_type.image_url)
        .bind(linen_type.updated_at)
        .execute(&mut *self.tx)
        .await?;
        guarded(result.rows_affected(), "linen type")
    }

    async fn linen_type(&mut self, id: Uuid) -> Result<Option<LinenType>, StoreError> {
        let row = sqlx::query_as::<_, LinenType>("SELECT * FROM linen_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn list_linen_types(&mut self) -> Result<Vec<LinenType>, StoreError> {
        let rows = sqlx::query_as::<_, LinenType>("SELECT * FROM linen_types ORDER BY name")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_room(&mut self, room: &Room) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO rooms (id, number, floor, block, type, status, capacity, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(room.id)
        .bind(&room.number)
        .bind(room.floor)
        .bind(&room.block)
        .bind(room.room_type)
        .bind(room.status)
        .bind(room.capacity)
        .bind(&room.description)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| unique_violation(e, || format!("room number {} is taken", room.number)))?;
        Ok(())
    }

    async fn update_room(&mut self, room: &Room) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET number = $2, floor = $3, block = $4, type = $5, status = $6, capacity = $7,
                description = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(room.id)
        .bind(&room.number)
        .bind(room.floor)
        .bind(&room.block)
        .bind(room.room_type)
        .bind(room.status)
        .bind(room.capacity)
        .bind(&room.description)
        .bind(room.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| unique_violation(e, || format!("room number {} is taken", room.number)))?;
        guarded(result.rows_affected(), "room")
    }

    async fn room(&mut self, id: Uuid) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn room_by_number(&mut self, number: &str) -> Result<Option<Room>, StoreError> {
        let row = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE number = $1")
            .bind(number)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn list_rooms(&mut self, filter: &RoomFilter) -> Result<Vec<Room>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM rooms WHERE TRUE");
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(room_type) = filter.room_type {
            query.push(" AND type = ").push_bind(room_type);
        }
        if let Some(floor) = filter.floor {
            query.push(" AND floor = ").push_bind(floor);
        }
        query.push(" ORDER BY number");

        let rows = query
            .build_query_as::<Room>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn room_linen_config(
        &mut self,
        room_type: RoomType,
    ) -> Result<Vec<RoomLinenConfig>, StoreError> {
        let rows = sqlx::query_as::<_, RoomLinenConfig>(
            r#"
            SELECT c.*
            FROM room_linen_config c
            JOIN linen_types t ON t.id = c.linen_type_id
            WHERE c.room_type = $1
            ORDER BY t.name
            "#,
        )
        .bind(room_type)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn upsert_room_linen_config(
        &mut self,
        config: &RoomLinenConfig,
    ) -> Result<RoomLinenConfig, StoreError> {
        let row = sqlx::query_as::<_, RoomLinenConfig>(
            r#"
            INSERT INTO room_linen_config (id, room_type, linen_type_id, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (room_type, linen_type_id)
            DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = EXCLUDED.updated_at
            RETURNING *
            "#,
        )
        .bind(config.id)
        .bind(config.room_type)
        .bind(config.linen_type_id)
        .bind(config.quantity)
        .bind(config.created_at)
        .bind(config.updated_at)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn insert_linen_item(&mut self, item: &LinenItem) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO linen_items (
                id, linen_type_id, room_id, status, condition, description, purchase_date,
                supplier_tax_id, invoice_number, last_wash_date, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(item.id)
        .bind(item.linen_type_id)
        .bind(item.room_id)
        .bind(item.status)
        .bind(item.condition)
        .bind(&item.description)
        .bind(item.purchase_date)
        .bind(&item.supplier_tax_id)
        .bind(&item.invoice_number)
        .bind(item.last_wash_date)
        .bind(&item.notes)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn linen_item(&mut self, id: Uuid) -> Result<Option<LinenItem>, StoreError> {
        let row = sqlx::query_as::<_, LinenItem>("SELECT * FROM linen_items WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn linen_items_by_ids(&mut self, ids: &[Uuid]) -> Result<Vec<LinenItem>, StoreError> {
        let rows = sqlx::query_as::<_, LinenItem>(
            "SELECT * FROM linen_items WHERE id = ANY($1) ORDER BY created_at",
        )
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn linen_items_in_room(&mut self, room_id: Uuid) -> Result<Vec<LinenItem>, StoreError> {
        let rows = sqlx::query_as::<_, LinenItem>(
            "SELECT * FROM linen_items WHERE room_id = $1 ORDER BY created_at",
        )
        .bind(room_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn list_linen_items(
        &mut self,
        filter: &LinenItemFilter,
    ) -> Result<Vec<LinenItem>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM linen_items WHERE TRUE");
        if let Some(linen_type_id) = filter.linen_type_id {
            query.push(" AND linen_type_id = ").push_bind(linen_type_id);
        }
        if let Some(room_id) = filter.room_id {
            query.push(" AND room_id = ").push_bind(room_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (COALESCE(description, '') ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR id::text ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        query.push(" ORDER BY created_at");

        let rows = query
            .build_query_as::<LinenItem>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn update_linen_item(
        &mut self,
        item: &LinenItem,
        expected: LinenStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE linen_items
            SET room_id = $2, status = $3, condition = $4, description = $5,
                last_wash_date = $6, notes = $7, updated_at = $8
            WHERE id = $1 AND status = $9
            "#,
        )
        .bind(item.id)
        .bind(item.room_id)
        .bind(item.status)
        .bind(item.condition)
        .bind(&item.description)
        .bind(item.last_wash_date)
        .bind(&item.notes)
        .bind(item.updated_at)
        .bind(expected)
        .execute(&mut *self.tx)
        .await?;
        guarded(result.rows_affected(), "linen item")
    }

    async fn insert_movement(&mut self, movement: &LinenMovement) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO linen_movements (id, linen_item_id, from_room_id, to_room_id, movement_type, user_id, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(movement.id)
        .bind(movement.linen_item_id)
        .bind(movement.from_room_id)
        .bind(movement.to_room_id)
        .bind(movement.movement_type)
        .bind(movement.user_id)
        .bind(&movement.notes)
        .bind(movement.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn list_movements(
        &mut self,
        filter: &MovementFilter,
    ) -> Result<Vec<LinenMovement>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM linen_movements WHERE TRUE");
        if let Some(movement_type) = filter.movement_type {
            query.push(" AND movement_type = ").push_bind(movement_type);
        }
        if let Some(room_id) = filter.room_id {
            query
                .push(" AND (from_room_id = ")
                .push_bind(room_id)
                .push(" OR to_room_id = ")
                .push_bind(room_id)
                .push(")");
        }
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(filter.limit());

        let rows = query
            .build_query_as::<LinenMovement>()
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn insert_laundry(&mut self, laundry: &Laundry) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO laundry (
                id, linen_item_id, status, collected_at, washed_at, delivered_at,
                collected_by, washed_by, delivered_by, notes, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(laundry.id)
        .bind(laundry.linen_item_id)
        .bind(laundry.status)
        .bind(laundry.collected_at)
        .bind(laundry.washed_at)
        .bind(laundry.delivered_at)
        .bind(laundry.collected_by)
        .bind(laundry.washed_by)
        .bind(laundry.delivered_by)
        .bind(&laundry.notes)
        .bind(laundry.created_at)
        .bind(laundry.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            unique_violation(e, || {
                format!(
                    "linen item {} already has an open laundry cycle",
                    laundry.linen_item_id
                )
            })
        })?;
        Ok(())
    }

    async fn open_laundry_for_item(
        &mut self,
        linen_item_id: Uuid,
    ) -> Result<Option<Laundry>, StoreError> {
        let row = sqlx::query_as::<_, Laundry>(
            "SELECT * FROM laundry WHERE linen_item_id = $1 AND status <> 'delivered' LIMIT 1",
        )
        .bind(linen_item_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn laundry_by_ids(
        &mut self,
        ids: &[Uuid],
        status: LaundryStatus,
    ) -> Result<Vec<Laundry>, StoreError> {
        let rows = sqlx::query_as::<_, Laundry>(
            "SELECT * FROM laundry WHERE id = ANY($1) AND status = $2 ORDER BY collected_at",
        )
        .bind(ids)
        .bind(status)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn update_laundry(
        &mut self,
        laundry: &Laundry,
        expected: LaundryStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE laundry
            SET status = $2, washed_at = $3, delivered_at = $4, washed_by = $5,
                delivered_by = $6, notes = $7, updated_at = $8
            WHERE id = $1 AND status = $9
            "#,
        )
        .bind(laundry.id)
        .bind(laundry.status)
        .bind(laundry.washed_at)
        .bind(laundry.delivered_at)
        .bind(laundry.washed_by)
        .bind(laundry.delivered_by)
        .bind(&laundry.notes)
        .bind(laundry.updated_at)
        .bind(expected)
        .execute(&mut *self.tx)
        .await?;
        guarded(result.rows_affected(), "laundry row")
    }

    async fn list_laundry(
        &mut self,
        status: Option<LaundryStatus>,
    ) -> Result<Vec<Laundry>, StoreError> {
        let rows = sqlx::query_as::<_, Laundry>(
            r#"
            SELECT * FROM laundry
            WHERE $1::laundry_status IS NULL OR status = $1
            ORDER BY collected_at
            "#,
        )
        .bind(status)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }

    async fn insert_checklist(
        &mut self,
        checklist: &RoomCleaningChecklist,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO room_cleaning_checklists (id, room_id, user_id, status, started_at, completed_at, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(checklist.id)
        .bind(checklist.room_id)
        .bind(checklist.user_id)
        .bind(checklist.status)
        .bind(checklist.started_at)
        .bind(checklist.completed_at)
        .bind(&checklist.notes)
        .bind(checklist.created_at)
        .bind(checklist.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            unique_violation(e, || {
                format!("room {} already has a checklist in progress", checklist.room_id)
            })
        })?;
        Ok(())
    }

    async fn update_checklist(
        &mut self,
        checklist: &RoomCleaningChecklist,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE room_cleaning_checklists
            SET status = $2, completed_at = $3, notes = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(checklist.id)
        .bind(checklist.status)
        .bind(checklist.completed_at)
        .bind(&checklist.notes)
        .bind(checklist.updated_at)
        .execute(&mut *self.tx)
        .await?;
        guarded(result.rows_affected(), "checklist")
    }

    async fn checklist(&mut self, id: Uuid) -> Result<Option<RoomCleaningChecklist>, StoreError> {
        let row = sqlx::query_as::<_, RoomCleaningChecklist>(
            "SELECT * FROM room_cleaning_checklists WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn checklist_in_progress(
        &mut self,
        room_id: Uuid,
    ) -> Result<Option<RoomCleaningChecklist>, StoreError> {
        let row = sqlx::query_as::<_, RoomCleaningChecklist>(
            "SELECT * FROM room_cleaning_checklists WHERE room_id = $1 AND status = 'in_progress' LIMIT 1",
        )
        .bind(room_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn insert_checklist_items(&mut self, items: &[ChecklistItem]) -> Result<(), StoreError> {
        if items.is_empty() {
            return Ok(());
        }
        let mut query = QueryBuilder::<Postgres>::new(
            "INSERT INTO cleaning_checklist_items (id, checklist_id, linen_item_id, linen_type_id, status, condition_notes, replacement_item_id, created_at, updated_at) ",
        );
        query.push_values(items, |mut row, item| {
            row.push_bind(item.id)
                .push_bind(item.checklist_id)
                .push_bind(item.linen_item_id)
                .push_bind(item.linen_type_id)
                .push_bind(item.status)
                .push_bind(item.condition_notes.clone())
                .push_bind(item.replacement_item_id)
                .push_bind(item.created_at)
                .push_bind(item.updated_at);
        });
        query.build().execute(&mut *self.tx).await?;
        Ok(())
    }

    async fn update_checklist_item(&mut self, item: &ChecklistItem) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE cleaning_checklist_items
            SET linen_item_id = $2, status = $3, condition_notes = $4,
                replacement_item_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(item.linen_item_id)
        .bind(item.status)
        .bind(&item.condition_notes)
        .bind(item.replacement_item_id)
        .bind(item.updated_at)
        .execute(&mut *self.tx)
        .await?;
        guarded(result.rows_affected(), "checklist item")
    }

    async fn checklist_item(&mut self, id: Uuid) -> Result<Option<ChecklistItem>, StoreError> {
        let row = sqlx::query_as::<_, ChecklistItem>(
            "SELECT * FROM cleaning_checklist_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn checklist_items(
        &mut self,
        checklist_id: Uuid,
    ) -> Result<Vec<ChecklistItem>, StoreError> {
        let rows = sqlx::query_as::<_, ChecklistItem>(
            "SELECT * FROM cleaning_checklist_items WHERE checklist_id = $1 ORDER BY created_at, id",
        )
        .bind(checklist_id)
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(rows)
    }
}
