use std::collections::HashMap;

use chrono::{Datelike, Months, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::warn;

use crate::db::error::StoreError;
use crate::entities::{items, prelude::*};
use crate::lifecycle::{self, ItemStatus};
use crate::models::{Item, ItemFilter, MonthlyCount, NewItem};

pub struct ItemRepository {
    conn: DatabaseConnection,
}

impl ItemRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add(&self, item: &NewItem) -> Result<Item, StoreError> {
        let active = items::ActiveModel {
            description: Set(item.description.clone()),
            found_location: Set(item.found_location.clone()),
            collect_location: Set(item.collect_location.clone()),
            image_path: Set(item.image_path.clone()),
            uploaded_at: Set(Utc::now().to_rfc3339()),
            status: Set(ItemStatus::Lost.as_str().to_string()),
            collected_at: Set(None),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        decode(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Item>, StoreError> {
        let model = Items::find_by_id(id).one(&self.conn).await?;
        model.map(decode).transpose()
    }

    /// Filtered listing, newest uploads first.
    ///
    /// The status filter runs in SQL; the calendar-date bounds are applied
    /// on the parsed `uploaded_at` so "date" means the date portion only,
    /// inclusive on both ends. Rows with an unparseable `uploaded_at` are
    /// excluded only while a date bound is active, matching how the
    /// predecessor's SQL `date()` comparison treated them.
    pub async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        let mut query = Items::find().order_by_desc(items::Column::UploadedAt);

        if let Some(status) = filter.status {
            query = query.filter(items::Column::Status.eq(status.as_str()));
        }

        let models = query.all(&self.conn).await?;

        let mut result = Vec::with_capacity(models.len());
        for model in models {
            let item = match Item::try_from(model) {
                Ok(item) => item,
                Err(e) => {
                    warn!("skipping item row with {e}");
                    continue;
                }
            };

            if filter.has_date_range() {
                let Some(date) = lifecycle::stored_date(&item.uploaded_at) else {
                    continue;
                };
                if filter.uploaded_from.is_some_and(|from| date < from) {
                    continue;
                }
                if filter.uploaded_to.is_some_and(|to| date > to) {
                    continue;
                }
            }

            result.push(item);
        }

        Ok(result)
    }

    pub async fn mark_collected(&self, id: i32) -> Result<Item, StoreError> {
        self.transition(id, ItemStatus::Collected, Some(Utc::now().to_rfc3339()))
            .await
    }

    pub async fn archive(&self, id: i32) -> Result<Item, StoreError> {
        self.transition(id, ItemStatus::Archived, None).await
    }

    pub async fn restore(&self, id: i32) -> Result<Item, StoreError> {
        self.transition(id, ItemStatus::Lost, None).await
    }

    /// Validated status change. The UPDATE is additionally filtered on the
    /// status observed during the read, so a row that moved in between is
    /// reported as `InvalidTransition` instead of being overwritten.
    ///
    /// `collected_at` is always written: the timestamp when entering
    /// `collected`, null for every other target state.
    async fn transition(
        &self,
        id: i32,
        to: ItemStatus,
        collected_at: Option<String>,
    ) -> Result<Item, StoreError> {
        let model = Items::find_by_id(id)
            .one(&self.conn)
            .await?
            .ok_or(StoreError::ItemNotFound(id))?;

        let from: ItemStatus = model
            .status
            .parse()
            .map_err(|e| corrupt_row(id, &e))?;

        if !from.can_become(to) {
            return Err(StoreError::InvalidTransition { id, from, to });
        }

        let result = Items::update_many()
            .col_expr(items::Column::Status, Expr::value(to.as_str()))
            .col_expr(items::Column::CollectedAt, Expr::value(collected_at))
            .filter(items::Column::Id.eq(id))
            .filter(items::Column::Status.eq(from.as_str()))
            .exec(&self.conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StoreError::InvalidTransition { id, from, to });
        }

        self.get(id).await?.ok_or(StoreError::ItemNotFound(id))
    }

    /// Permanent removal. Returns false when the id did not exist, which is
    /// not an error: delete is an idempotent no-op by contract.
    pub async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let result = Items::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_by_status(&self, status: ItemStatus) -> Result<u64, StoreError> {
        let count = Items::find()
            .filter(items::Column::Status.eq(status.as_str()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Upload counts per calendar month, oldest bucket first, ending with
    /// the current month. Buckets without uploads are zero-filled; rows
    /// with unparseable timestamps are not counted.
    pub async fn monthly_counts(&self, buckets: usize) -> Result<Vec<MonthlyCount>, StoreError> {
        let models = Items::find().all(&self.conn).await?;

        let mut tally: HashMap<(i32, u32), u64> = HashMap::new();
        for model in &models {
            if let Ok(uploaded) = lifecycle::parse_stored_timestamp(&model.uploaded_at) {
                let date = uploaded.date_naive();
                *tally.entry((date.year(), date.month())).or_insert(0) += 1;
            }
        }

        let today = Utc::now().date_naive();
        let mut counts = Vec::with_capacity(buckets);
        for back in (0..buckets).rev() {
            let month = today - Months::new(u32::try_from(back).unwrap_or(u32::MAX));
            let key = (month.year(), month.month());
            counts.push(MonthlyCount {
                month: format!("{:04}-{:02}", key.0, key.1),
                count: tally.get(&key).copied().unwrap_or(0),
            });
        }

        Ok(counts)
    }
}

fn decode(model: items::Model) -> Result<Item, StoreError> {
    let id = model.id;
    Item::try_from(model).map_err(|e| corrupt_row(id, &e))
}

// A status string outside the three-state enum can only come from edits
// behind the application's back; surface it as storage corruption.
fn corrupt_row(id: i32, err: &crate::lifecycle::UnknownStatus) -> StoreError {
    StoreError::Database(sea_orm::DbErr::Custom(format!("item {id}: {err}")))
}
