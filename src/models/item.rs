use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::items;
use crate::lifecycle::{ItemStatus, UnknownStatus};

/// A lost-and-found record with its status decoded into the typed state
/// machine. Timestamps stay in their stored string form; parsing happens
/// only where an instant is actually needed (sweep, date filters, stats).
#[derive(Debug, Clone)]
pub struct Item {
    pub id: i32,
    pub description: String,
    pub found_location: String,
    pub collect_location: String,
    pub image_path: Option<String>,
    pub uploaded_at: String,
    pub status: ItemStatus,
    pub collected_at: Option<String>,
}

impl TryFrom<items::Model> for Item {
    type Error = UnknownStatus;

    fn try_from(model: items::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse()?;
        Ok(Self {
            id: model.id,
            description: model.description,
            found_location: model.found_location,
            collect_location: model.collect_location,
            image_path: model.image_path,
            uploaded_at: model.uploaded_at,
            status,
            collected_at: model.collected_at,
        })
    }
}

/// Fields supplied by the intake form; everything else is assigned on
/// insert (`status=lost`, `uploaded_at=now`, `collected_at=null`).
#[derive(Debug, Clone)]
pub struct NewItem {
    pub description: String,
    pub found_location: String,
    pub collect_location: String,
    pub image_path: Option<String>,
}

/// Listing filter. Date bounds compare the calendar-date portion of
/// `uploaded_at` only and are inclusive on both ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    pub uploaded_from: Option<NaiveDate>,
    pub uploaded_to: Option<NaiveDate>,
}

impl ItemFilter {
    #[must_use]
    pub const fn by_status(status: ItemStatus) -> Self {
        Self {
            status: Some(status),
            uploaded_from: None,
            uploaded_to: None,
        }
    }

    #[must_use]
    pub const fn has_date_range(&self) -> bool {
        self.uploaded_from.is_some() || self.uploaded_to.is_some()
    }
}

/// One bucket of the intake chart: items uploaded in a given month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// `YYYY-MM`
    pub month: String,
    pub count: u64,
}
