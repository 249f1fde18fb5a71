use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub description: String,

    pub found_location: String,

    pub collect_location: String,

    /// Stored image filename under the configured images directory
    pub image_path: Option<String>,

    /// RFC 3339 UTC; immutable after insert
    pub uploaded_at: String,

    /// Lowercase form of [`crate::lifecycle::ItemStatus`]
    pub status: String,

    /// Set exactly while status is "collected"
    pub collected_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
