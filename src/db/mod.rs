use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod error;
pub mod migrator;
pub mod repositories;

pub use error::StoreError;

use crate::config::SecurityConfig;
use crate::lifecycle::ItemStatus;
use crate::models::{Item, ItemFilter, MonthlyCount, NewItem, Teacher};

/// Facade over the database connection. All table access goes through the
/// per-table repositories; callers only see these delegation methods.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if db_url.starts_with("sqlite:") && !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn item_repo(&self) -> repositories::item::ItemRepository {
        repositories::item::ItemRepository::new(self.conn.clone())
    }

    fn teacher_repo(&self) -> repositories::teacher::TeacherRepository {
        repositories::teacher::TeacherRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    pub async fn add_item(&self, item: &NewItem) -> Result<Item, StoreError> {
        self.item_repo().add(item).await
    }

    pub async fn get_item(&self, id: i32) -> Result<Option<Item>, StoreError> {
        self.item_repo().get(id).await
    }

    pub async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        self.item_repo().list(filter).await
    }

    pub async fn mark_collected(&self, id: i32) -> Result<Item, StoreError> {
        self.item_repo().mark_collected(id).await
    }

    pub async fn archive_item(&self, id: i32) -> Result<Item, StoreError> {
        self.item_repo().archive(id).await
    }

    pub async fn restore_item(&self, id: i32) -> Result<Item, StoreError> {
        self.item_repo().restore(id).await
    }

    pub async fn delete_item(&self, id: i32) -> Result<bool, StoreError> {
        self.item_repo().delete(id).await
    }

    pub async fn count_items_by_status(&self, status: ItemStatus) -> Result<u64, StoreError> {
        self.item_repo().count_by_status(status).await
    }

    pub async fn monthly_item_counts(&self, buckets: usize) -> Result<Vec<MonthlyCount>, StoreError> {
        self.item_repo().monthly_counts(buckets).await
    }

    // ------------------------------------------------------------------
    // Teachers
    // ------------------------------------------------------------------

    pub async fn has_any_teacher(&self) -> Result<bool, StoreError> {
        self.teacher_repo().has_any().await
    }

    pub async fn count_teachers(&self) -> Result<u64, StoreError> {
        self.teacher_repo().count().await
    }

    pub async fn teacher_exists(&self, username: &str) -> Result<bool, StoreError> {
        self.teacher_repo().exists(username).await
    }

    pub async fn create_teacher(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Teacher, StoreError> {
        self.teacher_repo().create(username, password, security).await
    }

    pub async fn verify_teacher_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        self.teacher_repo().verify_password(username, password).await
    }
}
