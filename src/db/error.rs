use crate::lifecycle::ItemStatus;

/// Typed failures crossing the repository boundary.
///
/// Expected conditions (duplicate username, missing item, disallowed
/// transition) are explicit variants so callers can map them to user-facing
/// outcomes; `Database` wraps everything the storage engine itself reports
/// and is treated as fatal for the operation, never retried here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    #[error("item {0} not found")]
    ItemNotFound(i32),

    #[error("item {id} is {from}, cannot become {to}")]
    InvalidTransition {
        id: i32,
        from: ItemStatus,
        to: ItemStatus,
    },

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
