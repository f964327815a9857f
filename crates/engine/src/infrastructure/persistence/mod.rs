//! SQLite adapters behind the repository ports.

pub mod connection;
mod mission_repository;
mod profile_repository;
mod progress_repository;
mod user_directory;

use std::sync::Arc;

use sqlx::SqlitePool;

pub use mission_repository::SqliteMissionRepo;
pub use profile_repository::SqliteProfileRepo;
pub use progress_repository::SqliteProgressRepo;
pub use user_directory::SqliteUserDirectory;

use crate::infrastructure::ports::RepoError;

/// All SQLite adapters over one pool.
pub struct SqliteRepositories {
    pub mission: Arc<SqliteMissionRepo>,
    pub progress: Arc<SqliteProgressRepo>,
    pub profile: Arc<SqliteProfileRepo>,
    pub users: Arc<SqliteUserDirectory>,
}

impl SqliteRepositories {
    /// Open a file-backed database, ensure the schema, and wire every
    /// adapter to the shared pool.
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = connection::connect(db_path).await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            mission: Arc::new(SqliteMissionRepo::new(pool.clone())),
            progress: Arc::new(SqliteProgressRepo::new(pool.clone())),
            profile: Arc::new(SqliteProfileRepo::new(pool.clone())),
            users: Arc::new(SqliteUserDirectory::new(pool)),
        }
    }
}
