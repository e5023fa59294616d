// ABOUTME: Data layer for epic records
// ABOUTME: Pool bootstrap, embedded migrations, and the EpicStorage CRUD surface

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use tracing::{debug, info};

pub mod epics;
pub mod error;
pub mod types;
pub mod validation;

pub use epics::EpicStorage;
pub use error::{Result, StorageError};
pub use types::{AiValidation, Effort, Epic, EpicDraft, EpicStatus};
pub use validation::{NewEpic, MIN_OBJECTIVE_CHARS, MIN_SCOPE_CHARS, MIN_TITLE_CHARS};

pub use sqlx::SqlitePool;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT_SECS: u64 = 10;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Open the process-wide pool and bring the schema up to date.
///
/// In-memory URLs get a single long-lived connection, otherwise every pooled
/// connection would see its own empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    debug!("Connecting to database: {}", database_url);

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
    };

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;

    info!("Database ready");
    Ok(pool)
}
