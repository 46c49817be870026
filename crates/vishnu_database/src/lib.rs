//! Quest and group persistence for Vishnu.
//!
//! This crate defines the record store interface the command handlers talk to
//! and three implementations of it:
//!
//! - [`PostgresStore`] - diesel over an r2d2 connection pool, schema managed
//!   by embedded migrations
//! - [`MemoryStore`] - in-process maps behind one async mutex, for tests and
//!   offline runs
//! - [`ResilientStore`] - wraps another store with a per-call timeout and
//!   retries when the store is unreachable
//!
//! Every record carries a `guild_id`; queries never cross guilds.
//!
//! # Example
//!
//! ```rust,ignore
//! use vishnu_database::{PostgresStore, QuestStore, ResilientStore};
//! use vishnu_core::{QuestFilter, StoreSettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = StoreSettings::default();
//! let postgres = PostgresStore::connect(&settings.resolve_database_url()?, &settings)?;
//! postgres.run_migrations().await?;
//!
//! let store = ResilientStore::new(postgres, &settings);
//! let open = store.list_quests(42, &QuestFilter::default()).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod connection;
mod memory;
mod models;
mod postgres;
mod resilient;
mod store;

/// Diesel table definitions.
#[allow(missing_docs)]
pub mod schema;

pub use connection::{PgPool, establish_pool, run_migrations};
pub use memory::MemoryStore;
pub use models::{GroupRow, NewGroupRow, NewQuestRow, QuestRow};
pub use postgres::PostgresStore;
pub use resilient::ResilientStore;
pub use store::{GroupStore, QuestStore, RecordStore};

/// Result type for pool and migration operations.
pub type DatabaseResult<T> = Result<T, vishnu_error::DatabaseError>;
