//! Connection pooling and schema migrations.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, Pool};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::time::Duration;
use tracing::{info, instrument};
use vishnu_error::{DatabaseError, DatabaseErrorKind};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pool of PostgreSQL connections.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Sets a server-side `statement_timeout` on every new connection.
///
/// The server cancels a statement that runs past the limit, so work the
/// caller has stopped waiting for rolls back instead of committing later.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout(Duration);

impl CustomizeConnection<PgConnection, r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), r2d2::Error> {
        diesel::sql_query(format!("SET statement_timeout = {}", self.0.as_millis()))
            .execute(conn)
            .map(|_| ())
            .map_err(r2d2::Error::QueryError)
    }
}

fn at_least_one_ms(duration: Duration) -> Duration {
    duration.max(Duration::from_millis(1))
}

/// Build a connection pool for `database_url`.
///
/// `deadline` is the caller's budget for one store call. Waiting for a free
/// connection is capped at half of it and each statement at a quarter, so a
/// checkout plus the two statements of a join finish or fail before the
/// caller gives up.
///
/// # Errors
///
/// Returns [`DatabaseErrorKind::Pool`] if the pool cannot open its initial
/// connections.
#[instrument(skip(database_url))]
pub fn establish_pool(
    database_url: &str,
    pool_size: u32,
    deadline: Duration,
) -> DatabaseResult<PgPool> {
    let checkout = at_least_one_ms(deadline / 2);
    let statement = at_least_one_ms(deadline / 4);

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(pool_size)
        .connection_timeout(checkout)
        .connection_customizer(Box::new(StatementTimeout(statement)))
        .build(manager)?;

    info!(
        pool_size,
        checkout_ms = checkout.as_millis() as u64,
        statement_ms = statement.as_millis() as u64,
        "Connection pool ready"
    );
    Ok(pool)
}

/// Apply pending migrations, returning how many ran.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<usize> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|applied| applied.len())
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))
}
