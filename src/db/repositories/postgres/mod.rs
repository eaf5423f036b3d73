//! Postgres repository implementation using Diesel.
//!
//! This module implements the repository traits against a Postgres
//! database. The booking writes run inside serializable transactions so
//! the overlap check and the insert/update are one atomic step, and the
//! schema carries a gist exclusion constraint on (property, day range) as
//! a second line of defense: the losing writer of a race fails atomically
//! and the error is reported as a conflict.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Automatic retry for transient failures
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_MAX_RETRIES`: Maximum retry attempts for transient failures (default: 3)
//! - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;
use uuid::Uuid;

use crate::api::{Booking, BookingId, BookingRecord, Property, PropertyId, User, UserId};
use crate::db::repository::{
    BookingRepository, ErrorContext, PropertyRepository, RepositoryError, RepositoryResult,
    UserRepository,
};
use crate::services::stay::day_start_utc;

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        let max_retries = std::env::var("PG_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(3);

        let retry_delay_ms = std::env::var("PG_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(100);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
            max_retries,
            retry_delay_ms,
        })
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool, config })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a database operation with automatic retry for transient
    /// failures (connection errors, serialization aborts).
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static + Clone,
    {
        let pool = self.pool.clone();
        let max_retries = self.config.max_retries;
        let retry_delay_ms = self.config.retry_delay_ms;

        task::spawn_blocking(move || {
            let mut last_error = None;
            let mut retry_delay = Duration::from_millis(retry_delay_ms);

            for attempt in 0..=max_retries {
                if attempt > 0 {
                    std::thread::sleep(retry_delay);
                    retry_delay *= 2; // Exponential backoff
                }

                let mut conn = match pool.get() {
                    Ok(c) => c,
                    Err(e) => {
                        let err = RepositoryError::connection_with_context(
                            e.to_string(),
                            ErrorContext::new("get_connection")
                                .with_details(format!("attempt={}", attempt + 1))
                                .retryable(),
                        );
                        if attempt < max_retries {
                            last_error = Some(err);
                            continue;
                        }
                        return Err(err);
                    }
                };

                match f.clone()(&mut conn) {
                    Ok(result) => return Ok(result),
                    Err(e) if e.is_retryable() && attempt < max_retries => {
                        last_error = Some(e);
                        continue;
                    }
                    Err(e) => return Err(e),
                }
            }

            Err(last_error.unwrap_or_else(|| {
                RepositoryError::internal("Max retries exceeded with no error captured")
            }))
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

/// Day-granular half-open overlap query, expressed over the raw stored
/// timestamps: `floor_utc(checkin) < checkout_day` iff
/// `checkin < checkout_day 00:00Z`, and `floor_utc(checkout) > checkin_day`
/// iff `checkout >= (checkin_day + 1) 00:00Z`.
fn find_conflict_tx(
    conn: &mut PgConnection,
    property_id: Uuid,
    checkin_day: NaiveDate,
    checkout_day: NaiveDate,
    exclude: Option<Uuid>,
) -> Result<Option<BookingRow>, diesel::result::Error> {
    let mut query = bookings::table
        .filter(bookings::property_id.eq(property_id))
        .filter(bookings::checkin_date.lt(day_start_utc(checkout_day)))
        .filter(bookings::checkout_date.ge(day_start_utc(checkin_day) + ChronoDuration::days(1)))
        .into_boxed();

    if let Some(exclude) = exclude {
        query = query.filter(bookings::id.ne(exclude));
    }

    query
        .select(BookingRow::as_select())
        .first::<BookingRow>(conn)
        .optional()
}

fn conflict_error(existing: &BookingRow, operation: &str) -> RepositoryError {
    RepositoryError::conflict_with_context(
        format!(
            "booking range overlaps existing stay from {} to {}",
            existing.checkin_date.date_naive(),
            existing.checkout_date.date_naive()
        ),
        ErrorContext::new(operation)
            .with_entity("booking")
            .with_entity_id(existing.id),
    )
}

#[async_trait]
impl BookingRepository for PostgresRepository {
    async fn fetch_booking(&self, id: BookingId) -> RepositoryResult<Option<Booking>> {
        let row = self
            .with_conn(move |conn| {
                bookings::table
                    .find(id.value())
                    .select(BookingRow::as_select())
                    .first::<BookingRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(row.map(Booking::from))
    }

    async fn list_bookings(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<Booking>> {
        let rows = self
            .with_conn(move |conn| {
                let mut query = bookings::table.into_boxed();
                if let Some(user_id) = user_id {
                    query = query.filter(bookings::user_id.eq(user_id.value()));
                }
                query
                    .order(bookings::checkin_date.asc())
                    .select(BookingRow::as_select())
                    .load::<BookingRow>(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn find_overlapping(
        &self,
        property_id: PropertyId,
        checkin_day: NaiveDate,
        checkout_day: NaiveDate,
        exclude: Option<BookingId>,
    ) -> RepositoryResult<Option<Booking>> {
        let row = self
            .with_conn(move |conn| {
                find_conflict_tx(
                    conn,
                    property_id.value(),
                    checkin_day,
                    checkout_day,
                    exclude.map(|id| id.value()),
                )
                .map_err(RepositoryError::from)
            })
            .await?;
        Ok(row.map(Booking::from))
    }

    async fn create_booking(&self, record: BookingRecord) -> RepositoryResult<Booking> {
        let row = self
            .with_conn(move |conn| {
                let record = record.clone();
                conn.build_transaction()
                    .serializable()
                    .run(|tx| -> Result<BookingRow, RepositoryError> {
                        let checkin_day = record.checkin_date.date_naive();
                        let checkout_day = record.checkout_date.date_naive();
                        if let Some(existing) = find_conflict_tx(
                            tx,
                            record.property_id.value(),
                            checkin_day,
                            checkout_day,
                            None,
                        )? {
                            return Err(conflict_error(&existing, "create_booking"));
                        }

                        let row = BookingRow::from_record(BookingId::generate(), &record);
                        diesel::insert_into(bookings::table)
                            .values(&row)
                            .returning(BookingRow::as_returning())
                            .get_result(tx)
                            .map_err(RepositoryError::from)
                    })
            })
            .await?;
        Ok(Booking::from(row))
    }

    async fn update_booking(
        &self,
        id: BookingId,
        record: BookingRecord,
    ) -> RepositoryResult<Booking> {
        let row = self
            .with_conn(move |conn| {
                let record = record.clone();
                conn.build_transaction()
                    .serializable()
                    .run(|tx| -> Result<BookingRow, RepositoryError> {
                        let exists: Option<Uuid> = bookings::table
                            .find(id.value())
                            .select(bookings::id)
                            .first::<Uuid>(tx)
                            .optional()
                            .map_err(RepositoryError::from)?;
                        if exists.is_none() {
                            return Err(RepositoryError::not_found_with_context(
                                format!("booking {} does not exist", id),
                                ErrorContext::new("update_booking")
                                    .with_entity("booking")
                                    .with_entity_id(id),
                            ));
                        }

                        let checkin_day = record.checkin_date.date_naive();
                        let checkout_day = record.checkout_date.date_naive();
                        if let Some(existing) = find_conflict_tx(
                            tx,
                            record.property_id.value(),
                            checkin_day,
                            checkout_day,
                            Some(id.value()),
                        )? {
                            return Err(conflict_error(&existing, "update_booking"));
                        }

                        let row = BookingRow::from_record(id, &record);
                        diesel::update(bookings::table.find(id.value()))
                            .set((
                                bookings::user_id.eq(row.user_id),
                                bookings::property_id.eq(row.property_id),
                                bookings::checkin_date.eq(row.checkin_date),
                                bookings::checkout_date.eq(row.checkout_date),
                                bookings::number_of_guests.eq(row.number_of_guests),
                                bookings::total_price.eq(row.total_price),
                                bookings::booking_status.eq(row.booking_status.clone()),
                            ))
                            .returning(BookingRow::as_returning())
                            .get_result(tx)
                            .map_err(RepositoryError::from)
                    })
            })
            .await?;
        Ok(Booking::from(row))
    }

    async fn delete_booking(&self, id: BookingId) -> RepositoryResult<bool> {
        let deleted = self
            .with_conn(move |conn| {
                diesel::delete(bookings::table.find(id.value()))
                    .execute(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(deleted > 0)
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map_err(RepositoryError::from)
        })
        .await?;
        Ok(true)
    }
}

#[async_trait]
impl PropertyRepository for PostgresRepository {
    async fn fetch_property(&self, id: PropertyId) -> RepositoryResult<Option<Property>> {
        let row = self
            .with_conn(move |conn| {
                properties::table
                    .find(id.value())
                    .select(PropertyRow::as_select())
                    .first::<PropertyRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(row.map(Property::from))
    }

    async fn upsert_property(&self, property: Property) -> RepositoryResult<Property> {
        let row = self
            .with_conn(move |conn| {
                let new_row = PropertyRow::from(&property);
                diesel::insert_into(properties::table)
                    .values(&new_row)
                    .on_conflict(properties::id)
                    .do_update()
                    .set((
                        properties::title.eq(excluded(properties::title)),
                        properties::max_guest_count.eq(excluded(properties::max_guest_count)),
                        properties::price_per_night.eq(excluded(properties::price_per_night)),
                    ))
                    .returning(PropertyRow::as_returning())
                    .get_result(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(Property::from(row))
    }
}

#[async_trait]
impl UserRepository for PostgresRepository {
    async fn fetch_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let row = self
            .with_conn(move |conn| {
                users::table
                    .find(id.value())
                    .select(UserRow::as_select())
                    .first::<UserRow>(conn)
                    .optional()
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(row.map(User::from))
    }

    async fn upsert_user(&self, user: User) -> RepositoryResult<User> {
        let row = self
            .with_conn(move |conn| {
                let new_row = UserRow::from(&user);
                diesel::insert_into(users::table)
                    .values(&new_row)
                    .on_conflict(users::id)
                    .do_update()
                    .set(users::username.eq(excluded(users::username)))
                    .returning(UserRow::as_returning())
                    .get_result(conn)
                    .map_err(RepositoryError::from)
            })
            .await?;
        Ok(User::from(row))
    }
}
