//! In-memory repository for unit testing and local development.
//!
//! All maps live behind one `parking_lot::RwLock`, and the guarded booking
//! writes re-run the overlap scan while holding the write lock, so the
//! check-then-write is atomic within the process.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::api::{Booking, BookingId, BookingRecord, Property, PropertyId, User, UserId};
use crate::db::repository::{
    BookingRepository, ErrorContext, PropertyRepository, RepositoryError, RepositoryResult,
    UserRepository,
};

#[derive(Default)]
struct Store {
    bookings: HashMap<Uuid, Booking>,
    properties: HashMap<Uuid, Property>,
    users: HashMap<Uuid, User>,
}

/// In-memory implementation of the repository traits.
#[derive(Default)]
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Half-open day-range overlap test against a stored booking.
fn overlaps(booking: &Booking, checkin_day: NaiveDate, checkout_day: NaiveDate) -> bool {
    booking.checkin_date.date_naive() < checkout_day
        && booking.checkout_date.date_naive() > checkin_day
}

fn find_conflict(
    store: &Store,
    property_id: PropertyId,
    checkin_day: NaiveDate,
    checkout_day: NaiveDate,
    exclude: Option<BookingId>,
) -> Option<Booking> {
    store
        .bookings
        .values()
        .filter(|b| b.property_id == property_id)
        .filter(|b| exclude != Some(b.id))
        .find(|b| overlaps(b, checkin_day, checkout_day))
        .cloned()
}

fn conflict_error(existing: &Booking, operation: &str) -> RepositoryError {
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
impl BookingRepository for LocalRepository {
    async fn fetch_booking(&self, id: BookingId) -> RepositoryResult<Option<Booking>> {
        Ok(self.store.read().bookings.get(&id.value()).cloned())
    }

    async fn list_bookings(&self, user_id: Option<UserId>) -> RepositoryResult<Vec<Booking>> {
        let store = self.store.read();
        let mut bookings: Vec<Booking> = store
            .bookings
            .values()
            .filter(|b| user_id.map_or(true, |u| b.user_id == u))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.checkin_date, b.id.value()));
        Ok(bookings)
    }

    async fn find_overlapping(
        &self,
        property_id: PropertyId,
        checkin_day: NaiveDate,
        checkout_day: NaiveDate,
        exclude: Option<BookingId>,
    ) -> RepositoryResult<Option<Booking>> {
        let store = self.store.read();
        Ok(find_conflict(
            &store,
            property_id,
            checkin_day,
            checkout_day,
            exclude,
        ))
    }

    async fn create_booking(&self, record: BookingRecord) -> RepositoryResult<Booking> {
        let mut store = self.store.write();

        // Re-check under the write lock so no concurrent writer can slip a
        // conflicting booking between the engine's pre-check and this insert.
        let checkin_day = record.checkin_date.date_naive();
        let checkout_day = record.checkout_date.date_naive();
        if let Some(existing) = find_conflict(
            &store,
            record.property_id,
            checkin_day,
            checkout_day,
            None,
        ) {
            return Err(conflict_error(&existing, "create_booking"));
        }

        let booking = record.into_booking(BookingId::generate());
        store.bookings.insert(booking.id.value(), booking.clone());
        Ok(booking)
    }

    async fn update_booking(
        &self,
        id: BookingId,
        record: BookingRecord,
    ) -> RepositoryResult<Booking> {
        let mut store = self.store.write();

        if !store.bookings.contains_key(&id.value()) {
            return Err(RepositoryError::not_found_with_context(
                format!("booking {} does not exist", id),
                ErrorContext::new("update_booking")
                    .with_entity("booking")
                    .with_entity_id(id),
            ));
        }

        let checkin_day = record.checkin_date.date_naive();
        let checkout_day = record.checkout_date.date_naive();
        if let Some(existing) = find_conflict(
            &store,
            record.property_id,
            checkin_day,
            checkout_day,
            Some(id),
        ) {
            return Err(conflict_error(&existing, "update_booking"));
        }

        let booking = record.into_booking(id);
        store.bookings.insert(id.value(), booking.clone());
        Ok(booking)
    }

    async fn delete_booking(&self, id: BookingId) -> RepositoryResult<bool> {
        Ok(self.store.write().bookings.remove(&id.value()).is_some())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl PropertyRepository for LocalRepository {
    async fn fetch_property(&self, id: PropertyId) -> RepositoryResult<Option<Property>> {
        Ok(self.store.read().properties.get(&id.value()).cloned())
    }

    async fn upsert_property(&self, property: Property) -> RepositoryResult<Property> {
        self.store
            .write()
            .properties
            .insert(property.id.value(), property.clone());
        Ok(property)
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn fetch_user(&self, id: UserId) -> RepositoryResult<Option<User>> {
        Ok(self.store.read().users.get(&id.value()).cloned())
    }

    async fn upsert_user(&self, user: User) -> RepositoryResult<User> {
        self.store.write().users.insert(user.id.value(), user.clone());
        Ok(user)
    }
}
