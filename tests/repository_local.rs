//! Repository-contract tests for the in-memory backend.

use chrono::{NaiveDate, TimeZone, Utc};

use stayhub_rust::api::{
    Booking, BookingId, BookingRecord, BookingStatus, Property, PropertyId, User, UserId,
};
use stayhub_rust::db::repositories::LocalRepository;
use stayhub_rust::db::repository::{BookingRepository, PropertyRepository, UserRepository};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(property_id: PropertyId, user_id: UserId, checkin: NaiveDate, checkout: NaiveDate) -> BookingRecord {
    BookingRecord {
        user_id,
        property_id,
        checkin_date: Utc.from_utc_datetime(&checkin.and_hms_opt(14, 0, 0).unwrap()),
        checkout_date: Utc.from_utc_datetime(&checkout.and_hms_opt(11, 0, 0).unwrap()),
        number_of_guests: 2,
        total_price: 400.0,
        booking_status: BookingStatus::Pending,
    }
}

async fn seeded_booking(repo: &LocalRepository, checkin: NaiveDate, checkout: NaiveDate) -> Booking {
    let property_id = PropertyId::generate();
    let user_id = UserId::generate();
    repo.create_booking(record(property_id, user_id, checkin, checkout))
        .await
        .unwrap()
}

#[tokio::test]
async fn find_overlapping_uses_half_open_ranges() {
    let repo = LocalRepository::new();
    let booking = seeded_booking(&repo, day(2024, 3, 10), day(2024, 3, 13)).await;
    let pid = booking.property_id;

    // Sharing at least one night is a hit
    let hit = repo
        .find_overlapping(pid, day(2024, 3, 12), day(2024, 3, 14), None)
        .await
        .unwrap();
    assert_eq!(hit.map(|b| b.id), Some(booking.id));

    // Touching at the boundary is not
    let before = repo
        .find_overlapping(pid, day(2024, 3, 8), day(2024, 3, 10), None)
        .await
        .unwrap();
    assert!(before.is_none());
    let after = repo
        .find_overlapping(pid, day(2024, 3, 13), day(2024, 3, 15), None)
        .await
        .unwrap();
    assert!(after.is_none());

    // A range fully containing the stay is a hit
    let containing = repo
        .find_overlapping(pid, day(2024, 3, 1), day(2024, 3, 31), None)
        .await
        .unwrap();
    assert!(containing.is_some());

    // Other properties are never considered
    let elsewhere = repo
        .find_overlapping(PropertyId::generate(), day(2024, 3, 12), day(2024, 3, 14), None)
        .await
        .unwrap();
    assert!(elsewhere.is_none());
}

#[tokio::test]
async fn find_overlapping_honors_the_exclusion() {
    let repo = LocalRepository::new();
    let booking = seeded_booking(&repo, day(2024, 3, 10), day(2024, 3, 13)).await;

    let excluded = repo
        .find_overlapping(
            booking.property_id,
            day(2024, 3, 11),
            day(2024, 3, 14),
            Some(booking.id),
        )
        .await
        .unwrap();
    assert!(excluded.is_none());
}

#[tokio::test]
async fn create_rejects_conflicting_write() {
    let repo = LocalRepository::new();
    let booking = seeded_booking(&repo, day(2024, 3, 10), day(2024, 3, 13)).await;

    // Same property, overlapping days: the write-time re-check fires even
    // though no pre-check ran
    let err = repo
        .create_booking(record(
            booking.property_id,
            booking.user_id,
            day(2024, 3, 12),
            day(2024, 3, 15),
        ))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn update_excludes_itself_from_the_conflict_check() {
    let repo = LocalRepository::new();
    let booking = seeded_booking(&repo, day(2024, 3, 10), day(2024, 3, 13)).await;

    let moved = repo
        .update_booking(
            booking.id,
            record(
                booking.property_id,
                booking.user_id,
                day(2024, 3, 11),
                day(2024, 3, 14),
            ),
        )
        .await
        .unwrap();
    assert_eq!(moved.checkin_date.date_naive(), day(2024, 3, 11));
}

#[tokio::test]
async fn update_missing_booking_is_not_found() {
    let repo = LocalRepository::new();
    let err = repo
        .update_booking(
            BookingId::generate(),
            record(
                PropertyId::generate(),
                UserId::generate(),
                day(2024, 3, 10),
                day(2024, 3, 13),
            ),
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let repo = LocalRepository::new();
    let booking = seeded_booking(&repo, day(2024, 3, 10), day(2024, 3, 13)).await;

    assert!(repo.delete_booking(booking.id).await.unwrap());
    assert!(!repo.delete_booking(booking.id).await.unwrap());
    assert!(repo.fetch_booking(booking.id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_bookings_sorts_by_checkin() {
    let repo = LocalRepository::new();
    let user_id = UserId::generate();
    let property_id = PropertyId::generate();

    let late = repo
        .create_booking(record(property_id, user_id, day(2024, 5, 20), day(2024, 5, 22)))
        .await
        .unwrap();
    let early = repo
        .create_booking(record(property_id, user_id, day(2024, 4, 1), day(2024, 4, 3)))
        .await
        .unwrap();

    let all = repo.list_bookings(None).await.unwrap();
    assert_eq!(
        all.iter().map(|b| b.id).collect::<Vec<_>>(),
        vec![early.id, late.id]
    );

    let filtered = repo.list_bookings(Some(UserId::generate())).await.unwrap();
    assert!(filtered.is_empty());
}

#[tokio::test]
async fn upserts_replace_existing_rows() {
    let repo = LocalRepository::new();

    let mut property = Property {
        id: PropertyId::generate(),
        title: "Old title".to_string(),
        max_guest_count: 2,
        price_per_night: 90.0,
    };
    repo.upsert_property(property.clone()).await.unwrap();
    property.title = "New title".to_string();
    property.max_guest_count = 6;
    repo.upsert_property(property.clone()).await.unwrap();

    let fetched = repo.fetch_property(property.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "New title");
    assert_eq!(fetched.max_guest_count, 6);

    let mut user = User {
        id: UserId::generate(),
        username: "before".to_string(),
    };
    repo.upsert_user(user.clone()).await.unwrap();
    user.username = "after".to_string();
    repo.upsert_user(user.clone()).await.unwrap();

    let fetched = repo.fetch_user(user.id).await.unwrap().unwrap();
    assert_eq!(fetched.username, "after");
}

#[tokio::test]
async fn health_check_reports_ready() {
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());
}
