//! End-to-end engine tests against the in-memory repository.

use stayhub_rust::api::{
    BookingStatus, CreateBookingRequest, Property, PropertyId, UpdateBookingRequest, User, UserId,
};
use stayhub_rust::db::repositories::LocalRepository;
use stayhub_rust::services::{booking_engine, BookingError};

/// Seed a repository with one user and one property (rate 100/night,
/// capacity 4).
async fn seed_repo() -> (LocalRepository, UserId, PropertyId) {
    let repo = LocalRepository::new();

    let user = User {
        id: UserId::generate(),
        username: "frequent-traveler".to_string(),
    };
    let property = Property {
        id: PropertyId::generate(),
        title: "Canal view apartment".to_string(),
        max_guest_count: 4,
        price_per_night: 100.0,
    };

    use stayhub_rust::db::repository::{PropertyRepository, UserRepository};
    repo.upsert_user(user.clone()).await.unwrap();
    repo.upsert_property(property.clone()).await.unwrap();

    (repo, user.id, property.id)
}

fn create_request(
    user_id: UserId,
    property_id: PropertyId,
    checkin: &str,
    checkout: &str,
    guests: i32,
) -> CreateBookingRequest {
    CreateBookingRequest {
        user_id,
        property_id,
        checkin_date: checkin.to_string(),
        checkout_date: checkout.to_string(),
        number_of_guests: guests,
        total_price: None,
        booking_status: None,
    }
}

#[tokio::test]
async fn create_computes_price_and_defaults_status() {
    let (repo, user_id, property_id) = seed_repo().await;

    let booking = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    // 3 nights x 100/night x 2 guests
    assert_eq!(booking.total_price, 600.0);
    assert_eq!(booking.booking_status, BookingStatus::Pending);
    assert_eq!(booking.number_of_guests, 2);
}

#[tokio::test]
async fn explicit_price_overrides_computed_amount() {
    let (repo, user_id, property_id) = seed_repo().await;

    let mut request = create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2);
    request.total_price = Some(150.0);

    let booking = booking_engine::create_booking(&repo, request).await.unwrap();
    assert_eq!(booking.total_price, 150.0);
}

#[tokio::test]
async fn overlapping_booking_is_rejected() {
    let (repo, user_id, property_id) = seed_repo().await;

    booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    // 12th < 13th: shares a night with the first stay
    let err = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-12", "2024-01-14", 2),
    )
    .await
    .unwrap_err();

    match err {
        BookingError::DateRangeConflict { checkin, checkout } => {
            assert_eq!(checkin.to_string(), "2024-01-10");
            assert_eq!(checkout.to_string(), "2024-01-13");
        }
        other => panic!("expected DateRangeConflict, got {other:?}"),
    }
}

#[tokio::test]
async fn adjacent_stays_do_not_conflict() {
    let (repo, user_id, property_id) = seed_repo().await;

    booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    // Checkout day of the first equals checkin day of the second
    let second = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-13", "2024-01-15", 2),
    )
    .await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn intraday_times_do_not_mask_overlaps() {
    let (repo, user_id, property_id) = seed_repo().await;

    booking_engine::create_booking(
        &repo,
        create_request(
            user_id,
            property_id,
            "2024-01-10T18:00:00Z",
            "2024-01-13T09:00:00Z",
            2,
        ),
    )
    .await
    .unwrap();

    // Different times of day, same overlapping day range
    let err = booking_engine::create_booking(
        &repo,
        create_request(
            user_id,
            property_id,
            "2024-01-12T23:00:00Z",
            "2024-01-14T01:00:00Z",
            2,
        ),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::DateRangeConflict { .. }));
}

#[tokio::test]
async fn updating_own_dates_never_self_conflicts() {
    let (repo, user_id, property_id) = seed_repo().await;

    let booking = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    // Shift the stay by one day; the new range overlaps the old one, which
    // must be excluded from the check
    let updated = booking_engine::update_booking(
        &repo,
        booking.id,
        UpdateBookingRequest {
            checkin_date: Some("2024-01-11".to_string()),
            checkout_date: Some("2024-01-14".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.checkin_date.date_naive().to_string(), "2024-01-11");
    assert_eq!(updated.checkout_date.date_naive().to_string(), "2024-01-14");
}

#[tokio::test]
async fn update_still_conflicts_with_other_bookings() {
    let (repo, user_id, property_id) = seed_repo().await;

    booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();
    let second = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-20", "2024-01-22", 2),
    )
    .await
    .unwrap();

    let err = booking_engine::update_booking(
        &repo,
        second.id,
        UpdateBookingRequest {
            checkin_date: Some("2024-01-11".to_string()),
            checkout_date: Some("2024-01-12".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::DateRangeConflict { .. }));
}

#[tokio::test]
async fn guest_count_over_capacity_is_rejected() {
    let (repo, user_id, property_id) = seed_repo().await;

    let err = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 5),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        BookingError::CapacityExceeded {
            requested: 5,
            maximum: 4
        }
    ));
}

#[tokio::test]
async fn guest_count_at_capacity_succeeds() {
    let (repo, user_id, property_id) = seed_repo().await;

    let booking = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 4),
    )
    .await
    .unwrap();
    assert_eq!(booking.number_of_guests, 4);
}

#[tokio::test]
async fn same_day_checkout_is_rejected() {
    let (repo, user_id, property_id) = seed_repo().await;

    let err = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-10", 2),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::InvalidStayDuration { .. }));
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let (repo, user_id, property_id) = seed_repo().await;

    let err = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "next tuesday", "2024-01-13", 2),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::InvalidDateFormat { .. }));
}

#[tokio::test]
async fn unknown_status_on_create_defaults_to_pending() {
    let (repo, user_id, property_id) = seed_repo().await;

    let mut request = create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2);
    request.booking_status = Some("archived".to_string());

    let booking = booking_engine::create_booking(&repo, request).await.unwrap();
    assert_eq!(booking.booking_status, BookingStatus::Pending);
}

#[tokio::test]
async fn unknown_status_on_update_keeps_previous_value() {
    let (repo, user_id, property_id) = seed_repo().await;

    let mut request = create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2);
    request.booking_status = Some("confirmed".to_string());
    let booking = booking_engine::create_booking(&repo, request).await.unwrap();

    let updated = booking_engine::update_booking(
        &repo,
        booking.id,
        UpdateBookingRequest {
            booking_status: Some("archived".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Silently ignored, no error raised
    assert_eq!(updated.booking_status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn update_without_price_recomputes_from_current_fields() {
    let (repo, user_id, property_id) = seed_repo().await;

    let mut request = create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2);
    request.total_price = Some(150.0);
    let booking = booking_engine::create_booking(&repo, request).await.unwrap();

    // Only the guest count changes; the price falls back to the computed
    // default for the unchanged stay
    let updated = booking_engine::update_booking(
        &repo,
        booking.id,
        UpdateBookingRequest {
            number_of_guests: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.number_of_guests, 3);
    assert_eq!(updated.total_price, 3.0 * 100.0 * 3.0);
    // Unsupplied fields keep their persisted values
    assert_eq!(updated.checkin_date, booking.checkin_date);
    assert_eq!(updated.checkout_date, booking.checkout_date);
    assert_eq!(updated.user_id, booking.user_id);
}

#[tokio::test]
async fn update_can_move_booking_to_another_property() {
    let (repo, user_id, property_id) = seed_repo().await;

    let other_property = Property {
        id: PropertyId::generate(),
        title: "Mountain cabin".to_string(),
        max_guest_count: 2,
        price_per_night: 80.0,
    };
    use stayhub_rust::db::repository::PropertyRepository;
    repo.upsert_property(other_property.clone()).await.unwrap();

    let booking = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    let updated = booking_engine::update_booking(
        &repo,
        booking.id,
        UpdateBookingRequest {
            property_id: Some(other_property.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.property_id, other_property.id);
    // Price recomputed against the new property's rate
    assert_eq!(updated.total_price, 3.0 * 80.0 * 2.0);

    // Capacity is checked against the target property
    let err = booking_engine::update_booking(
        &repo,
        booking.id,
        UpdateBookingRequest {
            number_of_guests: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        BookingError::CapacityExceeded {
            requested: 3,
            maximum: 2
        }
    ));
}

#[tokio::test]
async fn missing_references_are_not_found() {
    let (repo, user_id, property_id) = seed_repo().await;

    let err = booking_engine::create_booking(
        &repo,
        create_request(UserId::generate(), property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, BookingError::NotFound { entity: "user", .. }));

    let err = booking_engine::create_booking(
        &repo,
        create_request(user_id, PropertyId::generate(), "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        BookingError::NotFound {
            entity: "property",
            ..
        }
    ));

    let err = booking_engine::update_booking(
        &repo,
        stayhub_rust::api::BookingId::generate(),
        UpdateBookingRequest::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        BookingError::NotFound {
            entity: "booking",
            ..
        }
    ));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let (repo, user_id, property_id) = seed_repo().await;

    let booking = booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    let deleted = booking_engine::delete_booking(&repo, booking.id).await.unwrap();
    assert_eq!(deleted, booking.id);

    let err = booking_engine::get_booking(&repo, booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound { .. }));

    // Deleting again is a NotFound too
    let err = booking_engine::delete_booking(&repo, booking.id).await.unwrap_err();
    assert!(matches!(err, BookingError::NotFound { .. }));
}

#[tokio::test]
async fn list_bookings_filters_by_user() {
    let (repo, user_id, property_id) = seed_repo().await;

    let other_user = User {
        id: UserId::generate(),
        username: "weekend-guest".to_string(),
    };
    use stayhub_rust::db::repository::UserRepository;
    repo.upsert_user(other_user.clone()).await.unwrap();

    booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();
    booking_engine::create_booking(
        &repo,
        create_request(other_user.id, property_id, "2024-02-01", "2024-02-03", 1),
    )
    .await
    .unwrap();

    let all = booking_engine::list_bookings(&repo, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = booking_engine::list_bookings(&repo, Some(user_id)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].user_id, user_id);

    // Filtering by an unknown user is a NotFound, not an empty list
    let err = booking_engine::list_bookings(&repo, Some(UserId::generate()))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::NotFound { entity: "user", .. }));
}

#[tokio::test]
async fn bookings_on_different_properties_do_not_conflict() {
    let (repo, user_id, property_id) = seed_repo().await;

    let other_property = Property {
        id: PropertyId::generate(),
        title: "City loft".to_string(),
        max_guest_count: 3,
        price_per_night: 120.0,
    };
    use stayhub_rust::db::repository::PropertyRepository;
    repo.upsert_property(other_property.clone()).await.unwrap();

    booking_engine::create_booking(
        &repo,
        create_request(user_id, property_id, "2024-01-10", "2024-01-13", 2),
    )
    .await
    .unwrap();

    // Identical dates on a different property are fine
    let second = booking_engine::create_booking(
        &repo,
        create_request(user_id, other_property.id, "2024-01-10", "2024-01-13", 2),
    )
    .await;
    assert!(second.is_ok());
}
