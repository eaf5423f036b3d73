#[cfg(test)]
mod tests {
    use crate::api::{Property, PropertyId};
    use crate::services::booking_engine::{check_capacity, resolve_price};
    use crate::services::error::BookingError;
    use crate::services::stay::Stay;

    fn test_property(max_guests: i32, rate: f64) -> Property {
        Property {
            id: PropertyId::generate(),
            title: "Seaside cottage".to_string(),
            max_guest_count: max_guests,
            price_per_night: rate,
        }
    }

    fn three_night_stay() -> Stay {
        Stay::normalize("2024-01-10", "2024-01-13").unwrap()
    }

    #[test]
    fn capacity_at_maximum_succeeds() {
        let property = test_property(4, 100.0);
        assert!(check_capacity(4, &property).is_ok());
    }

    #[test]
    fn capacity_over_maximum_fails() {
        let property = test_property(4, 100.0);
        let err = check_capacity(5, &property).unwrap_err();
        assert!(matches!(
            err,
            BookingError::CapacityExceeded {
                requested: 5,
                maximum: 4
            }
        ));
    }

    #[test]
    fn explicit_price_is_accepted_verbatim() {
        // 150 disagrees with nights * rate * guests (600) and is still kept
        let price = resolve_price(Some(150.0), &three_night_stay(), 100.0, 2).unwrap();
        assert_eq!(price, 150.0);
    }

    #[test]
    fn omitted_price_computes_nights_times_rate_times_guests() {
        let price = resolve_price(None, &three_night_stay(), 100.0, 2).unwrap();
        assert_eq!(price, 600.0);
    }

    #[test]
    fn non_positive_explicit_price_is_rejected() {
        for value in [0.0, -10.0] {
            let err = resolve_price(Some(value), &three_night_stay(), 100.0, 2).unwrap_err();
            assert!(matches!(err, BookingError::InvalidPrice { .. }));
        }
    }

    #[test]
    fn non_finite_explicit_price_is_rejected() {
        for value in [f64::NAN, f64::INFINITY] {
            let err = resolve_price(Some(value), &three_night_stay(), 100.0, 2).unwrap_err();
            assert!(matches!(err, BookingError::InvalidPrice { .. }));
        }
    }
}
