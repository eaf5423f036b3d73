use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{bookings, properties, users};
use crate::api::{
    Booking, BookingId, BookingRecord, BookingStatus, Property, PropertyId, User, UserId,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PropertyRow {
    pub id: Uuid,
    pub title: String,
    pub max_guest_count: i32,
    pub price_per_night: f64,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub checkin_date: DateTime<Utc>,
    pub checkout_date: DateTime<Utc>,
    pub number_of_guests: i32,
    pub total_price: f64,
    pub booking_status: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            username: row.username,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            id: user.id.value(),
            username: user.username.clone(),
        }
    }
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Property {
            id: PropertyId::new(row.id),
            title: row.title,
            max_guest_count: row.max_guest_count,
            price_per_night: row.price_per_night,
        }
    }
}

impl From<&Property> for PropertyRow {
    fn from(property: &Property) -> Self {
        PropertyRow {
            id: property.id.value(),
            title: property.title.clone(),
            max_guest_count: property.max_guest_count,
            price_per_night: property.price_per_night,
        }
    }
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: BookingId::new(row.id),
            user_id: UserId::new(row.user_id),
            property_id: PropertyId::new(row.property_id),
            checkin_date: row.checkin_date,
            checkout_date: row.checkout_date,
            number_of_guests: row.number_of_guests,
            total_price: row.total_price,
            // The status column is constrained to the three known values;
            // fall back to the default rather than failing a read.
            booking_status: BookingStatus::parse_lenient(&row.booking_status).unwrap_or_default(),
        }
    }
}

impl BookingRow {
    pub fn from_record(id: BookingId, record: &BookingRecord) -> Self {
        BookingRow {
            id: id.value(),
            user_id: record.user_id.value(),
            property_id: record.property_id.value(),
            checkin_date: record.checkin_date,
            checkout_date: record.checkout_date,
            number_of_guests: record.number_of_guests,
            total_price: record.total_price,
            booking_status: record.booking_status.as_str().to_string(),
        }
    }
}
