//! # StayHub Rust Backend
//!
//! Booking availability and pricing engine for a short-term property
//! rental platform.
//!
//! This crate validates tentative reservations (date range, guest count,
//! optional price override) against a property snapshot and the existing
//! bookings for that property, and emits normalized records for
//! persistence. The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Date Normalization**: checkin/checkout truncated to UTC calendar
//!   days, nights derived as whole days
//! - **Overlap Detection**: half-open `[checkin, checkout)` day-range test,
//!   with an exclude-id escape hatch for in-place updates
//! - **Capacity & Pricing**: guest-capacity checks and
//!   nights × rate × guests price computation with an authoritative
//!   explicit-price override
//! - **HTTP API**: RESTful booking endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Entity identifiers and the public type surface
//! - [`models`]: Domain types (bookings, properties, users)
//! - [`services`]: The availability & pricing engine
//! - [`db`]: Repository pattern and persistence backends
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
