pub mod app;
pub mod auth;
pub mod bookings;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod quiz;
pub mod sessions;
pub mod state;
pub mod telemetry;
pub mod users;
