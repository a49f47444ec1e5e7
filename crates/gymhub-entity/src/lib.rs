//! # gymhub-entity
//!
//! Domain entity models for the GymHub client. Every struct in this crate is
//! a value object exchanged with the backend or held by the session layer.
//! All entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod notification;
pub mod user;
