//! Nutrition facts for food items, served from an in-memory copy of a JSON
//! food database.
//!
//! The [`store`] module owns the data and all lookup and calculation logic;
//! [`api`] maps HTTP endpoints onto it.

pub mod api;
pub mod config;
pub mod models;
pub mod store;
