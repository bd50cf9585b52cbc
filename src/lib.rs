//! Storefront Backend Library
//!
//! Users, catalog and orders over HTTP, backed by SQLite.
//! Exposes every module for the server binary and integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod filter;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;
