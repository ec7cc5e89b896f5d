//! # Factory Shared Library
//!
//! Domain types, persistence and business logic for the Factory backend.
//! The API server is a thin transport over the `business::Service` defined
//! here.
//!
//! ## Module Organization
//!
//! - `models`: Users, organizations, teams, roles and memberships
//! - `store`: Transactional persistence traits with Postgres and in-memory backends
//! - `db`: Embedded schema migrations
//! - `auth`: Caller identity forwarded by the identity gateway
//! - `business`: Registration workflow and the service façade

pub mod auth;
pub mod business;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Factory shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
