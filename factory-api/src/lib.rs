//! # Factory API Server Library
//!
//! REST transport over the `factory-shared` service.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON body extractor with API-shaped rejections
//! - `fixtures`: Optional data applied at startup
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod fixtures;
pub mod routes;
