//! Geocode Gateway Library
//!
//! Forwards a postal address to a third-party geocoding provider and hands
//! the resolved coordinates and formatted address back as JSON or XML.
//!
//! # Modules
//!
//! - `api`: Router and middleware.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `geocoding_client`: Geocoding provider client.
//! - `handlers`: HTTP request handlers.
//! - `models`: Query, result and provider wire models.
//! - `resolver`: Address resolution.

pub mod api;

// Re-export primary modules for shared use in tests and the binary
pub mod config;
pub mod errors;
pub mod geocoding_client;
pub mod handlers;
pub mod models;
pub mod resolver;
