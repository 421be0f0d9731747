//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value and its metadata
//! - `DELETE /del/:key` - Delete a key
//! - `GET /exists/:key` - Check whether a live entry exists
//! - `GET /keys` - List cache keys
//! - `DELETE /clear` - Remove every cache entry
//! - `POST /cleanup` - Sweep expired entries now
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//!
//! [`serve`] runs the router with graceful shutdown.

pub mod handlers;
pub mod routes;
pub mod server;

pub use handlers::*;
pub use routes::create_router;
pub use server::serve;
