//! Resume Ninja Usage HTTP API Service.
//!
//! This crate provides the HTTP API for usage metering, including:
//!
//! - Per-user usage statistics (`GET /api/user/stats`)
//! - The credit balance feed for the dashboard (`GET /api/user/credits`)
//! - Usage event ingestion from the analysis workflow (`POST /api/usage/events`)
//!
//! # Authentication
//!
//! The service supports two authentication methods:
//!
//! 1. **Supabase access tokens** - For end-user requests, resolved by an [`IdentityProvider`]
//! 2. **Service API keys** - For service-to-service requests (the analysis workflow)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Health handler needs async for routing

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod headers;
pub mod identity;
pub mod routes;
pub mod state;
pub mod supabase;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use identity::{Identity, IdentityError, IdentityProvider};
pub use routes::create_router;
pub use state::AppState;
pub use supabase::SupabaseIdentity;
