//! Resume Ninja usage client SDK.
//!
//! Used by the analysis workflow to record billable actions and by the
//! dashboard backend to read a user's usage summary and credit balance.
//!
//! # Example
//!
//! ```no_run
//! use ninja_usage_client::{NinjaUsageClient, RecordUsageRequest};
//!
//! # async fn example() -> Result<(), ninja_usage_client::ClientError> {
//! let client = NinjaUsageClient::new(
//!     "http://ninja-usage.internal:8080",
//!     "your-service-api-key",
//! )?;
//!
//! let recorded = client
//!     .report_usage(RecordUsageRequest::analysis(
//!         "0b6f5d2e-8c1a-4f3b-9d7e-2a4c6e8f0b1d",
//!         Some(87),
//!     ))
//!     .await?;
//! println!("recorded {}", recorded.event_id);
//!
//! let stats = client.get_stats("user-access-token").await?;
//! println!("{} credits left", stats.credits_remaining);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, NinjaUsageClient};
pub use error::ClientError;
pub use types::*;
