//! Async client for the Surmado reports API: create a report, poll it to a
//! terminal state, and fetch its result files.

mod client;
mod download;
pub mod error;
mod poll;
mod retry;

pub use client::ReportClient;
pub use error::ClientError;
pub use tokio_util::sync::CancellationToken;
