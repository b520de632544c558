//! Retry and backoff policy for model prefetch.
//!
//! This module encapsulates error classification (rate limiting vs anything
//! else) and exponential backoff decisions so the supervisor can treat the
//! whole acquisition as one best-effort call.

mod classify;
mod policy;
mod run;

pub use classify::{classify, FetchClass};
pub use policy::BackoffPolicy;
pub use run::acquire;
