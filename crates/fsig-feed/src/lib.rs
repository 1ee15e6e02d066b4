//! Signal feed adapter.
//!
//! Fetches the feed page, extracts trade rows by structural role and turns
//! them into `CandidateSignal`s that pass the instrument whitelist and the
//! confidence threshold. Document order is preserved.

pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod parser;
pub mod source;

pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use filter::{RowFilter, SkipReason};
pub use http::HttpSignalSource;
pub use parser::{parse_feed, RawFeedRow};
pub use source::{BoxFuture, DynSignalSource, ScriptedSignalSource, SignalSource};
