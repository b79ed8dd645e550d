//! Backend client for the planboard dashboard.
//!
//! The view layer never talks to the network itself; it consumes a
//! [`RecordSource`]. Two implementations ship here: [`HttpSource`]
//! against the real REST backend, and [`StaticSource`] over in-memory
//! collections for tests and offline runs.
//!
//! Every call takes a [`CancelToken`]. Issuing a fresh request for a
//! view and cancelling the token of the superseded one guarantees a
//! stale response can never overwrite newer state: a cancelled call
//! resolves to [`ClientError::Cancelled`] and its payload is dropped.

pub mod cancel;
pub mod details;
pub mod error;
pub mod http;
pub mod source;

pub use cancel::CancelToken;
pub use details::{report_details, ReportDetails};
pub use error::ClientError;
pub use http::HttpSource;
pub use source::{RecordSource, StaticSource};
