//! Wire-level data model for the planboard dashboard.
//!
//! Records mirror the backend's JSON shapes field for field: camelCase
//! names on the wire, snake_case in Rust via serde renames. Calendar
//! dates and timestamps are offset-less ISO 8601 strings (see
//! [`datetime`]); business numbers are `rust_decimal::Decimal`.

pub mod datetime;
pub mod dto;
pub mod record;

pub use dto::{Credentials, NewComment, NewPlan, NewReport, NewUser, UserPatch};
pub use record::{Comment, Document, Plan, QuarterlyReport, Role, User};
