//! adaptest-core: adaptive session controller, mastery tracking and gateway traits.
//!
//! This crate defines the data model, the session state machine and the
//! mastery model that the rest of adaptest builds on. It performs no I/O of
//! its own; gateway implementations live in `adaptest-gateway`.

pub mod driver;
pub mod error;
pub mod history;
pub mod mastery;
pub mod model;
pub mod report;
pub mod session;
pub mod traits;

pub use error::{GatewayError, SessionError};
pub use session::{Advance, FetchOutcome, FetchTicket, SessionConfig, SessionController};
