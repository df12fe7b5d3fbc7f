//! adaptest-gateway: adaptive-question service clients.
//!
//! Implements the `QuestionGateway` trait over HTTP against the adaptive
//! question service, plus a scripted mock, and loads adaptest configuration.

pub mod config;
pub mod http;
pub mod mock;
mod wire;

pub use config::{create_gateway, load_config_from, AdaptestConfig, GatewayConfig};
pub use http::HttpQuestionGateway;
pub use mock::MockGateway;
