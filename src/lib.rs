pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod hooks;
pub mod platform;
pub mod remote;
pub mod template;
pub mod ui;

pub use error::{GitRelayError, Result};
