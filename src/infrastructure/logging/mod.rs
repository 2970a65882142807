//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, with JSON or
//! pretty output, optional daily-rolled files, and secret scrubbing on
//! every writer.

pub mod config;
pub mod logger;
pub mod secret_scrubbing;

pub use config::{LogConfig, LogFormat};
pub use logger::LoggerImpl;
pub use secret_scrubbing::{ScrubbingMakeWriter, SecretScrubber};
