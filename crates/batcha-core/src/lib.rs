//! batcha core library
//!
//! Job definition templating, a line-based unified diff, local validation and
//! the AWS Batch operations behind the `batcha` CLI.

pub mod app;
pub mod batch;
pub mod casing;
pub mod config;
pub mod diff;
pub mod error;
pub mod template;
pub mod tfstate;
pub mod verify;

pub use app::{
    App, DiffOutcome, InitOptions, InitOutcome, LogsOptions, LogsOutput, RegisterOutcome,
    RunEvent, RunOptions, StatusReport,
};
pub use config::Config;
pub use diff::unified_diff;
pub use error::{BatchaError, BatchaResult};
pub use verify::{RegisterJobDefinitionInput, validate_input, verify_document};
