//! Host-facing runtime for animation object swaps.
//!
//! Hosts build a [`SwapManager`] around their form registry, trigger a load
//! once at startup, and hand [`SwapHandle`]s to the interception points that
//! ask which form to attach.
//!
//! Modules are organized by responsibility:
//! - [`manager`] hosts the load phase, the manager builder, and the lookup handle
//! - [`rng`] provides the default thread-local random source
//! - [`config`] reads process-level settings from the environment
//! - [`logging`] installs the tracing subscriber
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod rng;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use logging::{LogConfig, init_logging};
pub use manager::{LoadStats, SwapHandle, SwapManager, SwapManagerBuilder, bootstrap};
pub use rng::ThreadRandom;
