pub mod aux_row;
pub mod breakpoints;
pub mod chrome;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod host;
pub mod observer;
pub mod stream;
pub mod types;

pub use aux_row::{AuxiliaryRowManager, OrderStrategy, TransposedRowSlot};
pub use breakpoints::BreakpointTracker;
pub use config::ReflowConfig;
pub use dom::MemoryHost;
pub use engine::TranspositionEngine;
pub use error::{ConfigError, HostError, ReflowError};
pub use host::ViewHost;
pub use observer::WidthObserver;
pub use stream::{CancellationToken, EventStream, Subscription};
pub use types::*;
