//! Layout engine for flow graphs
//!
//! This module takes a [`FlowGraph`](crate::graph::FlowGraph), writes node and
//! flow geometry into it and produces the routed connectors.

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod routing;
pub mod types;

pub use config::{ConfigError, LayoutConfig};
pub use context::{LayoutContext, ProcessData};
pub use engine::{validate, LayoutCalculator, LayoutResult};
pub use error::LayoutError;
pub use routing::{ConnectionInfo, ConnectionSide, Endpoint};
pub use types::*;
