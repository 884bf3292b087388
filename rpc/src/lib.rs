//! HTTP API for the cashscope explorer.
//!
//! Provides endpoints for:
//! - Token reports (`GET /token/:id`)
//! - Liveness (`GET /health`)
//! - Prometheus metrics (`GET /metrics`)

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer, RpcState};
