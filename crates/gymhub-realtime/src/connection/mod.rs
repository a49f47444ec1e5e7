//! Live channel connections.

pub mod subscription;
pub mod ws;
