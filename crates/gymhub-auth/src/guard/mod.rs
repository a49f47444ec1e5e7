//! Role-based route protection.

pub mod route;

pub use route::{GuardDecision, RouteGuard, RouteRequirement};
