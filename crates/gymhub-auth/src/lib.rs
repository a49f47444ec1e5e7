//! # gymhub-auth
//!
//! Session access and route protection for the GymHub client.
//!
//! ## Modules
//!
//! - `session`: the `SessionProvider` capability and its implementations
//! - `guard`: role-based route guard with forced password change handling

pub mod guard;
pub mod session;

pub use guard::{GuardDecision, RouteGuard, RouteRequirement};
pub use session::{MemorySessionProvider, SessionProvider, StaticSessionProvider};
