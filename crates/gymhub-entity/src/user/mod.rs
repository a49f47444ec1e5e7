//! User and session domain entities.

pub mod role;
pub mod session;

pub use role::UserRole;
pub use session::Session;
