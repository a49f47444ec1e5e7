//! Session capability passed explicitly to everything that needs the
//! current user, instead of reading ambient storage.

pub mod memory;
pub mod provider;

pub use memory::MemorySessionProvider;
pub use provider::{SessionProvider, StaticSessionProvider};
