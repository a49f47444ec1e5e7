//! Bell-style view model over the notification store.
//!
//! Presentation never touches the transport or the live channel; it reads
//! the store and writes back only through `mark_read`.

pub mod bell;
pub mod style;

pub use bell::{Activation, NotificationBell, NotificationView};
pub use style::{KindStyle, Styled, relative_time};
