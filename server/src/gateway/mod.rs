//! Notification Fan-out
//!
//! Best-effort broadcast of state changes to live subscribers. Owns no
//! domain state: every notification fetches the current snapshot from
//! the store and publishes it on a named channel. A failed broadcast is
//! logged and swallowed — the triggering mutation already committed.

pub mod bus;
pub mod notifier;

pub use bus::{Gateway, GatewayMessage, user_channel};
pub use notifier::Notifier;
