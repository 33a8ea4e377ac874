//! Entities as the backend serves them.
//!
//! Only the fields the dashboard reads or masks are typed; everything else the
//! backend sends is kept in `extra` and written back out untouched.

pub mod hub;
pub mod machine;
pub mod store;
pub mod user;

pub use hub::{Hub, HubEvent};
pub use machine::Machine;
pub use store::{Store, StoreStatus};
pub use user::{Transaction, User};
