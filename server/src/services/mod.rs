//! Domain Services
//!
//! The managers that own all state-machine semantics. Each mutation is
//! one SQLite transaction; every manager re-validates table status
//! inside its own transaction before writing, and the partial unique
//! indexes act as the storage-layer backstop against races.

pub mod orders;
pub mod queue;
pub mod reservations;
pub mod tables;

pub use orders::OrdersService;
pub use queue::QueueService;
pub use reservations::ReservationsService;
pub use tables::TablesService;
