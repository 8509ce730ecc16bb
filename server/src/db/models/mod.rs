//! Domain Models
//!
//! Persisted entity shapes plus the create/update payloads and
//! read-side view types assembled by the repositories.

pub mod dining_table;
pub mod order;
pub mod queue_entry;
pub mod reservation;
pub mod user;

pub use dining_table::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableOverview, TableStatus,
    TableStatusUpdate,
};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderSummary, OrderUpdate,
    OrderView,
};
pub use queue_entry::{QueueEntry, QueueEntryView, QueuePosition};
pub use reservation::{
    Reservation, ReservationCreate, ReservationStatus, ReservationSummary, ReservationUpdate,
    ReservationView,
};
pub use user::{User, UserCreate, UserSummary};
