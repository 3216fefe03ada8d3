//! Domain entities for the SwapRunn marketplace.
//!
//! Each entity mirrors a row in the relational schema. Status enums carry
//! their wire representation (SCREAMING_SNAKE_CASE) and round-trip through
//! the database as text.

mod dealership;
mod driver;
mod job;
mod lifecycle;
mod message;
mod payment;
mod rating;
mod salesperson;
mod user;

pub use dealership::{Dealership, DealershipStatus};
pub use driver::Driver;
pub use job::{Job, JobStatus};
pub use lifecycle::JobLifecycle;
pub use message::Message;
pub use payment::{Payment, PaymentKind, PaymentStatus};
pub use rating::{Rating, MAX_SCORE, MIN_SCORE};
pub use salesperson::Salesperson;
pub use user::{User, UserRole};

use thiserror::Error;

/// Errors raised when decoding stored enum text back into domain enums.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown user role '{0}'")]
    UnknownRole(String),

    #[error("unknown job status '{0}'")]
    UnknownJobStatus(String),

    #[error("unknown dealership status '{0}'")]
    UnknownDealershipStatus(String),

    #[error("unknown payment status '{0}'")]
    UnknownPaymentStatus(String),

    #[error("unknown payment kind '{0}'")]
    UnknownPaymentKind(String),
}
