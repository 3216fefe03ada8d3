//! Persistent storage: SQLite pool, schema, migrations, entity queries.

pub mod database;
pub mod dealerships;
pub mod drivers;
pub mod jobs;
pub mod messages;
pub mod migrations;
pub mod payments;
pub mod ratings;
pub mod schema;
pub mod users;

pub use database::{Database, StoreError};
pub use dealerships::{DealershipFilter, DealershipListing, NewDealership};
pub use drivers::{DriverFilter, DriverListing};
pub use jobs::{JobFilter, JobListing, NewJob};
pub use messages::{MessageListing, NewMessage};
pub use migrations::{MigrationError, MigrationRunner};
pub use payments::{EarningsSummary, PaymentFilter, PaymentListing};
pub use ratings::{NewRating, RatingSheet};
pub use users::{DealershipSummary, NewUser, SalespersonAttachment, UserProfile};
