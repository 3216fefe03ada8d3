//! Database schema constants.
//!
//! All SQL schema definitions for the SQLite storage backend live here so
//! the migration runner can apply them in dependency order.

/// SQL schema for creating the users table.
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    name TEXT NOT NULL,
    phone TEXT,
    role TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the dealerships table.
pub const CREATE_DEALERSHIPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS dealerships (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    contact_email TEXT NOT NULL,
    phone TEXT,
    status TEXT NOT NULL DEFAULT 'PENDING',
    rejection_reason TEXT,
    admin_id TEXT NOT NULL REFERENCES users(id),
    approved_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the salespeople table.
pub const CREATE_SALESPEOPLE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS salespeople (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    dealership_id TEXT NOT NULL REFERENCES dealerships(id),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the drivers table.
pub const CREATE_DRIVERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS drivers (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    license_number TEXT NOT NULL,
    radius_miles INTEGER NOT NULL,
    average_rating REAL NOT NULL DEFAULT 0,
    completed_jobs INTEGER NOT NULL DEFAULT 0,
    verified INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the jobs table.
pub const CREATE_JOBS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id TEXT PRIMARY KEY,
    salesperson_id TEXT NOT NULL REFERENCES salespeople(id),
    driver_id TEXT REFERENCES drivers(id),
    status TEXT NOT NULL DEFAULT 'OPEN',
    vehicle_info TEXT NOT NULL,
    vin TEXT,
    pickup_location TEXT NOT NULL,
    dropoff_location TEXT NOT NULL,
    scheduled_at TEXT,
    amount_cents INTEGER NOT NULL,
    notes TEXT,
    pickup_proof TEXT,
    delivery_proof TEXT,
    accepted_at TEXT,
    started_at TEXT,
    completed_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the payments table.
pub const CREATE_PAYMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS payments (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL REFERENCES jobs(id),
    driver_id TEXT NOT NULL REFERENCES drivers(id),
    amount_cents INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'PENDING',
    kind TEXT NOT NULL DEFAULT 'JOB_COMPLETION',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the ratings table.
pub const CREATE_RATINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ratings (
    id TEXT PRIMARY KEY,
    job_id TEXT NOT NULL REFERENCES jobs(id),
    driver_id TEXT NOT NULL REFERENCES drivers(id),
    score INTEGER NOT NULL CHECK (score BETWEEN 1 AND 5),
    comment TEXT,
    created_at TEXT NOT NULL
)
"#;

/// SQL schema for creating the messages table.
pub const CREATE_MESSAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    sender_id TEXT NOT NULL REFERENCES users(id),
    recipient_id TEXT NOT NULL REFERENCES users(id),
    job_id TEXT REFERENCES jobs(id),
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL for creating all required indexes.
pub const CREATE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_dealerships_status ON dealerships(status);
CREATE INDEX IF NOT EXISTS idx_salespeople_dealership_id ON salespeople(dealership_id);
CREATE INDEX IF NOT EXISTS idx_drivers_average_rating ON drivers(average_rating);
CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status);
CREATE INDEX IF NOT EXISTS idx_jobs_salesperson_id ON jobs(salesperson_id);
CREATE INDEX IF NOT EXISTS idx_jobs_driver_id ON jobs(driver_id);
CREATE INDEX IF NOT EXISTS idx_payments_driver_id ON payments(driver_id);
CREATE INDEX IF NOT EXISTS idx_payments_job_id ON payments(job_id);
CREATE INDEX IF NOT EXISTS idx_ratings_driver_id ON ratings(driver_id);
CREATE INDEX IF NOT EXISTS idx_messages_job_id ON messages(job_id);
CREATE INDEX IF NOT EXISTS idx_messages_sender_recipient ON messages(sender_id, recipient_id)
"#;

/// Returns all schema creation statements in the correct order.
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_USERS_TABLE,
        CREATE_DEALERSHIPS_TABLE,
        CREATE_SALESPEOPLE_TABLE,
        CREATE_DRIVERS_TABLE,
        CREATE_JOBS_TABLE,
        CREATE_PAYMENTS_TABLE,
        CREATE_RATINGS_TABLE,
        CREATE_MESSAGES_TABLE,
        CREATE_INDEXES,
    ]
}

/// Table names in the schema.
pub mod tables {
    /// Users table name.
    pub const USERS: &str = "users";
    /// Dealerships table name.
    pub const DEALERSHIPS: &str = "dealerships";
    /// Salespeople table name.
    pub const SALESPEOPLE: &str = "salespeople";
    /// Drivers table name.
    pub const DRIVERS: &str = "drivers";
    /// Jobs table name.
    pub const JOBS: &str = "jobs";
    /// Payments table name.
    pub const PAYMENTS: &str = "payments";
    /// Ratings table name.
    pub const RATINGS: &str = "ratings";
    /// Messages table name.
    pub const MESSAGES: &str = "messages";
}
