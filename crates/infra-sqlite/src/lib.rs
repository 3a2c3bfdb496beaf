// Waitlist Infrastructure - SQLite Adapter
// Implements: QueueRepository, ParticipantLedger (+ LedgerTransaction)

mod connection;
mod error;
mod migration;
mod participant_ledger;
mod queue_repository;
mod transaction;

pub use connection::{busy_timeout_for, create_pool, create_pool_with};
pub use migration::run_migrations;
pub use participant_ledger::SqliteParticipantLedger;
pub use queue_repository::SqliteQueueRepository;
pub use transaction::SqliteLedgerTransaction;

// Note: sqlx::Error conversion is handled by `error::map_sqlx_error`
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
