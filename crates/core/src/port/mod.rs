// Port Layer - Interfaces for external dependencies

pub mod access_boundary;
pub mod participant_ledger;
pub mod queue_repository;
pub mod time_provider; // For deterministic testing
pub mod transaction;

// Re-exports
pub use access_boundary::AccessBoundary;
pub use participant_ledger::{LedgerTransaction, ParticipantLedger};
pub use queue_repository::QueueRepository;
pub use time_provider::{ManualTimeProvider, SystemTimeProvider, TimeProvider};
pub use transaction::Transaction;
