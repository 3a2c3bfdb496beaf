// Domain Layer - Pure business logic and entities

pub mod caller;
pub mod error;
pub mod participant;
pub mod queue;

// Re-exports
pub use caller::Caller;
pub use error::DomainError;
pub use participant::{
    positions_are_contiguous, ParticipantId, Position, QueueParticipant, ShiftOutcome,
    UserId,
};
pub use queue::{AvailabilityId, GroupId, NewQueue, Queue, QueueId, TimeWindow, MILLIS_PER_HOUR};
