//! Waitlist SDK - Rust Client Library
//!
//! Provides a convenient client for the Waitlist queue daemon.
//!
//! # Example
//!
//! ```no_run
//! use waitlist_sdk::{CreateQueue, WaitlistClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let admin = WaitlistClient::connect("http://127.0.0.1:9630", "<admin token>").await?;
//!
//!     let queue_id = admin
//!         .create_queue(CreateQueue {
//!             title: Some("Office hours".to_string()),
//!             duration_hours: Some(2),
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     let served = admin.shift(queue_id).await?;
//!     println!("Served: {:?}", served.served_user_id);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::WaitlistClient;
pub use error::{code, Result, SdkError};
pub use types::{
    CreateQueue, DeleteQueueResponse, JoinResponse, LeaveResponse, Participant,
    ParticipantsResponse, PositionResponse, Queue, ShiftResponse, UpdateQueue,
};
