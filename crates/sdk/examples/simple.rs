//! Simple SDK Example
//!
//! Walks one user through a queue.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    WAITLIST_JWT_SECRET=dev cargo run --package waitlist-daemon
//!    ```
//!
//! 2. Run this example with tokens signed by the same secret:
//!    ```bash
//!    WAITLIST_ADMIN_TOKEN=... WAITLIST_TOKEN=... cargo run --example simple
//!    ```

use waitlist_sdk::{CreateQueue, WaitlistClient};

const URL: &str = "http://127.0.0.1:9630";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Waitlist SDK - Simple Example");
    println!("=============================\n");

    let admin = WaitlistClient::connect(URL, std::env::var("WAITLIST_ADMIN_TOKEN")?).await?;
    let user = WaitlistClient::connect(URL, std::env::var("WAITLIST_TOKEN")?).await?;

    // 1. Create a queue
    println!("1. Creating a queue...");
    let queue_id = admin
        .create_queue(CreateQueue {
            title: Some("Consultations".to_string()),
            duration_hours: Some(2),
            ..Default::default()
        })
        .await?;
    println!("   ✓ Queue {}\n", queue_id);

    // 2. Join
    println!("2. Joining...");
    let joined = user.join(queue_id, None).await?;
    println!("   ✓ Position {}\n", joined.position);

    // 3. Joining twice is rejected
    println!("3. Joining again...");
    match user.join(queue_id, None).await {
        Err(e) if e.is_already_joined() => println!("   ✓ Rejected: {}\n", e),
        other => println!("   ⚠ Unexpected: {:?}\n", other.map(|r| r.position)),
    }

    // 4. Serve the front
    println!("4. Shifting...");
    let shifted = admin.shift(queue_id).await?;
    println!("   ✓ Served {:?}\n", shifted.served_user_id);

    // 5. Queue is empty again
    let view = admin.participants(queue_id).await?;
    println!("5. {} participant(s) left", view.participants.len());

    println!("\n✓ Example completed successfully!");

    Ok(())
}
