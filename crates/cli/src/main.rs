//! Waitlist CLI - Command-line interface for the Waitlist queue service

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";

#[derive(Parser)]
#[command(name = "waitlist")]
#[command(about = "Waitlist queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "WAITLIST_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Access token sent with every request
    #[arg(long, env = "WAITLIST_TOKEN", hide_env_values = true)]
    token: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List queues, most recent first
    Queues,

    /// Show one queue and its participants
    Show { queue_id: i64 },

    /// Create a queue (admin)
    Create {
        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        group: Option<i64>,

        #[arg(long)]
        availability: Option<i64>,

        /// Window start, epoch ms (default: now)
        #[arg(long)]
        start: Option<i64>,

        /// Window end, epoch ms
        #[arg(long, conflicts_with = "hours")]
        end: Option<i64>,

        /// Window length in hours when no end is given
        #[arg(long)]
        hours: Option<i64>,
    },

    /// Replace a queue's title, availability and window (admin)
    Update {
        queue_id: i64,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        availability: Option<i64>,

        #[arg(long)]
        start: i64,

        #[arg(long)]
        end: i64,
    },

    /// Delete a queue and its participants (admin)
    Delete { queue_id: i64 },

    /// Join a queue
    Join {
        queue_id: i64,

        /// Join on behalf of another user (admin)
        #[arg(long)]
        user: Option<i64>,
    },

    /// Leave a queue
    Leave {
        queue_id: i64,

        /// Remove another user (admin)
        #[arg(long)]
        user: Option<i64>,
    },

    /// List active participants in order
    Participants { queue_id: i64 },

    /// Show a position in a queue
    Position {
        queue_id: i64,

        #[arg(long)]
        user: Option<i64>,
    },

    /// Serve the front of a queue (admin)
    Shift { queue_id: i64 },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct QueueResult {
    id: i64,
    title: Option<String>,
    group_id: Option<i64>,
    availability_id: Option<i64>,
    time_start: i64,
    time_end: i64,
}

#[derive(Tabled)]
struct QueueRow {
    id: i64,
    title: String,
    group: String,
    availability: String,
    start: String,
    end: String,
}

impl From<QueueResult> for QueueRow {
    fn from(q: QueueResult) -> Self {
        Self {
            id: q.id,
            title: q.title.unwrap_or_else(|| "-".to_string()),
            group: optional(q.group_id),
            availability: optional(q.availability_id),
            start: timestamp(q.time_start),
            end: timestamp(q.time_end),
        }
    }
}

#[derive(Deserialize)]
struct ParticipantResult {
    user_id: i64,
    position: i64,
    joined_at: i64,
}

#[derive(Tabled)]
struct ParticipantRow {
    position: i64,
    user: i64,
    joined: String,
}

impl From<ParticipantResult> for ParticipantRow {
    fn from(p: ParticipantResult) -> Self {
        Self {
            position: p.position,
            user: p.user_id,
            joined: timestamp(p.joined_at),
        }
    }
}

fn optional(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

struct RpcClient {
    url: String,
    token: String,
    http: reqwest::Client,
}

impl RpcClient {
    async fn call(&self, method: &str, mut params: serde_json::Value) -> Result<serde_json::Value> {
        params["access_token"] = json!(self.token);

        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to daemon")?
            .json()
            .await
            .context("Failed to parse response")?;

        if let Some(error) = response.error {
            anyhow::bail!("RPC error ({}): {}", error.code, error.message);
        }

        response
            .result
            .ok_or_else(|| anyhow::anyhow!("No result in response"))
    }

    async fn participants(&self, queue_id: i64) -> Result<Vec<ParticipantRow>> {
        let result = self
            .call("queue.participants.v1", json!({ "queue_id": queue_id }))
            .await?;
        let participants: Vec<ParticipantResult> =
            serde_json::from_value(result["participants"].clone())?;
        Ok(participants.into_iter().map(Into::into).collect())
    }
}

fn print_participants(rows: Vec<ParticipantRow>) {
    if rows.is_empty() {
        println!("{}", "Queue is empty".yellow());
    } else {
        println!("{}", Table::new(rows));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let rpc = RpcClient {
        url: cli.rpc_url,
        token: cli.token,
        http: reqwest::Client::new(),
    };

    match cli.command {
        Commands::Queues => {
            let result = rpc.call("queue.list.v1", json!({})).await?;
            let queues: Vec<QueueResult> = serde_json::from_value(result["queues"].clone())?;

            if queues.is_empty() {
                println!("{}", "No queues".yellow());
            } else {
                let rows: Vec<QueueRow> = queues.into_iter().map(Into::into).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Show { queue_id } => {
            let result = rpc.call("queue.get.v1", json!({ "queue_id": queue_id })).await?;
            let queue: QueueResult = serde_json::from_value(result)?;

            println!("{}", Table::new(vec![QueueRow::from(queue)]));
            println!();
            print_participants(rpc.participants(queue_id).await?);
        }

        Commands::Create {
            title,
            group,
            availability,
            start,
            end,
            hours,
        } => {
            let params = json!({
                "title": title,
                "group_id": group,
                "availability_id": availability,
                "time_start": start,
                "time_end": end,
                "duration_hours": hours,
            });

            let result = rpc.call("queue.create.v1", params).await?;
            println!(
                "{}",
                format!("✓ Queue {} created", result["queue_id"]).green().bold()
            );
        }

        Commands::Update {
            queue_id,
            title,
            availability,
            start,
            end,
        } => {
            let params = json!({
                "queue_id": queue_id,
                "title": title,
                "availability_id": availability,
                "time_start": start,
                "time_end": end,
            });

            let result = rpc.call("queue.update.v1", params).await?;
            let queue: QueueResult = serde_json::from_value(result)?;

            println!("{}", format!("✓ Queue {} updated", queue_id).green().bold());
            println!("{}", Table::new(vec![QueueRow::from(queue)]));
        }

        Commands::Delete { queue_id } => {
            rpc.call("queue.delete.v1", json!({ "queue_id": queue_id }))
                .await?;
            println!("{}", format!("✓ Queue {} deleted", queue_id).green().bold());
        }

        Commands::Join { queue_id, user } => {
            let result = rpc
                .call("queue.join.v1", json!({ "queue_id": queue_id, "user_id": user }))
                .await?;
            println!(
                "{}",
                format!(
                    "✓ User {} joined queue {} at position {}",
                    result["user_id"], queue_id, result["position"]
                )
                .green()
                .bold()
            );
        }

        Commands::Leave { queue_id, user } => {
            let result = rpc
                .call("queue.leave.v1", json!({ "queue_id": queue_id, "user_id": user }))
                .await?;
            println!(
                "{}",
                format!("✓ User {} left queue {}", result["user_id"], queue_id)
                    .green()
                    .bold()
            );
        }

        Commands::Participants { queue_id } => {
            println!("{}", format!("Queue {}", queue_id).cyan().bold());
            print_participants(rpc.participants(queue_id).await?);
        }

        Commands::Position { queue_id, user } => {
            let result = rpc
                .call("queue.position.v1", json!({ "queue_id": queue_id, "user_id": user }))
                .await?;
            println!(
                "  {} {}",
                format!("User {} position:", result["user_id"]).bold(),
                result["position"]
            );
        }

        Commands::Shift { queue_id } => {
            let result = rpc
                .call("queue.shift.v1", json!({ "queue_id": queue_id }))
                .await?;

            match result["served_user_id"].as_i64() {
                Some(user_id) => println!("  {} Served user {}", "✓".green(), user_id),
                None => println!("  ○ Front position was empty"),
            }
            println!("  {} {} participant(s) moved up", "✓".green(), result["compacted"]);
        }
    }

    Ok(())
}
