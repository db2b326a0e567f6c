//! Basic example: authenticate, list users, end the session.
//!
//! Expects the server coordinates in environment variables:
//! `PTT_HOST`, `PTT_API_KEY`, `PTT_USERNAME`, `PTT_PASSWORD`.
//!
//! Run with: `cargo run --example basic_admin`

use ptt_admin::{types::UserFilter, Client};
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("ptt_admin=debug,basic_admin=info")
        .init();

    let mut client = Client::builder()
        .host(env::var("PTT_HOST")?)
        .api_key(env::var("PTT_API_KEY")?)
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()?;

    client
        .auth(&env::var("PTT_USERNAME")?, &env::var("PTT_PASSWORD")?)
        .await?;
    println!("authenticated, session id: {:?}", client.session_id());

    let response = client.get_users(&UserFilter::default().max(25)).await?;
    if let Some(users) = response.field("users").and_then(|v| v.as_array()) {
        println!("{} users:", users.len());
        for user in users {
            if let Some(name) = user.get("name").and_then(|v| v.as_str()) {
                println!("  {name}");
            }
        }
    }
    println!("fetched over {} in {:?}", response.url, response.latency);

    client.logout().await?;
    println!("session ended");
    Ok(())
}
