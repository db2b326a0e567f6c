//! Channel management example: create a channel, populate it, define a role.
//!
//! Expects `PTT_HOST`, `PTT_API_KEY`, `PTT_USERNAME`, `PTT_PASSWORD` in the
//! environment, like `basic_admin`.
//!
//! Run with: `cargo run --example channel_management`

use ptt_admin::{
    types::{ChannelFilter, UserAttributes},
    Client,
};
use serde_json::json;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("ptt_admin=debug,channel_management=info")
        .init();

    let mut client = Client::builder()
        .host(env::var("PTT_HOST")?)
        .api_key(env::var("PTT_API_KEY")?)
        .build()?;

    client
        .auth(&env::var("PTT_USERNAME")?, &env::var("PTT_PASSWORD")?)
        .await?;

    // A hidden group channel for dispatchers.
    client.add_channel("dispatch-demo", true, true).await?;

    // Two operators and a radio gateway.
    for name in ["demo-alice", "demo-bob"] {
        client
            .save_user(&UserAttributes::new(name).password("changeme"))
            .await?;
    }
    client
        .save_user(&UserAttributes::new("demo-bridge").password("changeme").gateway(true))
        .await?;
    client
        .add_to_channel("dispatch-demo", ["demo-alice", "demo-bob", "demo-bridge"])
        .await?;

    // Dispatchers may talk to everyone; drivers listen and call dispatch.
    client
        .save_channel_role(
            "dispatch-demo",
            "drivers",
            json!({ "listen_only": false, "no_disconnect": true, "to": ["dispatchers"] }),
        )
        .await?;
    client
        .add_to_channel_role("dispatch-demo", "drivers", ["demo-alice", "demo-bob"])
        .await?;

    let details = client
        .get_channels(&ChannelFilter::default().name("dispatch-demo"))
        .await?;
    println!("channel details: {:?}", details.field("channels"));

    // Clean up.
    client
        .delete_users(["demo-alice", "demo-bob", "demo-bridge"])
        .await?;
    client.delete_channels(["dispatch-demo"]).await?;
    client.logout().await?;
    Ok(())
}
