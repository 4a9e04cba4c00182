use std::time::Duration;

use anyhow::Result;
use log::info;
use tuppari::{Client, Config};
use tuppari_core::{Context, OsEnv};
use tuppari_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let http = ReqwestHttpSend::with_timeouts(
        Some(Duration::from_secs(3)),
        Some(Duration::from_secs(10)),
    )?;
    let ctx = Context::new().with_http_send(http).with_env(OsEnv);

    // Reads TUPPARI_APPLICATION_ID, TUPPARI_ACCESS_KEY_ID,
    // TUPPARI_SECRET_ACCESS_KEY and optionally TUPPARI_ENDPOINT.
    let config = Config::new().from_env(&ctx);
    info!("loaded config: {config:?}");

    let client = Client::from_config(ctx, &config)?;
    let channel = client.join("general");

    let resp = channel.send("update", "Hello from tuppari!").await?;
    println!("published: {}", serde_json::Value::Object(resp));

    Ok(())
}
