//! `invoke`: run one trigger event through the pipeline, print the reply.

use anyhow::{Context, Result};
use std::path::Path;
use tokio::io::AsyncReadExt;

use replicate_proxy_core::{handle_raw_event, PredictionBackend};
use replicate_proxy_types::Settings;

pub async fn run(
    event_path: Option<&Path>,
    settings: &Settings,
    backend: &dyn PredictionBackend,
) -> Result<()> {
    let raw = match event_path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read event from stdin")?;
            buf
        },
    };

    let reply = render(&raw, settings, backend).await?;
    println!("{}", reply);
    Ok(())
}

/// Handle `raw` and pretty-print the trigger reply.
async fn render(raw: &str, settings: &Settings, backend: &dyn PredictionBackend) -> Result<String> {
    let reply = handle_raw_event(raw, settings, backend).await;
    Ok(serde_json::to_string_pretty(&reply)?)
}
