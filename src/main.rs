use anyhow::Result;
use chrono::{Datelike, Utc};
use cvmscraper::FormType;
use reqwest::Client;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Env-var driven demo: retrieve one sub-dataset and print a sample.
///
/// CVM_FORM (fca|fre|<form id>), CVM_DATASET, CVM_START, CVM_END.
#[tokio::main]
async fn main() -> Result<()> {
    // ─── init logging ────────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,cvmscraper=info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let form = env::var("CVM_FORM").unwrap_or_else(|_| "fca".into());
    let dataset = env::var("CVM_DATASET").unwrap_or_else(|_| "geral".into());
    let current = Utc::now().year();
    let start = env::var("CVM_START")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(current - 1);
    let end = env::var("CVM_END")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(current + 1);

    let client = Client::new();
    let form_type = match form.as_str() {
        "fca" => FormType::fca(),
        "fre" => FormType::fre(),
        other => FormType::discovered(&client, other).await?,
    };
    info!(form = %form_type.name, %dataset, start, end, "retrieving");

    let table = form_type.get_data(&client, &dataset, start, end).await?;
    info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "retrieval finished"
    );

    if !table.is_empty() {
        println!("{}", table.headers.join(";"));
        for row in table.rows.iter().take(10) {
            println!("{}", row.join(";"));
        }
    }
    Ok(())
}
