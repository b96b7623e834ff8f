// NinjaRMM documentation explorer.
// Authenticates from the NINJA_* environment variables, fetches the OpenAPI
// document, and writes the tag-sorted index to ninja_api_docs.json. When the
// API declares the organizations operation, fetches it as a smoke check.

use std::fs;
use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use ninja_tools::Result;
use ninja_tools::ninja::{ClientConfig, NinjaClient, RequestOptions, Verb};

const OUTPUT_FILE: &str = "ninja_api_docs.json";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = ClientConfig::from_env()?;
    let mut client = NinjaClient::connect(config).await?;

    client.refresh_documentation().await?;
    let docs = client.sorted_docs()?;

    if let Some(op) = docs.operation("system", Verb::Get, "getOrganizations") {
        let path = op.path.clone();
        let organizations = client
            .request(Verb::Get, &path, RequestOptions::default())
            .await?;
        println!("{}", serde_json::to_string_pretty(&organizations)?);
    }

    fs::write(OUTPUT_FILE, serde_json::to_string_pretty(&docs)?)?;
    info!(file = OUTPUT_FILE, "sorted documentation written");

    Ok(())
}
