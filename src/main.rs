use anyhow::Result;
use clap::Parser;
use prompt_painter::app::App;
use prompt_painter::models::{Click, Config};
use prompt_painter::web;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "prompt-painter")]
#[command(about = "Refine a phrase into an image prompt and generate the image")]
struct CliArgs {
    /// Address to serve the page on; overrides BIND_ADDR.
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,

    /// Run a single interaction for TEXT and print the outcome instead of serving.
    #[arg(long, value_name = "TEXT")]
    once: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_painter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app = App::new(&config);

    if let Some(text) = args.once {
        return match app.handle(&Click::new(1, text)).await {
            Ok(Some(outcome)) => {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                error!("Interaction failed: {}", e);
                std::process::exit(1);
            }
        };
    }

    let bind_addr = args.bind.unwrap_or(config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Starting prompt-painter");

    if let Err(e) = web::serve(listener, Arc::new(app)).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
