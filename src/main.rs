use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use streaming_asr_client::{Cli, GrpcConnector, SessionOrchestrator, Settings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;
    let session_config = settings.session_config()?;

    println!("Number of clients: {}", settings.num_clients);
    println!("Number of iterations: {}", settings.num_iterations);
    println!("Input file: {}", session_config.input_file.display());
    info!("Recognition service: {}", settings.service_uri);

    let connector = GrpcConnector::new(settings.service_uri.clone());
    let orchestrator = SessionOrchestrator::new(session_config, settings.num_clients, connector);
    let summary = orchestrator.run().await;

    for (session_id, e) in summary.failures() {
        println!("Session {} failed ({}): {}", session_id, e.kind(), e);
    }
    println!(
        "{} sessions done, output written to {}",
        summary.num_sessions(),
        settings.output_dir.join("output_<id>.txt").display()
    );

    if summary.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
