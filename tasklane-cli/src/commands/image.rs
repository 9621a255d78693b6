//! Image command handlers
//!
//! Each command builds a payload and hands it to one orchestrator run.

use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use tasklane_runner::{
    CompletedJob, Config, EditPayload, ImageModel, JobOrchestrator, PayloadBuilder,
    ProcessPayload, UpscalePayload,
};
use tracing::info;

/// Process a single image with a prompt
pub async fn process(
    config: &Config,
    file: PathBuf,
    prompt: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let payload = ProcessPayload::new(file, prompt);
    run(config, &payload, output).await
}

/// Edit an image with the chosen model
pub async fn edit(
    config: &Config,
    main_image: PathBuf,
    reference_image: Option<PathBuf>,
    prompt: String,
    model: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let payload = EditPayload {
        main_image,
        reference_image,
        prompt,
        model: model.parse::<ImageModel>()?,
    };
    run(config, &payload, output).await
}

/// Upscale a hosted image
pub async fn upscale(config: &Config, image_url: String, output: Option<PathBuf>) -> Result<()> {
    let payload = UpscalePayload::new(image_url);
    run(config, &payload, output).await
}

async fn run(
    config: &Config,
    payload: &dyn PayloadBuilder,
    output: Option<PathBuf>,
) -> Result<()> {
    let orchestrator = JobOrchestrator::with_client(config.client(payload.routes()), config);

    info!(
        "Running {} job against {} (poll every {:?}, up to {} polls)",
        payload.name(),
        config.base_url,
        orchestrator.policy().interval,
        orchestrator.policy().max_attempts
    );

    let completed = orchestrator.run(payload, output.as_deref()).await?;
    print_completed(payload.name(), &completed);

    Ok(())
}

fn print_completed(name: &str, completed: &CompletedJob) {
    let report = &completed.report;

    println!("{} {} job completed", "✓".green(), name.bold());
    if let Some(handle) = &report.handle {
        println!("  Request ID: {}", handle.to_string().cyan());
    }
    println!("  Polls:      {}", report.polls);
    println!(
        "  Duration:   {}s",
        report
            .completed_at
            .signed_duration_since(report.submitted_at)
            .num_seconds()
    );
    println!("  Source:     {}", completed.artifact.source_url.dimmed());
    println!(
        "  Saved to:   {}",
        completed.artifact.path.display().to_string().green()
    );

    let extra = report.result.artifacts().len().saturating_sub(1);
    if extra > 0 {
        println!(
            "{}",
            format!("  ({} more artifact(s) not downloaded)", extra).dimmed()
        );
    }
}
