use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, bail};
use log::info;
use organisation_groups::utils::logging::{create_spinner, finish_and_clear, finish_spinner};
use organisation_groups::{GeneratorConfig, JsonRunInput, OrganisationGroupGenerator};

const USAGE: &str = "Usage: generate-groups <run-input.json> [generator-config.json]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(input_path) = args.next().map(PathBuf::from) else {
        bail!(USAGE);
    };
    let config_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        bail!(USAGE);
    }

    let config = match &config_path {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    }
    .with_env_overrides()
    .context("Invalid generator configuration")?;
    info!("{config}");

    let input = JsonRunInput::from_json_file(&input_path)?;
    let (provider_versions, payment_organisations) = input.sources();

    let generator = OrganisationGroupGenerator::new(
        Arc::new(provider_versions),
        Arc::new(payment_organisations),
        config,
    )?;

    let start = Instant::now();
    let spinner = create_spinner(Some("Generating organisation groups"));
    let results = generator
        .generate_for_funding_configuration(
            &input.funding_configuration,
            &input.scoped_providers,
            &input.provider_version_id,
            input.provider_snapshot_id,
        )
        .await;
    match &results {
        Ok(groups) => finish_spinner(&spinner, Some(&format!("Generated {} groups", groups.len()))),
        Err(_) => finish_and_clear(&spinner),
    }

    let results = results.with_context(|| {
        format!(
            "Failed to generate organisation groups from {}",
            input_path.display()
        )
    })?;
    info!(
        "Generated {} organisation groups in {:?}",
        results.len(),
        start.elapsed()
    );

    let json = serde_json::to_string_pretty(&results).context("Failed to serialise results")?;
    println!("{json}");

    Ok(())
}
