use crate::cli::TabulateArgs;
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use hostguest::engine::progress::ProgressReporter;
use hostguest::workflows;
use tracing::{info, warn};

pub fn run(args: TabulateArgs) -> Result<()> {
    let partial_config = PartialRunConfig::from_file(&args.overrides.config)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.overrides, args.output_dir.as_deref())?;

    if config.output_dir.exists() && !config.output_dir.is_dir() {
        return Err(CliError::Argument(format!(
            "Output path {} exists and is not a directory",
            config.output_dir.display()
        )));
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Tabulating measurements...");
    info!("Invoking the core tabulation workflow...");
    let tabulation = workflows::tabulate::run(&config.core_config, &reporter)?;

    let upper_bounds = &tabulation.derivation.upper_bounds;
    if !upper_bounds.ka.is_empty() {
        println!(
            "  Upper-bound Ka uncertainty used for: {}",
            upper_bounds.ka.join(", ")
        );
    }
    if !upper_bounds.dh.is_empty() {
        println!(
            "  Upper-bound DH uncertainty used for: {}",
            upper_bounds.dh.join(", ")
        );
    }
    if !tabulation.derivation.inconsistencies.is_empty() {
        warn!(
            "{} system(s) failed the DG = DH - TDS check; run 'hostguest check' for details.",
            tabulation.derivation.inconsistencies.len()
        );
    }

    let written = tabulation.write_to_dir(&config.output_dir)?;
    println!("✓ {} systems written to:", tabulation.table().len());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}
