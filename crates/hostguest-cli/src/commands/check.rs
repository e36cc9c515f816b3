use crate::cli::CheckArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use hostguest::engine::progress::ProgressReporter;
use hostguest::workflows;
use tracing::info;

pub fn run(args: CheckArgs) -> Result<()> {
    let config = PartialRunConfig::from_file(&args.overrides.config)?
        .merge_with_cli(&args.overrides, None)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Deriving systems without writing tables...");
    let derivation = workflows::tabulate::derive(&config.core_config, &reporter)?;

    println!("{} systems derived.", derivation.table.len());

    let upper_bounds = &derivation.upper_bounds;
    if upper_bounds.is_empty() {
        println!("No uncertainty was replaced by the upper bound.");
    } else {
        for (quantity, systems) in [("Ka", &upper_bounds.ka), ("DH", &upper_bounds.dh)] {
            if !systems.is_empty() {
                println!(
                    "Upper-bound {} uncertainty used for: {}",
                    quantity,
                    systems.join(", ")
                );
            }
        }
    }

    if derivation.inconsistencies.is_empty() {
        println!("All records satisfy DG = DH - TDS within tolerance.");
    } else {
        println!("Records failing DG = DH - TDS:");
        for inconsistency in &derivation.inconsistencies {
            println!(
                "  {:<12} |DG - (DH - TDS)| = {:.3} kcal/mol",
                inconsistency.system, inconsistency.residual
            );
        }
    }
    Ok(())
}
