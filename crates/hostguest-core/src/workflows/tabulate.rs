use crate::core::io::dataset::MeasurementDataset;
use crate::core::io::delimited::render_delimited;
use crate::core::io::error::RenderError;
use crate::core::io::identifiers::{GuestCatalog, HostCatalog};
use crate::core::io::json::render_json;
use crate::core::io::latex::render_latex;
use crate::core::models::record::MeasurementTable;
use crate::engine::config::{GuestSet, TabulationConfig};
use crate::engine::derive::{Derivation, derive_all};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const JSON_FILE_NAME: &str = "experimental_measurements.json";
pub const CSV_FILE_NAME: &str = "experimental_measurements.csv";
pub const LATEX_DIR_NAME: &str = "PDFTable";
pub const LATEX_FILE_NAME: &str = "experimental_measurements.tex";

/// The three renderings of one finalized table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTables {
    pub json: String,
    pub csv: String,
    pub latex: String,
}

impl RenderedTables {
    pub fn render(table: &MeasurementTable, temperature_kelvin: f64) -> Result<Self, RenderError> {
        Ok(Self {
            json: render_json(table)?,
            csv: render_delimited(table)?,
            latex: render_latex(table, temperature_kelvin)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Tabulation {
    pub derivation: Derivation,
    pub rendered: RenderedTables,
}

impl Tabulation {
    pub fn table(&self) -> &MeasurementTable {
        &self.derivation.table
    }

    /// Writes the JSON and delimited files into `dir` and the LaTeX document into
    /// `dir/PDFTable`, creating directories as needed. Returns the written paths.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
        let latex_dir = dir.join(LATEX_DIR_NAME);
        fs::create_dir_all(&latex_dir).map_err(|e| EngineError::Output {
            path: latex_dir.to_string_lossy().to_string(),
            source: e,
        })?;

        let outputs = [
            (dir.join(JSON_FILE_NAME), &self.rendered.json),
            (dir.join(CSV_FILE_NAME), &self.rendered.csv),
            (latex_dir.join(LATEX_FILE_NAME), &self.rendered.latex),
        ];
        let mut written = Vec::with_capacity(outputs.len());
        for (path, content) in outputs {
            fs::write(&path, content).map_err(|e| EngineError::Output {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            info!("Wrote {:?}", path);
            written.push(path);
        }
        Ok(written)
    }
}

/// Builds the host-to-guest lookup from every configured guest set.
pub fn load_host_catalog(guest_sets: &[GuestSet]) -> Result<HostCatalog, EngineError> {
    let mut hosts = HostCatalog::new();
    for set in guest_sets {
        let catalog = GuestCatalog::load(&set.smiles_path, &set.names_path)?;
        hosts.insert(set.hosts.iter().cloned(), catalog);
    }
    let mut names: Vec<&str> = hosts.hosts().collect();
    names.sort_unstable();
    debug!("Guest catalogs loaded for hosts: {}", names.join(", "));
    Ok(hosts)
}

/// Loads inputs and derives every system without rendering anything.
#[instrument(skip_all, name = "derivation_workflow")]
pub fn derive(
    config: &TabulationConfig,
    reporter: &ProgressReporter,
) -> Result<Derivation, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Loading inputs",
    });
    let hosts = load_host_catalog(&config.guest_sets)?;
    let dataset = MeasurementDataset::load(&config.measurements_path)?;
    info!(
        "Loaded {} systems from {:?}",
        dataset.len(),
        config.measurements_path
    );
    reporter.report(Progress::PhaseFinish);

    let derivation = derive_all(&dataset, &hosts, &config.derivation, reporter)?;
    if !derivation.inconsistencies.is_empty() {
        reporter.report(Progress::Message(format!(
            "{} system(s) fail the DG = DH - TDS check",
            derivation.inconsistencies.len()
        )));
    }
    Ok(derivation)
}

/// Derives every system and renders all three tables. Nothing is written to disk; see
/// [`Tabulation::write_to_dir`].
#[instrument(skip_all, name = "tabulation_workflow")]
pub fn run(config: &TabulationConfig, reporter: &ProgressReporter) -> Result<Tabulation, EngineError> {
    let derivation = derive(config, reporter)?;

    reporter.report(Progress::PhaseStart {
        name: "Rendering tables",
    });
    let rendered = RenderedTables::render(
        &derivation.table,
        config.derivation.conditions.temperature_kelvin,
    )?;
    reporter.report(Progress::PhaseFinish);

    info!("Tabulated {} systems.", derivation.table.len());
    Ok(Tabulation {
        derivation,
        rendered,
    })
}
