use super::config::DerivationConfig;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::io::dataset::{EntropyConvention, MeasurementDataset, SystemEntry};
use crate::core::io::identifiers::HostCatalog;
use crate::core::models::measurement::{Measurement, Value};
use crate::core::models::record::{MeasurementTable, SystemRecord};
use crate::core::thermo::DerivationError;
use crate::core::thermo::conversion::{
    association_constant_from_free_energy, association_from_dissociation,
    entropy_from_free_energy_and_enthalpy, free_energy_from_association_constant,
};
use crate::core::thermo::replicates::{combine_association_replicates, combine_enthalpy_replicates};
use crate::core::thermo::rounding::round_estimate;
use crate::core::thermo::titrant::inflate_for_titrant_error;
use tracing::{debug, info, warn};

/// Largest accepted `|DG - (DH - TDS)|` of a finalized record, in kcal/mol.
pub const CONSISTENCY_TOLERANCE_KCAL: f64 = 0.1;

/// Which reported uncertainties were replaced by the upper-bound relative error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpperBoundUsage {
    pub ka: bool,
    pub dh: bool,
}

/// A finalized record and the upper-bound substitutions made while deriving it.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSystem {
    pub record: SystemRecord,
    pub upper_bound: UpperBoundUsage,
}

/// Unit-tagged quantities of one system before unit stripping and rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedQuantities {
    pub ka: Measurement,
    pub dg: Measurement,
    pub dh: Measurement,
    pub tds: Measurement,
    pub upper_bound: UpperBoundUsage,
}

/// Systems whose Ka or DH uncertainty was an assumed upper bound, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpperBoundReport {
    pub ka: Vec<String>,
    pub dh: Vec<String>,
}

impl UpperBoundReport {
    pub fn is_empty(&self) -> bool {
        self.ka.is_empty() && self.dh.is_empty()
    }
}

/// A finalized record whose free energy disagrees with `DH - TDS`.
#[derive(Debug, Clone, PartialEq)]
pub struct Inconsistency {
    pub system: String,
    pub residual: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    pub table: MeasurementTable,
    pub upper_bounds: UpperBoundReport,
    pub inconsistencies: Vec<Inconsistency>,
}

/// Runs the unit-aware part of the pipeline for one system.
///
/// Replicates are combined first, then the missing member of the Ka/DG pair is filled in.
/// Systems that need the titrant correction get inflated Ka and DH uncertainties, after
/// which DG and TDS are recomputed from them. Otherwise a missing TDS is derived.
pub fn derive_quantities(
    entry: &SystemEntry,
    config: &DerivationConfig,
) -> Result<DerivedQuantities, DerivationError> {
    let conditions = &config.conditions;

    let mut ka = entry.ka;
    if ka.is_none() {
        if let Some((first, second)) = entry.association_replicates() {
            ka = Some(combine_association_replicates(&first, &second, conditions)?);
        } else if let Some((first, second)) = entry.dissociation_replicates() {
            let first = association_from_dissociation(&first)?;
            let second = association_from_dissociation(&second)?;
            ka = Some(combine_association_replicates(&first, &second, conditions)?);
        } else if let Some(kd) = entry.kd {
            ka = Some(association_from_dissociation(&kd)?);
        }
    }

    let mut dh = match (entry.dh, entry.enthalpy_replicates()) {
        (Some(dh), _) => dh,
        (None, Some((first, second))) => combine_enthalpy_replicates(&first, &second)?,
        (None, None) => return Err(DerivationError::MissingQuantity { quantity: "DH" }),
    };

    let mut ka = match (ka, entry.dg) {
        (Some(ka), _) => ka,
        (None, Some(dg)) => association_constant_from_free_energy(&dg, conditions)?,
        (None, None) => return Err(DerivationError::MissingQuantity { quantity: "Ka" }),
    };

    let mut upper_bound = UpperBoundUsage::default();
    let (dg, tds) = if config.applies_titrant_correction(&entry.id) {
        let inflated_ka = inflate_for_titrant_error(
            "Ka",
            &ka,
            config.relative_titrant_error,
            config.upper_bound_relative_error,
        )?;
        let inflated_dh = inflate_for_titrant_error(
            "DH",
            &dh,
            config.relative_titrant_error,
            config.upper_bound_relative_error,
        )?;
        upper_bound.ka = inflated_ka.used_upper_bound;
        upper_bound.dh = inflated_dh.used_upper_bound;
        ka = inflated_ka.measurement;
        dh = inflated_dh.measurement;

        let dg = free_energy_from_association_constant(&ka, conditions)?;
        let tds = entropy_from_free_energy_and_enthalpy(&dg, &dh)?;
        (dg, tds)
    } else {
        let dg = match entry.dg {
            Some(dg) => dg,
            None => free_energy_from_association_constant(&ka, conditions)?,
        };
        let tds = match entry.tds {
            Some(tds) => tds,
            None => entropy_from_free_energy_and_enthalpy(&dg, &dh)?,
        };
        (dg, tds)
    };

    Ok(DerivedQuantities {
        ka,
        dg,
        dh,
        tds,
        upper_bound,
    })
}

/// Derives, unit-strips and rounds one system, attaching the guest's name and SMILES.
pub fn derive_system(
    entry: &SystemEntry,
    hosts: &HostCatalog,
    config: &DerivationConfig,
) -> Result<DerivedSystem, EngineError> {
    let system = entry.id.to_string();
    let guests = hosts
        .guests_of(&entry.id.host)
        .ok_or_else(|| EngineError::UnknownHost {
            system: system.clone(),
            host: entry.id.host.clone(),
        })?;
    let guest = guests
        .get(&entry.id.guest)
        .ok_or_else(|| EngineError::MissingGuest {
            system: system.clone(),
            guest: entry.id.guest.clone(),
        })?;

    let finalize = || -> Result<DerivedSystem, DerivationError> {
        let quantities = derive_quantities(entry, config)?;
        let record = SystemRecord {
            id: entry.id.clone(),
            name: guest.name.clone(),
            smiles: guest.smiles.clone(),
            ka: round_estimate(quantities.ka.strip_unit()?),
            dh: round_estimate(quantities.dh.strip_unit()?),
            tds: round_estimate(quantities.tds.strip_unit()?),
            dg: round_estimate(quantities.dg.strip_unit()?),
            n: entry.n,
        };
        Ok(DerivedSystem {
            record,
            upper_bound: quantities.upper_bound,
        })
    };
    finalize().map_err(|source| EngineError::Derivation { system, source })
}

/// Returns `|DG - (DH - TΔS)|` when it exceeds `tolerance`, reading the record's TDS under
/// `convention`. Records with a sentinel in any of the three energies are not checked.
pub fn check_consistency(
    record: &SystemRecord,
    convention: EntropyConvention,
    tolerance: f64,
) -> Option<Inconsistency> {
    let (Value::Measured(dg), Value::Measured(dh), Value::Measured(tds)) =
        (record.dg.value, record.dh.value, record.tds.value)
    else {
        return None;
    };
    let residual = (dg - (dh - convention.entropic_term(tds))).abs();
    (residual > tolerance + 1e-12).then(|| Inconsistency {
        system: record.id.to_string(),
        residual,
    })
}

/// Derives every system of the dataset in order.
///
/// Fails on the first system that cannot be derived. Consistency violations are collected
/// and logged as warnings but do not abort the run.
pub fn derive_all(
    dataset: &MeasurementDataset,
    hosts: &HostCatalog,
    config: &DerivationConfig,
    reporter: &ProgressReporter,
) -> Result<Derivation, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Deriving thermodynamic quantities",
    });
    reporter.report(Progress::SystemsStart {
        total: dataset.len() as u64,
    });

    let mut derivation = Derivation::default();
    for entry in dataset.systems() {
        let DerivedSystem {
            record,
            upper_bound,
        } = derive_system(entry, hosts, config)?;
        let id = record.id.to_string();
        debug!(
            "Derived {}: Ka = {} M^-1, DG = {} kcal/mol",
            id, record.ka.value, record.dg.value
        );

        if upper_bound.ka {
            derivation.upper_bounds.ka.push(id.clone());
        }
        if upper_bound.dh {
            derivation.upper_bounds.dh.push(id.clone());
        }
        if let Some(inconsistency) = check_consistency(
            &record,
            entry.tds_convention,
            CONSISTENCY_TOLERANCE_KCAL,
        ) {
            warn!(
                "{}: DG differs from DH - TDS by {:.3} kcal/mol",
                inconsistency.system, inconsistency.residual
            );
            derivation.inconsistencies.push(inconsistency);
        }

        derivation.table.push(record);
        reporter.report(Progress::SystemDerived { id });
    }

    reporter.report(Progress::SystemsFinish);
    reporter.report(Progress::PhaseFinish);

    if !derivation.upper_bounds.ka.is_empty() {
        info!(
            "Ka uncertainty assumed at the upper bound for: {}",
            derivation.upper_bounds.ka.join(", ")
        );
    }
    if !derivation.upper_bounds.dh.is_empty() {
        info!(
            "DH uncertainty assumed at the upper bound for: {}",
            derivation.upper_bounds.dh.join(", ")
        );
    }
    Ok(derivation)
}
