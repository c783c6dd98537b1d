//! Persona catalog loading and stratified population sampling.
//!
//! The catalog is produced by an upstream ETL step; the runner only
//! samples it so the simulated population matches the configured party
//! mix.

use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;

use flock_types::Persona;

use crate::config::PartyFractions;
use crate::error::SimError;

/// Load the persona catalog from a JSON array file.
pub fn load_catalog(path: &Path) -> Result<Vec<Persona>, SimError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SimError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SimError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Sample a population of `size` personas with the configured party mix.
///
/// Each party group is sampled without replacement; truncation of the
/// per-party counts means the result may be slightly smaller than
/// `size`, matching how the experiment populations were built.
pub fn select_population(
    catalog: &[Persona],
    size: usize,
    fractions: PartyFractions,
    rng: &mut impl Rng,
) -> Result<Vec<Persona>, SimError> {
    let mut population = Vec::with_capacity(size);
    for (party, fraction) in [
        ("Democrat", fractions.democrat),
        ("Republican", fractions.republican),
        ("Non-partisan", fractions.non_partisan),
    ] {
        let group: Vec<&Persona> = catalog.iter().filter(|p| p.party == party).collect();
        let needed = share(size, fraction);
        if group.len() < needed {
            return Err(SimError::PersonaShortfall {
                party: party.to_owned(),
                available: group.len(),
                needed,
            });
        }
        population.extend(
            group
                .choose_multiple(rng, needed)
                .map(|persona| (*persona).clone()),
        );
    }
    Ok(population)
}

/// Truncating share of `total`, as the experiment populations were sized.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn share(total: usize, fraction: f64) -> usize {
    ((total as f64) * fraction.clamp(0.0, 1.0)).floor() as usize
}
