//! Serialized expert datasets, loaded as the bootstrap data of the first iteration.
//!
//! A dataset is a sequence of [`Trajectory`] records. Files with the `json` extension
//! are read and written with `serde_json`, any other file with `bincode`.
use super::Trajectory;
use anyhow::{Context, Result};
use log::info;
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

/// Loads expert trajectories from a file.
///
/// Every trajectory is validated while it is decoded.
pub fn load_expert_data(path: impl AsRef<Path>) -> Result<Vec<Trajectory>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open expert data {:?}", path))?;
    let rdr = BufReader::new(file);
    let paths: Vec<Trajectory> = match is_json(path) {
        true => serde_json::from_reader(rdr)
            .with_context(|| format!("Failed to decode expert data {:?}", path))?,
        false => bincode::deserialize_from(rdr)
            .with_context(|| format!("Failed to decode expert data {:?}", path))?,
    };
    info!(
        "Loaded {} expert trajectories ({} transitions) from {:?}",
        paths.len(),
        paths.iter().map(|p| p.len()).sum::<usize>(),
        path
    );
    Ok(paths)
}

/// Saves trajectories as an expert dataset.
pub fn save_expert_data(path: impl AsRef<Path>, paths: &[Trajectory]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create expert data {:?}", path))?;
    let wtr = BufWriter::new(file);
    match is_json(path) {
        true => serde_json::to_writer(wtr, paths)?,
        false => bincode::serialize_into(wtr, paths)?,
    }
    Ok(())
}
