use crate::{Mlp, MlpError, MlpPolicyConfig};
use anyhow::{Context, Result};
use dagger_core::{Act, Obs, Policy};
use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

const NORM_EPS: f32 = 1e-6;

/// Statistics used to standardize observations before the network.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ObsNormalizer {
    /// Mean of observations.
    pub mean: Array1<f32>,

    /// Standard deviation of observations.
    pub std: Array1<f32>,
}

impl ObsNormalizer {
    fn apply(&self, obs: &Obs) -> Array1<f32> {
        (obs - &self.mean) / (&self.std + NORM_EPS)
    }
}

/// Deterministic policy given by an [`Mlp`].
///
/// Observations are optionally standardized as `(obs - mean) / (std + 1e-6)`
/// before being fed to the network, whose output is the action.
///
/// Parameters are stored as JSON when the file has the `json` extension and
/// as bincode otherwise.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(try_from = "MlpPolicyParams", into = "MlpPolicyParams")]
pub struct MlpPolicy {
    mlp: Mlp,
    obs_norm: Option<ObsNormalizer>,
}

#[derive(Clone, Deserialize, Serialize)]
struct MlpPolicyParams {
    mlp: Mlp,
    #[serde(default)]
    obs_norm: Option<ObsNormalizer>,
}

impl TryFrom<MlpPolicyParams> for MlpPolicy {
    type Error = MlpError;

    fn try_from(p: MlpPolicyParams) -> Result<Self, Self::Error> {
        MlpPolicy::new(p.mlp, p.obs_norm)
    }
}

impl From<MlpPolicy> for MlpPolicyParams {
    fn from(p: MlpPolicy) -> Self {
        Self {
            mlp: p.mlp,
            obs_norm: p.obs_norm,
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

impl MlpPolicy {
    /// Constructs a policy, checking that normalization statistics match the network input.
    pub fn new(mlp: Mlp, obs_norm: Option<ObsNormalizer>) -> Result<Self, MlpError> {
        if let Some(norm) = &obs_norm {
            for len in [norm.mean.len(), norm.std.len()].iter() {
                if *len != mlp.in_dim() {
                    return Err(MlpError::NormalizerMismatch {
                        expected: mlp.in_dim(),
                        actual: *len,
                    });
                }
            }
        }
        Ok(Self { mlp, obs_norm })
    }

    /// Builds a policy from the parameter file given in the configuration.
    pub fn build(config: &MlpPolicyConfig) -> Result<Self> {
        let mut policy = Self::load(&config.params_path)?;
        if !config.normalize_obs {
            policy.obs_norm = None;
        }
        Ok(policy)
    }

    /// Loads parameters from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open policy parameters {:?}", path))?;
        let rdr = BufReader::new(file);
        let policy: Self = match is_json(path) {
            true => serde_json::from_reader(rdr)
                .with_context(|| format!("Failed to decode policy parameters {:?}", path))?,
            false => bincode::deserialize_from(rdr)
                .with_context(|| format!("Failed to decode policy parameters {:?}", path))?,
        };
        info!(
            "Loaded MLP policy ({} layers, {} -> {}) from {:?}",
            policy.mlp.n_layers(),
            policy.mlp.in_dim(),
            policy.mlp.out_dim(),
            path
        );
        Ok(policy)
    }

    /// Saves parameters to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create policy parameters {:?}", path))?;
        let wtr = BufWriter::new(file);
        match is_json(path) {
            true => serde_json::to_writer(wtr, self)?,
            false => bincode::serialize_into(wtr, self)?,
        }
        Ok(())
    }

    /// The network.
    pub fn mlp(&self) -> &Mlp {
        &self.mlp
    }

    /// The normalization statistics, if any.
    pub fn obs_norm(&self) -> Option<&ObsNormalizer> {
        self.obs_norm.as_ref()
    }
}

impl Policy for MlpPolicy {
    fn get_action(&mut self, obs: &Obs) -> Result<Act> {
        let act = match &self.obs_norm {
            Some(norm) => {
                if obs.len() != norm.mean.len() {
                    return Err(MlpError::InputMismatch {
                        expected: norm.mean.len(),
                        actual: obs.len(),
                    }
                    .into());
                }
                self.mlp.forward(norm.apply(obs).view())?
            }
            None => self.mlp.forward(obs.view())?,
        };
        Ok(act)
    }
}
