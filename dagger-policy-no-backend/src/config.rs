//! Configuration of [`MlpPolicy`](crate::MlpPolicy).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Configuration of [`MlpPolicy`](crate::MlpPolicy).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct MlpPolicyConfig {
    /// File of the policy parameters.
    pub params_path: PathBuf,

    /// Whether to apply the observation normalizer stored with the parameters.
    pub normalize_obs: bool,
}

impl Default for MlpPolicyConfig {
    fn default() -> Self {
        Self {
            params_path: PathBuf::from("expert_policy.bin"),
            normalize_obs: true,
        }
    }
}

impl MlpPolicyConfig {
    /// Sets the file of the policy parameters.
    pub fn params_path(mut self, v: impl AsRef<Path>) -> Self {
        self.params_path = v.as_ref().to_path_buf();
        self
    }

    /// Enables observation normalization.
    pub fn normalize_obs(mut self, v: bool) -> Self {
        self.normalize_obs = v;
        self
    }

    /// Constructs [`MlpPolicyConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`MlpPolicyConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_mlp_policy_config() -> Result<()> {
        let config = MlpPolicyConfig::default()
            .params_path("experts/Ant.json")
            .normalize_obs(false);

        let dir = TempDir::new("mlp_policy_config")?;
        let path = dir.path().join("mlp_policy_config.yaml");
        config.save(&path)?;
        assert_eq!(MlpPolicyConfig::load(&path)?, config);
        Ok(())
    }
}
