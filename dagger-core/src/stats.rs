//! Return statistics over a set of rollouts.
use crate::{
    error::StatsError,
    record::{Record, RecordValue},
    Trajectory,
};

/// Statistics of episode returns and lengths.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStats {
    /// Mean of episode returns.
    pub average_return: f32,

    /// Population standard deviation of episode returns.
    pub std_return: f32,

    /// Largest episode return.
    pub max_return: f32,

    /// Smallest episode return.
    pub min_return: f32,

    /// Mean of episode lengths.
    pub average_ep_len: f32,
}

impl PathStats {
    /// Computes statistics of `paths`.
    ///
    /// Fails on an empty slice instead of producing NaN.
    pub fn from_paths(paths: &[Trajectory]) -> Result<Self, StatsError> {
        if paths.is_empty() {
            return Err(StatsError::Empty);
        }

        let n = paths.len() as f32;
        let returns = paths.iter().map(|p| p.total_return()).collect::<Vec<_>>();
        let average_return = returns.iter().sum::<f32>() / n;
        let var = returns
            .iter()
            .map(|r| (r - average_return).powi(2))
            .sum::<f32>()
            / n;

        Ok(Self {
            average_return,
            std_return: var.sqrt(),
            max_return: returns.iter().cloned().fold(f32::NEG_INFINITY, f32::max),
            min_return: returns.iter().cloned().fold(f32::INFINITY, f32::min),
            average_ep_len: paths.iter().map(|p| p.len() as f32).sum::<f32>() / n,
        })
    }

    /// Converts to a record with keys like `{prefix}AverageReturn`.
    pub fn to_record(&self, prefix: &str) -> Record {
        let mut record = Record::empty();
        for (name, v) in [
            ("AverageReturn", self.average_return),
            ("StdReturn", self.std_return),
            ("MaxReturn", self.max_return),
            ("MinReturn", self.min_return),
            ("AverageEpLen", self.average_ep_len),
        ]
        .iter()
        {
            record.insert(format!("{}{}", prefix, name), RecordValue::Scalar(*v));
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn path(rewards: &[f32]) -> Trajectory {
        let len = rewards.len();
        let mut terminal = Array1::zeros(len);
        terminal[len - 1] = 1.0;
        Trajectory::new(
            Array2::zeros((len, 1)),
            Array2::zeros((len, 1)),
            Array1::from(rewards.to_vec()),
            Array2::zeros((len, 1)),
            terminal,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_stats() {
        let stats =
            PathStats::from_paths(&[path(&[1.0, 1.0]), path(&[4.0, 0.0, 0.0, 0.0])]).unwrap();
        assert_eq!(stats.average_return, 3.0);
        assert_eq!(stats.std_return, 1.0);
        assert_eq!(stats.max_return, 4.0);
        assert_eq!(stats.min_return, 2.0);
        assert_eq!(stats.average_ep_len, 3.0);

        let record = stats.to_record("Eval_");
        assert_eq!(record.get_scalar("Eval_StdReturn").unwrap(), 1.0);
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_empty_paths_are_rejected() {
        assert_eq!(PathStats::from_paths(&[]), Err(StatsError::Empty));
    }
}
