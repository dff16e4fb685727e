//! Isolation forest outlier detector.
//!
//! Each tree isolates points with random axis-aligned splits; points that
//! are separated from the bulk in few splits get a high anomaly score
//! `s(x) = 2^(-E[h(x)] / c(psi))`. The decision threshold is the training
//! score at the `1 - contamination` percentile.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::anomaly::error::ModelError;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    feature_count: usize,
    max_samples: usize,
    threshold: f64,
    trees: Vec<Node>,
}

impl IsolationForest {
    pub fn fit(samples: &[Vec<f64>], params: ForestParams) -> Result<Self, ModelError> {
        if samples.len() < 2 {
            return Err(ModelError::TrainingData(format!(
                "need at least 2 samples, got {}",
                samples.len()
            )));
        }
        let feature_count = samples[0].len();
        if feature_count == 0 || samples.iter().any(|s| s.len() != feature_count) {
            return Err(ModelError::TrainingData("samples must share a non-zero width".into()));
        }
        if samples.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ModelError::TrainingData("samples contain non-finite values".into()));
        }
        if !(params.contamination > 0.0 && params.contamination <= 0.5) {
            return Err(ModelError::TrainingData(format!(
                "contamination {} outside (0, 0.5]",
                params.contamination
            )));
        }
        if params.n_trees == 0 || params.max_samples < 2 {
            return Err(ModelError::TrainingData(
                "need at least one tree and a subsample of 2".into(),
            ));
        }

        let mut rng = Pcg64Mcg::seed_from_u64(params.seed);
        let subsample = params.max_samples.min(samples.len());
        let max_depth = (subsample as f64).log2().ceil() as usize;

        let trees = (0..params.n_trees)
            .map(|_| {
                let indices =
                    rand::seq::index::sample(&mut rng, samples.len(), subsample).into_vec();
                build_tree(samples, indices, 0, max_depth, &mut rng)
            })
            .collect();

        let mut forest = Self {
            feature_count,
            max_samples: subsample,
            threshold: 0.0,
            trees,
        };

        let mut scores: Vec<f64> = samples.iter().map(|s| forest.score(s)).collect();
        forest.threshold = percentile(&mut scores, 1.0 - params.contamination);

        log::debug!(
            "fitted isolation forest: {} trees, subsample {}, threshold {:.4}",
            forest.trees.len(),
            subsample,
            forest.threshold
        );
        Ok(forest)
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Anomaly score in `(0, 1]`; higher means easier to isolate.
    pub fn score(&self, sample: &[f64]) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| path_length(tree, sample))
            .sum();
        let mean = total / self.trees.len() as f64;
        2f64.powf(-mean / average_path_length(self.max_samples))
    }

    pub fn is_outlier(&self, sample: &[f64]) -> bool {
        self.score(sample) > self.threshold
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        let forest: Self = serde_json::from_reader(reader)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("no trees".into()));
        }
        if self.max_samples < 2 {
            return Err(ModelError::Invalid(format!("subsample size {}", self.max_samples)));
        }
        if !self.threshold.is_finite() {
            return Err(ModelError::Invalid("threshold is not finite".into()));
        }
        if self
            .trees
            .iter()
            .any(|tree| !node_is_valid(tree, self.feature_count))
        {
            return Err(ModelError::Invalid(
                "split refers to an unknown feature".into(),
            ));
        }
        Ok(())
    }
}

fn build_tree(
    samples: &[Vec<f64>],
    indices: Vec<usize>,
    depth: usize,
    max_depth: usize,
    rng: &mut Pcg64Mcg,
) -> Node {
    if depth >= max_depth || indices.len() <= 1 {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    // Only features that still vary inside this node can split it.
    let candidates: Vec<(usize, f64, f64)> = (0..samples[indices[0]].len())
        .filter_map(|feature| {
            let (lo, hi) = indices
                .iter()
                .map(|&i| samples[i][feature])
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
            (hi > lo).then_some((feature, lo, hi))
        })
        .collect();

    if candidates.is_empty() {
        return Node::Leaf {
            size: indices.len(),
        };
    }

    let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
    let threshold = rng.gen_range(lo..hi);
    let (left, right): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| samples[i][feature] <= threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(samples, left, depth + 1, max_depth, rng)),
        right: Box::new(build_tree(samples, right, depth + 1, max_depth, rng)),
    }
}

fn path_length(tree: &Node, sample: &[f64]) -> f64 {
    let mut node = tree;
    let mut depth = 0usize;
    loop {
        match node {
            Node::Leaf { size } => return depth as f64 + average_path_length(*size),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                node = if sample[*feature] <= *threshold {
                    left.as_ref()
                } else {
                    right.as_ref()
                };
                depth += 1;
            }
        }
    }
}

fn node_is_valid(node: &Node, feature_count: usize) -> bool {
    match node {
        Node::Leaf { .. } => true,
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            *feature < feature_count
                && threshold.is_finite()
                && node_is_valid(left, feature_count)
                && node_is_valid(right, feature_count)
        }
    }
}

/// Average unsuccessful-search path length in a binary search tree of `n` nodes.
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated quantile `q` in `[0, 1]`.
fn percentile(values: &mut [f64], q: f64) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = q * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (rank - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid() -> Vec<Vec<f64>> {
        (0..10)
            .flat_map(|x| (0..10).map(move |y| vec![x as f64 * 0.1, y as f64 * 0.1]))
            .collect()
    }

    fn grid_with_stray() -> Vec<Vec<f64>> {
        let mut data = grid();
        data.push(vec![5.0, 5.0]);
        data
    }

    #[test]
    fn path_length_normaliser() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert_abs_diff_eq!(average_path_length(256), 10.244_770_9, epsilon = 1e-6);
    }

    #[test]
    fn percentile_interpolates() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(percentile(&mut values, 0.5), 3.0);
        assert_abs_diff_eq!(percentile(&mut values, 0.9), 4.6, epsilon = 1e-12);
        assert_eq!(percentile(&mut values, 1.0), 5.0);
    }

    #[test]
    fn far_point_is_outlier() {
        let forest = IsolationForest::fit(&grid_with_stray(), ForestParams::default()).unwrap();
        assert!(!forest.is_outlier(&[0.45, 0.45]));
        assert!(forest.is_outlier(&[6.0, 6.0]));
        assert!(forest.score(&[6.0, 6.0]) > forest.score(&[0.45, 0.45]));
    }

    #[test]
    fn training_flags_about_the_contamination_share() {
        let data = grid_with_stray();
        let forest = IsolationForest::fit(&data, ForestParams::default()).unwrap();
        let flagged = data.iter().filter(|s| forest.is_outlier(s)).count();
        assert!((3..=7).contains(&flagged), "flagged {}", flagged);
    }

    #[test]
    fn same_seed_same_forest() {
        let a = IsolationForest::fit(&grid(), ForestParams::default()).unwrap();
        let b = IsolationForest::fit(&grid(), ForestParams::default()).unwrap();
        assert_eq!(a, b);

        let c = IsolationForest::fit(
            &grid(),
            ForestParams {
                seed: 7,
                ..ForestParams::default()
            },
        )
        .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn rejects_bad_training_data() {
        let params = ForestParams::default();
        assert!(IsolationForest::fit(&[vec![1.0]], params).is_err());
        assert!(IsolationForest::fit(&[vec![1.0, 2.0], vec![1.0]], params).is_err());
        assert!(IsolationForest::fit(&[vec![1.0], vec![f64::NAN]], params).is_err());
        assert!(IsolationForest::fit(
            &grid(),
            ForestParams {
                contamination: 0.0,
                ..params
            }
        )
        .is_err());
    }

    #[test]
    fn constant_data_builds_leaves() {
        let data = vec![vec![1.0, 1.0]; 8];
        let forest = IsolationForest::fit(&data, ForestParams::default()).unwrap();
        assert!(forest.trees.iter().all(|t| matches!(t, Node::Leaf { size: 8 })));
        assert!(!forest.is_outlier(&[1.0, 1.0]));
    }

    #[test]
    fn persisted_model_scores_identically() {
        let forest = IsolationForest::fit(&grid(), ForestParams::default()).unwrap();
        let file = tempfile::NamedTempFile::new().unwrap();
        forest.save(file.path()).unwrap();

        let loaded = IsolationForest::load(file.path()).unwrap();
        assert_eq!(loaded.score(&[0.3, 0.7]), forest.score(&[0.3, 0.7]));
        assert_eq!(loaded.threshold(), forest.threshold());
    }

    #[test]
    fn load_rejects_unknown_feature_index() {
        let forest = IsolationForest {
            feature_count: 1,
            max_samples: 4,
            threshold: 0.5,
            trees: vec![Node::Split {
                feature: 3,
                threshold: 0.0,
                left: Box::new(Node::Leaf { size: 1 }),
                right: Box::new(Node::Leaf { size: 1 }),
            }],
        };
        let file = tempfile::NamedTempFile::new().unwrap();
        forest.save(file.path()).unwrap();
        assert!(matches!(
            IsolationForest::load(file.path()),
            Err(ModelError::Invalid(_))
        ));
    }
}
