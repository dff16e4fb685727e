//! Offline training of the anomaly model on synthetic orbits.

use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

use crate::anomaly::error::ModelError;
use crate::anomaly::features::FEATURE_COUNT;
use crate::anomaly::forest::{ForestParams, IsolationForest};

pub const TRAINING_SAMPLES: usize = 100;

/// (mean, standard deviation) per feature, in feature-vector order.
const FEATURE_DISTRIBUTIONS: [(f64, f64); FEATURE_COUNT] = [
    (15.0, 0.5),       // mean motion, rev/day
    (0.0001, 0.00005), // mean motion derivative, folded to positive
    (500.0, 50.0),     // altitude, km
    (98.0, 2.0),       // inclination, deg
    (0.01, 0.005),     // eccentricity
];
const MEAN_MOTION_DOT: usize = 1;

/// Gaussian feature vectors centred on a typical sun-synchronous LEO.
pub fn synthetic_dataset(samples: usize, seed: u64) -> Result<Vec<Vec<f64>>, ModelError> {
    let distributions = FEATURE_DISTRIBUTIONS
        .iter()
        .map(|&(mean, std_dev)| {
            Normal::new(mean, std_dev).map_err(|e| ModelError::TrainingData(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let rows = (0..samples)
        .map(|_| {
            let mut row: Vec<f64> = distributions.iter().map(|d| d.sample(&mut rng)).collect();
            row[MEAN_MOTION_DOT] = row[MEAN_MOTION_DOT].abs();
            row
        })
        .collect();
    Ok(rows)
}

/// Fit an isolation forest on the synthetic dataset drawn with `params.seed`.
pub fn train_model(params: ForestParams) -> Result<IsolationForest, ModelError> {
    let data = synthetic_dataset(TRAINING_SAMPLES, params.seed)?;
    let forest = IsolationForest::fit(&data, params)?;
    log::info!(
        "trained anomaly model on {} synthetic orbits (contamination {})",
        data.len(),
        params.contamination
    );
    Ok(forest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_shape_and_spread() {
        let data = synthetic_dataset(TRAINING_SAMPLES, 42).unwrap();
        assert_eq!(data.len(), TRAINING_SAMPLES);
        assert!(data.iter().all(|row| row.len() == FEATURE_COUNT));
        assert!(data.iter().all(|row| row[MEAN_MOTION_DOT] >= 0.0));

        let mean_altitude = data.iter().map(|row| row[2]).sum::<f64>() / data.len() as f64;
        assert!((470.0..530.0).contains(&mean_altitude));
    }

    #[test]
    fn dataset_is_seeded() {
        assert_eq!(
            synthetic_dataset(10, 42).unwrap(),
            synthetic_dataset(10, 42).unwrap()
        );
        assert_ne!(
            synthetic_dataset(10, 42).unwrap(),
            synthetic_dataset(10, 43).unwrap()
        );
    }

    #[test]
    fn trained_model_covers_all_features() {
        let forest = train_model(ForestParams::default()).unwrap();
        assert_eq!(forest.feature_count(), FEATURE_COUNT);
    }
}
