use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::error::Error;
use crate::network::model::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train;
use crate::train::training_set::TrainingSet;

/// Runs `train` for `config.epochs` epochs and returns the total absolute
/// error of the **last completed epoch** (0.0 if no epoch ran).
///
/// Epoch-count looping is the caller's concern in the core; this helper packages
/// the loop hosts always end up writing, without adding any stopping criterion
/// of its own.
///
/// # Arguments
/// - `network`  — modified in place, one online update per example per epoch
/// - `set`      — training examples plus masks; masks may not change mid-run
/// - `observer` — forwarded to `train`; invoked once per processed example
/// - `config`   — epoch count, optional progress channel, optional stop flag
///
/// # Early termination
/// The loop breaks before the next epoch if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    set: &TrainingSet,
    mut observer: Option<&mut dyn FnMut()>,
    config: &TrainConfig,
) -> Result<f64, Error> {
    let mut last_error = 0.0;

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let t_start = Instant::now();
        let reborrowed = observer.as_mut().map(|obs| &mut **obs as &mut dyn FnMut());
        let total_error = train(network, set, reborrowed)?;
        last_error = total_error;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            total_error,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        if let Some(ref tx) = config.progress_tx {
            // Receiver gone means nobody is watching; stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    Ok(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn and_set() -> TrainingSet {
        TrainingSet::from_pairs(vec![
            (vec![0.0, 0.0], vec![-0.5]),
            (vec![0.0, 1.0], vec![-0.5]),
            (vec![1.0, 0.0], vec![-0.5]),
            (vec![1.0, 1.0], vec![0.5]),
        ])
        .unwrap()
    }

    #[test]
    fn emits_one_stats_record_per_epoch() {
        let mut rng = StdRng::seed_from_u64(20);
        let mut network = Network::new(2, 2, 1, &mut rng).unwrap();
        let set = and_set();

        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(5);
        config.progress_tx = Some(tx);

        train_loop(&mut network, &set, None, &config).unwrap();
        drop(config);

        let stats: Vec<EpochStats> = rx.iter().collect();
        assert_eq!(stats.len(), 5);
        for (i, s) in stats.iter().enumerate() {
            assert_eq!(s.epoch, i + 1);
            assert_eq!(s.total_epochs, 5);
            assert!(s.total_error > 0.0);
        }
    }

    #[test]
    fn preset_stop_flag_prevents_any_training() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut network = Network::new(2, 2, 1, &mut rng).unwrap();
        let before = network.clone();
        let set = and_set();

        let mut config = TrainConfig::new(100);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

        let last = train_loop(&mut network, &set, None, &config).unwrap();
        assert_eq!(last, 0.0);
        assert_eq!(network.w1.data, before.w1.data);
        assert_eq!(network.w2.data, before.w2.data);
    }

    #[test]
    fn dropped_receiver_stops_after_one_epoch() {
        let mut rng = StdRng::seed_from_u64(22);
        let network = Network::new(2, 2, 1, &mut rng).unwrap();
        let set = and_set();

        let mut looped = network.clone();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(50);
        config.progress_tx = Some(tx);
        train_loop(&mut looped, &set, None, &config).unwrap();

        // Identical to a single direct pass from the same starting weights.
        let mut single = network.clone();
        train(&mut single, &set, None).unwrap();
        assert_eq!(looped.w1.data, single.w1.data);
        assert_eq!(looped.w2.data, single.w2.data);
    }

    #[test]
    fn returns_last_epoch_error() {
        let mut rng = StdRng::seed_from_u64(23);
        let network = Network::new(2, 2, 1, &mut rng).unwrap();
        let set = and_set();

        let mut looped = network.clone();
        let last = train_loop(&mut looped, &set, None, &TrainConfig::new(3)).unwrap();

        let mut manual = network.clone();
        let mut expected = 0.0;
        for _ in 0..3 {
            expected = train(&mut manual, &set, None).unwrap();
        }
        assert_eq!(last, expected);
    }
}
