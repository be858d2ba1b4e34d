pub mod trainer;
pub mod training_set;
pub mod epoch_stats;
pub mod train_config;
pub mod loop_fn;

pub use trainer::train;
pub use training_set::{Example, TrainingSet};
pub use epoch_stats::EpochStats;
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;
