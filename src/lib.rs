pub mod math;
pub mod activation;
pub mod network;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::centered::{centered_sigmoid, centered_sigmoid_prime};
pub use network::model::Network;
pub use network::file::NetFile;
pub use train::trainer::train;
pub use train::training_set::{Example, TrainingSet};
pub use train::loop_fn::train_loop;
pub use train::train_config::TrainConfig;
pub use train::epoch_stats::EpochStats;
pub use error::Error;
