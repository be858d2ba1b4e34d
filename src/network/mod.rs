pub mod file;
pub mod model;

pub use file::NetFile;
pub use model::Network;
