pub mod centered;

pub use centered::{centered_sigmoid, centered_sigmoid_prime};
