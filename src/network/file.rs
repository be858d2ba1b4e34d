use std::fs::File;
use std::io::{BufReader, BufWriter};

use serde::{Serialize, Deserialize};

use crate::error::Error;
use crate::math::matrix::Matrix;

/// On-disk representation of a network configuration: declared layer sizes,
/// optional stored weights, and the flattened training cases.
///
/// `NetFile` is the sole authority on the serialization format; everything it
/// persists is its own serde representation, written as pretty-printed JSON.
/// All indices are zero-based and dense. Deserialized files are validated
/// before use so declared counts can never disagree with the data behind them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetFile {
    num_input: usize,
    num_hidden: usize,
    num_output: usize,
    num_training: usize,
    weights_present: bool,
    w1: Matrix,
    w2: Matrix,
    /// Example-major: entry `k * num_input + i` is feature `i` of example `k`.
    training_inputs: Vec<f64>,
    /// Example-major: entry `k * num_output + o` is target `o` of example `k`.
    training_outputs: Vec<f64>,
}

impl NetFile {
    /// Creates an empty configuration for the given layer sizes: no stored
    /// weights, no training cases.
    pub fn new(num_input: usize, num_hidden: usize, num_output: usize) -> Result<NetFile, Error> {
        if num_input == 0 || num_hidden == 0 || num_output == 0 {
            return Err(Error::Configuration(format!(
                "layer sizes must be positive, got {num_input}/{num_hidden}/{num_output}"
            )));
        }
        Ok(NetFile {
            num_input,
            num_hidden,
            num_output,
            num_training: 0,
            weights_present: false,
            w1: Matrix::zeros(num_input, num_hidden),
            w2: Matrix::zeros(num_hidden, num_output),
            training_inputs: Vec::new(),
            training_outputs: Vec::new(),
        })
    }

    /// Replaces the stored training cases with `cases`, flattening each
    /// (input, target) pair into the example-major arrays.
    pub fn set_training_cases(&mut self, cases: &[(Vec<f64>, Vec<f64>)]) -> Result<(), Error> {
        for (k, (input, target)) in cases.iter().enumerate() {
            if input.len() != self.num_input {
                return Err(Error::Configuration(format!(
                    "training case {k} has {} inputs, file declares {}",
                    input.len(),
                    self.num_input
                )));
            }
            if target.len() != self.num_output {
                return Err(Error::Configuration(format!(
                    "training case {k} has {} targets, file declares {}",
                    target.len(),
                    self.num_output
                )));
            }
        }
        self.num_training = cases.len();
        self.training_inputs = cases.iter().flat_map(|(input, _)| input.iter().copied()).collect();
        self.training_outputs = cases.iter().flat_map(|(_, target)| target.iter().copied()).collect();
        Ok(())
    }

    pub fn num_input(&self) -> usize {
        self.num_input
    }

    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    pub fn num_output(&self) -> usize {
        self.num_output
    }

    pub fn num_training(&self) -> usize {
        self.num_training
    }

    /// Whether this file carries trained weights (as opposed to only an
    /// architecture and training cases).
    pub fn has_weights(&self) -> bool {
        self.weights_present
    }

    pub fn w1(&self, input: usize, hidden: usize) -> Result<f64, Error> {
        self.w1.get(input, hidden)
    }

    pub fn w2(&self, hidden: usize, output: usize) -> Result<f64, Error> {
        self.w2.get(hidden, output)
    }

    pub fn set_w1(&mut self, input: usize, hidden: usize, value: f64) -> Result<(), Error> {
        self.w1.set(input, hidden, value)
    }

    pub fn set_w2(&mut self, hidden: usize, output: usize, value: f64) -> Result<(), Error> {
        self.w2.set(hidden, output, value)
    }

    /// Marks the stored weight matrices as meaningful. Called by
    /// `Network::save` once every entry has been copied in.
    pub fn mark_weights_stored(&mut self) {
        self.weights_present = true;
    }

    /// Training input scalar for `(example, feature)`.
    pub fn input(&self, example: usize, feature: usize) -> Result<f64, Error> {
        if example >= self.num_training || feature >= self.num_input {
            return Err(Error::Bounds(format!(
                "training input ({example}, {feature}) outside {} examples x {} features",
                self.num_training, self.num_input
            )));
        }
        Ok(self.training_inputs[example * self.num_input + feature])
    }

    /// Training target scalar for `(example, feature)`.
    pub fn output(&self, example: usize, feature: usize) -> Result<f64, Error> {
        if example >= self.num_training || feature >= self.num_output {
            return Err(Error::Bounds(format!(
                "training output ({example}, {feature}) outside {} examples x {} targets",
                self.num_training, self.num_output
            )));
        }
        Ok(self.training_outputs[example * self.num_output + feature])
    }

    /// Serializes the configuration to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a configuration from a JSON file previously written by
    /// `save_json`, rejecting any file whose declared counts do not match the
    /// data it actually holds.
    pub fn load_json(path: &str) -> Result<NetFile, Error> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let loaded: NetFile = serde_json::from_reader(reader)?;
        loaded.validate()?;
        Ok(loaded)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.num_input == 0 || self.num_hidden == 0 || self.num_output == 0 {
            return Err(Error::Configuration(format!(
                "layer sizes must be positive, got {}/{}/{}",
                self.num_input, self.num_hidden, self.num_output
            )));
        }
        if !self.w1.is_consistent()
            || self.w1.rows != self.num_input
            || self.w1.cols != self.num_hidden
        {
            return Err(Error::Configuration(format!(
                "w1 storage does not match declared {}x{} shape",
                self.num_input, self.num_hidden
            )));
        }
        if !self.w2.is_consistent()
            || self.w2.rows != self.num_hidden
            || self.w2.cols != self.num_output
        {
            return Err(Error::Configuration(format!(
                "w2 storage does not match declared {}x{} shape",
                self.num_hidden, self.num_output
            )));
        }
        if self.training_inputs.len() != self.num_training * self.num_input {
            return Err(Error::Configuration(format!(
                "file declares {} training examples but holds {} input scalars",
                self.num_training,
                self.training_inputs.len()
            )));
        }
        if self.training_outputs.len() != self.num_training * self.num_output {
            return Err(Error::Configuration(format!(
                "file declares {} training examples but holds {} target scalars",
                self.num_training,
                self.training_outputs.len()
            )));
        }
        Ok(())
    }
}
