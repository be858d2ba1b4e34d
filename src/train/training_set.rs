use crate::error::Error;
use crate::network::file::NetFile;

/// One training case: an input vector paired with its target vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// An ordered collection of training examples plus two optional ignore masks.
///
/// The examples are immutable once loaded; the masks may be toggled between
/// training passes. `ignore_training` disables whole examples,
/// `ignore_input` disables individual input neurons (see `train` for the
/// effect on weights). Mask setters validate lengths so a malformed mask is
/// rejected at the door rather than consulted mid-pass.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    examples: Vec<Example>,
    ignore_training: Option<Vec<bool>>,
    ignore_input: Option<Vec<bool>>,
}

impl TrainingSet {
    /// Builds a set from (input, target) pairs, requiring uniform vector
    /// lengths across examples. An empty set is valid.
    pub fn from_pairs(pairs: Vec<(Vec<f64>, Vec<f64>)>) -> Result<TrainingSet, Error> {
        if let Some((first_input, first_target)) = pairs.first() {
            let (input_len, target_len) = (first_input.len(), first_target.len());
            for (k, (input, target)) in pairs.iter().enumerate() {
                if input.len() != input_len || target.len() != target_len {
                    return Err(Error::Configuration(format!(
                        "example {k} has shape {}/{}, expected {input_len}/{target_len}",
                        input.len(),
                        target.len()
                    )));
                }
            }
        }
        let examples = pairs
            .into_iter()
            .map(|(input, target)| Example { input, target })
            .collect();
        Ok(TrainingSet { examples, ignore_training: None, ignore_input: None })
    }

    /// Loads the training cases a `NetFile` declares. Fails if the declared
    /// example count does not match the data actually retrievable.
    pub fn from_file(file: &NetFile) -> Result<TrainingSet, Error> {
        let mut examples = Vec::with_capacity(file.num_training());
        for k in 0..file.num_training() {
            let mut input = Vec::with_capacity(file.num_input());
            for i in 0..file.num_input() {
                input.push(file.input(k, i)?);
            }
            let mut target = Vec::with_capacity(file.num_output());
            for o in 0..file.num_output() {
                target.push(file.output(k, o)?);
            }
            examples.push(Example { input, target });
        }
        Ok(TrainingSet { examples, ignore_training: None, ignore_input: None })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Input vector length shared by every example; `None` for an empty set.
    pub fn input_len(&self) -> Option<usize> {
        self.examples.first().map(|example| example.input.len())
    }

    /// Flags examples to skip during training; `mask.len()` must equal the
    /// example count.
    pub fn set_ignore_training(&mut self, mask: Vec<bool>) -> Result<(), Error> {
        if mask.len() != self.examples.len() {
            return Err(Error::Bounds(format!(
                "ignore_training mask has {} entries for {} examples",
                mask.len(),
                self.examples.len()
            )));
        }
        self.ignore_training = Some(mask);
        Ok(())
    }

    pub fn clear_ignore_training(&mut self) {
        self.ignore_training = None;
    }

    /// Flags input neurons to mask out; `mask.len()` must equal the examples'
    /// input vector length.
    pub fn set_ignore_input(&mut self, mask: Vec<bool>) -> Result<(), Error> {
        if let Some(input_len) = self.input_len() {
            if mask.len() != input_len {
                return Err(Error::Bounds(format!(
                    "ignore_input mask has {} entries for {} inputs",
                    mask.len(),
                    input_len
                )));
            }
        }
        self.ignore_input = Some(mask);
        Ok(())
    }

    pub fn clear_ignore_input(&mut self) {
        self.ignore_input = None;
    }

    pub fn is_ignored(&self, example: usize) -> bool {
        self.ignore_training
            .as_ref()
            .map_or(false, |mask| mask.get(example).copied().unwrap_or(false))
    }

    pub fn ignore_training(&self) -> Option<&[bool]> {
        self.ignore_training.as_deref()
    }

    pub fn ignore_input(&self) -> Option<&[bool]> {
        self.ignore_input.as_deref()
    }
}
