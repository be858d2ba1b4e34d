use rand::Rng;

use crate::activation::centered::centered_sigmoid;
use crate::error::Error;
use crate::math::matrix::Matrix;
use crate::network::file::NetFile;

/// A two-layer feedforward network: one hidden layer, no biases.
///
/// Layer sizes are fixed at construction; the weight matrices are mutated in
/// place by training and only reset by an explicit `randomize_weights`. The
/// activation buffers (`inputs`, `hidden`, `outputs`) always hold the state
/// left by the most recent `forward_pass`.
#[derive(Debug, Clone)]
pub struct Network {
    num_inputs: usize,
    num_hidden: usize,
    num_outputs: usize,
    /// Current input activations; hosts write these before `forward_pass`.
    pub inputs: Vec<f64>,
    /// Raw hidden-layer weighted sums. `forward_pass` never activates this
    /// buffer in place; readers apply the activation themselves where they
    /// want the activated value.
    pub hidden: Vec<f64>,
    /// Current output activations.
    pub outputs: Vec<f64>,
    /// Input-to-hidden weights, `num_inputs x num_hidden`.
    pub w1: Matrix,
    /// Hidden-to-output weights, `num_hidden x num_outputs`.
    pub w2: Matrix,
    /// Per-example error scratch, overwritten by every training example.
    pub(crate) output_errors: Vec<f64>,
    pub(crate) hidden_errors: Vec<f64>,
    file: Option<NetFile>,
}

impl Network {
    /// Creates a network with the given layer sizes and weights drawn from
    /// [-0.05, 0.05) using the supplied random source.
    pub fn new(
        num_inputs: usize,
        num_hidden: usize,
        num_outputs: usize,
        rng: &mut impl Rng,
    ) -> Result<Network, Error> {
        if num_inputs == 0 || num_hidden == 0 || num_outputs == 0 {
            return Err(Error::Configuration(format!(
                "layer sizes must be positive, got {num_inputs}/{num_hidden}/{num_outputs}"
            )));
        }
        let mut network = Network {
            num_inputs,
            num_hidden,
            num_outputs,
            inputs: vec![0.0; num_inputs],
            hidden: vec![0.0; num_hidden],
            outputs: vec![0.0; num_outputs],
            w1: Matrix::zeros(num_inputs, num_hidden),
            w2: Matrix::zeros(num_hidden, num_outputs),
            output_errors: vec![0.0; num_outputs],
            hidden_errors: vec![0.0; num_hidden],
            file: None,
        };
        network.randomize_weights(rng);
        Ok(network)
    }

    /// Replays a saved configuration: layer sizes come from the file, and the
    /// stored weights are copied in when the file carries them; otherwise the
    /// weights are randomized. The file stays attached for a later `save`.
    pub fn from_file(file: NetFile, rng: &mut impl Rng) -> Result<Network, Error> {
        let mut network = Network::new(file.num_input(), file.num_hidden(), file.num_output(), rng)?;
        if file.has_weights() {
            for i in 0..network.num_inputs {
                for h in 0..network.num_hidden {
                    network.w1.data[i][h] = file.w1(i, h)?;
                }
            }
            for h in 0..network.num_hidden {
                for o in 0..network.num_outputs {
                    network.w2.data[h][o] = file.w2(h, o)?;
                }
            }
        }
        network.file = Some(file);
        Ok(network)
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_hidden(&self) -> usize {
        self.num_hidden
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn file(&self) -> Option<&NetFile> {
        self.file.as_ref()
    }

    /// Attaches a persistence file to a network built with explicit sizes, so
    /// that `save` has somewhere to write. The file's declared sizes must
    /// match the network's.
    pub fn attach_file(&mut self, file: NetFile) -> Result<(), Error> {
        if file.num_input() != self.num_inputs
            || file.num_hidden() != self.num_hidden
            || file.num_output() != self.num_outputs
        {
            return Err(Error::Configuration(format!(
                "file declares {}/{}/{} but network is {}/{}/{}",
                file.num_input(),
                file.num_hidden(),
                file.num_output(),
                self.num_inputs,
                self.num_hidden,
                self.num_outputs
            )));
        }
        self.file = Some(file);
        Ok(())
    }

    /// Re-draws every weight from [-0.05, 0.05). Used by hosts to reset a
    /// network between experiments.
    pub fn randomize_weights(&mut self, rng: &mut impl Rng) {
        self.w1.randomize_uniform(rng);
        self.w2.randomize_uniform(rng);
    }

    /// Computes hidden and output activations from the current `inputs`.
    ///
    /// The hidden buffer receives the raw weighted sums and is left that way:
    /// the activation is applied on read when forming the output sums, and
    /// the output sums are activated once more, so the final output is
    /// σ(Σ_h σ(hidden[h]) · w2[h][o]). The backward pass deliberately feeds
    /// the raw stored sums — not their activated values — into both the
    /// derivative and the w2 update; see `train`.
    pub fn forward_pass(&mut self) {
        for h in 0..self.num_hidden {
            let mut sum = 0.0;
            for i in 0..self.num_inputs {
                sum += self.inputs[i] * self.w1.data[i][h];
            }
            self.hidden[h] = sum;
        }
        for o in 0..self.num_outputs {
            let mut sum = 0.0;
            for h in 0..self.num_hidden {
                sum += centered_sigmoid(self.hidden[h]) * self.w2.data[h][o];
            }
            self.outputs[o] = centered_sigmoid(sum);
        }
    }

    /// Copies every weight into the attached `NetFile` and persists it to
    /// `path`. Saving a network that has no file attached is an error, not a
    /// silent no-op.
    pub fn save(&mut self, path: &str) -> Result<(), Error> {
        let file = self
            .file
            .as_mut()
            .ok_or(Error::NotConfigured("network has no attached NetFile to save into"))?;
        for i in 0..self.num_inputs {
            for h in 0..self.num_hidden {
                file.set_w1(i, h, self.w1.data[i][h])?;
            }
        }
        for h in 0..self.num_hidden {
            for o in 0..self.num_outputs {
                file.set_w2(h, o, self.w2.data[h][o])?;
            }
        }
        file.mark_weights_stored();
        file.save_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn temp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("cinder_bp_{}_{}.json", name, std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn new_rejects_zero_layer_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(Network::new(0, 2, 1, &mut rng), Err(Error::Configuration(_))));
        assert!(matches!(Network::new(2, 2, 0, &mut rng), Err(Error::Configuration(_))));
    }

    #[test]
    fn forward_pass_is_bit_for_bit_deterministic() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = Network::new(3, 4, 2, &mut rng).unwrap();
        network.inputs = vec![0.25, -0.75, 1.5];
        network.forward_pass();
        let first = network.outputs.clone();
        for _ in 0..5 {
            network.forward_pass();
            assert_eq!(network.outputs, first);
        }
    }

    #[test]
    fn hidden_buffer_keeps_raw_weighted_sums() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut network = Network::new(2, 2, 1, &mut rng).unwrap();
        network.w1 = Matrix::from_data(vec![vec![0.5, -1.0], vec![0.25, 2.0]]);
        network.w2 = Matrix::from_data(vec![vec![1.0], vec![-1.0]]);
        network.inputs = vec![2.0, 4.0];
        network.forward_pass();

        // Raw dot products, no activation applied to the stored values.
        assert_eq!(network.hidden, vec![2.0 * 0.5 + 4.0 * 0.25, 2.0 * -1.0 + 4.0 * 2.0]);

        // Output applies the activation to the hidden sums on read, then once
        // more to its own sum.
        let expected = crate::centered_sigmoid(
            crate::centered_sigmoid(2.0) * 1.0 + crate::centered_sigmoid(6.0) * -1.0,
        );
        assert_eq!(network.outputs[0], expected);
    }

    #[test]
    fn from_file_copies_stored_weights_exactly() {
        let mut file = NetFile::new(2, 2, 1).unwrap();
        file.set_w1(0, 0, 0.013).unwrap();
        file.set_w1(1, 1, -0.044).unwrap();
        file.set_w2(0, 0, 0.021).unwrap();
        file.mark_weights_stored();

        let mut rng = StdRng::seed_from_u64(3);
        let network = Network::from_file(file, &mut rng).unwrap();
        assert_eq!(network.w1.data[0][0], 0.013);
        assert_eq!(network.w1.data[1][1], -0.044);
        assert_eq!(network.w2.data[0][0], 0.021);
        assert_eq!(network.w1.data[0][1], 0.0);
    }

    #[test]
    fn from_file_randomizes_when_no_weights_stored() {
        let file = NetFile::new(4, 3, 2).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let network = Network::from_file(file, &mut rng).unwrap();
        assert!(network.w1.data.iter().flatten().any(|&x| x != 0.0));
        for &x in network.w1.data.iter().flatten().chain(network.w2.data.iter().flatten()) {
            assert!((-0.05..0.05).contains(&x));
        }
    }

    #[test]
    fn save_without_attached_file_is_an_error() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = Network::new(2, 2, 1, &mut rng).unwrap();
        let result = network.save(&temp_path("never_written"));
        assert!(matches!(result, Err(Error::NotConfigured(_))));
    }

    #[test]
    fn attach_file_rejects_mismatched_sizes() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut network = Network::new(2, 2, 1, &mut rng).unwrap();
        let file = NetFile::new(3, 2, 1).unwrap();
        assert!(matches!(network.attach_file(file), Err(Error::Configuration(_))));
    }

    #[test]
    fn save_and_reload_round_trips_weights_bit_for_bit() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut network = Network::new(2, 3, 1, &mut rng).unwrap();
        network.attach_file(NetFile::new(2, 3, 1).unwrap()).unwrap();

        let path = temp_path("model_round_trip");
        network.save(&path).unwrap();

        let reloaded = Network::from_file(NetFile::load_json(&path).unwrap(), &mut rng).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.w1.data, network.w1.data);
        assert_eq!(reloaded.w2.data, network.w2.data);
    }
}
