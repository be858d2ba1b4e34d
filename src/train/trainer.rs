use crate::activation::centered::centered_sigmoid_prime;
use crate::error::Error;
use crate::network::model::Network;
use crate::train::training_set::TrainingSet;

/// Step size for every online weight update. Fixed; callers control training
/// only through epoch count and the ignore masks.
pub const LEARNING_RATE: f64 = 0.5;

/// Runs one online-backpropagation pass over `set` and returns the total
/// absolute output error accumulated across the non-skipped examples.
///
/// Examples are visited strictly in order; each weight update is applied
/// before the next example is presented, so later examples see the weights
/// the earlier ones left behind. `observer` is invoked once per processed
/// example, after the forward pass and before the error computation —
/// fire-and-forget, typically a host redraw.
///
/// Masking:
/// - an example flagged in `ignore_training` is skipped entirely;
/// - an input neuron flagged in `ignore_input` has its `w1` row zeroed before
///   every forward pass and excluded from the `w1` update, so its weights are
///   still zero when this returns and the outputs are insensitive to it.
///
/// The backward pass reads the raw pre-activation sums that `forward_pass`
/// leaves in `hidden`: both the σ' factor of the hidden error and the `w2`
/// update consume those raw sums, while the forward matmul used their
/// activated values. A textbook derivation would use the activated value in
/// the `w2` update; the raw-sum rule is the behavior this engine is defined
/// by (the factors stay sign-correct, so training still descends), and
/// `w2_update_uses_raw_hidden_sums` pins it down.
///
/// An empty set (or one whose examples are all masked) succeeds with 0.0.
pub fn train(
    network: &mut Network,
    set: &TrainingSet,
    mut observer: Option<&mut dyn FnMut()>,
) -> Result<f64, Error> {
    validate(network, set)?;

    let num_inputs = network.num_inputs();
    let num_hidden = network.num_hidden();
    let num_outputs = network.num_outputs();
    let input_mask = set.ignore_input();

    let mut total_error = 0.0;
    for (index, example) in set.examples().iter().enumerate() {
        if set.is_ignored(index) {
            continue;
        }

        network.inputs.copy_from_slice(&example.input);

        // Erase masked inputs' influence before the forward pass.
        if let Some(mask) = input_mask {
            for (i, &masked) in mask.iter().enumerate() {
                if masked {
                    for h in 0..num_hidden {
                        network.w1.data[i][h] = 0.0;
                    }
                }
            }
        }

        network.forward_pass();

        if let Some(redraw) = observer.as_mut() {
            redraw();
        }

        for o in 0..num_outputs {
            network.output_errors[o] = (example.target[o] - network.outputs[o])
                * centered_sigmoid_prime(network.outputs[o]);
        }

        for h in 0..num_hidden {
            let mut acc = 0.0;
            for o in 0..num_outputs {
                acc += network.output_errors[o] * network.w2.data[h][o];
            }
            network.hidden_errors[h] = acc * centered_sigmoid_prime(network.hidden[h]);
        }

        // Hidden-to-output update, against the raw hidden sums.
        for o in 0..num_outputs {
            for h in 0..num_hidden {
                network.w2.data[h][o] += LEARNING_RATE * network.output_errors[o] * network.hidden[h];
            }
        }

        // Input-to-hidden update; masked rows stay zero.
        for h in 0..num_hidden {
            for i in 0..num_inputs {
                if input_mask.map_or(false, |mask| mask[i]) {
                    continue;
                }
                network.w1.data[i][h] += LEARNING_RATE * network.hidden_errors[h] * network.inputs[i];
            }
        }

        for o in 0..num_outputs {
            total_error += network.output_errors[o].abs();
        }
    }

    Ok(total_error)
}

/// Rejects shape mismatches up front so nothing is consulted mid-pass.
fn validate(network: &Network, set: &TrainingSet) -> Result<(), Error> {
    for (k, example) in set.examples().iter().enumerate() {
        if example.input.len() != network.num_inputs()
            || example.target.len() != network.num_outputs()
        {
            return Err(Error::Configuration(format!(
                "example {k} has shape {}/{}, network expects {}/{}",
                example.input.len(),
                example.target.len(),
                network.num_inputs(),
                network.num_outputs()
            )));
        }
    }
    if let Some(mask) = set.ignore_training() {
        if mask.len() != set.len() {
            return Err(Error::Bounds(format!(
                "ignore_training mask has {} entries for {} examples",
                mask.len(),
                set.len()
            )));
        }
    }
    if let Some(mask) = set.ignore_input() {
        if mask.len() != network.num_inputs() {
            return Err(Error::Bounds(format!(
                "ignore_input mask has {} entries for {} network inputs",
                mask.len(),
                network.num_inputs()
            )));
        }
    }
    Ok(())
}
