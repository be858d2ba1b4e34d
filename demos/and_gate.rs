use cinder_bp::{train, Network, TrainingSet};

fn main() {
    let mut rng = rand::thread_rng();
    let mut network = Network::new(2, 2, 1, &mut rng).expect("valid layer sizes");

    // Targets live in the centered-sigmoid output range (-0.5, 0.5).
    let set = TrainingSet::from_pairs(vec![
        (vec![0.0, 0.0], vec![-0.5]),
        (vec![0.0, 1.0], vec![-0.5]),
        (vec![1.0, 0.0], vec![-0.5]),
        (vec![1.0, 1.0], vec![0.5]),
    ])
    .expect("uniform example shapes");

    let epochs = 2000;
    for epoch in 0..epochs {
        let error = train(&mut network, &set, None).expect("shapes already validated");
        if epoch % 200 == 0 {
            println!("Epoch {epoch}: total error = {error:.6}");
        }
    }

    for example in set.examples() {
        network.inputs.copy_from_slice(&example.input);
        network.forward_pass();
        println!(
            "Input: {:?} -> Output: {:.4} (target {:.1})",
            example.input, network.outputs[0], example.target[0]
        );
    }
}
