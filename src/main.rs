// This binary crate is intentionally minimal.
// All training logic lives in the library (src/lib.rs and its modules).
// Run the demo with:
//   cargo run --example and_gate
fn main() {
    println!("cinder-bp: online backpropagation for a single-hidden-layer network.");
    println!("Run `cargo run --example and_gate` to see the AND demo.");
}
