use std::f64::consts::E;

/// Logistic function shifted down by 0.5; range (-0.5, 0.5), zero at x = 0.
pub fn centered_sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x)) - 0.5
}

/// Derivative of the centered sigmoid, expressed through the underlying
/// 0..1 logistic value: z = σ(x) + 0.5, σ'(x) = z·(1 − z).
pub fn centered_sigmoid_prime(x: f64) -> f64 {
    let z = centered_sigmoid(x) + 0.5;
    z * (1.0 - z)
}
