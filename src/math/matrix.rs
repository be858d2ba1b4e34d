use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::Error;

/// Half-width of the uniform interval used for weight initialization:
/// every entry is drawn from [-0.05, 0.05).
pub const INIT_WEIGHT_SPAN: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data,
        }
    }

    /// Overwrites every entry with an independent draw from [-0.05, 0.05).
    ///
    /// The random source is injected so callers can seed it; demos pass
    /// `rand::thread_rng()`.
    pub fn randomize_uniform(&mut self, rng: &mut impl Rng) {
        for i in 0..self.rows {
            for j in 0..self.cols {
                self.data[i][j] = 2.0 * INIT_WEIGHT_SPAN * rng.gen::<f64>() - INIT_WEIGHT_SPAN;
            }
        }
    }

    /// Checked read; out-of-range indices report instead of panicking.
    pub fn get(&self, row: usize, col: usize) -> Result<f64, Error> {
        self.check(row, col)?;
        Ok(self.data[row][col])
    }

    /// Checked write.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), Error> {
        self.check(row, col)?;
        self.data[row][col] = value;
        Ok(())
    }

    /// True when `rows`/`cols` agree with the actual storage. Deserialized
    /// matrices are untrusted until this holds.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    fn check(&self, row: usize, col: usize) -> Result<(), Error> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::Bounds(format!(
                "index ({row}, {col}) outside {}x{} matrix",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn zeros_has_requested_shape() {
        let m = Matrix::zeros(3, 4);
        assert_eq!(m.rows, 3);
        assert_eq!(m.cols, 4);
        assert!(m.data.iter().flatten().all(|&x| x == 0.0));
        assert!(m.is_consistent());
    }

    #[test]
    fn randomize_uniform_stays_in_init_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut m = Matrix::zeros(20, 20);
        m.randomize_uniform(&mut rng);
        for &x in m.data.iter().flatten() {
            assert!(x >= -INIT_WEIGHT_SPAN && x < INIT_WEIGHT_SPAN, "entry {x} out of range");
        }
    }

    #[test]
    fn randomize_uniform_is_reproducible_per_seed() {
        let mut a = Matrix::zeros(5, 5);
        let mut b = Matrix::zeros(5, 5);
        a.randomize_uniform(&mut StdRng::seed_from_u64(7));
        b.randomize_uniform(&mut StdRng::seed_from_u64(7));
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn get_and_set_reject_out_of_range_indices() {
        let mut m = Matrix::zeros(2, 3);
        assert!(m.set(0, 2, 1.5).is_ok());
        assert_eq!(m.get(0, 2).unwrap(), 1.5);
        assert!(matches!(m.get(2, 0), Err(Error::Bounds(_))));
        assert!(matches!(m.set(0, 3, 0.0), Err(Error::Bounds(_))));
    }

    #[test]
    fn from_data_infers_shape() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!((m.rows, m.cols), (2, 2));
        let empty = Matrix::from_data(vec![]);
        assert_eq!((empty.rows, empty.cols), (0, 0));
    }
}
