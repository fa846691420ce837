//! Train/test splitting.
//!
//! A [`Partition`] is computed once from the input lengths and then applied to
//! every array, so row `i` of the features and row `i` of the labels always
//! land on the same side of the split.

use ndarray::{Array1, Array2, Axis};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::SplitError;

/// Something with rows that can be gathered by index.
pub trait Rows: Sized {
    fn n_rows(&self) -> usize;

    /// New value holding the rows at `indices`, in that order.
    fn take_rows(&self, indices: &[usize]) -> Self;
}

impl<T: Clone> Rows for Vec<T> {
    fn n_rows(&self) -> usize {
        self.len()
    }

    fn take_rows(&self, indices: &[usize]) -> Self {
        indices.iter().map(|&i| self[i].clone()).collect()
    }
}

impl<A: Clone> Rows for Array1<A> {
    fn n_rows(&self) -> usize {
        self.len()
    }

    fn take_rows(&self, indices: &[usize]) -> Self {
        self.select(Axis(0), indices)
    }
}

impl<A: Clone> Rows for Array2<A> {
    fn n_rows(&self) -> usize {
        self.nrows()
    }

    fn take_rows(&self, indices: &[usize]) -> Self {
        self.select(Axis(0), indices)
    }
}

/// Split configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    /// Fraction of rows held out, in the open interval (0, 1).
    pub test_size: f64,
    /// Seed for a reproducible shuffle; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Shuffle before splitting; when false the tail rows become the test set.
    pub shuffle: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            seed: None,
            shuffle: true,
        }
    }
}

impl SplitOptions {
    pub fn new(test_size: f64) -> Self {
        Self {
            test_size,
            ..Self::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
}

/// Disjoint train/test row indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Partition {
    /// Validate the input lengths and draw a partition of `0..n`.
    ///
    /// `test.len() == floor(n * test_size)`; the rest is `train`.
    pub fn new(lengths: &[usize], options: &SplitOptions) -> Result<Self, SplitError> {
        let (&n, rest) = lengths.split_first().ok_or(SplitError::NoArrays)?;
        if let Some(&found) = rest.iter().find(|&&len| len != n) {
            return Err(SplitError::LengthMismatch { expected: n, found });
        }
        if !(options.test_size > 0.0 && options.test_size < 1.0) {
            return Err(SplitError::InvalidTestSize(options.test_size));
        }

        let n_test = (n as f64 * options.test_size).floor() as usize;
        let n_train = n - n_test;

        let mut indices: Vec<usize> = (0..n).collect();
        if options.shuffle {
            let mut rng = match options.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            indices.shuffle(&mut rng);
        }

        let test = indices.split_off(n_train);
        Ok(Self {
            train: indices,
            test,
        })
    }

    /// Gather `(train, test)` rows of one array.
    pub fn apply<T: Rows>(&self, array: &T) -> (T, T) {
        (array.take_rows(&self.train), array.take_rows(&self.test))
    }
}

/// Split same-typed arrays with one shared partition.
///
/// For `k` inputs returns `2k` outputs: `train1, test1, train2, test2, ...`.
pub fn train_test_split<T: Rows>(
    arrays: &[&T],
    options: &SplitOptions,
) -> Result<Vec<T>, SplitError> {
    let lengths: Vec<usize> = arrays.iter().map(|a| a.n_rows()).collect();
    let partition = Partition::new(&lengths, options)?;

    Ok(arrays
        .iter()
        .flat_map(|a| {
            let (train, test) = partition.apply(*a);
            [train, test]
        })
        .collect())
}

/// Split a feature matrix and its label vector: `(x_train, x_test, y_train, y_test)`.
pub fn split_xy<X: Rows, Y: Rows>(
    x: &X,
    y: &Y,
    options: &SplitOptions,
) -> Result<(X, X, Y, Y), SplitError> {
    let partition = Partition::new(&[x.n_rows(), y.n_rows()], options)?;
    let (x_train, x_test) = partition.apply(x);
    let (y_train, y_test) = partition.apply(y);
    Ok((x_train, x_test, y_train, y_test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_partition_sizes() {
        let p = Partition::new(&[10], &SplitOptions::new(0.25).seed(1)).unwrap();
        assert_eq!(p.test.len(), 2); // floor(2.5)
        assert_eq!(p.train.len(), 8);

        let mut all: Vec<usize> = p.train.iter().chain(&p.test).copied().collect();
        all.sort();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_partition_small_fraction_can_be_empty() {
        let p = Partition::new(&[40], &SplitOptions::new(0.02).seed(42)).unwrap();
        assert_eq!(p.test.len(), 0);
        assert_eq!(p.train.len(), 40);
    }

    #[test]
    fn test_no_shuffle_keeps_order() {
        let p = Partition::new(&[5], &SplitOptions::new(0.4).shuffle(false)).unwrap();
        assert_eq!(p.train, vec![0, 1, 2]);
        assert_eq!(p.test, vec![3, 4]);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let opts = SplitOptions::new(0.3).seed(42);
        let a = Partition::new(&[100], &opts).unwrap();
        let b = Partition::new(&[100], &opts).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unseeded_partitions_differ() {
        let opts = SplitOptions::new(0.3);
        let a = Partition::new(&[1000], &opts).unwrap();
        let b = Partition::new(&[1000], &opts).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_errors() {
        let opts = SplitOptions::new(0.5);
        assert_eq!(Partition::new(&[], &opts), Err(SplitError::NoArrays));
        assert_eq!(
            Partition::new(&[3, 4], &opts),
            Err(SplitError::LengthMismatch {
                expected: 3,
                found: 4
            })
        );
        for bad in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                Partition::new(&[3], &SplitOptions::new(bad)),
                Err(SplitError::InvalidTestSize(_))
            ));
        }
    }

    #[test]
    fn test_train_test_split_output_order() {
        let a = vec![0, 1, 2, 3];
        let b = vec![10, 11, 12, 13];
        let out = train_test_split(&[&a, &b], &SplitOptions::new(0.5).shuffle(false)).unwrap();
        assert_eq!(
            out,
            vec![vec![0, 1], vec![2, 3], vec![10, 11], vec![12, 13]]
        );
    }

    #[test]
    fn test_split_xy_keeps_rows_aligned() {
        let x = Array2::from_shape_fn((20, 2), |(i, j)| (i * 10 + j) as f32);
        let y: Array1<i32> = (0..20).collect();

        let (x_train, x_test, y_train, y_test) =
            split_xy(&x, &y, &SplitOptions::new(0.25).seed(7)).unwrap();

        assert_eq!(x_train.nrows() + x_test.nrows(), 20);
        assert_eq!(x_test.nrows(), 5);
        for (row, label) in x_train.outer_iter().zip(&y_train) {
            assert_eq!(row[0], (*label * 10) as f32);
        }
        for (row, label) in x_test.outer_iter().zip(&y_test) {
            assert_eq!(row[0], (*label * 10) as f32);
        }
    }

    #[test]
    fn test_split_xy_length_mismatch() {
        let x = array![[1.0_f32], [2.0]];
        let y = array![1, 0, 1];
        assert!(matches!(
            split_xy(&x, &y, &SplitOptions::new(0.5)),
            Err(SplitError::LengthMismatch { .. })
        ));
    }
}
