//! Declarative parallel/sequential execution utilities.
//!
//! The `cfg` logic for the `parallel` feature lives here in one place so the
//! dataset loader can fan file reads out over rayon without sprinkling
//! `#[cfg]` blocks through its own code.
//!
//! Every helper takes a `force_sequential` flag. When `true`, execution is
//! sequential even if the `parallel` feature is enabled, which keeps error
//! ordering reproducible in tests.
//!
//! # Example
//!
//! ```ignore
//! // Read every sample file; stops at the first error.
//! let matrices = parallel::try_map_slice(&samples, |s| read_csv(&s.x_path), false)?;
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Map a fallible function over a slice, potentially in parallel.
///
/// Returns the results in input order, or an error produced by one of the
/// calls. In parallel mode the reported error is not necessarily the one with
/// the lowest index.
#[inline]
pub fn try_map_slice<T, F, R, E>(slice: &[T], f: F, force_sequential: bool) -> Result<Vec<R>, E>
where
    T: Sync,
    F: Fn(&T) -> Result<R, E> + Sync + Send,
    R: Send,
    E: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            slice.iter().map(f).collect()
        } else {
            slice.par_iter().map(f).collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        slice.iter().map(f).collect()
    }
}

/// Run two closures, potentially on different threads, and return both results.
#[inline]
pub fn join<A, B, RA, RB>(a: A, b: B, force_sequential: bool) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    #[cfg(feature = "parallel")]
    {
        if force_sequential {
            (a(), b())
        } else {
            rayon::join(a, b)
        }
    }

    #[cfg(not(feature = "parallel"))]
    {
        let _ = force_sequential;
        (a(), b())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_map_slice_ok() {
        let items = ["1", "2", "3"];
        let parsed: Result<Vec<i32>, _> = try_map_slice(&items, |s| s.parse::<i32>(), false);
        assert_eq!(parsed.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_try_map_slice_err_sequential() {
        let items = ["1", "x", "y"];
        let parsed: Result<Vec<i32>, String> = try_map_slice(
            &items,
            |s| s.parse::<i32>().map_err(|_| s.to_string()),
            true,
        );
        assert_eq!(parsed.unwrap_err(), "x");
    }

    #[test]
    fn test_join() {
        let (a, b) = join(|| 1 + 1, || "two", false);
        assert_eq!(a, 2);
        assert_eq!(b, "two");
    }
}
