//! Threshold-gated data parallelism for per-element numeric loops.
//!
//! Small grids run sequentially; above the threshold the loop is split
//! across rayon's pool. Every closure writes only its own output slot.

use rayon::prelude::*;

pub(crate) fn for_each_indexed_mut<T, F>(slice: &mut [T], threshold: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Sync + Send,
{
    if slice.len() >= threshold {
        slice
            .par_iter_mut()
            .enumerate()
            .for_each(|(idx, value)| f(idx, value));
        return;
    }

    for (idx, value) in slice.iter_mut().enumerate() {
        f(idx, value);
    }
}

pub(crate) fn map_indexed<T, F>(len: usize, threshold: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if len >= threshold {
        return (0..len).into_par_iter().map(f).collect();
    }
    (0..len).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_and_parallel_agree() {
        let seq = map_indexed(5000, usize::MAX, |i| i * 3);
        let par = map_indexed(5000, 1, |i| i * 3);
        assert_eq!(seq, par);
    }

    #[test]
    fn for_each_writes_every_slot() {
        let mut v = vec![0usize; 3000];
        for_each_indexed_mut(&mut v, 1024, |i, slot| *slot = i + 1);
        assert!(v.iter().enumerate().all(|(i, &x)| x == i + 1));
    }
}
