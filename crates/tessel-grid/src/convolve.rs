//! Discrete convolution of a field on one grid with a kernel on another.
//!
//! Both grids must share lattice and pitch. Kernel offsets are the kernel
//! elements' lattice coordinates relative to the kernel origin; each output
//! element sums `kernel[k] * data[hop(i, offset_k)]`, walking neighbour
//! links so that irregular edges and wrapped seams are honoured. Offsets
//! that walk off the domain contribute nothing.

use tessel_core::{ElementId, GridError, LatticeCoord};
use tracing::trace;

use crate::grid::Grid;
use crate::lattice::Lattice;
use crate::parallel;

/// Relative pitch tolerance for kernel/domain compatibility.
const PITCH_TOLERANCE: f64 = 1e-6;

/// Convolve `data` on `domain` with `kernel_data` on `kernel`.
///
/// # Errors
///
/// See [`convolve_into`].
pub fn convolve<L: Lattice>(
    domain: &Grid<L>,
    kernel: &Grid<L>,
    kernel_data: &[f64],
    data: &[f64],
) -> Result<Vec<f64>, GridError> {
    let mut result = vec![0.0; domain.len()];
    convolve_into(domain, kernel, kernel_data, data, &mut result)?;
    Ok(result)
}

/// Convolve into a caller-provided buffer.
///
/// Output aliasing the input is ruled out by the borrow checker: `data` is
/// shared and `result` is exclusive.
///
/// # Errors
///
/// [`GridError::Configuration`] if the pitches differ by more than one part
/// in a million; [`GridError::SizeMismatch`] if any buffer length differs
/// from its grid's element count.
pub fn convolve_into<L: Lattice>(
    domain: &Grid<L>,
    kernel: &Grid<L>,
    kernel_data: &[f64],
    data: &[f64],
    result: &mut [f64],
) -> Result<(), GridError> {
    let (dp, kp) = (domain.pitch(), kernel.pitch());
    if (dp - kp).abs() > PITCH_TOLERANCE * dp {
        return Err(GridError::config(format!(
            "kernel pitch {kp} does not match domain pitch {dp}"
        )));
    }
    kernel.dense().check_len("kernel data", kernel_data.len())?;
    domain.dense().check_len("data", data.len())?;
    domain.dense().check_len("result", result.len())?;

    let taps: Vec<(LatticeCoord, f64)> = kernel
        .arena()
        .elements()
        .iter()
        .zip(kernel_data)
        .filter(|(_, w)| **w != 0.0)
        .map(|(e, &w)| (e.coord(), w))
        .collect();
    trace!(taps = taps.len(), elements = domain.len(), "convolving");

    parallel::for_each_indexed_mut(result, domain.config().parallel_threshold, |i, out| {
        let from = ElementId(i as u32);
        *out = taps
            .iter()
            .filter_map(|(off, w)| domain.hop(from, off.a, off.b).map(|j| w * data[j.index()]))
            .sum();
    });
    Ok(())
}
