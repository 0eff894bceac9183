//! Gaussian resampling of a pixel image onto grid elements.

use tessel_core::{GridError, Point2};
use tracing::debug;

use crate::grid::Grid;
use crate::lattice::Lattice;
use crate::parallel;

/// A rectangular greyscale image, row-major from the bottom-left pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl Image {
    /// Wrap `pixels` as rows of `width`.
    ///
    /// # Errors
    ///
    /// [`GridError::Configuration`] for zero width;
    /// [`GridError::SizeMismatch`] when `pixels` is not a whole number of
    /// rows.
    pub fn new(width: usize, pixels: Vec<f64>) -> Result<Self, GridError> {
        if width == 0 {
            return Err(GridError::config("image width must be positive"));
        }
        if pixels.len() % width != 0 {
            return Err(GridError::SizeMismatch {
                what: "image pixels",
                expected: pixels.len().div_ceil(width) * width,
                found: pixels.len(),
            });
        }
        let height = pixels.len() / width;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Pixels per row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at column `col`, row `row` (row 0 at the bottom).
    pub fn get(&self, col: usize, row: usize) -> Option<f64> {
        if col >= self.width {
            return None;
        }
        self.pixels.get(row * self.width + col).copied()
    }

    /// Raw pixel data.
    pub fn pixels(&self) -> &[f64] {
        &self.pixels
    }
}

impl<L: Lattice> Grid<L> {
    /// Resample `image` onto the grid.
    ///
    /// The image spans `scale.x` metres horizontally, with square pixels
    /// of side `scale.x / width` horizontally and `scale.y / width`
    /// vertically, centred on `offset`. Each element takes a Gaussian-weighted
    /// sum of the pixels within three standard deviations, with one pixel
    /// pitch as the deviation on each axis. The result is divided by its
    /// maximum unless that maximum is zero.
    ///
    /// # Errors
    ///
    /// [`GridError::Configuration`] for a non-positive or non-finite scale or
    /// a non-finite offset.
    pub fn resample_image(
        &self,
        image: &Image,
        scale: Point2,
        offset: Point2,
    ) -> Result<Vec<f64>, GridError> {
        if !(scale.x > 0.0 && scale.y > 0.0 && scale.x.is_finite() && scale.y.is_finite()) {
            return Err(GridError::config(format!(
                "image scale must be positive and finite, got ({}, {})",
                scale.x, scale.y
            )));
        }
        if !(offset.x.is_finite() && offset.y.is_finite()) {
            return Err(GridError::config("image offset must be finite"));
        }
        let (w, h) = (image.width as f64, image.height as f64);
        let (px, py) = (scale.x / w, scale.y / w);
        let origin = Point2::new(offset.x - w * px / 2.0, offset.y - h * py / 2.0);
        let (reach_x, reach_y) = (3.0 * px, 3.0 * py);

        // Pixel centres along an axis falling within `reach` of `v`.
        let span = |v: f64, o: f64, pitch: f64, reach: f64, n: usize| {
            let lo = ((v - reach - o) / pitch - 0.5).ceil().max(0.0) as usize;
            let hi = ((v + reach - o) / pitch - 0.5).floor();
            if hi < 0.0 {
                return (0, 0);
            }
            (lo, (hi as usize + 1).min(n))
        };

        let dense = self.dense();
        let mut out = parallel::map_indexed(self.len(), self.config().parallel_threshold, |i| {
            let (ex, ey) = (dense.x()[i], dense.y()[i]);
            let (c0, c1) = span(ex, origin.x, px, reach_x, image.width);
            let (r0, r1) = span(ey, origin.y, py, reach_y, image.height);
            let mut sum = 0.0;
            for row in r0..r1 {
                let dy = (origin.y + (row as f64 + 0.5) * py - ey) / py;
                for col in c0..c1 {
                    let dx = (origin.x + (col as f64 + 0.5) * px - ex) / px;
                    let weight = (-0.5 * (dx * dx + dy * dy)).exp();
                    sum += weight * image.pixels[row * image.width + col];
                }
            }
            sum
        });

        let max = out.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            for v in &mut out {
                *v /= max;
            }
        }
        debug!(
            width = image.width,
            height = image.height,
            elements = out.len(),
            max,
            "image resampled"
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::hex::HexLattice;
    use crate::rect::RectLattice;

    #[test]
    fn ragged_pixels_rejected() {
        assert!(matches!(
            Image::new(4, vec![0.0; 10]),
            Err(GridError::SizeMismatch { expected: 12, found: 10, .. })
        ));
        assert!(Image::new(0, vec![]).is_err());
    }

    #[test]
    fn rows_start_at_bottom() {
        let img = Image::new(2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(img.height(), 3);
        assert_eq!(img.get(1, 0), Some(2.0));
        assert_eq!(img.get(0, 2), Some(5.0));
        assert_eq!(img.get(2, 0), None);
    }

    #[test]
    fn uniform_image_is_flat_in_the_middle() {
        let grid = Grid::<HexLattice>::new(GridConfig::hex(0.1, 2.0)).unwrap();
        let img = Image::new(40, vec![1.0; 1600]).unwrap();
        let out = grid.resample_image(&img, Point2::new(4.0, 4.0), Point2::ZERO).unwrap();
        // The whole grid lies well inside the 4 m image; the only variation
        // left is the sub-pixel phase of each element against the 3-sigma cut.
        for &v in &out {
            assert!(v > 0.98 && v <= 1.0, "{v}");
        }
    }

    #[test]
    fn bright_pixel_peaks_at_nearest_element() {
        let grid = Grid::<RectLattice>::new(GridConfig::square(0.25, 4.0)).unwrap();
        let mut pixels = vec![0.0; 16 * 16];
        // Pixel (12, 4): centre at (1.125, -0.875) for a 4 m image at the origin.
        pixels[4 * 16 + 12] = 1.0;
        let img = Image::new(16, pixels).unwrap();
        let out = grid.resample_image(&img, Point2::new(4.0, 4.0), Point2::ZERO).unwrap();
        let (best, _) = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        let p = Point2::new(grid.dense().x()[best], grid.dense().y()[best]);
        assert!(p.distance(Point2::new(1.125, -0.875)) <= 0.25 * 0.75);
        assert_eq!(out[best], 1.0);
    }

    #[test]
    fn image_far_away_gives_zeros() {
        let grid = Grid::<HexLattice>::new(GridConfig::hex(0.5, 4.0)).unwrap();
        let img = Image::new(4, vec![1.0; 16]).unwrap();
        let out = grid
            .resample_image(&img, Point2::new(1.0, 1.0), Point2::new(100.0, 0.0))
            .unwrap();
        assert!(out.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn bad_scale_rejected() {
        let grid = Grid::<HexLattice>::new(GridConfig::hex(0.5, 4.0)).unwrap();
        let img = Image::new(1, vec![1.0]).unwrap();
        assert!(grid
            .resample_image(&img, Point2::new(0.0, 1.0), Point2::ZERO)
            .is_err());
    }
}
