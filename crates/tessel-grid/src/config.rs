//! Grid construction parameters and their validation.
//!
//! [`GridConfig`] is the builder input for [`Grid::new`](crate::Grid::new).
//! [`validate()`](GridConfig::validate) checks the structural invariants up
//! front so construction never starts on parameters that cannot describe a
//! grid.

use tessel_core::GridError;

use crate::lattice::LatticeKind;

// ── DomainShape ────────────────────────────────────────────────────

/// Which elements survive once a boundary has been fitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DomainShape {
    /// Keep only elements on or inside the boundary.
    #[default]
    Boundary,
    /// Keep a metric rectangle around the boundary (plus growth buffers).
    Rectangle,
    /// Keep a lattice-aligned parallelogram around the boundary.
    Parallelogram,
    /// Keep the whole hexagonal tiling. Hex lattices only.
    Hexagon,
}

impl DomainShape {
    /// Stable tag used by the persisted layout.
    pub fn tag(self) -> u8 {
        match self {
            Self::Boundary => 0,
            Self::Rectangle => 1,
            Self::Parallelogram => 2,
            Self::Hexagon => 3,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Boundary),
            1 => Some(Self::Rectangle),
            2 => Some(Self::Parallelogram),
            3 => Some(Self::Hexagon),
            _ => None,
        }
    }
}

// ── WrapMode ───────────────────────────────────────────────────────

/// Periodic closure of a rectangular grid's edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Open edges.
    #[default]
    None,
    /// East edge joins the west edge.
    Horizontal,
    /// North edge joins the south edge.
    Vertical,
    /// Both seams are closed (a torus).
    Both,
}

impl WrapMode {
    /// `true` if the east/west seam is closed.
    pub fn wraps_x(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    /// `true` if the north/south seam is closed.
    pub fn wraps_y(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }

    /// Stable tag used by the persisted layout.
    pub fn tag(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Horizontal => 1,
            Self::Vertical => 2,
            Self::Both => 3,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::Horizontal),
            2 => Some(Self::Vertical),
            3 => Some(Self::Both),
            _ => None,
        }
    }
}

// ── GridConfig ─────────────────────────────────────────────────────

/// Default depth of the recently-visited memory used while walking a
/// boundary ring. Tuned for boundaries up to two elements thick.
pub const DEFAULT_BOUNDARY_MEMORY: usize = 16;

/// Default element count above which per-element numeric loops go parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Complete set of parameters for building a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Centre-to-centre spacing of adjacent tiles (hex `d`, rect `dx`).
    pub pitch: f64,
    /// Row spacing for rect grids (`dy`). Ignored by hex grids, whose row
    /// spacing is always `pitch * sqrt(3) / 2`.
    pub row_pitch: f64,
    /// Horizontal extent of the initial tiling, centred on the origin.
    pub span_x: f64,
    /// Vertical extent of the initial tiling. Ignored by hex grids.
    pub span_y: f64,
    /// Common z coordinate of every element.
    pub z: f64,
    /// Which elements survive boundary fitting.
    pub domain_shape: DomainShape,
    /// Edge wrapping (rect only).
    pub wrap: WrapMode,
    /// Depth of the recently-visited ring buffer used by the interior marker.
    pub boundary_memory: usize,
    /// Extra columns kept either side of the boundary for non-boundary domains.
    pub growth_buffer_horz: i32,
    /// Extra rows kept above and below the boundary for non-boundary domains.
    pub growth_buffer_vert: i32,
    /// Element count at which convolution, resampling and shifting use rayon.
    pub parallel_threshold: usize,
}

impl Default for GridConfig {
    /// A unit-pitch hexagonal grid with one ring around the centre.
    fn default() -> Self {
        Self::hex(1.0, 2.0)
    }
}

impl GridConfig {
    /// Hexagonal grid of pitch `d` covering a hexagon of width `span`.
    pub fn hex(d: f64, span: f64) -> Self {
        Self {
            pitch: d,
            row_pitch: d * 3f64.sqrt() / 2.0,
            span_x: span,
            span_y: span,
            z: 0.0,
            domain_shape: DomainShape::Boundary,
            wrap: WrapMode::None,
            boundary_memory: DEFAULT_BOUNDARY_MEMORY,
            growth_buffer_horz: 5,
            growth_buffer_vert: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Rectangular grid with pitches `dx`, `dy` covering `span_x` by `span_y`.
    pub fn rect(dx: f64, dy: f64, span_x: f64, span_y: f64) -> Self {
        Self {
            pitch: dx,
            row_pitch: dy,
            span_x,
            span_y,
            z: 0.0,
            domain_shape: DomainShape::Boundary,
            wrap: WrapMode::None,
            boundary_memory: DEFAULT_BOUNDARY_MEMORY,
            growth_buffer_horz: 0,
            growth_buffer_vert: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Square-pitched rectangular grid covering a `span` by `span` square.
    pub fn square(d: f64, span: f64) -> Self {
        Self::rect(d, d, span, span)
    }

    /// Builder-style domain shape override.
    pub fn with_domain_shape(mut self, shape: DomainShape) -> Self {
        self.domain_shape = shape;
        self
    }

    /// Builder-style wrap mode override.
    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Builder-style z override.
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }

    /// Builder-style boundary memory override.
    pub fn with_boundary_memory(mut self, depth: usize) -> Self {
        self.boundary_memory = depth;
        self
    }

    /// Check every structural invariant for a lattice of kind `kind`.
    pub fn validate(&self, kind: LatticeKind) -> Result<(), GridError> {
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(GridError::config(format!(
                "pitch must be finite and positive, got {}",
                self.pitch
            )));
        }
        if !(self.span_x.is_finite() && self.span_x >= 0.0) {
            return Err(GridError::config(format!(
                "span must be finite and non-negative, got {}",
                self.span_x
            )));
        }
        if !self.z.is_finite() {
            return Err(GridError::config(format!("z must be finite, got {}", self.z)));
        }
        if self.boundary_memory == 0 {
            return Err(GridError::config("boundary_memory must be at least 1"));
        }
        if self.growth_buffer_horz < 0 || self.growth_buffer_vert < 0 {
            return Err(GridError::config(format!(
                "growth buffers must be non-negative, got ({}, {})",
                self.growth_buffer_horz, self.growth_buffer_vert
            )));
        }
        match kind {
            LatticeKind::Hex => {
                if self.wrap != WrapMode::None {
                    return Err(GridError::config(
                        "hexagonal grids do not support wrapping",
                    ));
                }
            }
            LatticeKind::Rect => {
                if !(self.row_pitch.is_finite() && self.row_pitch > 0.0) {
                    return Err(GridError::config(format!(
                        "row pitch must be finite and positive, got {}",
                        self.row_pitch
                    )));
                }
                if !(self.span_y.is_finite() && self.span_y >= 0.0) {
                    return Err(GridError::config(format!(
                        "span must be finite and non-negative, got {}",
                        self.span_y
                    )));
                }
                if self.domain_shape == DomainShape::Hexagon {
                    return Err(GridError::config(
                        "hexagon domain shape requires a hexagonal lattice",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_defaults_validate() {
        assert!(GridConfig::hex(0.01, 1.0).validate(LatticeKind::Hex).is_ok());
    }

    #[test]
    fn rect_defaults_validate() {
        assert!(GridConfig::square(1.0, 10.0)
            .validate(LatticeKind::Rect)
            .is_ok());
    }

    #[test]
    fn non_positive_pitch_rejected() {
        for pitch in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let cfg = GridConfig::hex(pitch, 1.0);
            assert!(
                matches!(
                    cfg.validate(LatticeKind::Hex),
                    Err(GridError::Configuration { .. })
                ),
                "pitch {pitch} accepted"
            );
        }
    }

    #[test]
    fn negative_span_rejected() {
        let cfg = GridConfig::square(1.0, -2.0);
        assert!(cfg.validate(LatticeKind::Rect).is_err());
    }

    #[test]
    fn hex_rejects_wrap() {
        let cfg = GridConfig::hex(1.0, 4.0).with_wrap(WrapMode::Horizontal);
        assert!(cfg.validate(LatticeKind::Hex).is_err());
    }

    #[test]
    fn rect_rejects_hexagon_domain() {
        let cfg = GridConfig::square(1.0, 4.0).with_domain_shape(DomainShape::Hexagon);
        assert!(cfg.validate(LatticeKind::Rect).is_err());
    }

    #[test]
    fn zero_boundary_memory_rejected() {
        let cfg = GridConfig::hex(1.0, 4.0).with_boundary_memory(0);
        assert!(cfg.validate(LatticeKind::Hex).is_err());
    }

    #[test]
    fn tags_roundtrip() {
        for s in [
            DomainShape::Boundary,
            DomainShape::Rectangle,
            DomainShape::Parallelogram,
            DomainShape::Hexagon,
        ] {
            assert_eq!(DomainShape::from_tag(s.tag()), Some(s));
        }
        for w in [
            WrapMode::None,
            WrapMode::Horizontal,
            WrapMode::Vertical,
            WrapMode::Both,
        ] {
            assert_eq!(WrapMode::from_tag(w.tag()), Some(w));
        }
        assert_eq!(WrapMode::from_tag(9), None);
    }
}
