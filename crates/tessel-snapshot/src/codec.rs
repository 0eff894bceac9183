//! Binary encode/decode for the snapshot payload.
//!
//! All integers and floats are little-endian; there is no padding and no
//! self-describing schema. The payload layout is:
//!
//! ```text
//! kind u8
//! pitch f64, row_pitch f64, span_x f64, span_y f64, z f64
//! growth_buffer_horz i32, growth_buffer_vert i32
//! domain_shape u8, wrap u8, boundary_memory u32
//! centroid (f64, f64), original_centroid (f64, f64), enclosed_tiles f64
//! element_count u32
//! element_count x { x f64, y f64, a i32, b i32, flags u32,
//!                   dist_to_boundary f64, neighbour u32 x degree }
//! ```
//!
//! The parallel threshold is a property of the host rather than the grid
//! and is not stored; decoded configs carry the default.

use std::io::{self, Read, Write};

use tessel_core::{ElementFlags, LatticeCoord, Point2};
use tessel_grid::{
    DomainShape, ElementRecord, GridConfig, GridParts, HexLattice, Lattice, LatticeKind,
    RectLattice, WrapMode,
};

use crate::error::SnapshotError;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), SnapshotError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), SnapshotError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn write_point(w: &mut dyn Write, p: Point2) -> Result<(), SnapshotError> {
    write_f64_le(w, p.x)?;
    write_f64_le(w, p.y)
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, SnapshotError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, SnapshotError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, SnapshotError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, SnapshotError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, SnapshotError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_point(r: &mut dyn Read) -> Result<Point2, SnapshotError> {
    let x = read_f64_le(r)?;
    let y = read_f64_le(r)?;
    Ok(Point2::new(x, y))
}

// ── Payload ─────────────────────────────────────────────────────

/// Neighbour slots stored per element for lattice `kind`.
pub fn degree_of(kind: LatticeKind) -> usize {
    match kind {
        LatticeKind::Hex => HexLattice::DEGREE,
        LatticeKind::Rect => RectLattice::DEGREE,
    }
}

/// Encoded size of one element record for lattice `kind`.
pub fn record_len(kind: LatticeKind) -> usize {
    8 + 8 + 4 + 4 + 4 + 8 + 4 * degree_of(kind)
}

/// Encode `parts` for a lattice of `kind`.
pub fn encode_parts(
    w: &mut dyn Write,
    kind: LatticeKind,
    parts: &GridParts,
) -> Result<(), SnapshotError> {
    let c = &parts.config;
    write_u8(w, kind.tag())?;
    for v in [c.pitch, c.row_pitch, c.span_x, c.span_y, c.z] {
        write_f64_le(w, v)?;
    }
    write_i32_le(w, c.growth_buffer_horz)?;
    write_i32_le(w, c.growth_buffer_vert)?;
    write_u8(w, c.domain_shape.tag())?;
    write_u8(w, c.wrap.tag())?;
    let memory = u32::try_from(c.boundary_memory)
        .map_err(|_| SnapshotError::malformed("boundary memory exceeds u32"))?;
    write_u32_le(w, memory)?;
    write_point(w, parts.centroid)?;
    write_point(w, parts.original_centroid)?;
    write_f64_le(w, parts.enclosed_tiles)?;

    let count = u32::try_from(parts.elements.len())
        .map_err(|_| SnapshotError::malformed("element count exceeds u32"))?;
    write_u32_le(w, count)?;
    let degree = degree_of(kind);
    for (i, e) in parts.elements.iter().enumerate() {
        if e.neighbours.len() != degree {
            return Err(SnapshotError::malformed(format!(
                "element {i} has {} neighbour slots, {kind} lattices have {degree}",
                e.neighbours.len()
            )));
        }
        write_point(w, e.position)?;
        write_i32_le(w, e.coord.a)?;
        write_i32_le(w, e.coord.b)?;
        write_u32_le(w, e.flags.bits())?;
        write_f64_le(w, e.dist_to_boundary)?;
        for &nb in &e.neighbours {
            write_u32_le(w, nb)?;
        }
    }
    Ok(())
}

/// Decode a complete payload. Trailing bytes after the last element record
/// are an error.
pub fn decode_parts(payload: &[u8]) -> Result<(LatticeKind, GridParts), SnapshotError> {
    let mut r = payload;
    let decoded = decode_body(&mut r).map_err(|e| match e {
        SnapshotError::Io(io) if io.kind() == io::ErrorKind::UnexpectedEof => {
            SnapshotError::malformed("payload truncated")
        }
        other => other,
    })?;
    if !r.is_empty() {
        return Err(SnapshotError::malformed(format!(
            "{} trailing bytes after the last element",
            r.len()
        )));
    }
    Ok(decoded)
}

fn decode_body(r: &mut &[u8]) -> Result<(LatticeKind, GridParts), SnapshotError> {
    let tag = read_u8(r)?;
    let kind = LatticeKind::from_tag(tag)
        .ok_or_else(|| SnapshotError::malformed(format!("unknown lattice kind tag {tag}")))?;

    let mut config = GridConfig::default();
    config.pitch = read_f64_le(r)?;
    config.row_pitch = read_f64_le(r)?;
    config.span_x = read_f64_le(r)?;
    config.span_y = read_f64_le(r)?;
    config.z = read_f64_le(r)?;
    config.growth_buffer_horz = read_i32_le(r)?;
    config.growth_buffer_vert = read_i32_le(r)?;
    let shape = read_u8(r)?;
    config.domain_shape = DomainShape::from_tag(shape)
        .ok_or_else(|| SnapshotError::malformed(format!("unknown domain shape tag {shape}")))?;
    let wrap = read_u8(r)?;
    config.wrap = WrapMode::from_tag(wrap)
        .ok_or_else(|| SnapshotError::malformed(format!("unknown wrap mode tag {wrap}")))?;
    config.boundary_memory = read_u32_le(r)? as usize;
    let centroid = read_point(r)?;
    let original_centroid = read_point(r)?;
    let enclosed_tiles = read_f64_le(r)?;

    let count = read_u32_le(r)? as usize;
    let per_record = record_len(kind);
    if count > r.len() / per_record {
        return Err(SnapshotError::malformed(format!(
            "{count} elements declared but only {} bytes remain",
            r.len()
        )));
    }
    let degree = degree_of(kind);
    let mut elements = Vec::with_capacity(count);
    for i in 0..count {
        let position = read_point(r)?;
        let a = read_i32_le(r)?;
        let b = read_i32_le(r)?;
        let bits = read_u32_le(r)?;
        let flags = ElementFlags::from_bits_truncate(bits);
        if flags.bits() != bits {
            return Err(SnapshotError::malformed(format!(
                "element {i} carries unknown flag bits {bits:#x}"
            )));
        }
        let dist_to_boundary = read_f64_le(r)?;
        let neighbours = (0..degree)
            .map(|_| read_u32_le(r))
            .collect::<Result<_, _>>()?;
        elements.push(ElementRecord {
            coord: LatticeCoord::new(a, b),
            position,
            flags,
            dist_to_boundary,
            neighbours,
        });
    }

    Ok((
        kind,
        GridParts {
            config,
            centroid,
            original_centroid,
            enclosed_tiles,
            elements,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_grid::{GridConfig, HexGrid, RectGrid};

    fn encoded(kind: LatticeKind, parts: &GridParts) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_parts(&mut buf, kind, parts).unwrap();
        buf
    }

    // ── Primitive tests ─────────────────────────────────────────

    #[test]
    fn primitives_are_little_endian() {
        let mut buf = Vec::new();
        write_u32_le(&mut buf, 0x0403_0201).unwrap();
        write_i32_le(&mut buf, -2).unwrap();
        assert_eq!(buf, [1, 2, 3, 4, 0xfe, 0xff, 0xff, 0xff]);
        let mut r = buf.as_slice();
        assert_eq!(read_u32_le(&mut r).unwrap(), 0x0403_0201);
        assert_eq!(read_i32_le(&mut r).unwrap(), -2);
    }

    #[test]
    fn f64_keeps_bit_pattern() {
        let mut buf = Vec::new();
        write_f64_le(&mut buf, -0.0).unwrap();
        write_f64_le(&mut buf, -100.0).unwrap();
        let mut r = buf.as_slice();
        assert_eq!(read_f64_le(&mut r).unwrap().to_bits(), (-0.0f64).to_bits());
        assert_eq!(read_f64_le(&mut r).unwrap(), -100.0);
    }

    // ── Payload tests ───────────────────────────────────────────

    #[test]
    fn payload_length_matches_layout() {
        let grid = RectGrid::new(GridConfig::square(1.0, 2.0)).unwrap();
        let buf = encoded(LatticeKind::Rect, &grid.to_parts());
        let header = 1 + 5 * 8 + 2 * 4 + 2 + 4 + 5 * 8 + 4;
        assert_eq!(buf.len(), header + 9 * record_len(LatticeKind::Rect));
    }

    #[test]
    fn decode_restores_parts() {
        let mut grid = HexGrid::new(GridConfig::hex(0.5, 6.0).with_z(2.5)).unwrap();
        grid.set_circular_boundary(2.0, Point2::ZERO).unwrap();
        let parts = grid.to_parts();
        let (kind, back) = decode_parts(&encoded(LatticeKind::Hex, &parts)).unwrap();
        assert_eq!(kind, LatticeKind::Hex);
        assert_eq!(back, parts);
    }

    #[test]
    fn unknown_kind_tag_is_malformed() {
        let grid = HexGrid::new(GridConfig::hex(1.0, 2.0)).unwrap();
        let mut buf = encoded(LatticeKind::Hex, &grid.to_parts());
        buf[0] = 9;
        assert!(matches!(
            decode_parts(&buf),
            Err(SnapshotError::Malformed { .. })
        ));
    }

    #[test]
    fn truncated_payload_is_malformed() {
        let grid = HexGrid::new(GridConfig::hex(1.0, 2.0)).unwrap();
        let buf = encoded(LatticeKind::Hex, &grid.to_parts());
        let err = decode_parts(&buf[..buf.len() - 3]).unwrap_err();
        assert!(matches!(err, SnapshotError::Malformed { .. }), "{err}");
    }

    #[test]
    fn trailing_bytes_are_malformed() {
        let grid = HexGrid::new(GridConfig::hex(1.0, 2.0)).unwrap();
        let mut buf = encoded(LatticeKind::Hex, &grid.to_parts());
        buf.push(0);
        assert!(matches!(
            decode_parts(&buf),
            Err(SnapshotError::Malformed { .. })
        ));
    }

    #[test]
    fn unknown_flag_bits_are_malformed() {
        let grid = HexGrid::new(GridConfig::hex(1.0, 0.0)).unwrap();
        let mut buf = encoded(LatticeKind::Hex, &grid.to_parts());
        let header = 1 + 5 * 8 + 2 * 4 + 2 + 4 + 5 * 8 + 4;
        let flags_at = header + 8 + 8 + 4 + 4;
        buf[flags_at + 3] = 0x80;
        assert!(matches!(
            decode_parts(&buf),
            Err(SnapshotError::Malformed { .. })
        ));
    }

    #[test]
    fn wrong_slot_count_is_rejected_on_encode() {
        let grid = HexGrid::new(GridConfig::hex(1.0, 2.0)).unwrap();
        let parts = grid.to_parts();
        let mut buf = Vec::new();
        assert!(encode_parts(&mut buf, LatticeKind::Rect, &parts).is_err());
    }
}
