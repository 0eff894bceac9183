//! FNV-1a hashing for payload checksums and grid fingerprints.
//!
//! Not cryptographic. The checksum catches truncation and bit rot; the
//! fingerprint is a quick equality check between two grids.

use tessel_grid::DenseGrid;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_extend(hash: u64, bytes: &[u8]) -> u64 {
    bytes.iter().fold(hash, |h, &b| fnv1a_byte(h, b))
}

/// 64-bit FNV-1a of `bytes`.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    fnv1a_extend(FNV_OFFSET, bytes)
}

/// Fingerprint of a dense export: element count, then every position,
/// lattice coordinate, flag word, boundary distance and neighbour index in
/// dense order.
///
/// Floats are hashed by bit pattern, so `0.0` and `-0.0` differ.
pub fn grid_hash(dense: &DenseGrid) -> u64 {
    let mut hash = fnv1a_extend(FNV_OFFSET, &(dense.len() as u64).to_le_bytes());
    for i in 0..dense.len() {
        hash = fnv1a_extend(hash, &dense.x()[i].to_bits().to_le_bytes());
        hash = fnv1a_extend(hash, &dense.y()[i].to_bits().to_le_bytes());
        hash = fnv1a_extend(hash, &dense.lattice_a()[i].to_le_bytes());
        hash = fnv1a_extend(hash, &dense.lattice_b()[i].to_le_bytes());
        hash = fnv1a_extend(hash, &dense.flags()[i].to_le_bytes());
        hash = fnv1a_extend(hash, &dense.dist_to_boundary()[i].to_bits().to_le_bytes());
        for dir in 0..dense.degree() {
            hash = fnv1a_extend(hash, &dense.neighbours(dir)[i].to_le_bytes());
        }
    }
    hash
}
