//! Per-element flag set.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Boolean state attached to every grid element.
///
/// Bit values match the persisted layout, so they must never be renumbered.
///
/// # Examples
///
/// ```
/// use tessel_core::ElementFlags;
///
/// let mut f = ElementFlags::empty();
/// f.insert(ElementFlags::IS_BOUNDARY | ElementFlags::INSIDE_BOUNDARY);
/// assert!(f.contains(ElementFlags::INSIDE_BOUNDARY));
/// assert!(!f.contains(ElementFlags::INSIDE_REGION));
/// assert_eq!(f.bits(), 0xc0);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ElementFlags(u32);

impl ElementFlags {
    /// Element lies on the fitted boundary.
    pub const IS_BOUNDARY: Self = Self(0x40);
    /// Element lies on or inside the fitted boundary.
    pub const INSIDE_BOUNDARY: Self = Self(0x80);
    /// Element lies inside the rectangular/parallelogram/hexagonal domain.
    pub const INSIDE_DOMAIN: Self = Self(0x100);
    /// Element lies on a region boundary.
    pub const IS_REGION_BOUNDARY: Self = Self(0x200);
    /// Element lies on or inside a region boundary.
    pub const INSIDE_REGION: Self = Self(0x400);

    const ALL: u32 = 0x40 | 0x80 | 0x100 | 0x200 | 0x400;

    /// The empty flag set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit pattern.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Rebuild from raw bits, dropping any bits that name no flag.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    /// `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set every bit of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear every bit of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for ElementFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ElementFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ElementFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(ElementFlags, &str); 5] = [
            (ElementFlags::IS_BOUNDARY, "IS_BOUNDARY"),
            (ElementFlags::INSIDE_BOUNDARY, "INSIDE_BOUNDARY"),
            (ElementFlags::INSIDE_DOMAIN, "INSIDE_DOMAIN"),
            (ElementFlags::IS_REGION_BOUNDARY, "IS_REGION_BOUNDARY"),
            (ElementFlags::INSIDE_REGION, "INSIDE_REGION"),
        ];
        let mut set = f.debug_set();
        for (flag, name) in NAMES {
            if self.contains(flag) {
                set.entry(&format_args!("{name}"));
            }
        }
        set.finish()
    }
}
