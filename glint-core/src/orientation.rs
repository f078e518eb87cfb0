//! Orientation resolution
//!
//! Display controllers encode axis-swap and mirror flags in a single
//! address-mode register (MADCTL on MIPI-style chips), but different
//! silicon families place the bits at different positions and combine them
//! differently per rotation. No formula covers them all, so the unit of
//! chip-specific knowledge is a 4-entry table and the engine only does the
//! lookup.

/// Logical screen rotation, counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// No rotation
    #[default]
    Deg0,
    /// 90 degrees
    Deg90,
    /// 180 degrees
    Deg180,
    /// 270 degrees
    Deg270,
}

/// Caller passed a rotation index outside 0..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidRotation(pub u8);

impl Rotation {
    /// Convert a raw rotation index (0 = 0 deg, 1 = 90 deg, ...) to a rotation
    pub fn from_index(index: u8) -> Result<Self, InvalidRotation> {
        match index {
            0 => Ok(Rotation::Deg0),
            1 => Ok(Rotation::Deg90),
            2 => Ok(Rotation::Deg180),
            3 => Ok(Rotation::Deg270),
            other => Err(InvalidRotation(other)),
        }
    }

    /// Table index for this rotation
    pub fn index(self) -> usize {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// True when this rotation swaps the panel's width and height
    pub fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Per-variant address-mode table, one control byte per rotation
///
/// Entries must not include the chip's byte-order (BGR) bit; the display
/// core composes that in separately so orientation and byte order can be
/// rewritten as one atomic register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MadctlTable(pub [u8; 4]);

impl MadctlTable {
    /// Control byte for the given rotation
    pub fn entry(&self, rotation: Rotation) -> u8 {
        self.0[rotation.index()]
    }
}

/// Resolve a raw rotation index against a variant's table
///
/// Pure lookup: indices 0..=3 return exactly the table entry at that
/// position, anything else fails with [`InvalidRotation`].
pub fn resolve(table: &MadctlTable, index: u8) -> Result<u8, InvalidRotation> {
    let rotation = Rotation::from_index(index)?;
    Ok(table.entry(rotation))
}
