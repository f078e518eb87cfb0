//! Chip identification probe
//!
//! Touch controller vendors reuse one register map across several mask
//! revisions that report different identity values, so a variant owns an
//! ordered *set* of candidate IDs rather than a single one. Identification
//! reads the identity register once and takes the first matching candidate;
//! candidate sets are small and do not collide across families, so the
//! order only matters for diagnostics.

use crate::bus::BusTransport;
use crate::variant::TouchVariant;

/// Identification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdentifyError {
    /// The identity register could not be read (no device, bus timeout)
    NoDevice,
    /// The register read back a value outside the candidate set
    UnknownDevice(u32),
}

/// Result of a successful probe
///
/// Immutable once resolved; the matched ID drives diagnostics and the
/// variant reference drives all subsequent register-map interpretation.
#[derive(Debug, Clone, Copy)]
pub struct ChipIdentity {
    /// The candidate ID the device reported
    pub chip_id: u32,
    /// The descriptor it was matched against
    pub variant: &'static TouchVariant,
}

/// Probe the identity register and match it against `variant.chip_ids`
///
/// Multi-byte identity registers are assembled big-endian (first byte read
/// is most significant), so a Goodix-style ASCII product ID reads as its
/// byte string, e.g. `"911\0"` -> `0x3931_3100`.
pub fn identify(
    bus: &mut impl BusTransport,
    variant: &'static TouchVariant,
) -> Result<ChipIdentity, IdentifyError> {
    let mut buf = [0u8; 4];
    let len = variant.id_width.bytes();

    bus.read(variant.id_reg, &mut buf[..len])
        .map_err(|_| IdentifyError::NoDevice)?;

    let mut value = 0u32;
    for &b in &buf[..len] {
        value = (value << 8) | b as u32;
    }

    for &candidate in variant.chip_ids {
        if candidate == value {
            return Ok(ChipIdentity {
                chip_id: candidate,
                variant,
            });
        }
    }

    Err(IdentifyError::UnknownDevice(value))
}
