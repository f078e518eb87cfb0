//! Variant descriptor types
//!
//! A variant descriptor is the complete per-chip knowledge consumed by a
//! generic driver core: orientation tables, register addresses, candidate
//! chip IDs, geometry, and bring-up stages. Descriptors are plain `'static`
//! data, created at board-configuration time and shared read-only across
//! any number of driver instances.

use crate::orientation::MadctlTable;
use crate::sequencer::InitStage;

/// Color channel ordering expected by a panel's pixel-write path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteOrder {
    /// Red in the high channel
    #[default]
    Rgb,
    /// Blue in the high channel
    Bgr,
}

/// Register data width of a touch controller's map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegWidth {
    /// 8-bit registers
    Bits8,
    /// 16-bit registers
    Bits16,
    /// 32-bit registers
    Bits32,
}

impl RegWidth {
    /// Width in bytes
    pub fn bytes(self) -> usize {
        match self {
            RegWidth::Bits8 => 1,
            RegWidth::Bits16 => 2,
            RegWidth::Bits32 => 4,
        }
    }
}

/// Per-chip display controller descriptor
pub struct DisplayVariant {
    /// Chip name for diagnostics
    pub name: &'static str,
    /// Address-mode table, one entry per rotation, BGR bit excluded
    pub madctl: MadctlTable,
    /// Register holding the address-mode byte
    pub madctl_reg: u32,
    /// BGR bit position within the address-mode byte, 0 when the chip has
    /// no byte-order bit there (byte order is then applied in software)
    pub bgr_mask: u8,
    /// Channel order the panel is wired for
    pub default_order: ByteOrder,
    /// Column address set register
    pub caset_reg: u32,
    /// Row address set register
    pub raset_reg: u32,
    /// Memory write register
    pub ramwr_reg: u32,
    /// Memory write continue register (subsequent chunks of one transfer)
    pub ramwr_cont_reg: u32,
    /// Sleep-in register
    pub sleep_in_reg: u32,
    /// Sleep-out register
    pub sleep_out_reg: u32,
    /// Inversion on register
    pub invert_on_reg: u32,
    /// Inversion off register
    pub invert_off_reg: u32,
    /// Active area width in pixels, unrotated
    pub width: u16,
    /// Active area height in pixels, unrotated
    pub height: u16,
    /// Offset of the active area within controller RAM
    pub offset: (u16, u16),
    /// Bring-up stages, run in order by `initialize`
    pub init: &'static [InitStage],
}

/// Register layout of a touch controller's report region
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchRegisterMap {
    /// Status register holding the active point count
    pub status_reg: u32,
    /// Mask selecting the point count within the status byte
    pub count_mask: u8,
    /// First point record register
    pub points_reg: u32,
    /// Bytes per point record
    pub point_stride: u8,
    /// Maximum simultaneous points the chip reports
    pub max_points: u8,
    /// Coordinate encoding within a point record
    pub coords: CoordLayout,
    /// Status write-back required to re-arm reporting: (register, value)
    pub status_ack: Option<(u32, u8)>,
}

/// How a point record encodes its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoordLayout {
    /// FocalTech-style: 12-bit big-endian X/Y with event/ID flags in the
    /// high nibbles (bytes 0..4 of the record)
    BigEndian12 {
        /// Touch ID lives in the high nibble of byte 2
        id_in_y_high: bool,
    },
    /// Goodix-style: ID byte followed by 16-bit little-endian X then Y
    LittleEndian16,
}

/// Per-chip touch controller descriptor
#[derive(Debug)]
pub struct TouchVariant {
    /// Chip family name for diagnostics
    pub name: &'static str,
    /// Identity register
    pub id_reg: u32,
    /// Width of the identity register
    pub id_width: RegWidth,
    /// Candidate chip IDs, in declared order; a family may legitimately
    /// report several IDs across silicon revisions, first match wins
    pub chip_ids: &'static [u32],
    /// Physical active area in millimetres, `None` when the controller
    /// self-reports its resolution
    pub size_mm: Option<(u16, u16)>,
    /// Reported coordinate range, used to clamp decoded points
    pub max_x: u16,
    /// Reported coordinate range, used to clamp decoded points
    pub max_y: u16,
    /// Report region layout
    pub map: TouchRegisterMap,
    /// Post-identification configuration stages
    pub config: &'static [InitStage],
}
