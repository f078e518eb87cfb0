//! Touch controller descriptors
//!
//! Candidate chip-ID sets are declared in the order silicon revisions
//! shipped; identification takes the first match and keeps it for
//! diagnostics only.

use glint_core::sequencer::{InitStage, SeqOp, StageKind};
use glint_core::variant::{CoordLayout, RegWidth, TouchRegisterMap, TouchVariant};

// ---------------------------------------------------------------------------
// FocalTech FT6x36 family (FT6206 / FT6236 / FT6336)
// ---------------------------------------------------------------------------

/// Device mode register (0x00 = normal operating mode)
const FT_DEV_MODE: u32 = 0x00;
/// Touch detection threshold
const FT_TH_GROUP: u32 = 0x80;

const FT6X36_CONFIG_OPS: &[SeqOp] = &[
    SeqOp::Write {
        addr: FT_DEV_MODE,
        data: &[0x00],
    },
    SeqOp::Write {
        addr: FT_TH_GROUP,
        data: &[0x16],
    },
];

const FT6X36_CONFIG: &[InitStage] = &[InitStage {
    name: "config",
    kind: StageKind::Script(FT6X36_CONFIG_OPS),
}];

pub static FT6X36: TouchVariant = TouchVariant {
    name: "FT6x36",
    id_reg: 0xA3,
    id_width: RegWidth::Bits8,
    // FT6206, FT6236, FT6336 respectively
    chip_ids: &[0x06, 0x36, 0x64],
    size_mm: Some((31, 52)),
    max_x: 319,
    max_y: 479,
    map: TouchRegisterMap {
        status_reg: 0x02,
        count_mask: 0x0F,
        points_reg: 0x03,
        point_stride: 6,
        max_points: 2,
        coords: CoordLayout::BigEndian12 { id_in_y_high: true },
        status_ack: None,
    },
    config: FT6X36_CONFIG,
};

// ---------------------------------------------------------------------------
// Hynitron CST816 family (CST816S / CST816T / CST816D)
// ---------------------------------------------------------------------------

/// Interrupt control register
const CST_IRQ_CTL: u32 = 0xFA;
/// Auto-sleep disable register
const CST_DIS_AUTO_SLEEP: u32 = 0xFE;

const CST816_CONFIG_OPS: &[SeqOp] = &[
    // Report on touch and change events
    SeqOp::Write {
        addr: CST_IRQ_CTL,
        data: &[0x60],
    },
    SeqOp::Write {
        addr: CST_DIS_AUTO_SLEEP,
        data: &[0x01],
    },
];

const CST816_CONFIG: &[InitStage] = &[InitStage {
    name: "config",
    kind: StageKind::Script(CST816_CONFIG_OPS),
}];

pub static CST816: TouchVariant = TouchVariant {
    name: "CST816",
    id_reg: 0xA7,
    id_width: RegWidth::Bits8,
    // CST816S, CST816T, CST816D respectively
    chip_ids: &[0xB4, 0xB5, 0xB6],
    size_mm: Some((28, 35)),
    max_x: 239,
    max_y: 279,
    map: TouchRegisterMap {
        status_reg: 0x02,
        count_mask: 0x0F,
        points_reg: 0x03,
        point_stride: 6,
        max_points: 1,
        coords: CoordLayout::BigEndian12 {
            id_in_y_high: false,
        },
        status_ack: None,
    },
    config: CST816_CONFIG,
};

// ---------------------------------------------------------------------------
// Goodix GT911 - 16-bit register map, self-reported resolution
// ---------------------------------------------------------------------------

/// Coordinate status register; bit 7 = buffer ready, low nibble = count
const GT911_STATUS: u32 = 0x814E;

pub static GT911: TouchVariant = TouchVariant {
    name: "GT911",
    id_reg: 0x8140,
    id_width: RegWidth::Bits32,
    // ASCII product ID "911\0"
    chip_ids: &[0x3931_3100],
    // Resolution is self-reported via the 0x8146/0x8148 config area
    size_mm: None,
    max_x: 1023,
    max_y: 599,
    map: TouchRegisterMap {
        status_reg: GT911_STATUS,
        count_mask: 0x0F,
        points_reg: 0x814F,
        point_stride: 8,
        max_points: 5,
        coords: CoordLayout::LittleEndian16,
        status_ack: Some((GT911_STATUS, 0x00)),
    },
    config: &[],
};
