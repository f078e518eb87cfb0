//! Display controller descriptors
//!
//! Everything chip-specific lives here as constant data: MADCTL tables,
//! bring-up stage lists, geometry. The driver core never special-cases a
//! chip name.

use glint_core::bus::{BusError, BusTransport};
use glint_core::orientation::MadctlTable;
use glint_core::sequencer::{InitStage, SeqOp, StageKind, StageState};
use glint_core::variant::{ByteOrder, DisplayVariant};

/// MIPI Display Command Set opcodes shared by the chips below
pub mod dcs {
    pub const SWRESET: u32 = 0x01;
    pub const RDID4: u32 = 0xD3;
    pub const SLPIN: u32 = 0x10;
    pub const SLPOUT: u32 = 0x11;
    pub const NORON: u32 = 0x13;
    pub const INVOFF: u32 = 0x20;
    pub const INVON: u32 = 0x21;
    pub const DISPON: u32 = 0x29;
    pub const CASET: u32 = 0x2A;
    pub const RASET: u32 = 0x2B;
    pub const RAMWR: u32 = 0x2C;
    pub const MADCTL: u32 = 0x36;
    pub const COLMOD: u32 = 0x3A;
    pub const RAMWRC: u32 = 0x3C;
}

/// MADCTL BGR bit common to the MIPI-style chips
const BGR_BIT: u8 = 0x08;

/// 16-bit pixel format for COLMOD
const COLMOD_16BPP: &[u8] = &[0x55];

// ---------------------------------------------------------------------------
// ST7789 - 240x320 TFT, RGB-wired, inversion-on panel
// ---------------------------------------------------------------------------

const ST7789_RESET: &[SeqOp] = &[
    SeqOp::Write {
        addr: dcs::SWRESET,
        data: &[],
    },
    SeqOp::DelayMs(150),
    SeqOp::Write {
        addr: dcs::SLPOUT,
        data: &[],
    },
    SeqOp::DelayMs(120),
];

const ST7789_CONFIG: &[SeqOp] = &[
    SeqOp::Write {
        addr: dcs::COLMOD,
        data: COLMOD_16BPP,
    },
    SeqOp::DelayMs(10),
    // ST7789 panels are wired inverted
    SeqOp::Write {
        addr: dcs::INVON,
        data: &[],
    },
    SeqOp::Write {
        addr: dcs::NORON,
        data: &[],
    },
    SeqOp::DelayMs(10),
    SeqOp::Write {
        addr: dcs::DISPON,
        data: &[],
    },
    SeqOp::DelayMs(100),
];

const ST7789_INIT: &[InitStage] = &[
    InitStage {
        name: "reset",
        kind: StageKind::Script(ST7789_RESET),
    },
    InitStage {
        name: "config",
        kind: StageKind::Script(ST7789_CONFIG),
    },
];

pub static ST7789: DisplayVariant = DisplayVariant {
    name: "ST7789",
    madctl: MadctlTable([0x00, 0x60, 0xC0, 0xA0]),
    madctl_reg: dcs::MADCTL,
    bgr_mask: BGR_BIT,
    default_order: ByteOrder::Rgb,
    caset_reg: dcs::CASET,
    raset_reg: dcs::RASET,
    ramwr_reg: dcs::RAMWR,
    ramwr_cont_reg: dcs::RAMWRC,
    sleep_in_reg: dcs::SLPIN,
    sleep_out_reg: dcs::SLPOUT,
    invert_on_reg: dcs::INVON,
    invert_off_reg: dcs::INVOFF,
    width: 240,
    height: 320,
    offset: (0, 0),
    init: ST7789_INIT,
};

// ---------------------------------------------------------------------------
// ILI9341 - 240x320 TFT, BGR-wired
//
// The power stage depends on which stepping answered the ID4 probe, so the
// bring-up is the staged, read-back-dependent form: stage 1 captures ID4,
// stage 2 picks the VRH setting from it.
// ---------------------------------------------------------------------------

const ILI9341_PROBE: &[SeqOp] = &[
    SeqOp::Write {
        addr: dcs::SWRESET,
        data: &[],
    },
    SeqOp::DelayMs(150),
    // ID4 is three bytes after a dummy parameter; the transport drops the
    // dummy, leaving manufacturer/version/driver IDs
    SeqOp::ReadCapture {
        addr: dcs::RDID4,
        len: 3,
    },
];

/// ILI9341 power control register
const ILI9341_PWCTRL1: u32 = 0xC0;
/// VCOM control register
const ILI9341_VMCTRL1: u32 = 0xC5;

/// Driver ID reported by genuine ILI9341 silicon in the last ID4 byte pair
const ILI9341_ID: [u8; 2] = [0x93, 0x41];

fn ili9341_power(state: &mut StageState, bus: &mut dyn BusTransport) -> Result<(), BusError> {
    // Genuine 9341 steppings take a higher GVDD than the 9340-compatible
    // parts that answer the same register map
    let captured = state.captured();
    let vrh = if captured.len() >= 3 && captured[1..3] == ILI9341_ID {
        0x23
    } else {
        0x21
    };
    bus.write(ILI9341_PWCTRL1, &[vrh])?;
    bus.write(ILI9341_VMCTRL1, &[0x3E, 0x28])
}

const ILI9341_CONFIG: &[SeqOp] = &[
    SeqOp::Write {
        addr: dcs::COLMOD,
        data: COLMOD_16BPP,
    },
    SeqOp::Write {
        addr: dcs::SLPOUT,
        data: &[],
    },
    SeqOp::DelayMs(120),
    SeqOp::Write {
        addr: dcs::DISPON,
        data: &[],
    },
    SeqOp::DelayMs(20),
];

const ILI9341_INIT: &[InitStage] = &[
    InitStage {
        name: "probe",
        kind: StageKind::Script(ILI9341_PROBE),
    },
    InitStage {
        name: "power",
        kind: StageKind::Dynamic(ili9341_power),
    },
    InitStage {
        name: "config",
        kind: StageKind::Script(ILI9341_CONFIG),
    },
];

pub static ILI9341: DisplayVariant = DisplayVariant {
    name: "ILI9341",
    madctl: MadctlTable([0x40, 0x20, 0x80, 0xE0]),
    madctl_reg: dcs::MADCTL,
    bgr_mask: BGR_BIT,
    default_order: ByteOrder::Bgr,
    caset_reg: dcs::CASET,
    raset_reg: dcs::RASET,
    ramwr_reg: dcs::RAMWR,
    ramwr_cont_reg: dcs::RAMWRC,
    sleep_in_reg: dcs::SLPIN,
    sleep_out_reg: dcs::SLPOUT,
    invert_on_reg: dcs::INVON,
    invert_off_reg: dcs::INVOFF,
    width: 240,
    height: 320,
    offset: (0, 0),
    init: ILI9341_INIT,
};

// ---------------------------------------------------------------------------
// GC9A01 - 240x240 round TFT, BGR-wired, inversion-on panel
// ---------------------------------------------------------------------------

/// Inter-register access unlock pair
const GC9A01_INTER_EN1: u32 = 0xFE;
const GC9A01_INTER_EN2: u32 = 0xEF;

const GC9A01_UNLOCK: &[SeqOp] = &[
    SeqOp::Write {
        addr: GC9A01_INTER_EN1,
        data: &[],
    },
    SeqOp::Write {
        addr: GC9A01_INTER_EN2,
        data: &[],
    },
];

const GC9A01_CONFIG: &[SeqOp] = &[
    SeqOp::Write {
        addr: dcs::COLMOD,
        data: COLMOD_16BPP,
    },
    SeqOp::Write {
        addr: dcs::INVON,
        data: &[],
    },
    SeqOp::Write {
        addr: dcs::SLPOUT,
        data: &[],
    },
    SeqOp::DelayMs(120),
    SeqOp::Write {
        addr: dcs::DISPON,
        data: &[],
    },
    SeqOp::DelayMs(20),
];

const GC9A01_INIT: &[InitStage] = &[
    InitStage {
        name: "unlock",
        kind: StageKind::Script(GC9A01_UNLOCK),
    },
    InitStage {
        name: "config",
        kind: StageKind::Script(GC9A01_CONFIG),
    },
];

pub static GC9A01: DisplayVariant = DisplayVariant {
    name: "GC9A01",
    madctl: MadctlTable([0x00, 0x60, 0xC0, 0xA0]),
    madctl_reg: dcs::MADCTL,
    bgr_mask: BGR_BIT,
    default_order: ByteOrder::Bgr,
    caset_reg: dcs::CASET,
    raset_reg: dcs::RASET,
    ramwr_reg: dcs::RAMWR,
    ramwr_cont_reg: dcs::RAMWRC,
    sleep_in_reg: dcs::SLPIN,
    sleep_out_reg: dcs::SLPOUT,
    invert_on_reg: dcs::INVON,
    invert_off_reg: dcs::INVOFF,
    width: 240,
    height: 240,
    offset: (0, 0),
    init: GC9A01_INIT,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayDriver;
    use crate::testutil::{MockBus, NoDelay};
    use glint_core::orientation::{resolve, Rotation};

    #[test]
    fn test_tables_resolve_for_all_rotations() {
        for variant in [&ST7789, &ILI9341, &GC9A01] {
            for index in 0..4u8 {
                resolve(&variant.madctl, index).unwrap();
            }
            assert!(resolve(&variant.madctl, 4).is_err());
        }
    }

    #[test]
    fn test_ili9341_power_tracks_probed_stepping() {
        let mut genuine = MockBus::new();
        genuine.expect_read(dcs::RDID4, &[0x00, 0x93, 0x41]);
        let mut driver = DisplayDriver::new(genuine, &ILI9341);
        driver.initialize(&mut NoDelay).unwrap();
        let bus = driver.release();
        assert_eq!(bus.writes_to(ILI9341_PWCTRL1).last().unwrap(), &[0x23]);

        let mut compat = MockBus::new();
        compat.expect_read(dcs::RDID4, &[0x00, 0x93, 0x40]);
        let mut driver = DisplayDriver::new(compat, &ILI9341);
        driver.initialize(&mut NoDelay).unwrap();
        let bus = driver.release();
        assert_eq!(bus.writes_to(ILI9341_PWCTRL1).last().unwrap(), &[0x21]);
    }

    #[test]
    fn test_ili9341_default_order_is_bgr() {
        let mut bus = MockBus::new();
        bus.expect_read(dcs::RDID4, &[0x00, 0x93, 0x41]);
        let mut driver = DisplayDriver::new(bus, &ILI9341);
        driver.initialize(&mut NoDelay).unwrap();

        // Rotation 0 with the BGR bit folded in
        assert_eq!(driver.address_mode(), 0x48);
        driver.set_orientation(Rotation::Deg90).unwrap();
        assert_eq!(driver.address_mode(), 0x28);
    }

    #[test]
    fn test_gc9a01_is_square() {
        let driver = DisplayDriver::new(MockBus::new(), &GC9A01);
        assert_eq!(driver.size(), (240, 240));
    }
}
