//! Display driver core
//!
//! One generic driver drives every supported panel controller; per-chip
//! differences (orientation tables, init sequences, register addresses)
//! come from a [`DisplayVariant`] descriptor. See [`variants`] for the
//! chips shipped with this crate.
//!
//! Failure policy: bus errors are never absorbed. A failed `initialize`
//! leaves the instance unusable (there is no best-effort display mode);
//! callers discard it and construct a fresh driver. `set_orientation` and
//! `set_byte_order` update driver state only after the register write
//! succeeded, so the cached state always reflects what the chip last
//! acknowledged.

pub mod variants;

use embedded_hal::delay::DelayNs;

use glint_core::bus::{BusError, BusTransport, LineControl, LineLevel};
use glint_core::orientation::{InvalidRotation, Rotation};
use glint_core::sequencer::{run_stages, SequenceError};
use glint_core::variant::{ByteOrder, DisplayVariant};

/// Display operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bring-up sequence aborted at the given stage
    InitFailed {
        /// Failing stage index in the variant's init list
        stage: usize,
        /// Underlying bus error
        cause: BusError,
    },
    /// Transport failure outside initialization
    Bus(BusError),
    /// Out-of-range logical rotation index
    InvalidRotation(u8),
    /// Empty or inverted pixel region
    InvalidRegion,
    /// Operation on a driver that has not completed `initialize`
    NotInitialized,
}

impl From<BusError> for DisplayError {
    fn from(e: BusError) -> Self {
        DisplayError::Bus(e)
    }
}

impl From<InvalidRotation> for DisplayError {
    fn from(e: InvalidRotation) -> Self {
        DisplayError::InvalidRotation(e.0)
    }
}

impl From<SequenceError> for DisplayError {
    fn from(e: SequenceError) -> Self {
        DisplayError::InitFailed {
            stage: e.stage,
            cause: e.cause,
        }
    }
}

/// Rectangular panel region, inclusive corners, logical (rotated) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Region {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Region {
    /// Region covering both corners
    pub fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    fn is_valid(&self) -> bool {
        self.x1 >= self.x0 && self.y1 >= self.y0
    }
}

/// Pixel bytes staged per chunk when software byte-order marshaling runs
const MARSHAL_CHUNK: usize = 64;

/// Generic display driver core
///
/// Owns its bus handle exclusively; all operations run to completion
/// before another may begin (the bus is inherently serial).
pub struct DisplayDriver<B: BusTransport> {
    bus: B,
    variant: &'static DisplayVariant,
    rotation: Rotation,
    /// Address-mode byte last acknowledged by the chip
    madctl: u8,
    order: ByteOrder,
    initialized: bool,
    sleeping: bool,
}

impl<B: BusTransport> DisplayDriver<B> {
    /// Create a driver over `bus` for the given chip variant
    ///
    /// The driver starts uninitialized at rotation 0 with the panel's
    /// default byte order; call [`initialize`](Self::initialize) before
    /// anything else.
    pub fn new(bus: B, variant: &'static DisplayVariant) -> Self {
        Self {
            bus,
            variant,
            rotation: Rotation::Deg0,
            madctl: variant.madctl.entry(Rotation::Deg0),
            order: variant.default_order,
            initialized: false,
            sleeping: false,
        }
    }

    /// Pulse a reset line: low, 10 ms, high, then the 120 ms the MIPI
    /// command set mandates before the first command
    pub fn hardware_reset(
        line: &mut impl LineControl,
        delay: &mut impl DelayNs,
    ) -> Result<(), BusError> {
        line.set(LineLevel::Low)?;
        delay.delay_ms(10);
        line.set(LineLevel::High)?;
        delay.delay_ms(120);
        Ok(())
    }

    /// Drive a backlight line
    ///
    /// Pass-through to the board's line driver so callers can treat the
    /// backlight as part of the display surface; PWM duty gives dimming
    /// where the board wires the line to a PWM-capable pin.
    pub fn set_backlight(line: &mut impl LineControl, level: LineLevel) -> Result<(), BusError> {
        line.set(level)
    }

    /// Run the variant's bring-up stages, then program the composed
    /// orientation/byte-order register
    ///
    /// A sequencer failure is fatal to this instance: the driver stays
    /// unusable and every later operation returns
    /// [`DisplayError::NotInitialized`]. Bring-up order sensitivity makes a
    /// blind retry unsafe; construct a fresh driver to try again.
    pub fn initialize(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.initialized = false;
        run_stages(self.variant.init, &mut self.bus, delay)?;
        self.write_address_mode(self.rotation, self.order)?;
        self.initialized = true;
        Ok(())
    }

    /// Current logical rotation
    pub fn orientation(&self) -> Rotation {
        self.rotation
    }

    /// Address-mode byte last successfully written
    pub fn address_mode(&self) -> u8 {
        self.madctl
    }

    /// Current byte order
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Logical size at the current rotation
    pub fn size(&self) -> (u16, u16) {
        if self.rotation.swaps_axes() {
            (self.variant.height, self.variant.width)
        } else {
            (self.variant.width, self.variant.height)
        }
    }

    /// Set the logical rotation
    ///
    /// On a failed write the previous orientation state is kept unchanged.
    pub fn set_orientation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.write_address_mode(rotation, self.order)
    }

    /// Set the rotation from a raw index (0 = 0 deg, 1 = 90 deg, ...)
    pub fn set_orientation_index(&mut self, index: u8) -> Result<(), DisplayError> {
        let rotation = Rotation::from_index(index)?;
        self.set_orientation(rotation)
    }

    /// Set the color channel order for subsequent pixel transfers
    ///
    /// Chips that fold byte order into the address-mode register get the
    /// combined byte recomputed and rewritten as a single write; on the
    /// rest this only changes how payloads are marshaled.
    pub fn set_byte_order(&mut self, order: ByteOrder) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        if self.variant.bgr_mask != 0 {
            self.write_address_mode(self.rotation, order)
        } else {
            self.order = order;
            Ok(())
        }
    }

    /// Write a pixel payload to a panel region
    ///
    /// `payload` is RGB565, two bytes per pixel, MSB first, already in the
    /// caller's byte order; the driver remarshals only when the chip cannot
    /// express the order in a register. The region must lie within the
    /// logical panel size at the current rotation. Errors propagate, never
    /// retried.
    pub fn write_pixels(&mut self, region: Region, payload: &[u8]) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        let (width, height) = self.size();
        if !region.is_valid() || region.x1 >= width || region.y1 >= height {
            return Err(DisplayError::InvalidRegion);
        }

        self.set_address_window(region)?;

        let swap = self.variant.bgr_mask == 0 && self.order != self.variant.default_order;
        if !swap {
            self.bus.write(self.variant.ramwr_reg, payload)?;
            return Ok(());
        }

        // Software channel swap through a bounded staging buffer; the
        // first chunk opens the transfer, the rest continue it.
        let mut staging = [0u8; MARSHAL_CHUNK];
        let mut reg = self.variant.ramwr_reg;
        for chunk in payload.chunks(MARSHAL_CHUNK) {
            let out = &mut staging[..chunk.len()];
            out.copy_from_slice(chunk);
            swap_rgb565_channels(out);
            self.bus.write(reg, out)?;
            reg = self.variant.ramwr_cont_reg;
        }
        Ok(())
    }

    /// Enter sleep mode
    pub fn sleep(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.bus.write(self.variant.sleep_in_reg, &[])?;
        // 5 ms before the next command per the MIPI command set
        delay.delay_ms(5);
        self.sleeping = true;
        Ok(())
    }

    /// Leave sleep mode
    pub fn wake(&mut self, delay: &mut impl DelayNs) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        self.bus.write(self.variant.sleep_out_reg, &[])?;
        delay.delay_ms(120);
        self.sleeping = false;
        Ok(())
    }

    /// True while the panel is in sleep mode
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// Enable or disable display color inversion
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.ensure_initialized()?;
        let reg = if inverted {
            self.variant.invert_on_reg
        } else {
            self.variant.invert_off_reg
        };
        self.bus.write(reg, &[])?;
        Ok(())
    }

    /// Release the bus handle
    pub fn release(self) -> B {
        self.bus
    }

    fn ensure_initialized(&self) -> Result<(), DisplayError> {
        if self.initialized {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }

    /// Compose orientation and byte order into one register byte
    fn compose_address_mode(&self, rotation: Rotation, order: ByteOrder) -> u8 {
        let mut byte = self.variant.madctl.entry(rotation);
        if order == ByteOrder::Bgr {
            byte |= self.variant.bgr_mask;
        }
        byte
    }

    /// Single atomic write of the combined byte; state updates only on
    /// success so a failed write leaves the prior state intact
    fn write_address_mode(
        &mut self,
        rotation: Rotation,
        order: ByteOrder,
    ) -> Result<(), DisplayError> {
        let byte = self.compose_address_mode(rotation, order);
        self.bus.write(self.variant.madctl_reg, &[byte])?;
        self.rotation = rotation;
        self.madctl = byte;
        self.order = order;
        Ok(())
    }

    fn set_address_window(&mut self, region: Region) -> Result<(), DisplayError> {
        let (ox, oy) = self.variant.offset;
        let (sx, ex) = (region.x0 + ox, region.x1 + ox);
        let (sy, ey) = (region.y0 + oy, region.y1 + oy);

        self.bus.write(
            self.variant.caset_reg,
            &[(sx >> 8) as u8, sx as u8, (ex >> 8) as u8, ex as u8],
        )?;
        self.bus.write(
            self.variant.raset_reg,
            &[(sy >> 8) as u8, sy as u8, (ey >> 8) as u8, ey as u8],
        )?;
        Ok(())
    }
}

/// Swap the R and B channels of big-endian RGB565 pixels in place
fn swap_rgb565_channels(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(2) {
        let value = u16::from_be_bytes([px[0], px[1]]);
        let r = (value >> 11) & 0x1F;
        let g = (value >> 5) & 0x3F;
        let b = value & 0x1F;
        let swapped = (b << 11) | (g << 5) | r;
        px.copy_from_slice(&swapped.to_be_bytes());
    }
}
