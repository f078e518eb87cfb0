//! Bus transport and line-control abstractions
//!
//! The engine never talks to hardware directly; a board supplies one
//! [`BusTransport`] handle per chip instance. The transport decides what a
//! register address means electrically (SPI command phase, I2C register
//! pointer, parallel bus cycle) and is responsible for bounding every call
//! with its own timeout. Each driver core exclusively owns its handle, so
//! no locking happens at this layer.

/// Errors surfaced by a bus transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// Transaction exceeded the transport's timeout
    Timeout,
    /// Device did not acknowledge the transaction
    Nack,
    /// No device present on the bus
    NoDevice,
}

/// Addressed register read/write over a physical bus
///
/// Addresses are opaque to the engine; a transport for an 8-bit register
/// map simply ignores the upper bytes. The trait is object-safe so that
/// variant descriptors can hold stage functions over `&mut dyn BusTransport`.
pub trait BusTransport {
    /// Write `data` to the register at `addr`
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), BusError>;

    /// Read `buf.len()` bytes from the register at `addr`
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), BusError>;
}

impl<T: BusTransport + ?Sized> BusTransport for &mut T {
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), BusError> {
        (**self).write(addr, data)
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), BusError> {
        (**self).read(addr, buf)
    }
}

/// Drive level for a control line (reset, backlight)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineLevel {
    /// Line driven low
    Low,
    /// Line driven high
    High,
    /// PWM output, duty cycle 0-255
    PwmDuty(u8),
}

/// Tri-state driver for a reset or backlight line
///
/// Used only during bring-up and for backlight control; the engine never
/// samples the line back.
pub trait LineControl {
    /// Set the line to the given level
    fn set(&mut self, level: LineLevel) -> Result<(), BusError>;
}
