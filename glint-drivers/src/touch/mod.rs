//! Touch driver core
//!
//! Generic capacitive touch controller driver: probe the chip identity,
//! apply the variant's configuration, then poll for touch reports decoded
//! through the variant's register map.
//!
//! Touch buses are noisier than display buses and a missed sample is
//! harmless, so polling tolerates isolated read glitches: a transient bus
//! error returns an empty report and bumps a consecutive-error counter.
//! Only when the counter reaches the configured threshold does the driver
//! latch `Failed`, after which it must be restarted from outside.

pub mod state;
pub mod variants;

pub use state::{TouchEvent, TouchState};

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use glint_core::bus::{BusError, BusTransport};
use glint_core::identify::{identify, ChipIdentity, IdentifyError};
use glint_core::sequencer::run_stages;
use glint_core::variant::{CoordLayout, TouchVariant};

/// Most simultaneous points any supported chip reports
pub const MAX_TOUCH_POINTS: usize = 5;

/// Consecutive bus errors tolerated before the link is declared lost
pub const DEFAULT_ERROR_THRESHOLD: u8 = 3;

/// Largest point record block any variant reads in one poll
const REPORT_BUF: usize = 40;

/// Touch operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError {
    /// Identity probe failed
    Identify(IdentifyError),
    /// Post-identification configuration write failed
    ConfigFailed(BusError),
    /// Consecutive-error threshold exceeded; driver is latched `Failed`
    LinkFailed,
    /// Operation not valid in the current state
    InvalidState,
}

impl From<IdentifyError> for TouchError {
    fn from(e: IdentifyError) -> Self {
        TouchError::Identify(e)
    }
}

/// One active touch point, panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    /// Track ID assigned by the controller
    pub id: u8,
    pub x: u16,
    pub y: u16,
}

/// Report list returned by one poll
pub type TouchReport = Vec<TouchPoint, MAX_TOUCH_POINTS>;

/// Generic touch driver core
///
/// Owns its bus handle exclusively. All per-chip knowledge comes from the
/// [`TouchVariant`] descriptor; the identity matched during `start` is kept
/// for diagnostics.
pub struct TouchDriver<B: BusTransport> {
    bus: B,
    variant: &'static TouchVariant,
    state: TouchState,
    identity: Option<ChipIdentity>,
    consecutive_errors: u8,
    error_threshold: u8,
}

impl<B: BusTransport> TouchDriver<B> {
    /// Create a driver over `bus` for the given chip variant
    pub fn new(bus: B, variant: &'static TouchVariant) -> Self {
        Self::with_error_threshold(bus, variant, DEFAULT_ERROR_THRESHOLD)
    }

    /// Create a driver with a custom consecutive-error threshold
    ///
    /// `threshold` is the number of consecutive failed polls that latches
    /// the driver `Failed`; it must be at least 1.
    pub fn with_error_threshold(
        bus: B,
        variant: &'static TouchVariant,
        threshold: u8,
    ) -> Self {
        Self {
            bus,
            variant,
            state: TouchState::Uninitialized,
            identity: None,
            consecutive_errors: 0,
            error_threshold: threshold.max(1),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TouchState {
        self.state
    }

    /// Identity matched during `start`, if any
    pub fn identity(&self) -> Option<&ChipIdentity> {
        self.identity.as_ref()
    }

    /// Consecutive failed polls so far
    pub fn consecutive_errors(&self) -> u8 {
        self.consecutive_errors
    }

    /// Physical active area, if the variant specifies one
    ///
    /// `None` means the controller self-reports its resolution.
    pub fn physical_size_mm(&self) -> Option<(u16, u16)> {
        self.variant.size_mm
    }

    /// Identify the chip and apply the variant configuration
    ///
    /// Valid from `Uninitialized`, or from `Failed` as an external
    /// re-initialization. Any failure lands in `Failed`.
    pub fn start(&mut self, delay: &mut impl DelayNs) -> Result<(), TouchError> {
        match self.state {
            TouchState::Uninitialized => {
                self.state = self.state.transition(TouchEvent::ProbeStarted);
            }
            TouchState::Failed => {
                self.state = self.state.transition(TouchEvent::Restart);
            }
            _ => return Err(TouchError::InvalidState),
        }
        self.consecutive_errors = 0;

        let identity = match identify(&mut self.bus, self.variant) {
            Ok(identity) => identity,
            Err(e) => {
                self.state = self.state.transition(TouchEvent::ProbeFailed);
                return Err(e.into());
            }
        };
        self.identity = Some(identity);

        if let Err(e) = run_stages(self.variant.config, &mut self.bus, delay) {
            self.state = self.state.transition(TouchEvent::ProbeFailed);
            return Err(TouchError::ConfigFailed(e.cause));
        }

        self.state = self.state.transition(TouchEvent::ConfigApplied);
        Ok(())
    }

    /// Read and decode the current touch report
    ///
    /// Valid in `Configured`/`Reporting`. Returns the (possibly empty)
    /// ordered list of active points. A transient bus error yields an
    /// empty report until the consecutive-error threshold is exceeded.
    pub fn poll(&mut self) -> Result<TouchReport, TouchError> {
        if self.state == TouchState::Failed {
            return Err(TouchError::LinkFailed);
        }
        if !self.state.can_poll() {
            return Err(TouchError::InvalidState);
        }

        match self.read_report() {
            Ok(points) => {
                self.consecutive_errors = 0;
                self.state = self.state.transition(TouchEvent::ReportOk);
                Ok(points)
            }
            Err(_) => {
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                if self.consecutive_errors >= self.error_threshold {
                    self.state = self.state.transition(TouchEvent::LinkLost);
                    return Err(TouchError::LinkFailed);
                }
                Ok(TouchReport::new())
            }
        }
    }

    /// Release the bus handle
    pub fn release(self) -> B {
        self.bus
    }

    fn read_report(&mut self) -> Result<TouchReport, BusError> {
        let map = &self.variant.map;

        let mut status = [0u8; 1];
        self.bus.read(map.status_reg, &mut status)?;
        let status = status[0];

        // Goodix-style chips gate reports behind a buffer-ready flag and
        // need the status register cleared to re-arm reporting
        if let Some((ack_reg, ack_value)) = map.status_ack {
            if status & 0x80 == 0 {
                return Ok(TouchReport::new());
            }
            let points = self.decode_points(status)?;
            self.bus.write(ack_reg, &[ack_value])?;
            return Ok(points);
        }

        self.decode_points(status)
    }

    fn decode_points(&mut self, status: u8) -> Result<TouchReport, BusError> {
        let map = &self.variant.map;
        let count = (status & map.count_mask)
            .min(map.max_points)
            .min(MAX_TOUCH_POINTS as u8) as usize;

        let mut points = TouchReport::new();
        if count == 0 {
            return Ok(points);
        }

        let stride = map.point_stride as usize;
        let mut buf = [0u8; REPORT_BUF];
        let len = (count * stride).min(REPORT_BUF);
        self.bus.read(map.points_reg, &mut buf[..len])?;

        for record in buf[..len].chunks_exact(stride) {
            let (id, x, y) = match map.coords {
                CoordLayout::BigEndian12 { id_in_y_high } => {
                    let x = u16::from(record[0] & 0x0F) << 8 | u16::from(record[1]);
                    let y = u16::from(record[2] & 0x0F) << 8 | u16::from(record[3]);
                    let id = if id_in_y_high { record[2] >> 4 } else { 0 };
                    (id, x, y)
                }
                CoordLayout::LittleEndian16 => {
                    let x = u16::from_le_bytes([record[1], record[2]]);
                    let y = u16::from_le_bytes([record[3], record[4]]);
                    (record[0], x, y)
                }
            };
            // Geometry clamp: a glitched sample must not escape the panel
            let point = TouchPoint {
                id,
                x: x.min(self.variant.max_x),
                y: y.min(self.variant.max_y),
            };
            if points.push(point).is_err() {
                break;
            }
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockBus, NoDelay};
    use glint_core::variant::{RegWidth, TouchRegisterMap};

    /// FocalTech-style 8-bit map: count at 0x02, 6-byte records at 0x03
    const FT_MAP: TouchRegisterMap = TouchRegisterMap {
        status_reg: 0x02,
        count_mask: 0x0F,
        points_reg: 0x03,
        point_stride: 6,
        max_points: 2,
        coords: CoordLayout::BigEndian12 { id_in_y_high: true },
        status_ack: None,
    };

    static FT_LIKE: TouchVariant = TouchVariant {
        name: "ft-like",
        id_reg: 0xA3,
        id_width: RegWidth::Bits8,
        chip_ids: &[0x06, 0x11],
        size_mm: Some((31, 52)),
        max_x: 319,
        max_y: 479,
        map: FT_MAP,
        config: &[],
    };

    fn started(bus: MockBus) -> TouchDriver<MockBus> {
        let mut driver = TouchDriver::new(bus, &FT_LIKE);
        driver.start(&mut NoDelay).unwrap();
        driver
    }

    fn bus_with_id(id: u8) -> MockBus {
        let mut bus = MockBus::new();
        bus.expect_read(0xA3, &[id]);
        bus
    }

    #[test]
    fn test_start_identifies_and_configures() {
        let driver = started(bus_with_id(0x11));
        assert_eq!(driver.state(), TouchState::Configured);
        assert_eq!(driver.identity().unwrap().chip_id, 0x11);
    }

    #[test]
    fn test_unknown_chip_fails_start() {
        let mut driver = TouchDriver::new(bus_with_id(0x99), &FT_LIKE);
        let err = driver.start(&mut NoDelay).unwrap_err();
        assert_eq!(err, TouchError::Identify(IdentifyError::UnknownDevice(0x99)));
        assert_eq!(driver.state(), TouchState::Failed);
        assert_eq!(driver.poll(), Err(TouchError::LinkFailed));
    }

    #[test]
    fn test_poll_before_start_is_invalid() {
        let mut driver = TouchDriver::new(MockBus::new(), &FT_LIKE);
        assert_eq!(driver.poll(), Err(TouchError::InvalidState));
    }

    #[test]
    fn test_poll_decodes_two_points() {
        let mut bus = bus_with_id(0x06);
        bus.expect_read(0x02, &[0x02]);
        // Point 0: x=0x123, y=0x1A4, id 0; point 1: x=0x050, y=0x0B0, id 1
        bus.expect_read(
            0x03,
            &[
                0x81, 0x23, 0x01, 0xA4, 0x00, 0x00, //
                0x80, 0x50, 0x10, 0xB0, 0x00, 0x00,
            ],
        );

        let mut driver = started(bus);
        let report = driver.poll().unwrap();
        assert_eq!(driver.state(), TouchState::Reporting);
        assert_eq!(
            &report[..],
            &[
                TouchPoint {
                    id: 0,
                    x: 0x123,
                    y: 0x1A4,
                },
                TouchPoint {
                    id: 1,
                    x: 0x050,
                    y: 0x0B0,
                },
            ]
        );
    }

    #[test]
    fn test_points_clamped_to_active_area() {
        let mut bus = bus_with_id(0x06);
        bus.expect_read(0x02, &[0x01]);
        // x=0xFFF is beyond max_x=319
        bus.expect_read(0x03, &[0x8F, 0xFF, 0x00, 0x10, 0x00, 0x00]);

        let mut driver = started(bus);
        let report = driver.poll().unwrap();
        assert_eq!(report[0].x, 319);
        assert_eq!(report[0].y, 0x010);
    }

    #[test]
    fn test_isolated_glitch_is_absorbed() {
        let mut bus = bus_with_id(0x06);
        bus.expect_read(0x02, &[0x00]);
        bus.expect_read(0x02, &[0x00]);
        let mut driver = started(bus);

        // Glitch on the first status read: empty report, no state change
        driver.bus.fail_from_transaction(1, BusError::Timeout);
        assert_eq!(driver.poll().unwrap().len(), 0);
        assert_eq!(driver.consecutive_errors(), 1);
        assert_ne!(driver.state(), TouchState::Failed);

        // Clean polls reset the counter
        driver.bus.fail_from = None;
        driver.poll().unwrap();
        assert_eq!(driver.consecutive_errors(), 0);
        driver.poll().unwrap();
        assert_eq!(driver.state(), TouchState::Reporting);
    }

    #[test]
    fn test_threshold_latches_failed() {
        let mut driver = started(bus_with_id(0x06));
        // Every poll after start fails
        driver.bus.fail_from_transaction(1, BusError::Timeout);

        // Threshold is 3: two absorbed, third latches
        assert!(driver.poll().unwrap().is_empty());
        assert!(driver.poll().unwrap().is_empty());
        assert_eq!(driver.poll(), Err(TouchError::LinkFailed));
        assert_eq!(driver.state(), TouchState::Failed);
        assert_eq!(driver.poll(), Err(TouchError::LinkFailed));
    }

    #[test]
    fn test_threshold_of_one_fails_immediately() {
        let mut driver = TouchDriver::with_error_threshold(bus_with_id(0x06), &FT_LIKE, 1);
        driver.start(&mut NoDelay).unwrap();
        driver.bus.fail_from_transaction(1, BusError::Timeout);

        assert_eq!(driver.poll(), Err(TouchError::LinkFailed));
        assert_eq!(driver.state(), TouchState::Failed);
    }

    #[test]
    fn test_restart_after_failed() {
        let mut driver = TouchDriver::new(bus_with_id(0x99), &FT_LIKE);
        assert!(driver.start(&mut NoDelay).is_err());
        assert_eq!(driver.state(), TouchState::Failed);

        driver.bus.expect_read(0xA3, &[0x06]);
        driver.start(&mut NoDelay).unwrap();
        assert_eq!(driver.state(), TouchState::Configured);
        assert_eq!(driver.consecutive_errors(), 0);
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut driver = started(bus_with_id(0x06));
        assert_eq!(driver.start(&mut NoDelay), Err(TouchError::InvalidState));
    }
}
