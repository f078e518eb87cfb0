//! Shared test doubles for the driver cores

use glint_core::bus::{BusError, BusTransport};
use heapless::Vec;

pub const MAX_LOG: usize = 64;
pub const MAX_WRITE: usize = 64;

/// Scripted transport: logs every write, serves reads from a queue, and
/// can fail a chosen transaction.
pub struct MockBus {
    pub writes: Vec<(u32, Vec<u8, MAX_WRITE>), MAX_LOG>,
    pub reads: Vec<(u32, Vec<u8, 48>), 16>,
    read_cursor: usize,
    pub fail_from: Option<usize>,
    pub fail_with: BusError,
    transactions: usize,
}

impl MockBus {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            reads: Vec::new(),
            read_cursor: 0,
            fail_from: None,
            fail_with: BusError::Timeout,
            transactions: 0,
        }
    }

    /// Queue a read response for the given register
    pub fn expect_read(&mut self, addr: u32, data: &[u8]) {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(data).unwrap();
        self.reads.push((addr, bytes)).unwrap();
    }

    /// Fail every transaction from the Nth on (0-based, writes and reads)
    pub fn fail_from_transaction(&mut self, n: usize, err: BusError) {
        self.fail_from = Some(n);
        self.fail_with = err;
    }

    pub fn writes_to(&self, addr: u32) -> impl Iterator<Item = &[u8]> {
        self.writes
            .iter()
            .filter(move |(a, _)| *a == addr)
            .map(|(_, d)| d.as_slice())
    }

    fn tick(&mut self) -> Result<(), BusError> {
        let n = self.transactions;
        self.transactions += 1;
        match self.fail_from {
            Some(fail) if n >= fail => Err(self.fail_with),
            _ => Ok(()),
        }
    }
}

impl BusTransport for MockBus {
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), BusError> {
        self.tick()?;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(data).unwrap();
        self.writes.push((addr, bytes)).unwrap();
        Ok(())
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), BusError> {
        self.tick()?;
        let (expected_addr, data) = self
            .reads
            .get(self.read_cursor)
            .expect("unexpected read: no queued response");
        assert_eq!(*expected_addr, addr, "read from unexpected register");
        buf.copy_from_slice(&data[..buf.len()]);
        self.read_cursor += 1;
        Ok(())
    }
}

/// Delay provider that returns immediately
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
