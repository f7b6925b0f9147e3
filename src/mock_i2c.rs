//! We use this mocking module in unit tests to emulate the register bus.

use crate::bus::Bus;
use crate::registers::{DeviceAddress, MemoryAddress};

/// Our mock type used to emulate an SM72445 sitting on a register bus.
pub struct MockI2c {
    /// Value returned by every successful read.
    read_value: u64,
    /// Flag to simulate read failures (NACK, timeout).
    should_fail_read: bool,
    /// Flag to simulate write failures.
    should_fail_write: bool,
    /// Record of read transactions issued through this mock.
    reads: Vec<(DeviceAddress, MemoryAddress)>,
    /// Record of write transactions issued through this mock.
    writes: Vec<(DeviceAddress, MemoryAddress, u64)>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self {
            read_value: 0,
            should_fail_read: false,
            should_fail_write: false,
            reads: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Set the value every subsequent read will return.
    pub fn set_read_value(&mut self, value: u64) {
        self.read_value = value;
    }

    /// Configure whether read transactions should fail.
    pub fn set_read_failure(&mut self, should_fail: bool) {
        self.should_fail_read = should_fail;
    }

    /// Configure whether write transactions should fail.
    pub fn set_write_failure(&mut self, should_fail: bool) {
        self.should_fail_write = should_fail;
    }

    /// The read transactions issued so far.
    pub fn reads(&self) -> &[(DeviceAddress, MemoryAddress)] {
        &self.reads
    }

    /// The write transactions issued so far.
    pub fn writes(&self) -> &[(DeviceAddress, MemoryAddress, u64)] {
        &self.writes
    }
}

impl Bus for MockI2c {
    fn read(&mut self, device: DeviceAddress, address: MemoryAddress) -> Option<u64> {
        self.reads.push((device, address));
        if self.should_fail_read {
            return None;
        }
        Some(self.read_value)
    }

    fn write(
        &mut self,
        device: DeviceAddress,
        address: MemoryAddress,
        value: u64,
    ) -> Option<u64> {
        self.writes.push((device, address, value));
        if self.should_fail_write {
            return None;
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_returns_configured_value_and_records() {
        let mut mock = MockI2c::new();
        mock.set_read_value(0xABCD);

        let value = mock.read(DeviceAddress::Addr010, MemoryAddress::Reg1);
        assert_eq!(value, Some(0xABCD));
        assert_eq!(mock.reads(), &[(DeviceAddress::Addr010, MemoryAddress::Reg1)]);
    }

    #[test]
    fn read_failure_still_records_the_attempt() {
        let mut mock = MockI2c::new();
        mock.set_read_failure(true);

        assert!(mock.read(DeviceAddress::Addr001, MemoryAddress::Reg0).is_none());
        assert_eq!(mock.reads().len(), 1);
    }

    #[test]
    fn write_echoes_value() {
        let mut mock = MockI2c::new();
        let value = mock.write(DeviceAddress::Addr001, MemoryAddress::Reg3, 0x55);
        assert_eq!(value, Some(0x55));
        assert_eq!(
            mock.writes(),
            &[(DeviceAddress::Addr001, MemoryAddress::Reg3, 0x55)]
        );
    }

    #[test]
    fn write_failure_returns_none() {
        let mut mock = MockI2c::new();
        mock.set_write_failure(true);
        assert!(mock.write(DeviceAddress::Addr001, MemoryAddress::Reg3, 0x55).is_none());
    }
}
