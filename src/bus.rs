//! The bus capability consumed by [`Sm72445`](crate::mppt::Sm72445).
//!
//! The SM72445 speaks a 7-data-byte block protocol over I2C; implementing
//! that framing (length byte, LSB-first data order, clock stretching) is the
//! bus implementation's job, not this crate's. The capability surfaced here
//! is a whole-register read/write keyed by device and memory address.

use crate::registers::{DeviceAddress, MemoryAddress};

/// A register bus to one or more SM72445 devices.
///
/// `None` signals a transport-level failure (NACK, arbitration loss,
/// timeout). The driver propagates it without retrying; retry policy belongs
/// to the implementation behind this trait.
pub trait Bus {
    /// Read one register.
    ///
    /// The device prefixes the transfer with a length byte which must be
    /// discarded; the returned value is the 7 data bytes assembled LSB first.
    fn read(&mut self, device: DeviceAddress, address: MemoryAddress) -> Option<u64>;

    /// Write one register, returning the value written on success.
    ///
    /// The device expects the length byte (always 7) before the data; the
    /// implementation must insert it.
    fn write(
        &mut self,
        device: DeviceAddress,
        address: MemoryAddress,
        value: u64,
    ) -> Option<u64>;
}
