//! This crate provides an interface for the SM72445 photovoltaic MPPT
//! controller.
//!
//! It supports `no-std` environments by use of the `no-std` feature flag.
//!
//! The MPPT algorithm itself runs in hardware on the chip; what the bus
//! exposes is a small register file of ADC telemetry and an override
//! configuration register. This crate models that register file: structural
//! views of each register, conversions between raw ADC codes and real volts
//! and amps, an interpreted configuration snapshot, and a builder for
//! composing new configuration values.
//!
//! Physical transfers are delegated to a user-supplied [`bus::Bus`]
//! implementation keyed by device and memory address. Bus failures surface
//! as `None` from every dependent operation.
//!
//! ```
//! use sm72445::bus::Bus;
//! use sm72445::config::DeadTime;
//! use sm72445::conversion::Gains;
//! use sm72445::mppt::Sm72445;
//! use sm72445::registers::{DeviceAddress, MemoryAddress};
//!
//! struct LoopbackBus(u64);
//!
//! impl Bus for LoopbackBus {
//!     fn read(&mut self, _: DeviceAddress, _: MemoryAddress) -> Option<u64> {
//!         Some(self.0)
//!     }
//!     fn write(&mut self, _: DeviceAddress, _: MemoryAddress, value: u64) -> Option<u64> {
//!         self.0 = value;
//!         Some(value)
//!     }
//! }
//!
//! let gains = Gains::new(0.1, 0.2, 0.3, 0.4, Gains::DEFAULT_VDDA).unwrap();
//! let mut mppt = Sm72445::new(LoopbackBus(0), DeviceAddress::Addr001, gains);
//!
//! let raw = mppt
//!     .config_builder()
//!     .set_output_voltage_max(14.4)
//!     .set_dead_time_off(DeadTime::Three)
//!     .build();
//! mppt.write_config(raw).unwrap();
//! ```

#![cfg_attr(feature = "no-std", no_std)]

pub mod bus;
pub mod config;
pub mod conversion;
pub mod error;
pub mod mppt;
pub mod registers;

#[cfg(test)]
mod mock_i2c;
