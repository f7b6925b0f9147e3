//! The SM72445 device facade.
//!
//! Wraps a [`Bus`] implementation together with a device address and the
//! installation's [`Gains`], and surfaces typed register reads, physical-unit
//! telemetry and the configuration read/build/write cycle.
//!
//! For method nomenclature, "read" returns a measured value, "get" style
//! accessors return configured values, and the configuration is written back
//! through [`write_config`](Sm72445::write_config).

use crate::{
    bus::Bus,
    config::{Config, ConfigBuilder},
    conversion::{code_to_voltage, voltage_to_unit, Gains},
    registers::{
        AnalogueChannel, AnalogueChannelRegister, ConfigRegister, CurrentThreshold,
        DeviceAddress, ElectricalProperty, MeasurementRegister, MemoryAddress, OffsetRegister,
        ThresholdRegister,
    },
};
use strum::IntoEnumIterator;

/// One SM72445 behind a register bus.
///
/// Every bus-touching method returns `None` on transport failure and performs
/// at most one bus transaction.
pub struct Sm72445<B> {
    bus: B,
    device_address: DeviceAddress,
    gains: Gains,
}

impl<B: Bus> Sm72445<B> {
    /// Create a new driver instance.
    ///
    /// The gain context is validated at [`Gains::new`], so construction here
    /// cannot fail.
    pub fn new(bus: B, device_address: DeviceAddress, gains: Gains) -> Self {
        Self {
            bus,
            device_address,
            gains,
        }
    }

    /// The gain context this driver converts with.
    pub fn gains(&self) -> &Gains {
        &self.gains
    }

    fn read_register(&mut self, address: MemoryAddress) -> Option<u64> {
        self.bus.read(self.device_address, address)
    }

    /// Read reg0, the analogue configuration channel ADC results.
    pub fn analogue_channel_register(&mut self) -> Option<AnalogueChannelRegister> {
        let raw = self.read_register(MemoryAddress::Reg0)?;
        Some(AnalogueChannelRegister::from_raw(raw))
    }

    /// Read reg1, the electrical measurement ADC results.
    pub fn measurement_register(&mut self) -> Option<MeasurementRegister> {
        let raw = self.read_register(MemoryAddress::Reg1)?;
        Some(MeasurementRegister::from_raw(raw))
    }

    /// Read reg3, the override configuration.
    pub fn config_register(&mut self) -> Option<ConfigRegister> {
        let raw = self.read_register(MemoryAddress::Reg3)?;
        Some(ConfigRegister::from_raw(raw))
    }

    /// Read reg4, the ADC offset corrections.
    pub fn offset_register(&mut self) -> Option<OffsetRegister> {
        let raw = self.read_register(MemoryAddress::Reg4)?;
        Some(OffsetRegister::from_raw(raw))
    }

    /// Read reg5, the MPPT current thresholds.
    pub fn threshold_register(&mut self) -> Option<ThresholdRegister> {
        let raw = self.read_register(MemoryAddress::Reg5)?;
        Some(ThresholdRegister::from_raw(raw))
    }

    /// Read all four electrical measurements, indexed by
    /// [`ElectricalProperty`]. Voltages in volts, currents in amps.
    pub fn electrical_measurements(&mut self) -> Option<[f32; 4]> {
        let reg = self.measurement_register()?;
        let mut measurements = [0.0; 4];
        for property in ElectricalProperty::iter() {
            let voltage = code_to_voltage(reg.property(property), 10, self.gains.vdda);
            measurements[property as usize] =
                voltage_to_unit(voltage, self.gains.for_property(property));
        }
        Some(measurements)
    }

    /// Read the analogue configuration channel pin voltages, indexed by
    /// [`AnalogueChannel`].
    pub fn analogue_channel_voltages(&mut self) -> Option<[f32; 4]> {
        let reg = self.analogue_channel_register()?;
        let mut voltages = [0.0; 4];
        for channel in AnalogueChannel::iter() {
            let voltage = code_to_voltage(reg.channel(channel), 10, self.gains.vdda);
            voltages[channel as usize] =
                voltage_to_unit(voltage, self.gains.for_channel(channel));
        }
        Some(voltages)
    }

    /// Read the ADC measurement offsets, indexed by [`ElectricalProperty`].
    /// Voltages in volts, currents in amps.
    ///
    /// The offset DACs are 8 bit, unlike the 10-bit measurement channels.
    pub fn offsets(&mut self) -> Option<[f32; 4]> {
        let reg = self.offset_register()?;
        let mut offsets = [0.0; 4];
        for property in ElectricalProperty::iter() {
            let voltage = code_to_voltage(reg.property(property) as u16, 8, self.gains.vdda);
            offsets[property as usize] =
                voltage_to_unit(voltage, self.gains.for_property(property));
        }
        Some(offsets)
    }

    /// Read the MPPT current hysteresis thresholds in amps, indexed by
    /// [`CurrentThreshold`].
    pub fn current_thresholds(&mut self) -> Option<[f32; 4]> {
        let reg = self.threshold_register()?;
        let mut thresholds = [0.0; 4];
        for threshold in CurrentThreshold::iter() {
            let voltage = code_to_voltage(reg.threshold(threshold), 10, self.gains.vdda);
            thresholds[threshold as usize] =
                voltage_to_unit(voltage, self.gains.for_threshold(threshold));
        }
        Some(thresholds)
    }

    /// Read one electrical measurement.
    pub fn electrical_measurement(&mut self, property: ElectricalProperty) -> Option<f32> {
        Some(self.electrical_measurements()?[property as usize])
    }

    /// Read the measured input current in amps.
    pub fn input_current(&mut self) -> Option<f32> {
        self.electrical_measurement(ElectricalProperty::CurrentIn)
    }

    /// Read the measured input voltage in volts.
    pub fn input_voltage(&mut self) -> Option<f32> {
        self.electrical_measurement(ElectricalProperty::VoltageIn)
    }

    /// Read the measured output current in amps.
    pub fn output_current(&mut self) -> Option<f32> {
        self.electrical_measurement(ElectricalProperty::CurrentOut)
    }

    /// Read the measured output voltage in volts.
    pub fn output_voltage(&mut self) -> Option<f32> {
        self.electrical_measurement(ElectricalProperty::VoltageOut)
    }

    /// Read one analogue configuration channel pin voltage.
    pub fn analogue_channel_voltage(&mut self, channel: AnalogueChannel) -> Option<f32> {
        Some(self.analogue_channel_voltages()?[channel as usize])
    }

    /// Read one ADC measurement offset.
    pub fn offset(&mut self, property: ElectricalProperty) -> Option<f32> {
        Some(self.offsets()?[property as usize])
    }

    /// Read one MPPT current threshold in amps.
    pub fn current_threshold(&mut self, threshold: CurrentThreshold) -> Option<f32> {
        Some(self.current_thresholds()?[threshold as usize])
    }

    /// Read and interpret the current override configuration.
    pub fn config(&mut self) -> Option<Config> {
        let reg = self.config_register()?;
        Some(Config::from_register(&reg, &self.gains))
    }

    /// Start a configuration builder from the datasheet reset values without
    /// touching the bus.
    pub fn config_builder(&self) -> ConfigBuilder {
        ConfigBuilder::from_defaults(self.gains)
    }

    /// Start a configuration builder seeded from the device's current
    /// configuration. Falls back to the reset values if the read fails, so a
    /// builder is always returned.
    pub fn config_builder_from_device(&mut self) -> ConfigBuilder {
        match self.read_register(MemoryAddress::Reg3) {
            Some(raw) => ConfigBuilder::from_raw(self.gains, raw),
            None => ConfigBuilder::from_defaults(self.gains),
        }
    }

    /// Write a built configuration value to reg3, echoing the value written
    /// if the bus transaction succeeds.
    pub fn write_config(&mut self, raw: u64) -> Option<u64> {
        self.bus.write(self.device_address, MemoryAddress::Reg3, raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeadTime, FrequencyMode, PanelMode};
    use crate::mock_i2c::MockI2c;

    fn test_gains() -> Gains {
        Gains::new(0.1, 0.2, 0.3, 0.4, 5.0).unwrap()
    }

    fn mppt(mock: MockI2c) -> Sm72445<MockI2c> {
        Sm72445::new(mock, DeviceAddress::Addr001, test_gains())
    }

    fn assert_near(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn electrical_measurements_convert_adc_codes() {
        let mut mock = MockI2c::new();
        // iIn = full scale, vIn = half scale (511), iOut = 0, vOut = full scale.
        mock.set_read_value(0x3FFu64 << 30 | 0x000 << 20 | 0x1FF << 10 | 0x3FF);
        let mut mppt = mppt(mock);

        let measurements = mppt.electrical_measurements().unwrap();
        assert_near(measurements[ElectricalProperty::CurrentIn as usize], 5.0 / 0.3);
        assert_near(
            measurements[ElectricalProperty::VoltageIn as usize],
            511.0 / 1023.0 * 5.0 / 0.1,
        );
        assert_near(measurements[ElectricalProperty::CurrentOut as usize], 0.0);
        assert_near(measurements[ElectricalProperty::VoltageOut as usize], 5.0 / 0.2);

        assert_eq!(
            mppt.bus.reads(),
            &[(DeviceAddress::Addr001, MemoryAddress::Reg1)]
        );
    }

    #[test]
    fn single_measurement_accessors_index_the_array() {
        let mut mock = MockI2c::new();
        mock.set_read_value(0x3FFu64 << 30 | 0x000 << 20 | 0x1FF << 10 | 0x3FF);
        let mut mppt = mppt(mock);

        assert_near(mppt.input_current().unwrap(), 5.0 / 0.3);
        assert_near(mppt.output_current().unwrap(), 0.0);
        assert_near(mppt.output_voltage().unwrap(), 5.0 / 0.2);
        assert_near(mppt.input_voltage().unwrap(), 511.0 / 1023.0 * 5.0 / 0.1);
    }

    #[test]
    fn analogue_channel_voltages_are_pin_voltages() {
        let mut mock = MockI2c::new();
        mock.set_read_value(0x3FFu64 << 30 | 0x1FF << 20 | 0x000 << 10 | 0x3FF);
        let mut mppt = mppt(mock);

        let voltages = mppt.analogue_channel_voltages().unwrap();
        assert_near(voltages[AnalogueChannel::Ch0 as usize], 5.0);
        assert_near(voltages[AnalogueChannel::Ch2 as usize], 0.0);
        assert_near(voltages[AnalogueChannel::Ch4 as usize], 511.0 / 1023.0 * 5.0);
        assert_near(voltages[AnalogueChannel::Ch6 as usize], 5.0);

        assert_near(mppt.analogue_channel_voltage(AnalogueChannel::Ch0).unwrap(), 5.0);
        assert_eq!(mppt.bus.reads()[0].1, MemoryAddress::Reg0);
    }

    #[test]
    fn offsets_use_eight_bit_resolution() {
        let mut mock = MockI2c::new();
        // vOut = 0xFF, iOut = 0x00, vIn = 0x80, iIn = 0xFF.
        mock.set_read_value(0xFF_00_80_FF);
        let mut mppt = mppt(mock);

        let offsets = mppt.offsets().unwrap();
        assert_near(offsets[ElectricalProperty::CurrentIn as usize], 5.0 / 0.3);
        assert_near(
            offsets[ElectricalProperty::VoltageIn as usize],
            128.0 / 255.0 * 5.0 / 0.1,
        );
        assert_near(offsets[ElectricalProperty::CurrentOut as usize], 0.0);
        assert_near(offsets[ElectricalProperty::VoltageOut as usize], 5.0 / 0.2);

        assert_near(
            mppt.offset(ElectricalProperty::VoltageOut).unwrap(),
            5.0 / 0.2,
        );
        assert_eq!(mppt.bus.reads()[0].1, MemoryAddress::Reg4);
    }

    #[test]
    fn current_thresholds_use_matching_current_gains() {
        let mut mock = MockI2c::new();
        // iInHigh = 1023, iInLow = 511, iOutHigh = 1023, iOutLow = 0.
        mock.set_read_value(0x3FFu64 << 30 | 0x1FF << 20 | 0x3FF << 10 | 0x000);
        let mut mppt = mppt(mock);

        let thresholds = mppt.current_thresholds().unwrap();
        assert_near(thresholds[CurrentThreshold::CurrentOutLow as usize], 0.0);
        assert_near(thresholds[CurrentThreshold::CurrentOutHigh as usize], 5.0 / 0.4);
        assert_near(
            thresholds[CurrentThreshold::CurrentInLow as usize],
            511.0 / 1023.0 * 5.0 / 0.3,
        );
        assert_near(thresholds[CurrentThreshold::CurrentInHigh as usize], 5.0 / 0.3);

        assert_near(
            mppt.current_threshold(CurrentThreshold::CurrentOutHigh).unwrap(),
            5.0 / 0.4,
        );
        assert_eq!(mppt.bus.reads()[0].1, MemoryAddress::Reg5);
    }

    #[test]
    fn config_interprets_reg3() {
        let mut mock = MockI2c::new();
        mock.set_read_value(0b1_0_01_111_1111111111_1111111111_111_111_000000000_1_1_0_1_1);
        let mut mppt = mppt(mock);

        let config = mppt.config().unwrap();
        assert!(config.override_adc_programming);
        assert_eq!(config.frequency_mode, FrequencyMode::High);
        assert_eq!(config.panel_mode, PanelMode::UseSwitch);
        assert_near(config.i_out_max, 12.5);
        assert_near(config.v_out_max, 25.0);
        assert_eq!(config.td_off, DeadTime::Max);
        assert_eq!(config.td_on, DeadTime::Max);
        assert_eq!(mppt.bus.reads(), &[(DeviceAddress::Addr001, MemoryAddress::Reg3)]);
    }

    #[test]
    fn transport_failure_propagates_as_none() {
        let mut mock = MockI2c::new();
        mock.set_read_failure(true);
        let mut mppt = mppt(mock);

        assert!(mppt.analogue_channel_register().is_none());
        assert!(mppt.measurement_register().is_none());
        assert!(mppt.config_register().is_none());
        assert!(mppt.offset_register().is_none());
        assert!(mppt.threshold_register().is_none());
        assert!(mppt.electrical_measurements().is_none());
        assert!(mppt.analogue_channel_voltages().is_none());
        assert!(mppt.offsets().is_none());
        assert!(mppt.current_thresholds().is_none());
        assert!(mppt.config().is_none());
        assert!(mppt.input_current().is_none());
        assert!(mppt.current_threshold(CurrentThreshold::CurrentInLow).is_none());
    }

    #[test]
    fn config_builder_performs_no_bus_traffic() {
        let mppt = mppt(MockI2c::new());
        let raw = mppt.config_builder().build();
        assert_eq!(raw, ConfigRegister::default().to_raw());
        assert!(mppt.bus.reads().is_empty());
    }

    #[test]
    fn config_builder_from_device_seeds_from_read() {
        let mut mock = MockI2c::new();
        let seed = 0b1_0_01_010_1010101010_1010101010_101_101_010101010_0_1_0_1_0u64;
        mock.set_read_value(seed);
        let mut mppt = mppt(mock);

        let raw = mppt.config_builder_from_device().build();
        assert_eq!(
            raw & ConfigRegister::USED_BITS,
            seed & ConfigRegister::USED_BITS
        );
        assert_eq!(mppt.bus.reads(), &[(DeviceAddress::Addr001, MemoryAddress::Reg3)]);
    }

    #[test]
    fn config_builder_from_device_falls_back_to_defaults() {
        let mut mock = MockI2c::new();
        mock.set_read_failure(true);
        let mut mppt = mppt(mock);

        let raw = mppt.config_builder_from_device().build();
        assert_eq!(raw, ConfigRegister::default().to_raw());
    }

    #[test]
    fn write_config_targets_reg3_and_echoes() {
        let mut mppt = mppt(MockI2c::new());
        let raw = mppt
            .config_builder()
            .set_frequency_mode(FrequencyMode::Med)
            .set_panel_mode(PanelMode::UseHBridge)
            .build();

        assert_eq!(mppt.write_config(raw), Some(raw));
        assert_eq!(
            mppt.bus.writes(),
            &[(DeviceAddress::Addr001, MemoryAddress::Reg3, raw)]
        );
    }

    #[test]
    fn write_config_failure_propagates_as_none() {
        let mut mock = MockI2c::new();
        mock.set_write_failure(true);
        let mut mppt = mppt(mock);
        assert!(mppt.write_config(0x1).is_none());
    }
}
