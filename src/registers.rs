//! This module defines the SM72445 register map: memory and device addresses,
//! the enum keys used to index multi-field registers, and the structural views
//! of each 64-bit register value.
//!
//! Every view decodes from and re-encodes to a plain `u64` with explicit
//! shift/mask pairs so the bit layout never depends on struct layout.

use strum_macros::EnumIter;

/// Memory address of each SM72445 register.
///
/// Registers begin at 0xE0 and are offset by the register number, e.g.
/// reg1 = 0xE1, reg3 = 0xE3. This is not clearly stated in the datasheet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum MemoryAddress {
    /// __R__ - Analogue channel configuration ADC results.
    Reg0 = 0xE0,
    /// __R__ - Voltage and current input/output measurements.
    Reg1 = 0xE1,
    /// __R/W__ - Override configuration.
    Reg3 = 0xE3,
    /// __R/W__ - Voltage and current input/output ADC offsets.
    Reg4 = 0xE4,
    /// __R/W__ - Current input/output high/low MPPT thresholds.
    Reg5 = 0xE5,
}

impl From<MemoryAddress> for u8 {
    fn from(value: MemoryAddress) -> Self {
        value as u8
    }
}

/// Device address of the SM72445 on the bus, set by the ADDR pin divider.
///
/// Address 000 is not supported by the part. Values should be left shifted
/// by 1 and the R/W bit appended by the bus implementation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceAddress {
    Addr001 = 0x1,
    Addr010 = 0x2,
    Addr011 = 0x3,
    Addr100 = 0x4,
    Addr101 = 0x5,
    Addr110 = 0x6,
    Addr111 = 0x7,
}

impl From<DeviceAddress> for u8 {
    fn from(value: DeviceAddress) -> Self {
        value as u8
    }
}

/// Analogue configuration channels, named for the pins they sample.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum AnalogueChannel {
    Ch0 = 0x0,
    Ch2 = 0x1,
    Ch4 = 0x2,
    Ch6 = 0x3,
}

/// The four core electrical properties measured and offset-corrected by the
/// SM72445.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum ElectricalProperty {
    CurrentIn = 0x0,
    VoltageIn = 0x1,
    CurrentOut = 0x2,
    VoltageOut = 0x3,
}

/// MPPT current hysteresis thresholds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter)]
#[repr(u8)]
pub enum CurrentThreshold {
    CurrentOutLow = 0x0,
    CurrentOutHigh = 0x1,
    CurrentInLow = 0x2,
    CurrentInHigh = 0x3,
}

/// Structural view of reg0: the ADC results for the four analogue
/// configuration channels, 10 bits each.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AnalogueChannelRegister {
    pub adc0: u16,
    pub adc2: u16,
    pub adc4: u16,
    pub adc6: u16,
}

impl AnalogueChannelRegister {
    /// Union of the bits this register owns.
    pub const USED_BITS: u64 = 0xFF_FFFF_FFFF;

    pub const fn from_raw(raw: u64) -> Self {
        Self {
            adc0: (raw & 0x3FF) as u16,
            adc2: ((raw >> 10) & 0x3FF) as u16,
            adc4: ((raw >> 20) & 0x3FF) as u16,
            adc6: ((raw >> 30) & 0x3FF) as u16,
        }
    }

    pub const fn to_raw(&self) -> u64 {
        (self.adc0 as u64 & 0x3FF)
            | (self.adc2 as u64 & 0x3FF) << 10
            | (self.adc4 as u64 & 0x3FF) << 20
            | (self.adc6 as u64 & 0x3FF) << 30
    }

    /// ADC result for one analogue configuration channel.
    pub const fn channel(&self, channel: AnalogueChannel) -> u16 {
        match channel {
            AnalogueChannel::Ch0 => self.adc0,
            AnalogueChannel::Ch2 => self.adc2,
            AnalogueChannel::Ch4 => self.adc4,
            AnalogueChannel::Ch6 => self.adc6,
        }
    }
}

/// Structural view of reg1: the electrical measurement ADC results, 10 bits
/// each. Read-only on the device.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct MeasurementRegister {
    pub i_in: u16,
    pub v_in: u16,
    pub i_out: u16,
    pub v_out: u16,
}

impl MeasurementRegister {
    pub const USED_BITS: u64 = 0xFF_FFFF_FFFF;

    pub const fn from_raw(raw: u64) -> Self {
        Self {
            i_in: (raw & 0x3FF) as u16,
            v_in: ((raw >> 10) & 0x3FF) as u16,
            i_out: ((raw >> 20) & 0x3FF) as u16,
            v_out: ((raw >> 30) & 0x3FF) as u16,
        }
    }

    pub const fn to_raw(&self) -> u64 {
        (self.i_in as u64 & 0x3FF)
            | (self.v_in as u64 & 0x3FF) << 10
            | (self.i_out as u64 & 0x3FF) << 20
            | (self.v_out as u64 & 0x3FF) << 30
    }

    /// ADC result for one electrical property.
    pub const fn property(&self, property: ElectricalProperty) -> u16 {
        match property {
            ElectricalProperty::CurrentIn => self.i_in,
            ElectricalProperty::VoltageIn => self.v_in,
            ElectricalProperty::CurrentOut => self.i_out,
            ElectricalProperty::VoltageOut => self.v_out,
        }
    }
}

/// Structural view of reg3, the override configuration register.
///
/// The open loop duty cycle field is factory/test territory and is not
/// exposed for mutation; it is carried through decode and encode verbatim.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConfigRegister {
    /// ADC programming override enable.
    pub override_adc_programming: bool,
    /// 3-bit mode-select code multiplexing frequency and panel mode.
    /// Reference SM72445 datasheet Table 1.
    pub a2_override: u8,
    /// Override maximum output current, 10-bit ADC threshold.
    pub i_out_max: u16,
    /// Override maximum output voltage, 10-bit ADC threshold.
    pub v_out_max: u16,
    /// Dead time off, 3-bit code.
    pub td_off: u8,
    /// Dead time on, 3-bit code.
    pub td_on: u8,
    /// Open loop duty cycle. Testing only.
    dc_open: u16,
    /// Override enable for bus control of panel mode.
    pub panel_mode_override_enable: bool,
    /// Panel mode override value.
    pub panel_mode_override: bool,
    /// Soft reset.
    pub soft_reset: bool,
    /// Enable PLL clock output on pin 5.
    pub clock_output_enable: bool,
    /// Enable open loop operation. Note the part requires a separate enable
    /// sequence before this bit takes effect.
    pub open_loop_operation: bool,
}

impl ConfigRegister {
    /// Union of the bits this register owns.
    pub const USED_BITS: u64 = (1 << 46)
        | (0x7 << 40)
        | (0x3FF << 30)
        | (0x3FF << 20)
        | (0x7 << 17)
        | (0x7 << 14)
        | (0x1FF << 5)
        | 0x1F;

    /// Reserved bit the datasheet requires to read back as 1. The part
    /// misbehaves if it is written clear, so encoding always sets it.
    pub const RESERVED_BITS: u64 = 1 << 43;

    pub const fn from_raw(raw: u64) -> Self {
        Self {
            override_adc_programming: (raw >> 46) & 0x1 != 0,
            a2_override: ((raw >> 40) & 0x7) as u8,
            i_out_max: ((raw >> 30) & 0x3FF) as u16,
            v_out_max: ((raw >> 20) & 0x3FF) as u16,
            td_off: ((raw >> 17) & 0x7) as u8,
            td_on: ((raw >> 14) & 0x7) as u8,
            dc_open: ((raw >> 5) & 0x1FF) as u16,
            panel_mode_override_enable: (raw >> 4) & 0x1 != 0,
            panel_mode_override: (raw >> 3) & 0x1 != 0,
            soft_reset: (raw >> 2) & 0x1 != 0,
            clock_output_enable: (raw >> 1) & 0x1 != 0,
            open_loop_operation: raw & 0x1 != 0,
        }
    }

    pub const fn to_raw(&self) -> u64 {
        (self.override_adc_programming as u64) << 46
            | Self::RESERVED_BITS
            | (self.a2_override as u64 & 0x7) << 40
            | (self.i_out_max as u64 & 0x3FF) << 30
            | (self.v_out_max as u64 & 0x3FF) << 20
            | (self.td_off as u64 & 0x7) << 17
            | (self.td_on as u64 & 0x7) << 14
            | (self.dc_open as u64 & 0x1FF) << 5
            | (self.panel_mode_override_enable as u64) << 4
            | (self.panel_mode_override as u64) << 3
            | (self.soft_reset as u64) << 2
            | (self.clock_output_enable as u64) << 1
            | self.open_loop_operation as u64
    }

    /// The open loop duty cycle as currently latched.
    pub const fn open_loop_duty_cycle(&self) -> u16 {
        self.dc_open
    }
}

/// Power-on reset values per the datasheet register table.
impl Default for ConfigRegister {
    fn default() -> Self {
        Self {
            override_adc_programming: false,
            a2_override: 0x0,
            i_out_max: 0x3FF,
            v_out_max: 0x3FF,
            td_off: 0x3,
            td_on: 0x3,
            dc_open: 0xFF,
            panel_mode_override_enable: false,
            panel_mode_override: false,
            soft_reset: false,
            clock_output_enable: false,
            open_loop_operation: false,
        }
    }
}

/// Structural view of reg4: the ADC zero-offset corrections, 8 bits per
/// electrical property.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OffsetRegister {
    pub i_in_offset: u8,
    pub v_in_offset: u8,
    pub i_out_offset: u8,
    pub v_out_offset: u8,
}

impl OffsetRegister {
    pub const USED_BITS: u64 = 0xFFFF_FFFF;

    pub const fn from_raw(raw: u64) -> Self {
        Self {
            i_in_offset: (raw & 0xFF) as u8,
            v_in_offset: ((raw >> 8) & 0xFF) as u8,
            i_out_offset: ((raw >> 16) & 0xFF) as u8,
            v_out_offset: ((raw >> 24) & 0xFF) as u8,
        }
    }

    pub const fn to_raw(&self) -> u64 {
        (self.i_in_offset as u64)
            | (self.v_in_offset as u64) << 8
            | (self.i_out_offset as u64) << 16
            | (self.v_out_offset as u64) << 24
    }

    /// Offset code for one electrical property.
    pub const fn property(&self, property: ElectricalProperty) -> u8 {
        match property {
            ElectricalProperty::CurrentIn => self.i_in_offset,
            ElectricalProperty::VoltageIn => self.v_in_offset,
            ElectricalProperty::CurrentOut => self.i_out_offset,
            ElectricalProperty::VoltageOut => self.v_out_offset,
        }
    }
}

/// Structural view of reg5: the MPPT current hysteresis thresholds, 10 bits
/// each.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ThresholdRegister {
    pub i_out_low: u16,
    pub i_out_high: u16,
    pub i_in_low: u16,
    pub i_in_high: u16,
}

impl ThresholdRegister {
    pub const USED_BITS: u64 = 0xFF_FFFF_FFFF;

    pub const fn from_raw(raw: u64) -> Self {
        Self {
            i_out_low: (raw & 0x3FF) as u16,
            i_out_high: ((raw >> 10) & 0x3FF) as u16,
            i_in_low: ((raw >> 20) & 0x3FF) as u16,
            i_in_high: ((raw >> 30) & 0x3FF) as u16,
        }
    }

    pub const fn to_raw(&self) -> u64 {
        (self.i_out_low as u64 & 0x3FF)
            | (self.i_out_high as u64 & 0x3FF) << 10
            | (self.i_in_low as u64 & 0x3FF) << 20
            | (self.i_in_high as u64 & 0x3FF) << 30
    }

    /// ADC threshold code for one hysteresis bound.
    pub const fn threshold(&self, threshold: CurrentThreshold) -> u16 {
        match threshold {
            CurrentThreshold::CurrentOutLow => self.i_out_low,
            CurrentThreshold::CurrentOutHigh => self.i_out_high,
            CurrentThreshold::CurrentInLow => self.i_in_low,
            CurrentThreshold::CurrentInHigh => self.i_in_high,
        }
    }
}
