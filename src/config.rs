//! The interpreted override configuration: a read-only [`Config`] snapshot
//! decoded from reg3, and a chained [`ConfigBuilder`] for composing a new
//! reg3 value to transmit.

use crate::conversion::{code_to_voltage, unit_to_code, voltage_to_unit, Gains};
use crate::registers::ConfigRegister;
use strum_macros::EnumIter;

/// Switching frequency selected by the mode-select code. Discriminants are
/// the nominal frequencies in kHz.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum FrequencyMode {
    Low = 110,
    Med = 135,
    High = 215,
}

/// Power train topology selected by the mode-select code.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PanelMode {
    UseSwitch,
    UseHBridge,
}

/// Dead time codes for the switching bridge. The datasheet gives no
/// code-to-milliseconds formula; values are the raw controller codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[repr(u8)]
pub enum DeadTime {
    Zero = 0x0,
    One = 0x1,
    Two = 0x2,
    Three = 0x3,
    Four = 0x4,
    Five = 0x5,
    Six = 0x6,
    Max = 0x7,
}

impl FrequencyMode {
    /// Decode the frequency half of a mode-select code.
    ///
    /// Total over all 8 codes: the unassigned codes 6 and 7 read as High.
    /// This is the part's documented behaviour, not a driver convention.
    pub const fn from_a2_code(code: u8) -> Self {
        match code & 0x7 {
            0x0 | 0x3 | 0x6 | 0x7 => Self::High,
            0x1 | 0x4 => Self::Med,
            _ => Self::Low,
        }
    }

    const fn a2_base(self) -> u8 {
        match self {
            Self::High => 0x0,
            Self::Med => 0x1,
            Self::Low => 0x2,
        }
    }
}

impl PanelMode {
    /// Decode the panel half of a mode-select code.
    ///
    /// Total over all 8 codes: only 3, 4 and 5 select the H-bridge; the
    /// unassigned codes 6 and 7 read as the switch topology.
    pub const fn from_a2_code(code: u8) -> Self {
        match code & 0x7 {
            0x3 | 0x4 | 0x5 => Self::UseHBridge,
            _ => Self::UseSwitch,
        }
    }
}

impl DeadTime {
    /// Decode a 3-bit dead time code.
    pub const fn from_code(code: u8) -> Self {
        match code & 0x7 {
            0x0 => Self::Zero,
            0x1 => Self::One,
            0x2 => Self::Two,
            0x3 => Self::Three,
            0x4 => Self::Four,
            0x5 => Self::Five,
            0x6 => Self::Six,
            _ => Self::Max,
        }
    }
}

/// Combined mode-select code per datasheet Table 1: the H-bridge variants sit
/// three codes above their switch counterparts.
const fn a2_override_code(frequency_mode: FrequencyMode, panel_mode: PanelMode) -> u8 {
    let base = frequency_mode.a2_base();
    match panel_mode {
        PanelMode::UseHBridge => base + 0x3,
        PanelMode::UseSwitch => base,
    }
}

/// Read-only snapshot of the override configuration, translated into
/// physical units and symbolic modes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Config {
    /// ADC programming override enable.
    pub override_adc_programming: bool,
    pub frequency_mode: FrequencyMode,
    pub panel_mode: PanelMode,
    /// Override maximum output current in amps.
    pub i_out_max: f32,
    /// Override maximum output voltage in volts.
    pub v_out_max: f32,
    pub td_off: DeadTime,
    pub td_on: DeadTime,
    pub panel_mode_override_enable: bool,
    pub panel_mode_override: bool,
    /// Pin 5 clock output enable.
    pub clock_output_enable: bool,
    pub open_loop_operation: bool,
}

impl Config {
    /// Derive the snapshot from a register view and the installation's gain
    /// context. Pure; performs no bus traffic.
    pub fn from_register(reg: &ConfigRegister, gains: &Gains) -> Self {
        Self {
            override_adc_programming: reg.override_adc_programming,
            frequency_mode: FrequencyMode::from_a2_code(reg.a2_override),
            panel_mode: PanelMode::from_a2_code(reg.a2_override),
            i_out_max: voltage_to_unit(
                code_to_voltage(reg.i_out_max, 10, gains.vdda),
                gains.i_out,
            ),
            v_out_max: voltage_to_unit(
                code_to_voltage(reg.v_out_max, 10, gains.vdda),
                gains.v_out,
            ),
            td_off: DeadTime::from_code(reg.td_off),
            td_on: DeadTime::from_code(reg.td_on),
            panel_mode_override_enable: reg.panel_mode_override_enable,
            panel_mode_override: reg.panel_mode_override,
            clock_output_enable: reg.clock_output_enable,
            open_loop_operation: reg.open_loop_operation,
        }
    }
}

/// Composes a new reg3 value through chained setters.
///
/// The builder is never partially invalid: every intermediate state encodes
/// to a legal register value, so a half-configured builder can still be
/// built and transmitted safely.
#[derive(Debug, Copy, Clone)]
pub struct ConfigBuilder {
    reg: ConfigRegister,
    gains: Gains,
}

impl ConfigBuilder {
    /// Start from the datasheet power-on reset values.
    pub fn from_defaults(gains: Gains) -> Self {
        Self {
            reg: ConfigRegister::default(),
            gains,
        }
    }

    /// Start from a previously read register value.
    pub fn from_raw(gains: Gains, raw: u64) -> Self {
        Self {
            reg: ConfigRegister::from_raw(raw),
            gains,
        }
    }

    /// Clear the ADC programming override enable bit, handing ADC
    /// programming back to the configuration pins.
    pub fn reset_adc_programming_override(mut self) -> Self {
        self.reg.override_adc_programming = false;
        self
    }

    /// Select the switching frequency, keeping the currently latched panel
    /// mode. Also sets the ADC programming override enable bit; the part
    /// ignores the mode-select code without it.
    pub fn set_frequency_mode(mut self, frequency_mode: FrequencyMode) -> Self {
        let panel_mode = PanelMode::from_a2_code(self.reg.a2_override);
        self.reg.a2_override = a2_override_code(frequency_mode, panel_mode);
        self.reg.override_adc_programming = true;
        self
    }

    /// Select the panel topology, keeping the currently latched frequency
    /// mode. Also sets the ADC programming override enable bit.
    pub fn set_panel_mode(mut self, panel_mode: PanelMode) -> Self {
        let frequency_mode = FrequencyMode::from_a2_code(self.reg.a2_override);
        self.reg.a2_override = a2_override_code(frequency_mode, panel_mode);
        self.reg.override_adc_programming = true;
        self
    }

    /// Set the maximum output current override in amps.
    ///
    /// A negative or unrepresentable request forces the threshold to zero
    /// rather than clamping to full scale, and leaves the override enable
    /// untouched; an in-range request also sets the ADC programming override
    /// enable bit.
    pub fn set_output_current_max(mut self, amps: f32) -> Self {
        let code = unit_to_code(amps, self.gains.i_out, self.gains.vdda, 10);
        if amps < 0.0 || code > 0x3FF {
            self.reg.i_out_max = 0x000;
            return self;
        }
        self.reg.i_out_max = code as u16;
        self.reg.override_adc_programming = true;
        self
    }

    /// Set the maximum output voltage override in volts. Same range policy
    /// as [`set_output_current_max`](Self::set_output_current_max).
    pub fn set_output_voltage_max(mut self, volts: f32) -> Self {
        let code = unit_to_code(volts, self.gains.v_out, self.gains.vdda, 10);
        if volts < 0.0 || code > 0x3FF {
            self.reg.v_out_max = 0x000;
            return self;
        }
        self.reg.v_out_max = code as u16;
        self.reg.override_adc_programming = true;
        self
    }

    /// Set the dead time inserted after switch-off.
    pub fn set_dead_time_off(mut self, dead_time: DeadTime) -> Self {
        self.reg.td_off = dead_time as u8;
        self
    }

    /// Set the dead time inserted before switch-on.
    pub fn set_dead_time_on(mut self, dead_time: DeadTime) -> Self {
        self.reg.td_on = dead_time as u8;
        self
    }

    /// Clear the panel mode override enable bit, returning panel mode
    /// selection to the configuration pins.
    pub fn reset_panel_mode_override(mut self) -> Self {
        self.reg.panel_mode_override_enable = false;
        self
    }

    /// Set the panel mode override value. Also sets the panel mode override
    /// enable bit; the value bit is ignored without it.
    pub fn set_panel_mode_override(mut self, value: bool) -> Self {
        self.reg.panel_mode_override = value;
        self.reg.panel_mode_override_enable = true;
        self
    }

    /// The raw register value to transmit.
    pub fn build(self) -> u64 {
        self.reg.to_raw()
    }
}
