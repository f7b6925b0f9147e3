//! Conversions between raw ADC codes and physical electrical units.
//!
//! The SM72445's ADCs measure pin voltage against the analogue supply rail
//! `vdda`; external signal conditioning relates that pin voltage to the real
//! quantity through a per-channel gain. Different boards use different
//! divider/shunt networks, so the gains are supplied at construction and
//! carried in [`Gains`].

use crate::error::{Error, Result};
use crate::registers::{AnalogueChannel, CurrentThreshold, ElectricalProperty};

/// Convert an ADC result to the apparent pin voltage.
///
/// `code` must already be masked to `resolution_bits`; wider inputs produce
/// silently wrong results.
pub fn code_to_voltage(code: u16, resolution_bits: u8, vdda: f32) -> f32 {
    let full_scale = ((1u32 << resolution_bits) - 1) as f32;
    code as f32 / full_scale * vdda
}

/// Convert a pin voltage to the real electrical quantity it represents.
///
/// A zero gain divides by zero; [`Gains`] refuses to be constructed with one,
/// so callers holding a `Gains` never hit that case.
pub fn voltage_to_unit(voltage: f32, gain: f32) -> f32 {
    voltage / gain
}

/// Convert a physical value back to the nearest ADC code.
///
/// Returned wide so the caller can range-check against the target field width
/// before masking. Negative inputs are the caller's responsibility to reject
/// beforehand.
pub fn unit_to_code(value: f32, gain: f32, vdda: f32, resolution_bits: u8) -> u32 {
    let full_scale = ((1u32 << resolution_bits) - 1) as f32;
    (value * gain / vdda * full_scale + 0.5) as u32
}

/// The analogue gain context for one SM72445 installation: the four
/// signal-conditioning gains plus the analogue supply voltage used as the ADC
/// reference.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Gains {
    /// Input voltage gain, vInAdc : vInReal.
    pub v_in: f32,
    /// Output voltage gain, vOutAdc : vOutReal.
    pub v_out: f32,
    /// Input current gain, iInAdc : iInReal.
    pub i_in: f32,
    /// Output current gain, iOutAdc : iOutReal.
    pub i_out: f32,
    /// Analogue supply voltage.
    pub vdda: f32,
}

impl Gains {
    /// Nominal analogue supply voltage for most installations.
    pub const DEFAULT_VDDA: f32 = 5.0;

    /// Validate and construct a gain context.
    ///
    /// All four gains and `vdda` must be positive and finite; anything else
    /// would make the unit conversions divide by zero or produce non-finite
    /// values downstream.
    pub fn new(v_in: f32, v_out: f32, i_in: f32, i_out: f32, vdda: f32) -> Result<Self> {
        for gain in [v_in, v_out, i_in, i_out] {
            if !gain.is_finite() || gain <= 0.0 {
                return Err(Error::InvalidGain);
            }
        }
        if !vdda.is_finite() || vdda <= 0.0 {
            return Err(Error::InvalidReferenceVoltage);
        }
        Ok(Self {
            v_in,
            v_out,
            i_in,
            i_out,
            vdda,
        })
    }

    /// Gain for one electrical property.
    pub const fn for_property(&self, property: ElectricalProperty) -> f32 {
        match property {
            ElectricalProperty::CurrentIn => self.i_in,
            ElectricalProperty::VoltageIn => self.v_in,
            ElectricalProperty::CurrentOut => self.i_out,
            ElectricalProperty::VoltageOut => self.v_out,
        }
    }

    /// Gain for one current threshold. Input thresholds share the input
    /// current gain, output thresholds the output current gain.
    pub const fn for_threshold(&self, threshold: CurrentThreshold) -> f32 {
        match threshold {
            CurrentThreshold::CurrentOutLow | CurrentThreshold::CurrentOutHigh => self.i_out,
            CurrentThreshold::CurrentInLow | CurrentThreshold::CurrentInHigh => self.i_in,
        }
    }

    /// Analogue configuration channels are sampled directly at the pin.
    pub const fn for_channel(&self, _channel: AnalogueChannel) -> f32 {
        1.0
    }
}
