//! Far-field gain post-processing: polarization weighting and display
//! scaling of gain values in dB.

use serde::{Deserialize, Serialize};

/// Gain display scaling styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GainScaling {
    /// Linear power, `10^(dB/10)`.
    LinearPower,
    /// Linear voltage, `10^(dB/20)`.
    LinearVoltage,
    /// ARRL log-periodic style, `e^(0.058267 dB)`.
    Arrl,
    /// Logarithmic with a -40 dB floor mapped onto [0, 1].
    Logarithmic,
}

/// Polarization senses selectable for pattern display. The axial ratio
/// is signed: positive for left-hand sense, negative for right-hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarization {
    Total,
    Horizontal,
    Vertical,
    RightCircular,
    LeftCircular,
}

/// Power fraction of a gain sample received in the given polarization,
/// in dB, from the axial ratio and tilt angle (radians) of the
/// polarization ellipse.
pub fn polarization_factor(pol: Polarization, axial_ratio: f64, tilt: f64) -> f64 {
    let a2 = axial_ratio * axial_ratio;
    let polf = match pol {
        Polarization::Total => 1.0,
        Polarization::Horizontal => {
            let s2 = tilt.sin() * tilt.sin();
            (a2 + (1.0 - a2) * s2) / (1.0 + a2)
        }
        Polarization::Vertical => {
            let c2 = tilt.cos() * tilt.cos();
            (a2 + (1.0 - a2) * c2) / (1.0 + a2)
        }
        Polarization::LeftCircular => {
            (1.0 + 2.0 * axial_ratio + a2) / 2.0 / (1.0 + a2)
        }
        Polarization::RightCircular => {
            (1.0 - 2.0 * axial_ratio + a2) / 2.0 / (1.0 + a2)
        }
    };
    10.0 * polf.max(1.0e-200).log10()
}

/// Directional gain in dB adjusted for the receive polarization:
/// the raw gain plus the polarization mismatch factor.
pub fn polarized_gain(gain_db: f64, pol: Polarization, axial_ratio: f64, tilt: f64) -> f64 {
    gain_db + polarization_factor(pol, axial_ratio, tilt)
}

/// Map a gain in dB to the selected display scale (legacy `Scale_Gain`
/// without the per-point polarization lookup; apply
/// [`polarization_factor`] to the gain first when a polarization other
/// than total is displayed).
pub fn scale_gain(gain_db: f64, scaling: GainScaling) -> f64 {
    match scaling {
        GainScaling::LinearPower => 10.0f64.powf(gain_db / 10.0),
        GainScaling::LinearVoltage => 10.0f64.powf(gain_db / 20.0),
        GainScaling::Arrl => (0.058267 * gain_db).exp(),
        GainScaling::Logarithmic => {
            if gain_db < -40.0 {
                0.0
            } else {
                gain_db / 40.0 + 1.0
            }
        }
    }
}

/// Recover the dB gain from a scaled value (legacy `Inverse_Scale_Gain`).
/// Nonpositive values on the multiplicative scales map to -999.99.
pub fn inverse_scale_gain(scaled: f64, scaling: GainScaling) -> f64 {
    match scaling {
        GainScaling::LinearPower => {
            if scaled > 0.0 {
                10.0 * scaled.log10()
            } else {
                -999.99
            }
        }
        GainScaling::LinearVoltage => {
            if scaled > 0.0 {
                20.0 * scaled.log10()
            } else {
                -999.99
            }
        }
        GainScaling::Arrl => {
            if scaled > 0.0 {
                scaled.ln() / 0.058267
            } else {
                -999.99
            }
        }
        GainScaling::Logarithmic => (scaled - 1.0) * 40.0,
    }
}
