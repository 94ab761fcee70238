//! Registration metadata handed to the host pulse demodulator
//!
//! All timings are in microseconds.

use std::fmt;

use crate::hg01::MODEL;

/// Pulse modulation the host demodulator should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Modulation {
    /// On-off keying, bit value carried by pulse width
    OokPulsePwm,
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OokPulsePwm => write!(f, "OOK_PULSE_PWM"),
        }
    }
}

/// Static description of a decoder for the host dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSpec {
    pub name: &'static str,
    pub model: &'static str,
    pub modulation: Modulation,
    pub short_width_us: u32,
    pub long_width_us: u32,
    pub reset_limit_us: u32,
    pub gap_limit_us: u32,
    pub tolerance_us: u32,
    /// Repeats the host should see before trusting a reading; advisory only
    pub min_repeats: u8,
    pub disabled: bool,
}

pub const VINGNUT_HG01: DeviceSpec = DeviceSpec {
    name: "Vingnut Moisture Meter",
    model: MODEL,
    modulation: Modulation::OokPulsePwm,
    short_width_us: 380,
    long_width_us: 1180,
    reset_limit_us: 4076,
    gap_limit_us: 1308,
    tolerance_us: 320,
    min_repeats: 3,
    disabled: false,
};

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) {} short={}us long={}us reset={}us gap={}us tolerance={}us repeats>={}",
            self.name,
            self.model,
            self.modulation,
            self.short_width_us,
            self.long_width_us,
            self.reset_limit_us,
            self.gap_limit_us,
            self.tolerance_us,
            self.min_repeats
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hg01_timings() {
        assert_eq!(VINGNUT_HG01.modulation, Modulation::OokPulsePwm);
        assert_eq!(VINGNUT_HG01.short_width_us, 380);
        assert_eq!(VINGNUT_HG01.long_width_us, 1180);
        assert_eq!(VINGNUT_HG01.reset_limit_us, 4076);
        assert_eq!(VINGNUT_HG01.gap_limit_us, 1308);
        assert_eq!(VINGNUT_HG01.tolerance_us, 320);
        assert_eq!(VINGNUT_HG01.min_repeats, 3);
        assert!(!VINGNUT_HG01.disabled);
    }

    #[test]
    fn test_display() {
        let text = VINGNUT_HG01.to_string();
        assert!(text.starts_with("Vingnut Moisture Meter (Vingnut HG01) OOK_PULSE_PWM"));
        assert!(text.ends_with("repeats>=3"));
    }
}
