//! Vingnut HG01 message constants and the decoded reading

use serde::Serialize;

/// Message length in bits, counted from the start of the preamble
pub const MESSAGE_BITLEN: usize = 65;

/// Bytes needed to hold one extracted message
pub const MESSAGE_BYTELEN: usize = (MESSAGE_BITLEN + 7) / 8;

/// Preamble searched for in the raw (non-inverted) row
pub const PREAMBLE: [u8; 3] = [0x55, 0xaa, 0xde];

/// Preamble length in bits
pub const PREAMBLE_BITLEN: usize = PREAMBLE.len() * 8;

/// Model name reported with every reading
pub const MODEL: &str = "Vingnut HG01";

/// One decoded soil meter reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    pub model: &'static str,

    /// Sensor id, two lowercase hex digits
    pub id: String,

    /// Temperature in whole degrees Celsius (-127 to 127)
    #[serde(rename = "temperature_C")]
    pub temperature_c: i8,

    /// Raw soil moisture, reported as percent (not clamped)
    pub soil_moisture: u8,

    pub light: u8,

    /// Battery bars (0-15)
    pub battery: u8,
}

impl Reading {
    /// Output fields as `(key, label, formatted value)`, in report order
    pub fn fields(&self) -> [(&'static str, &'static str, String); 6] {
        [
            ("model", "model", self.model.to_string()),
            ("id", "id", self.id.clone()),
            ("temperature_C", "Temperature", format!("{} C", self.temperature_c)),
            ("soil_moisture", "Soil Moisture", format!("{} %", self.soil_moisture)),
            ("light", "Light", self.light.to_string()),
            ("battery", "Battery Bars", self.battery.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reading {
        Reading {
            model: MODEL,
            id: "3c".to_string(),
            temperature_c: -30,
            soil_moisture: 45,
            light: 71,
            battery: 6,
        }
    }

    #[test]
    fn test_message_sizes() {
        assert_eq!(MESSAGE_BYTELEN, 9);
        assert_eq!(PREAMBLE_BITLEN, 24);
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["model"], "Vingnut HG01");
        assert_eq!(json["id"], "3c");
        assert_eq!(json["temperature_C"], -30);
        assert_eq!(json["soil_moisture"], 45);
        assert_eq!(json["light"], 71);
        assert_eq!(json["battery"], 6);
    }

    #[test]
    fn test_field_formatting() {
        let fields = sample().fields();
        assert_eq!(fields[2], ("temperature_C", "Temperature", "-30 C".to_string()));
        assert_eq!(fields[3], ("soil_moisture", "Soil Moisture", "45 %".to_string()));
        assert_eq!(fields[5].1, "Battery Bars");
    }
}
