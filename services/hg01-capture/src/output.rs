//! Reporting sinks for decoded readings

use std::io::Write;

use serde::Serialize;
use tracing::warn;

use crate::hg01::Reading;

/// Timestamp format of emitted records
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Receives every reading the scanner decodes
pub trait ReadingSink {
    fn emit(&mut self, reading: Reading);
}

impl ReadingSink for Vec<Reading> {
    fn emit(&mut self, reading: Reading) {
        self.push(reading);
    }
}

#[derive(Serialize)]
struct Record<'a> {
    time: String,
    #[serde(flatten)]
    reading: &'a Reading,
}

fn now() -> String {
    chrono::Local::now().format(TIME_FORMAT).to_string()
}

/// One JSON object per line
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_record(&mut self, reading: &Reading) -> anyhow::Result<()> {
        let record = Record {
            time: now(),
            reading,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> ReadingSink for JsonSink<W> {
    fn emit(&mut self, reading: Reading) {
        if let Err(e) = self.write_record(&reading) {
            warn!("Failed to write reading {}: {}", reading.id, e);
        }
    }
}

/// Human-readable `Label: value` line per reading
pub struct KvSink<W: Write> {
    writer: W,
}

impl<W: Write> KvSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, reading: &Reading) -> std::io::Result<()> {
        write!(self.writer, "time: {}", now())?;
        for (_, label, value) in reading.fields() {
            write!(self.writer, " | {}: {}", label, value)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()
    }
}

impl<W: Write> ReadingSink for KvSink<W> {
    fn emit(&mut self, reading: Reading) {
        if let Err(e) = self.write_line(&reading) {
            warn!("Failed to write reading {}: {}", reading.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hg01::MODEL;

    fn reading() -> Reading {
        Reading {
            model: MODEL,
            id: "3c".to_string(),
            temperature_c: 20,
            soil_moisture: 45,
            light: 71,
            battery: 6,
        }
    }

    #[test]
    fn test_json_sink_line() {
        let mut sink = JsonSink::new(Vec::new());
        sink.emit(reading());
        sink.emit(reading());

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert!(value["time"].is_string());
        assert_eq!(value["model"], "Vingnut HG01");
        assert_eq!(value["temperature_C"], 20);
        assert_eq!(value["soil_moisture"], 45);
    }

    #[test]
    fn test_kv_sink_line() {
        let mut sink = KvSink::new(Vec::new());
        sink.emit(reading());

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with("time: "));
        assert!(out.contains("| model: Vingnut HG01 | id: 3c | Temperature: 20 C"));
        assert!(out.contains("| Soil Moisture: 45 % | Light: 71 | Battery Bars: 6"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_vec_sink_collects() {
        let mut sink: Vec<Reading> = Vec::new();
        sink.emit(reading());
        assert_eq!(sink, vec![reading()]);
    }
}
