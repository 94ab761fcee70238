//! Decoder registration, state and capture processing

mod manager;
mod spec;
mod state;

pub use manager::DeviceManager;
pub use spec::{DeviceSpec, Modulation, VINGNUT_HG01};
pub use state::{DeviceState, DeviceStats};
