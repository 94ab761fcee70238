//! Vingnut HG01 soil moisture meter decoder
//!
//! Takes captures of demodulated OOK bit rows, finds the HG01 preamble in
//! each row and turns every 65-bit message into a [`hg01::Reading`].

pub mod bitbuffer;
pub mod config;
pub mod decoder;
pub mod device;
pub mod hg01;
pub mod output;

pub use bitbuffer::{BitRow, Capture};
pub use hg01::{Hg01Decoder, Reading};
