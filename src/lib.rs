#![no_std]

#[cfg(test)]
extern crate std;

pub mod address;
pub mod axis;
pub mod calibration;
pub mod config;
pub mod error;
pub mod error_async;
pub mod heading;
pub mod mag;
pub mod registers;
pub mod sensor;
pub mod sensor_async;
