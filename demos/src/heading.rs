//! Print the compass heading twice a second on a Raspberry Pi.
//!
//! Wiring: QMC5883L breakout on i2c bus 1 (pins 3/5). Rotate the sensor
//! through a full horizontal turn after startup so the calibration
//! windows open up; headings read 0 until they do.

use embedded_hal::delay::DelayNs;
use linux_embedded_hal::{Delay, I2cdev};
use qmc5883l_compass::{
    address::Address,
    axis::Axis,
    config::Config,
    sensor::Qmc5883l,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let i2c = I2cdev::new("/dev/i2c-1")?;
    let mut delay = Delay;

    let config = Config {
        // Magnetic declination for your location, e.g. from
        // https://www.magnetic-declination.com/
        declination_degrees: 2.44,
        ..Config::default()
    };

    let mut compass = Qmc5883l::new(i2c, Address::default(), config)
        .map_err(|e| format!("no QMC5883L found: {:?}", e))?;

    println!("chip id: {:#04x}", compass.chip_id().map_err(|e| format!("{e:?}"))?);

    loop {
        let degrees = compass
            .heading_degrees(&mut delay, Axis::X, Axis::Y)
            .map_err(|e| format!("read failed: {e:?}"))?;
        println!("heading: {degrees:6.1}°");
        delay.delay_ms(500);
    }
}
