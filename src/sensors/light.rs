//! Analog light sensor read through an MCP3008 ADC.
//!
//! The MCP3008 is an 8-channel 10-bit ADC spoken to over a bit-banged SPI bus
//! on four GPIO pins. Channel 0 carries the photoresistor. The raw conversion
//! code (0-1023) is published as-is, with no translation to physical units.
//!
//! Hardware access requires the `gpio` feature (rppal). Without it a mock
//! sensor is provided so the exporter still builds and runs on non-Pi systems.

use crate::error::Result;

/// ADC channel the light sensor is wired to.
pub const LIGHT_CHANNEL: u8 = 0;

/// BCM pin numbers for the bit-banged SPI bus.
#[derive(Debug, Clone, Copy)]
pub struct SpiPins {
    pub clk: u8,
    pub miso: u8,
    pub mosi: u8,
    pub cs: u8,
}

impl Default for SpiPins {
    fn default() -> Self {
        Self {
            clk: 18,
            miso: 23,
            mosi: 24,
            cs: 25,
        }
    }
}

/// Trait for reading a raw conversion code from the light sensor.
pub trait LightSensor {
    /// Read one sample, returning a value in `[0, 1023]`.
    fn read_raw(&mut self) -> Result<u16>;
}

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use super::*;
    use crate::error::SensorError;
    use rppal::gpio::{Gpio, InputPin, OutputPin};

    /// MCP3008 driver over software SPI.
    pub struct Mcp3008 {
        clk: OutputPin,
        miso: InputPin,
        mosi: OutputPin,
        cs: OutputPin,
        channel: u8,
    }

    impl Mcp3008 {
        /// Claim the four bus pins and prepare to sample the given channel.
        pub fn new(pins: SpiPins, channel: u8) -> Result<Self> {
            if channel > 7 {
                return Err(SensorError::bus_error(format!(
                    "MCP3008 channel {} out of range (0-7)",
                    channel
                )));
            }

            let gpio = Gpio::new()
                .map_err(|e| SensorError::bus_error(format!("failed to initialize GPIO: {}", e)))?;

            let claim_out = |pin: u8| -> Result<OutputPin> {
                Ok(gpio
                    .get(pin)
                    .map_err(|e| {
                        SensorError::bus_error(format!("failed to claim pin {}: {}", pin, e))
                    })?
                    .into_output())
            };

            let mut clk = claim_out(pins.clk)?;
            let mut cs = claim_out(pins.cs)?;
            let mosi = claim_out(pins.mosi)?;
            let miso = gpio
                .get(pins.miso)
                .map_err(|e| {
                    SensorError::bus_error(format!("failed to claim pin {}: {}", pins.miso, e))
                })?
                .into_input();

            // Idle state: chip deselected, clock low.
            cs.set_high();
            clk.set_low();

            Ok(Self {
                clk,
                miso,
                mosi,
                cs,
                channel,
            })
        }

        fn clock_pulse(&mut self) -> bool {
            self.clk.set_high();
            let bit = self.miso.is_high();
            self.clk.set_low();
            bit
        }
    }

    impl LightSensor for Mcp3008 {
        fn read_raw(&mut self) -> Result<u16> {
            self.cs.set_high();
            self.clk.set_low();
            self.cs.set_low();

            // Command word: start bit, single-ended mode, 3-bit channel.
            let command: u8 = 0b1_1000 | (self.channel & 0x07);
            for i in (0..5).rev() {
                if command & (1 << i) != 0 {
                    self.mosi.set_high();
                } else {
                    self.mosi.set_low();
                }
                self.clock_pulse();
            }

            // One null bit, then 10 data bits MSB first.
            let mut result: u16 = 0;
            for _ in 0..11 {
                result = (result << 1) | u16::from(self.clock_pulse());
            }

            self.cs.set_high();
            Ok(result & 0x03FF)
        }
    }
}

#[cfg(not(feature = "gpio"))]
mod mock {
    use super::*;

    /// Stand-in light sensor for systems without GPIO support.
    pub struct MockLightSensor {
        value: u16,
    }

    impl MockLightSensor {
        pub fn new(_pins: SpiPins, _channel: u8) -> Result<Self> {
            tracing::warn!("GPIO feature not compiled, light sensor reads a fixed value");
            Ok(Self { value: 0 })
        }

        /// Mock returning a fixed conversion code.
        pub fn with_value(value: u16) -> Self {
            Self { value }
        }
    }

    impl LightSensor for MockLightSensor {
        fn read_raw(&mut self) -> Result<u16> {
            Ok(self.value)
        }
    }
}

// Re-export the appropriate sensor implementation
#[cfg(feature = "gpio")]
pub use raspberry_pi::Mcp3008 as DefaultLightSensor;

#[cfg(not(feature = "gpio"))]
pub use mock::MockLightSensor as DefaultLightSensor;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pins_match_wiring() {
        let pins = SpiPins::default();
        assert_eq!(pins.clk, 18);
        assert_eq!(pins.miso, 23);
        assert_eq!(pins.mosi, 24);
        assert_eq!(pins.cs, 25);
    }

    #[cfg(not(feature = "gpio"))]
    #[test]
    fn test_mock_sensor_returns_configured_value() {
        let mut sensor = DefaultLightSensor::with_value(512);
        assert_eq!(sensor.read_raw().unwrap(), 512);
    }
}
