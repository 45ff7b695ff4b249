//! Hardware sensor access.
//!
//! This module covers the two physical inputs of the exporter: DS18B20-style
//! temperature probes read through the kernel 1-wire sysfs interface, and an
//! MCP3008 ADC carrying the analog light sensor. ADC access is feature-gated
//! to allow compilation on non-Raspberry Pi systems.

pub mod light;
pub mod onewire;

pub use light::{DefaultLightSensor, LightSensor, SpiPins, LIGHT_CHANNEL};
pub use onewire::OneWireProbe;
