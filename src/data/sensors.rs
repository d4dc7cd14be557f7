//! Thermal and power extraction from the chassis sensor arrays.
//!
//! Sensor data follows the BMC (Redfish-style) layout:
//!
//! ```text
//! "thermal": {
//!     "Temperatures": [{"Name": "System Board Inlet Temp", "ReadingCelsius": 24}],
//!     "Fans": [{"Name": "Fan1", "Reading": 40}, ...]
//! },
//! "power": {"PowerControl": [{"PowerConsumedWatts": 412}]}
//! ```

use serde_json::Value;

use rigwatch_types::ThermalPower;

use super::payload::{field, first_present, number, number_or_zero, records, RawPayload};

/// Sensor label of the inlet ambient temperature probe.
pub const AMBIENT_SENSOR_NAME: &str = "System Board Inlet Temp";

/// Locate the ambient reading by exact sensor name.
///
/// Returns `None` when no sensor carries `label`, or when the matching
/// sensor has no numeric reading.
pub fn ambient_temperature(temperatures: Option<&Value>, label: &str) -> Option<f64> {
    let sensor = records(temperatures)
        .into_iter()
        .find(|s| s.get("Name").and_then(Value::as_str) == Some(label))?;
    number(first_present([sensor.get("ReadingCelsius"), sensor.get("Reading")]))
}

/// Mean of all fans with a numeric reading.
///
/// Fans without one are left out of both the sum and the count. With no
/// valid fans the result is zero.
pub fn average_fan_reading(fans: Option<&Value>) -> f64 {
    let readings: Vec<f64> = records(fans)
        .into_iter()
        .filter_map(|fan| number(fan.get("Reading")))
        .collect();

    if readings.is_empty() {
        0.0
    } else {
        readings.iter().sum::<f64>() / readings.len() as f64
    }
}

/// Current power draw in watts.
pub fn power_draw(power: Option<&Value>) -> f64 {
    let control = records(field(power, "PowerControl")).into_iter().next();
    number_or_zero(first_present([
        control.and_then(|c| c.get("PowerConsumedWatts")),
        field(power, "consumed_watts"),
    ]))
}

/// Build the thermal/power group of the view model.
pub fn thermal_power(payload: &RawPayload, ambient_label: &str) -> ThermalPower {
    let thermal = payload.get("thermal");
    ThermalPower {
        ambient_celsius: ambient_temperature(field(thermal, "Temperatures"), ambient_label),
        power_watts: power_draw(payload.get("power")),
        fan_percent: average_fan_reading(field(thermal, "Fans")),
    }
}
