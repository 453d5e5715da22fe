//! Presentation state of the card's rows.
//!
//! Everything here is a pure function of readings (and, for nutrition, today's date). The
//! card collects the readings from the host and hands them in.

mod battery;
mod clock;
mod meter;
mod nutrition;
mod status;
mod units;

pub use battery::battery_display;
pub use battery::battery_tier;
pub use battery::battery_tier_in;
pub use battery::BatteryDisplay;
pub use battery::BatteryTier;
pub use battery::BATTERY_TIERS;
pub use battery::UNKNOWN_BATTERY_TIER;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use meter::meter_state;
pub use meter::MeterState;
pub use meter::SensorRange;
pub use meter::SensorSettings;
pub use meter::BATTERY_SETTINGS;
pub use nutrition::day_unit;
pub use nutrition::days_until;
pub use nutrition::format_date_for_display;
pub use nutrition::nutrition_tooltip;
pub use status::ColorToken;
pub use status::MeasurementStatus;
pub use status::MeterClass;
pub use status::PlantStatus;
pub use units::format_unit;

use chrono::DateTime;
use chrono::FixedOffset;
use serde::Serialize;
use tracing::debug;

use crate::config::SensorType;
use crate::host::EntityState;

/// Current value of a measuring sensor and its status entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Raw state, shown as is
    pub value: String,
    pub unit: String,
    /// `None` when the device has no status entity for this sensor
    pub status: Option<MeasurementStatus>,
}

impl SensorReading {
    pub fn from_states(sensor: &EntityState, status: Option<&EntityState>) -> Self {
        Self {
            value: sensor.state.clone(),
            unit: sensor.unit().to_string(),
            status: status.map(|s| MeasurementStatus::from_state(&s.state)),
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Current nutrient status and fertilization schedule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NutritionReading {
    pub status: Option<MeasurementStatus>,
    pub last_fertilized: Option<String>,
    pub next_fertilization: Option<String>,
}

/// Everything needed to draw one sensor row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorDisplay {
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    /// Entity opened when the row is clicked
    pub entity_id: String,
    pub icon: &'static str,
    pub color: ColorToken,
    pub meter: MeterState,
    pub tooltip: String,
    pub value: String,
    pub unit: String,
}

/// Display state of a light, moisture, temperature or salinity row.
pub fn derive_sensor(
    sensor_type: SensorType,
    entity_id: &str,
    reading: &SensorReading,
) -> SensorDisplay {
    let settings = sensor_type.settings();
    let status = reading.status.unwrap_or_default();

    let mut tooltip = format!(
        "{}: {} {}",
        sensor_type.display_name(),
        reading.value,
        reading.unit
    );
    if let Some(status) = reading.status {
        tooltip.push_str(&format!("\nStatus: {}", status.label()));
    }

    let meter = meter_state(settings.range, reading.numeric(), status);
    debug!(
        "Derived {} row: {} {:?} ({}%)",
        sensor_type, status, meter.class, meter.fill
    );

    SensorDisplay {
        sensor_type,
        entity_id: entity_id.to_string(),
        icon: settings.icon,
        color: status.color(),
        meter,
        tooltip,
        value: reading.value.clone(),
        unit: format_unit(&reading.unit).to_string(),
    }
}

/// Display state of the nutrition row. The value is the number of days until the next
/// fertilization, or `-` when that is unknown.
pub fn derive_nutrition(
    entity_id: &str,
    reading: &NutritionReading,
    start_of_today: DateTime<FixedOffset>,
) -> SensorDisplay {
    let status = reading.status.unwrap_or_default();
    let days = reading
        .next_fertilization
        .as_deref()
        .and_then(|next| days_until(next, start_of_today));
    debug!("Derived nutrition row: {} with {:?} days to go", status, days);

    SensorDisplay {
        sensor_type: SensorType::Nutrition,
        entity_id: entity_id.to_string(),
        icon: SensorType::Nutrition.settings().icon,
        color: status.color(),
        meter: meter_state(None, None, status),
        tooltip: nutrition_tooltip(
            reading.status,
            days,
            reading.last_fertilized.as_deref(),
            reading.next_fertilization.as_deref(),
        ),
        value: days.map_or_else(|| "-".to_string(), |d| d.to_string()),
        unit: day_unit(days).to_string(),
    }
}
