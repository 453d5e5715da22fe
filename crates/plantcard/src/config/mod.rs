//! Card configuration.
//!
//! Raw configs come from the host (or a file) in any of the historical schema versions and are
//! normalized into a canonical [`CardConfig`]. Normalization never rejects a config object: it
//! repairs what it can and reports what it repaired as [`Diagnostic`]s.

mod card;
mod diagnostics;
mod load;
mod schema;
mod sensor;

pub use card::default_slot;
pub use card::CardConfig;
pub use card::SensorSlot;
pub use card::DEFAULT_BATTERY_THRESHOLD;
pub use card::SENSOR_SLOTS;
pub use diagnostics::format_diagnostics;
pub use diagnostics::Diagnostic;
pub use diagnostics::Error;
pub use diagnostics::ParseError;
pub use diagnostics::SourceInfo;
pub use diagnostics::Warning;
pub use load::load_raw_config;
pub use load::parse_raw_config;
pub use load::ConfigFormat;
pub use load::LoadError;
pub use schema::RawCardConfig;
pub use sensor::DisplayMode;
pub use sensor::SensorType;

use serde_json::Value;
use tracing::debug;

use crate::CardError;

/// Normalize a raw config object into the canonical config.
///
/// Fails only when `raw` is not a config object at all. Normalizing the serialized output
/// again yields the same config with no diagnostics.
pub fn normalize(raw: &Value) -> Result<(CardConfig, Vec<Diagnostic>), CardError> {
    let mut diagnostics = Vec::new();
    let raw = RawCardConfig::from_value(raw, &mut diagnostics)?;
    debug!("Normalizing {} card config", raw.version_name());

    let config = raw.into_current(&mut diagnostics);
    Ok((config, diagnostics))
}

impl CardConfig {
    /// Serialize to the canonical config object the host persists.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
