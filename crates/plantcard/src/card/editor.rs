//! Config editor.
//!
//! The editor presents the config as a flat form (`show_<type>` toggles and `<type>_order`
//! selects) and turns every form change into a new config. It never mutates a config a card
//! may still be rendering: each change produces a fresh [`CardConfig`] sent out in a
//! [`CardEvent::ConfigChanged`].

use std::str::FromStr;

use serde_json::Map;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::debug;
use tracing::warn;

use super::device_title;
use super::CardEvent;
use crate::config::normalize;
use crate::config::CardConfig;
use crate::config::Diagnostic;
use crate::config::DisplayMode;
use crate::config::SensorType;
use crate::host::DeviceRegistry;
use crate::CardError;

/// Editor state for one card.
#[derive(Debug, Clone, Default)]
pub struct CardEditor {
    config: CardConfig,
}

impl CardEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    /// Load the card's current config. A config with a device but no title gets the device
    /// name as its title.
    pub fn set_config(
        &mut self,
        raw: &Value,
        registry: Option<&impl DeviceRegistry>,
    ) -> Result<Vec<Diagnostic>, CardError> {
        let (mut config, diagnostics) = normalize(raw)?;

        if !config.device_id.is_empty() && config.title.is_empty() {
            if let Some(title) = registry.and_then(|r| device_title(r, &config.device_id)) {
                config = config.with_title(title);
            }
        }

        self.config = config;
        Ok(diagnostics)
    }

    /// The config as form data, one field per form control.
    pub fn form_data(&self) -> Map<String, Value> {
        let config = &self.config;
        let mut form = Map::new();
        form.insert("device_id".to_string(), config.device_id.clone().into());
        form.insert("title".to_string(), config.title.clone().into());
        form.insert(
            "display_mode".to_string(),
            config.display_mode.to_string().into(),
        );
        form.insert(
            "battery_threshold".to_string(),
            config.battery_threshold.into(),
        );
        for slot in config.sensors() {
            form.insert(slot.sensor_type.show_key(), slot.enabled.into());
            form.insert(slot.sensor_type.order_key(), slot.order.to_string().into());
        }
        form
    }

    /// Apply a form change.
    ///
    /// Picking an order another sensor already has swaps the two. Clearing the device clears
    /// the title; picking a device while the title is blank uses the device name.
    pub fn value_changed(
        &mut self,
        form: &Map<String, Value>,
        registry: &impl DeviceRegistry,
    ) -> CardEvent {
        let current = &self.config;
        let mut next = current.clone();
        let mut toggles = Vec::new();

        for (key, value) in form {
            match key.as_str() {
                "device_id" | "title" | "display_mode" | "battery_threshold" => {}
                _ => {
                    if let Some(sensor) = SensorType::iter().find(|s| *key == s.show_key()) {
                        match value.as_bool() {
                            Some(enabled) => toggles.push((sensor, enabled)),
                            None => warn!("Ignoring non-boolean value for '{}': {}", key, value),
                        }
                    } else if let Some(sensor) =
                        SensorType::iter().find(|s| *key == s.order_key())
                    {
                        next = apply_order(next, current, sensor, value);
                    } else {
                        next.extra.insert(key.clone(), value.clone());
                    }
                }
            }
        }

        // Enable before disabling so that swapping which sensor is shown never leaves the grid
        // empty halfway through
        toggles.sort_by_key(|(_, enabled)| !enabled);
        for (sensor, enabled) in toggles {
            next = next.with_enabled(sensor, enabled);
        }

        if let Some(title) = form.get("title").and_then(Value::as_str) {
            next = next.with_title(title);
        }
        if let Some(mode) = form.get("display_mode").and_then(Value::as_str) {
            match DisplayMode::from_str(mode) {
                Ok(mode) => next = next.with_display_mode(mode),
                Err(_) => warn!("Ignoring unknown display mode '{}'", mode),
            }
        }
        if let Some(threshold) = form.get("battery_threshold").and_then(Value::as_f64) {
            next = next.with_battery_threshold(threshold.round().clamp(0.0, 100.0) as u8);
        }

        if let Some(device_id) = form.get("device_id").and_then(Value::as_str) {
            if device_id != current.device_id {
                debug!("Device changed from '{}' to '{}'", current.device_id, device_id);
                next = next.with_device(device_id);
                if device_id.is_empty() {
                    next = next.with_title("");
                } else if next.title.is_empty() {
                    if let Some(title) = device_title(registry, device_id) {
                        next = next.with_title(title);
                    }
                }
            }
        }

        self.commit(next)
    }

    /// Give `sensor_type` the order `order`, swapping with the sensor that had it.
    pub fn set_order(
        &mut self,
        sensor_type: SensorType,
        order: u8,
    ) -> Result<CardEvent, CardError> {
        let next = self.config.with_order(sensor_type, order)?;
        Ok(self.commit(next))
    }

    /// Drag-and-drop reorder of the sensor list.
    pub fn move_sensor(&mut self, from: usize, to: usize) -> Result<CardEvent, CardError> {
        let next = self.config.with_moved_sensor(from, to)?;
        Ok(self.commit(next))
    }

    pub fn set_enabled(&mut self, sensor_type: SensorType, enabled: bool) -> CardEvent {
        let next = self.config.with_enabled(sensor_type, enabled);
        self.commit(next)
    }

    fn commit(&mut self, next: CardConfig) -> CardEvent {
        self.config = next.clone();
        CardEvent::ConfigChanged { config: next }
    }
}

/// Apply an `<type>_order` form value. Only values that differ from the config the form was
/// built from count as edits.
fn apply_order(
    next: CardConfig,
    current: &CardConfig,
    sensor: SensorType,
    value: &Value,
) -> CardConfig {
    let order = match value {
        Value::String(s) => s.trim().parse::<u8>().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u8::try_from(n).ok()),
        _ => None,
    };
    let Some(order) = order else {
        warn!("Ignoring invalid order for {}: {}", sensor, value);
        return next;
    };
    if order == current.order_of(sensor) {
        return next;
    }

    match next.with_order(sensor, order) {
        Ok(edited) => edited,
        Err(e) => {
            warn!("Ignoring order change for {}: {}", sensor, e);
            next
        }
    }
}
