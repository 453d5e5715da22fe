use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

use super::DisplayMode;
use super::SensorType;
use crate::CardError;

/// Battery level at or below which the header shows the battery icon, unless configured.
pub const DEFAULT_BATTERY_THRESHOLD: u8 = 10;

/// Number of sensor slots; orders run from 1 to this value.
pub const SENSOR_SLOTS: u8 = 5;

/// Grid position and visibility of one sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorSlot {
    #[serde(rename = "type")]
    pub sensor_type: SensorType,
    pub enabled: bool,
    pub order: u8,
}

/// Canonical card configuration.
///
/// Every sensor type has exactly one slot and the slot orders are exactly `1..=5`, so order
/// values never collide. Edits return a new config; a config is never patched in place
/// while a render pass may be reading it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardConfig {
    pub device_id: String,

    /// Empty means "use the device name"
    pub title: String,

    pub display_mode: DisplayMode,

    /// 0 never shows the battery, 100 always does
    pub battery_threshold: u8,

    /// Sorted by `order`
    sensors: Vec<SensorSlot>,

    /// Host-owned keys (card `type`, grid options, ...) passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            title: String::new(),
            display_mode: DisplayMode::Full,
            battery_threshold: DEFAULT_BATTERY_THRESHOLD,
            sensors: default_slots(),
            extra: BTreeMap::new(),
        }
    }
}

/// Default order and visibility of each sensor.
pub fn default_slot(sensor_type: SensorType) -> SensorSlot {
    let (order, enabled) = match sensor_type {
        SensorType::Moisture => (1, true),
        SensorType::Light => (2, true),
        SensorType::Temperature => (3, true),
        SensorType::Nutrition => (4, true),
        SensorType::Salinity => (5, false),
    };
    SensorSlot {
        sensor_type,
        enabled,
        order,
    }
}

fn default_slots() -> Vec<SensorSlot> {
    let mut slots: Vec<SensorSlot> = SensorType::iter().map(default_slot).collect();
    slots.sort_by_key(|s| s.order);
    slots
}

impl CardConfig {
    /// The config a freshly added card starts with.
    pub fn stub() -> Self {
        Self::default()
    }

    /// Build a config from sensors in display order. Types missing from `ordered` are appended
    /// disabled, and orders are renumbered from 1.
    pub(crate) fn with_ordered_sensors(mut self, ordered: Vec<(SensorType, bool)>) -> Self {
        let mut slots: Vec<SensorSlot> = Vec::with_capacity(SENSOR_SLOTS as usize);
        for (sensor_type, enabled) in ordered {
            if slots.iter().any(|s| s.sensor_type == sensor_type) {
                continue;
            }
            slots.push(SensorSlot {
                sensor_type,
                enabled,
                order: 0,
            });
        }
        for slot in default_slots() {
            if !slots.iter().any(|s| s.sensor_type == slot.sensor_type) {
                slots.push(SensorSlot {
                    enabled: false,
                    ..slot
                });
            }
        }

        self.sensors = slots;
        self.renumber();
        self
    }

    /// All sensor slots in display order.
    pub fn sensors(&self) -> &[SensorSlot] {
        &self.sensors
    }

    /// Enabled sensor slots in display order.
    pub fn enabled_sensors(&self) -> impl Iterator<Item = &SensorSlot> {
        self.sensors.iter().filter(|s| s.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_sensors().count()
    }

    pub fn slot(&self, sensor_type: SensorType) -> SensorSlot {
        self.sensors
            .iter()
            .copied()
            .find(|s| s.sensor_type == sensor_type)
            .unwrap_or_else(|| default_slot(sensor_type))
    }

    pub fn is_enabled(&self, sensor_type: SensorType) -> bool {
        self.slot(sensor_type).enabled
    }

    pub fn order_of(&self, sensor_type: SensorType) -> u8 {
        self.slot(sensor_type).order
    }

    /// Move `sensor_type` to `order`. The sensor previously holding `order` takes the old
    /// order of `sensor_type`, so orders stay distinct.
    pub fn with_order(&self, sensor_type: SensorType, order: u8) -> Result<Self, CardError> {
        if !(1..=SENSOR_SLOTS).contains(&order) {
            return Err(CardError::OrderOutOfRange {
                order,
                max: SENSOR_SLOTS,
            });
        }

        let old_order = self.order_of(sensor_type);
        let mut next = self.clone();
        for slot in &mut next.sensors {
            if slot.sensor_type == sensor_type {
                slot.order = order;
            } else if slot.order == order {
                debug!(
                    "Swapping order of {} ({} -> {}) with {}",
                    slot.sensor_type, order, old_order, sensor_type
                );
                slot.order = old_order;
            }
        }
        next.sensors.sort_by_key(|s| s.order);
        Ok(next)
    }

    /// Drag-reorder: move the slot at display position `from` to position `to`.
    pub fn with_moved_sensor(&self, from: usize, to: usize) -> Result<Self, CardError> {
        let len = self.sensors.len();
        for index in [from, to] {
            if index >= len {
                return Err(CardError::PositionOutOfRange { index, len });
            }
        }

        let mut next = self.clone();
        let slot = next.sensors.remove(from);
        next.sensors.insert(to, slot);
        next.renumber();
        Ok(next)
    }

    /// Show or hide a sensor. Hiding the last visible sensor shows all of them again.
    pub fn with_enabled(&self, sensor_type: SensorType, enabled: bool) -> Self {
        let mut next = self.clone();
        for slot in &mut next.sensors {
            if slot.sensor_type == sensor_type {
                slot.enabled = enabled;
            }
        }
        next.ensure_any_enabled();
        next
    }

    pub fn with_device(&self, device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..self.clone()
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_display_mode(&self, display_mode: DisplayMode) -> Self {
        Self {
            display_mode,
            ..self.clone()
        }
    }

    /// Set the battery threshold, capped at 100.
    pub fn with_battery_threshold(&self, threshold: u8) -> Self {
        Self {
            battery_threshold: threshold.min(100),
            ..self.clone()
        }
    }

    /// Enable every sensor when none is enabled. Returns true if it had to.
    pub(crate) fn ensure_any_enabled(&mut self) -> bool {
        if self.sensors.iter().any(|s| s.enabled) {
            return false;
        }
        for slot in &mut self.sensors {
            slot.enabled = true;
        }
        true
    }

    fn renumber(&mut self) {
        for (index, slot) in self.sensors.iter_mut().enumerate() {
            slot.order = index as u8 + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn orders(config: &CardConfig) -> Vec<(SensorType, u8)> {
        config
            .sensors()
            .iter()
            .map(|s| (s.sensor_type, s.order))
            .collect()
    }

    #[test]
    fn test_default_slots() {
        let config = CardConfig::default();
        assert_eq!(
            orders(&config),
            vec![
                (SensorType::Moisture, 1),
                (SensorType::Light, 2),
                (SensorType::Temperature, 3),
                (SensorType::Nutrition, 4),
                (SensorType::Salinity, 5),
            ]
        );
        assert!(!config.is_enabled(SensorType::Salinity));
        assert_eq!(config.enabled_count(), 4);
        assert_eq!(config.battery_threshold, 10);
    }

    #[test]
    fn test_with_order_swaps() {
        let config = CardConfig::default();
        let edited = config.with_order(SensorType::Temperature, 1).unwrap();

        assert_eq!(edited.order_of(SensorType::Temperature), 1);
        assert_eq!(edited.order_of(SensorType::Moisture), 3);
        assert_eq!(edited.order_of(SensorType::Light), 2);

        // The source config is untouched
        assert_eq!(config.order_of(SensorType::Temperature), 3);
    }

    #[test]
    fn test_every_single_order_edit_keeps_orders_distinct() {
        let config = CardConfig::default().with_enabled(SensorType::Salinity, true);
        for sensor in SensorType::iter() {
            for order in 1..=SENSOR_SLOTS {
                let edited = config.with_order(sensor, order).unwrap();
                let distinct: HashSet<u8> = edited.enabled_sensors().map(|s| s.order).collect();
                assert_eq!(distinct.len(), edited.enabled_count(), "{sensor} -> {order}");
                assert_eq!(edited.order_of(sensor), order);
            }
        }
    }

    #[test]
    fn test_with_order_rejects_out_of_range() {
        let config = CardConfig::default();
        assert_eq!(
            config.with_order(SensorType::Light, 0),
            Err(CardError::OrderOutOfRange { order: 0, max: 5 })
        );
        assert!(config.with_order(SensorType::Light, 6).is_err());
    }

    #[test]
    fn test_with_moved_sensor() {
        let config = CardConfig::default();
        let moved = config.with_moved_sensor(4, 0).unwrap();
        assert_eq!(
            orders(&moved),
            vec![
                (SensorType::Salinity, 1),
                (SensorType::Moisture, 2),
                (SensorType::Light, 3),
                (SensorType::Temperature, 4),
                (SensorType::Nutrition, 5),
            ]
        );

        assert_eq!(
            config.with_moved_sensor(0, 5),
            Err(CardError::PositionOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn test_hiding_last_sensor_shows_all() {
        let mut config = CardConfig::default();
        for sensor in [
            SensorType::Light,
            SensorType::Moisture,
            SensorType::Temperature,
        ] {
            config = config.with_enabled(sensor, false);
        }
        assert_eq!(config.enabled_count(), 1);

        let config = config.with_enabled(SensorType::Nutrition, false);
        assert_eq!(config.enabled_count(), 5);
    }

    #[test]
    fn test_with_ordered_sensors_fills_missing() {
        let config = CardConfig::default()
            .with_ordered_sensors(vec![(SensorType::Nutrition, true), (SensorType::Light, false)]);
        assert_eq!(
            orders(&config),
            vec![
                (SensorType::Nutrition, 1),
                (SensorType::Light, 2),
                (SensorType::Moisture, 3),
                (SensorType::Temperature, 4),
                (SensorType::Salinity, 5),
            ]
        );
        assert_eq!(config.enabled_count(), 1);
    }

    #[test]
    fn test_battery_threshold_capped() {
        assert_eq!(
            CardConfig::default()
                .with_battery_threshold(250)
                .battery_threshold,
            100
        );
    }
}
