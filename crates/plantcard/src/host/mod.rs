//! Host platform model.
//!
//! The card never reaches into ambient globals. It is handed a read-only [`StateProvider`]
//! (entity states and the entity registry) and a [`DeviceRegistry`] on every state push.
//! [`HassSnapshot`] implements both for tests and the CLI.

mod registry;
mod snapshot;
mod state;

use std::path::PathBuf;

pub use registry::Device;
pub use registry::RegistryEntry;
pub use snapshot::HassSnapshot;
pub use state::EntityAttributes;
pub use state::EntityState;
pub use state::UNKNOWN_STATE;

use crate::classify::DeviceClass;
use crate::classify::EntityDescriptor;

/// Errors raised while talking to the host
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("device '{0}' not found in the device registry")]
    DeviceNotFound(String),

    #[error("device '{0}' has no name")]
    UnnamedDevice(String),

    #[error("Failed to read '{}': {error}", path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Failed to parse '{}': {error}", path.display())]
    Parse {
        path: PathBuf,
        error: serde_json::Error,
    },
}

/// Read-only view of entity states and the entity registry.
pub trait StateProvider {
    fn state(&self, entity_id: &str) -> Option<&EntityState>;

    fn registry_entry(&self, entity_id: &str) -> Option<&RegistryEntry>;

    /// IDs of every entity registered to `device_id`.
    fn device_entity_ids(&self, device_id: &str) -> Vec<String>;

    /// Describe the entities of a device for classification.
    ///
    /// Entities without a current state are skipped: the host has not loaded them yet.
    fn describe_device(&self, device_id: &str) -> Vec<EntityDescriptor> {
        self.device_entity_ids(device_id)
            .into_iter()
            .filter_map(|entity_id| {
                let state = self.state(&entity_id)?;
                let translation_key = self
                    .registry_entry(&entity_id)
                    .and_then(|entry| entry.translation_key.clone());

                Some(EntityDescriptor {
                    device_class: state
                        .attributes
                        .device_class
                        .clone()
                        .map(DeviceClass::from),
                    unit_of_measurement: state.attributes.unit_of_measurement.clone(),
                    translation_key,
                    entity_id,
                })
            })
            .collect()
    }
}

/// Read-only view of the host's device registry.
pub trait DeviceRegistry {
    /// Display name of a device.
    fn device_name(&self, device_id: &str) -> Result<String, HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> HassSnapshot {
        let mut hass = HassSnapshot::new();
        hass.add_device("dev1", Device::new("Ficus"));
        hass.add_entity(
            "sensor.ficus_moisture",
            RegistryEntry::for_device("dev1"),
            EntityState::new("41")
                .with_device_class("moisture")
                .with_unit("%"),
        );
        hass.add_entity(
            "sensor.ficus_moisture_state",
            RegistryEntry::for_device("dev1").with_translation_key("moisture_status"),
            EntityState::new("low").with_device_class("enum"),
        );
        hass.add_entity(
            "sensor.other_moisture",
            RegistryEntry::for_device("dev2"),
            EntityState::new("80").with_device_class("moisture"),
        );
        // Registered but the host has not pushed a state yet
        hass.entities.insert(
            "sensor.ficus_light".to_string(),
            RegistryEntry::for_device("dev1"),
        );
        hass
    }

    #[test]
    fn test_describe_device_filters_by_device() {
        let hass = snapshot();
        let entities = hass.describe_device("dev1");

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].entity_id, "sensor.ficus_moisture");
        assert_eq!(entities[0].device_class, Some(DeviceClass::Moisture));
        assert_eq!(entities[0].unit_of_measurement.as_deref(), Some("%"));
        assert_eq!(entities[1].entity_id, "sensor.ficus_moisture_state");
        assert_eq!(
            entities[1].translation_key.as_deref(),
            Some("moisture_status")
        );
    }

    #[test]
    fn test_device_name_lookup() {
        let hass = snapshot();
        assert_eq!(hass.device_name("dev1").unwrap(), "Ficus");
        assert!(matches!(
            hass.device_name("missing"),
            Err(HostError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_snapshot_from_json() {
        let hass: HassSnapshot = serde_json::from_str(
            r#"{
                "states": {"sensor.a": {"state": 12, "attributes": {"device_class": "battery"}}},
                "entities": {"sensor.a": {"device_id": "d"}},
                "devices": {"d": {"name": "Basil"}}
            }"#,
        )
        .unwrap();

        assert_eq!(hass.state("sensor.a").unwrap().state, "12");
        assert_eq!(hass.device_entity_ids("d"), vec!["sensor.a".to_string()]);
        assert_eq!(hass.device_name("d").unwrap(), "Basil");
    }

    #[test]
    fn test_set_state_keeps_attributes() {
        let mut hass = snapshot();
        hass.set_state("sensor.ficus_moisture", "12");
        let state = hass.state("sensor.ficus_moisture").unwrap();
        assert_eq!(state.state, "12");
        assert_eq!(state.unit(), "%");
    }
}
