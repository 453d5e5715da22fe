use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use super::registry::Device;
use super::registry::RegistryEntry;
use super::state::EntityState;
use super::DeviceRegistry;
use super::HostError;
use super::StateProvider;

/// An immutable copy of everything the host exposes to the card.
///
/// Maps are ordered so that classification over a snapshot is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HassSnapshot {
    #[serde(default)]
    pub states: BTreeMap<String, EntityState>,

    #[serde(default)]
    pub entities: BTreeMap<String, RegistryEntry>,

    #[serde(default)]
    pub devices: BTreeMap<String, Device>,
}

impl HassSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from a JSON file (the shape of the frontend `hass` object).
    pub fn from_file(path: &Path) -> Result<Self, HostError> {
        let content = std::fs::read_to_string(path).map_err(|error| HostError::Io {
            path: path.to_path_buf(),
            error,
        })?;

        serde_json::from_str(&content).map_err(|error| HostError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    pub fn add_device(&mut self, device_id: impl Into<String>, device: Device) {
        self.devices.insert(device_id.into(), device);
    }

    /// Register an entity with the device it belongs to and its current state.
    pub fn add_entity(
        &mut self,
        entity_id: impl Into<String>,
        entry: RegistryEntry,
        state: EntityState,
    ) {
        let entity_id = entity_id.into();
        self.entities.insert(entity_id.clone(), entry);
        self.states.insert(entity_id, state);
    }

    /// Replace the state of an entity, as the host does on every push.
    pub fn set_state(&mut self, entity_id: impl Into<String>, state: impl Into<String>) {
        let entity_id = entity_id.into();
        match self.states.get_mut(&entity_id) {
            Some(existing) => existing.state = state.into(),
            None => {
                self.states.insert(entity_id, EntityState::new(state));
            }
        }
    }
}

impl StateProvider for HassSnapshot {
    fn state(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }

    fn registry_entry(&self, entity_id: &str) -> Option<&RegistryEntry> {
        self.entities.get(entity_id)
    }

    fn device_entity_ids(&self, device_id: &str) -> Vec<String> {
        self.entities
            .iter()
            .filter(|(_, entry)| entry.device_id.as_deref() == Some(device_id))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl DeviceRegistry for HassSnapshot {
    fn device_name(&self, device_id: &str) -> Result<String, HostError> {
        let device = self
            .devices
            .get(device_id)
            .ok_or_else(|| HostError::DeviceNotFound(device_id.to_string()))?;

        device
            .display_name()
            .map(str::to_string)
            .ok_or_else(|| HostError::UnnamedDevice(device_id.to_string()))
    }
}
