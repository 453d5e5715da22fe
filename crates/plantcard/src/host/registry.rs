use serde::Deserialize;
use serde::Serialize;

/// Entity registry entry: which device an entity belongs to and how the integration labels it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub device_id: Option<String>,

    /// Integration-specific key, e.g. "moisture_status" for FYTA status enums
    pub translation_key: Option<String>,
}

impl RegistryEntry {
    pub fn for_device(device_id: impl Into<String>) -> Self {
        Self {
            device_id: Some(device_id.into()),
            translation_key: None,
        }
    }

    pub fn with_translation_key(mut self, key: impl Into<String>) -> Self {
        self.translation_key = Some(key.into());
        self
    }
}

/// A device in the host's device registry.
///
/// A device represents a physical plant sensor that owns one or more entities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Device {
    #[serde(default)]
    pub name: Option<String>,

    /// Name the user gave the device, preferred over `name` when set
    #[serde(default)]
    pub name_by_user: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            name_by_user: None,
        }
    }

    /// The name to show for this device, if it has one.
    pub fn display_name(&self) -> Option<&str> {
        self.name_by_user
            .as_deref()
            .or(self.name.as_deref())
            .filter(|n| !n.is_empty())
    }
}
