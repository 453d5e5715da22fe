use std::collections::BTreeMap;

use serde::Serialize;
use strum::AsRefStr;
use strum::Display;
use strum::EnumIter;
use strum::EnumString;

/// Semantic purpose of one of the bound device's entities.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Role {
    Battery,
    Light,
    Moisture,
    Temperature,
    Salinity,
    LightStatus,
    MoistureStatus,
    TemperatureStatus,
    SalinityStatus,
    NutrientsStatus,
    PlantStatus,
    ScientificName,
    PlantImage,
    FertilizedLast,
    FertilizedNext,
}

impl Role {
    /// Map an enum entity's translation key (e.g. "light_status") to its status role.
    pub fn from_translation_key(key: &str) -> Option<Self> {
        match key {
            "plant_status" => Some(Self::PlantStatus),
            "light_status" => Some(Self::LightStatus),
            "moisture_status" => Some(Self::MoistureStatus),
            "salinity_status" => Some(Self::SalinityStatus),
            "temperature_status" => Some(Self::TemperatureStatus),
            "nutrients_status" => Some(Self::NutrientsStatus),
            _ => None,
        }
    }
}

/// Which entity plays which role for the bound device.
///
/// At most one entity per role. When the host reports two entities for the same role the
/// later one wins; the card tolerates this rather than trying to pick the "right" one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct EntityRoleMap {
    roles: BTreeMap<Role, String>,
}

impl EntityRoleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `entity_id` to `role`, returning the entity it displaced, if any.
    pub fn assign(&mut self, role: Role, entity_id: impl Into<String>) -> Option<String> {
        self.roles.insert(role, entity_id.into())
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &str)> {
        self.roles.iter().map(|(role, id)| (*role, id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role::ScientificName.to_string(), "scientificName");
        assert_eq!(Role::NutrientsStatus.as_ref(), "nutrientsStatus");
        assert_eq!(Role::from_str("fertilizedNext").unwrap(), Role::FertilizedNext);
    }

    #[test]
    fn test_every_status_role_has_a_translation_key() {
        let status_roles: Vec<Role> = Role::iter()
            .filter(|r| r.as_ref().ends_with("Status"))
            .collect();
        assert_eq!(status_roles.len(), 6);

        for key in [
            "plant_status",
            "light_status",
            "moisture_status",
            "salinity_status",
            "temperature_status",
            "nutrients_status",
        ] {
            assert!(Role::from_translation_key(key).is_some(), "{key}");
        }
        assert_eq!(Role::from_translation_key("battery_status"), None);
    }

    #[test]
    fn test_assign_replaces() {
        let mut roles = EntityRoleMap::new();
        assert_eq!(roles.assign(Role::Battery, "sensor.a"), None);
        assert_eq!(
            roles.assign(Role::Battery, "sensor.b"),
            Some("sensor.a".to_string())
        );
        assert_eq!(roles.get(Role::Battery), Some("sensor.b"));
        assert_eq!(roles.len(), 1);
    }
}
