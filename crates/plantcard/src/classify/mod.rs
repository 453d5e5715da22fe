//! Entity classification.
//!
//! Assigns each entity of the bound device to the role it plays on the card (battery sensor,
//! moisture status, next fertilization date, ...). Classification is best effort over an
//! open-ended device schema: entities that match no rule are skipped, never rejected.

mod descriptor;
mod role;

pub use descriptor::DeviceClass;
pub use descriptor::EntityDescriptor;
pub use role::EntityRoleMap;
pub use role::Role;

use tracing::debug;
use tracing::trace;

/// Unit the FYTA integration reports light flux in. Light sensors have no device class.
pub const LIGHT_FLUX_UNIT: &str = "μmol/s⋅m²";

const IMAGE_PREFIX: &str = "image.";
const SCIENTIFIC_NAME_SUFFIX: &str = "_scientific_name";
const FERTILIZED_LAST_MARKERS: [&str; 2] = ["fertilize_last", "last_fertilized"];
const FERTILIZED_NEXT_MARKERS: [&str; 2] = ["fertilize_next", "next_fertilization"];

/// Classify a single entity. First matching rule wins.
pub fn classify_entity(entity: &EntityDescriptor) -> Option<Role> {
    let id = entity.entity_id.as_str();

    if id.starts_with(IMAGE_PREFIX) {
        return Some(Role::PlantImage);
    }
    if id.ends_with(SCIENTIFIC_NAME_SUFFIX) {
        return Some(Role::ScientificName);
    }

    match &entity.device_class {
        Some(DeviceClass::Battery) => Some(Role::Battery),
        Some(DeviceClass::Moisture) => Some(Role::Moisture),
        Some(DeviceClass::Temperature) => Some(Role::Temperature),
        Some(DeviceClass::Conductivity) => Some(Role::Salinity),
        None if entity.unit_of_measurement.as_deref() == Some(LIGHT_FLUX_UNIT) => Some(Role::Light),
        Some(DeviceClass::Date) => {
            if FERTILIZED_LAST_MARKERS.iter().any(|m| id.contains(m)) {
                Some(Role::FertilizedLast)
            } else if FERTILIZED_NEXT_MARKERS.iter().any(|m| id.contains(m)) {
                Some(Role::FertilizedNext)
            } else {
                None
            }
        }
        Some(DeviceClass::Enum) => entity
            .translation_key
            .as_deref()
            .and_then(Role::from_translation_key),
        _ => None,
    }
}

/// Build the role map for one device's entities.
pub fn classify(entities: &[EntityDescriptor]) -> EntityRoleMap {
    let mut roles = EntityRoleMap::new();

    for entity in entities {
        let Some(role) = classify_entity(entity) else {
            trace!("Ignoring unclassified entity {}", entity.entity_id);
            continue;
        };

        if let Some(previous) = roles.assign(role, entity.entity_id.clone()) {
            debug!(
                "Role {} reassigned from {} to {}",
                role, previous, entity.entity_id
            );
        }
    }

    debug!("Classified {} of {} entities", roles.len(), entities.len());
    roles
}
