//! The plant card.
//!
//! [`PlantCard`] holds the bound config and the role map of the bound device. The host calls
//! [`PlantCard::set_config`] when the user saves the card and [`PlantCard::update`] on every
//! state push; each push returns a fresh [`CardView`].

pub mod editor;
mod view;

pub use editor::CardEditor;
pub use view::CardEvent;
pub use view::CardView;
pub use view::ClickTarget;
pub use view::LayoutOptions;
pub use view::PlantView;
pub use view::UNCONFIGURED_HEADER;
pub use view::UNCONFIGURED_MESSAGE;

use chrono::DateTime;
use chrono::FixedOffset;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::classify::classify;
use crate::classify::EntityRoleMap;
use crate::classify::Role;
use crate::config::normalize;
use crate::config::CardConfig;
use crate::config::Diagnostic;
use crate::config::DisplayMode;
use crate::config::SensorType;
use crate::host::DeviceRegistry;
use crate::host::EntityState;
use crate::host::StateProvider;
use crate::layout::layout;
use crate::present::battery_display;
use crate::present::derive_nutrition;
use crate::present::derive_sensor;
use crate::present::Clock;
use crate::present::MeasurementStatus;
use crate::present::NutritionReading;
use crate::present::PlantStatus;
use crate::present::SensorDisplay;
use crate::present::SensorReading;
use crate::present::SystemClock;
use crate::CardError;

/// Size of a compact card, in dashboard rows.
const COMPACT_CARD_SIZE: f32 = 3.0;

/// Size of a full card showing two sensors or fewer.
const BASE_CARD_SIZE: f32 = 4.0;

/// Look up the display name of `device_id` for use as a card title.
///
/// Lookup failures are logged and yield `None`; the title then stays blank.
pub(crate) fn device_title(registry: &impl DeviceRegistry, device_id: &str) -> Option<String> {
    match registry.device_name(device_id) {
        Ok(name) => Some(name),
        Err(e) => {
            warn!("Could not set card title from device name: {}", e);
            None
        }
    }
}

/// A plant card bound to (at most) one device.
#[derive(Debug)]
pub struct PlantCard<C: Clock = SystemClock> {
    config: Option<CardConfig>,
    roles: Option<EntityRoleMap>,
    clock: C,
}

impl PlantCard<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for PlantCard<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> PlantCard<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            config: None,
            roles: None,
            clock,
        }
    }

    /// Config a newly added card starts with.
    pub fn stub_config() -> CardConfig {
        CardConfig::stub()
    }

    pub fn layout_options() -> LayoutOptions {
        LayoutOptions::default()
    }

    /// Bind a new config, replacing the old one.
    ///
    /// Switching to another device drops the role map; the next push classifies again.
    pub fn set_config(&mut self, raw: &Value) -> Result<Vec<Diagnostic>, CardError> {
        let (config, diagnostics) = normalize(raw)?;

        let old_device = self.config.as_ref().map(|c| c.device_id.as_str());
        if old_device != Some(config.device_id.as_str()) {
            if !config.device_id.is_empty() {
                info!("Binding card to device '{}'", config.device_id);
            }
            self.roles = None;
        }

        self.config = Some(config);
        Ok(diagnostics)
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    /// Role map of the bound device, once the first push classified it.
    pub fn roles(&self) -> Option<&EntityRoleMap> {
        self.roles.as_ref()
    }

    /// Height hint: compact cards are fixed, full cards grow half a row per sensor beyond two.
    pub fn card_size(&self) -> f32 {
        let Some(config) = &self.config else {
            return BASE_CARD_SIZE;
        };
        if config.display_mode == DisplayMode::Compact {
            return COMPACT_CARD_SIZE;
        }
        let extra = config.enabled_count().saturating_sub(2);
        BASE_CARD_SIZE + extra as f32 * 0.5
    }

    /// Handle a state push.
    pub fn update<H: StateProvider + DeviceRegistry>(&mut self, host: &H) -> CardView {
        let Some(config) = self.config.as_mut() else {
            return CardView::unconfigured();
        };
        if config.device_id.is_empty() {
            return CardView::unconfigured();
        }

        if config.title.is_empty() {
            if let Some(title) = device_title(host, &config.device_id) {
                debug!("Using device name '{}' as card title", title);
                *config = config.with_title(title);
            }
        }

        let roles = self.roles.get_or_insert_with(|| {
            let roles = classify(&host.describe_device(&config.device_id));
            info!(
                "Classified {} entities of device '{}'",
                roles.len(),
                config.device_id
            );
            roles
        });

        CardView::Plant(plant_view(config, roles, host, self.clock.start_of_today()))
    }
}

/// Value and status roles of a measuring sensor.
fn sensor_roles(sensor_type: SensorType) -> Option<(Role, Role)> {
    match sensor_type {
        SensorType::Light => Some((Role::Light, Role::LightStatus)),
        SensorType::Moisture => Some((Role::Moisture, Role::MoistureStatus)),
        SensorType::Temperature => Some((Role::Temperature, Role::TemperatureStatus)),
        SensorType::Salinity => Some((Role::Salinity, Role::SalinityStatus)),
        SensorType::Nutrition => None,
    }
}

fn state_of<'a>(
    host: &'a impl StateProvider,
    roles: &'a EntityRoleMap,
    role: Role,
) -> Option<(&'a str, &'a EntityState)> {
    let entity_id = roles.get(role)?;
    Some((entity_id, host.state(entity_id)?))
}

fn plant_view(
    config: &CardConfig,
    roles: &EntityRoleMap,
    host: &impl StateProvider,
    start_of_today: DateTime<FixedOffset>,
) -> PlantView {
    let plant_status = state_of(host, roles, Role::PlantStatus)
        .map(|(_, state)| PlantStatus::from_state(&state.state))
        .unwrap_or_default();
    let image = state_of(host, roles, Role::PlantImage)
        .and_then(|(_, state)| state.attributes.entity_picture.clone());
    let scientific_name = state_of(host, roles, Role::ScientificName)
        .map(|(_, state)| state.state.clone())
        .unwrap_or_default();
    let battery = state_of(host, roles, Role::Battery)
        .and_then(|(entity_id, state)| battery_display(entity_id, state, config.battery_threshold));

    let rows = config.enabled_sensors().filter_map(|slot| {
        sensor_row(slot.sensor_type, roles, host, start_of_today)
            .map(|display| (slot.sensor_type, slot.order, display))
    });

    PlantView {
        title: config.title.clone(),
        title_color: plant_status.color(),
        plant_status,
        status_entity: roles.get(Role::PlantStatus).map(str::to_string),
        image,
        scientific_name,
        display_mode: config.display_mode,
        battery,
        sensors: layout(rows),
    }
}

/// Row for an enabled sensor, or `None` when the device has no entity for it.
fn sensor_row(
    sensor_type: SensorType,
    roles: &EntityRoleMap,
    host: &impl StateProvider,
    start_of_today: DateTime<FixedOffset>,
) -> Option<SensorDisplay> {
    let Some((value_role, status_role)) = sensor_roles(sensor_type) else {
        let entity_id = roles.get(Role::NutrientsStatus)?;
        let reading = NutritionReading {
            status: host
                .state(entity_id)
                .map(|state| MeasurementStatus::from_state(&state.state)),
            last_fertilized: state_of(host, roles, Role::FertilizedLast)
                .map(|(_, state)| state.state.clone()),
            next_fertilization: state_of(host, roles, Role::FertilizedNext)
                .map(|(_, state)| state.state.clone()),
        };
        return Some(derive_nutrition(entity_id, &reading, start_of_today));
    };

    let Some((entity_id, state)) = state_of(host, roles, value_role) else {
        debug!("No {} entity, skipping its row", sensor_type);
        return None;
    };
    let status = state_of(host, roles, status_role).map(|(_, state)| state);
    Some(derive_sensor(
        sensor_type,
        entity_id,
        &SensorReading::from_states(state, status),
    ))
}
