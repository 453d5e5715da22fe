use serde::Serialize;

use crate::config::CardConfig;
use crate::config::DisplayMode;
use crate::config::SensorType;
use crate::layout::SensorLayout;
use crate::present::BatteryDisplay;
use crate::present::ColorToken;
use crate::present::PlantStatus;
use crate::present::SensorDisplay;

/// Header of the placeholder shown before a device is picked.
pub const UNCONFIGURED_HEADER: &str = "FYTA Plant Card";

/// Body of the placeholder shown before a device is picked.
pub const UNCONFIGURED_MESSAGE: &str = "Please select a FYTA device in the card configuration.";

/// What the card draws after a state push.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum CardView {
    /// No device selected yet
    Unconfigured { header: String, message: String },
    Plant(PlantView),
}

impl CardView {
    pub fn unconfigured() -> Self {
        CardView::Unconfigured {
            header: UNCONFIGURED_HEADER.to_string(),
            message: UNCONFIGURED_MESSAGE.to_string(),
        }
    }

    /// Event for a click on `target`. `None` when nothing is bound to it.
    pub fn click(&self, target: ClickTarget) -> Option<CardEvent> {
        match self {
            CardView::Unconfigured { .. } => None,
            CardView::Plant(plant) => plant.click(target),
        }
    }
}

/// Card for a bound device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantView {
    pub title: String,
    pub title_color: ColorToken,
    pub plant_status: PlantStatus,

    /// Plant status entity, opened from the image, title and scientific name
    pub status_entity: Option<String>,

    pub image: Option<String>,
    pub scientific_name: String,
    pub display_mode: DisplayMode,

    /// Only present while the battery is at or below the configured threshold
    pub battery: Option<BatteryDisplay>,

    pub sensors: SensorLayout<SensorDisplay>,
}

impl PlantView {
    pub fn click(&self, target: ClickTarget) -> Option<CardEvent> {
        let entity_id = match target {
            ClickTarget::Image | ClickTarget::Title | ClickTarget::ScientificName => {
                self.status_entity.clone()
            }
            ClickTarget::Battery => self.battery.as_ref().map(|b| b.entity_id.clone()),
            ClickTarget::Sensor(sensor_type) => self
                .sensor(sensor_type)
                .map(|display| display.entity_id.clone()),
        }?;
        Some(CardEvent::MoreInfo { entity_id })
    }

    /// The row shown for `sensor_type`, wherever it sits in the grid.
    pub fn sensor(&self, sensor_type: SensorType) -> Option<&SensorDisplay> {
        self.sensors
            .left
            .iter()
            .chain(&self.sensors.right)
            .chain(&self.sensors.full_width)
            .find(|display| display.sensor_type == sensor_type)
    }
}

/// Clickable parts of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Image,
    Title,
    ScientificName,
    Battery,
    Sensor(SensorType),
}

/// Events the card and editor send to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CardEvent {
    /// Open the host's detail dialog for an entity
    MoreInfo { entity_id: String },
    /// The editor produced a new config
    ConfigChanged { config: CardConfig },
}

/// Grid sizing hints for sections-style dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutOptions {
    pub grid_rows: u8,
    pub grid_columns: u8,
    pub grid_min_rows: u8,
    pub grid_min_columns: u8,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            grid_rows: 3,
            grid_columns: 4,
            grid_min_rows: 3,
            grid_min_columns: 2,
        }
    }
}
