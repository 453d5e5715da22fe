pub mod card;
pub mod classify;
pub mod config;
mod error;
pub mod host;
pub mod layout;
pub mod present;

pub use card::CardEditor;
pub use card::CardEvent;
pub use card::CardView;
pub use card::PlantCard;
pub use classify::classify;
pub use classify::EntityRoleMap;
pub use config::format_diagnostics;
pub use config::normalize;
pub use config::CardConfig;
pub use config::Diagnostic;
pub use error::CardError;
pub use host::DeviceRegistry;
pub use host::HassSnapshot;
pub use host::StateProvider;
pub use layout::layout;
