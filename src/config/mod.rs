// Configuration layer
pub mod settings;

pub use settings::{Settings, SettingsError};
