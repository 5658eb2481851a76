// Settings service module
// Loads and stores engine settings as TOML

mod service;

pub use service::SettingsService;
