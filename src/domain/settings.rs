use crate::domain::models::{ConnectionGating, PrimarySelection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String, // "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_true")]
    pub file_logging_enabled: bool,
    #[serde(default = "default_true")]
    pub console_logging_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_prefix")]
    pub file_name_prefix: String,
    #[serde(default = "default_true")]
    pub show_file_line: bool,
    #[serde(default = "default_false")]
    pub show_thread_ids: bool,
    #[serde(default = "default_true")]
    pub show_target: bool,
    #[serde(default = "default_true")]
    pub ansi_colors: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String, // "daily", "hourly", "minutely", "never"
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            file_logging_enabled: default_true(),
            console_logging_enabled: default_true(),
            log_dir: default_log_dir(),
            file_name_prefix: default_prefix(),
            show_file_line: default_true(),
            show_thread_ids: default_false(),
            show_target: default_true(),
            ansi_colors: default_true(),
            rotation: default_rotation(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_log_dir() -> String {
    "logs".to_string()
}
fn default_prefix() -> String {
    "bt_joystick_remote".to_string()
}
fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // Logging Settings
    #[serde(default)]
    pub log_settings: LogSettings,

    // Paired device
    #[serde(default)]
    pub device_address: Option<String>,
    #[serde(default = "default_device_name")]
    pub device_name: String,

    // Emission
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub connection_gating: ConnectionGating,
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,

    // Touch surface
    #[serde(default)]
    pub primary_selection: PrimarySelection,
    #[serde(default = "default_max_contacts")]
    pub max_contacts: usize,
    #[serde(default = "default_false")]
    pub remeasure_on_resize: bool,
    #[serde(default = "default_joystick_radius")]
    pub joystick_radius: f32,

    // Advanced BLE Settings
    #[serde(default = "default_service_uuid")]
    pub ble_service_uuid: String,
    #[serde(default = "default_write_uuid")]
    pub ble_write_char_uuid: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_settings: LogSettings::default(),
            device_address: None,
            device_name: default_device_name(),
            tick_interval_ms: default_tick_interval_ms(),
            connection_gating: ConnectionGating::default(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
            primary_selection: PrimarySelection::default(),
            max_contacts: default_max_contacts(),
            remeasure_on_resize: false,
            joystick_radius: default_joystick_radius(),
            ble_service_uuid: default_service_uuid(),
            ble_write_char_uuid: default_write_uuid(),
        }
    }
}

fn default_device_name() -> String {
    "BT Remote".to_string()
}
fn default_tick_interval_ms() -> u64 {
    250
}
fn default_outbound_queue_capacity() -> usize {
    8
}
fn default_max_contacts() -> usize {
    crate::domain::touch::DEFAULT_MAX_CONTACTS
}
fn default_joystick_radius() -> f32 {
    60.0
}
fn default_service_uuid() -> String {
    crate::infrastructure::bluetooth::protocol::SERIAL_SERVICE_UUID.to_string()
}
fn default_write_uuid() -> String {
    crate::infrastructure::bluetooth::protocol::SERIAL_WRITE_CHAR_UUID.to_string()
}

pub struct SettingsService {
    settings: Settings,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new() -> anyhow::Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Ok(Self::with_path(settings_path))
    }

    /// Load from an explicit file, falling back to defaults when it is missing or invalid
    pub fn with_path(settings_path: PathBuf) -> Self {
        let settings = match Self::load_from_file(&settings_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!(
                    "Using default settings ({}): {}",
                    settings_path.display(),
                    e
                );
                Settings::default()
            }
        };

        Self {
            settings,
            settings_path,
        }
    }

    fn get_settings_path() -> anyhow::Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        path.push("BTJoystickRemote");
        fs::create_dir_all(&path)?;
        path.push("settings.json");
        Ok(path)
    }

    fn load_from_file(path: &Path) -> anyhow::Result<Settings> {
        let contents = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.settings_path, json)?;
        Ok(())
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    pub fn set_device(&mut self, address: String, name: String) -> anyhow::Result<()> {
        self.settings.device_address = Some(address);
        self.settings.device_name = name;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "bt_joystick_remote_{}_{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_interval_ms, 250);
        assert_eq!(settings.connection_gating, ConnectionGating::Legacy);
        assert_eq!(settings.primary_selection, PrimarySelection::FirstSurviving);
        assert_eq!(settings.joystick_radius, 60.0);
        assert!(settings.device_address.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "device_address": "00:11:22:33:44:55" }"#).unwrap();
        assert_eq!(settings.device_address.as_deref(), Some("00:11:22:33:44:55"));
        assert_eq!(settings.tick_interval_ms, 250);
        assert_eq!(settings.log_settings.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let service = SettingsService::with_path(temp_settings_path("missing"));
        assert_eq!(service.get().max_contacts, 10);
    }

    #[test]
    fn test_save_and_reload() {
        let path = temp_settings_path("reload");
        let mut service = SettingsService::with_path(path.clone());
        service.get_mut().primary_selection = PrimarySelection::FixedId(0);
        service
            .set_device("AA:BB:CC:DD:EE:FF".to_string(), "Rover".to_string())
            .unwrap();

        let reloaded = SettingsService::with_path(path.clone());
        assert_eq!(reloaded.get().device_name, "Rover");
        assert_eq!(
            reloaded.get().device_address.as_deref(),
            Some("AA:BB:CC:DD:EE:FF")
        );
        assert_eq!(reloaded.get().primary_selection, PrimarySelection::FixedId(0));
        let _ = fs::remove_file(path);
    }
}
