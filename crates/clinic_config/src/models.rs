// --- File: crates/clinic_config/src/models.rs ---

use clinic_slots::{SlotError, SlotPolicy, TimeSlot};
use serde::{Deserialize, Serialize};

// --- Backend API Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String, // e.g. https://clinic.example.com/api, via CLINIC__API__BASE_URL
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// --- Clinic Calendar Config ---
// Operating hours are kept as "HH:MM" strings so they read naturally in TOML.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ClinicConfig {
    pub time_zone: String, // IANA name, e.g. America/Guayaquil
    pub open_time: String,
    pub close_time: String,
    pub slot_minutes: u16,
    pub include_closing_slot: bool,
    pub booking_horizon_months: u32,
    pub weekend_contact_channel: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            open_time: "08:00".to_string(),
            close_time: "20:00".to_string(),
            slot_minutes: 30,
            include_closing_slot: false,
            booking_horizon_months: 3,
            weekend_contact_channel: "WhatsApp".to_string(),
        }
    }
}

impl ClinicConfig {
    /// Builds the slot policy shared by slot generation and validation.
    pub fn slot_policy(&self) -> Result<SlotPolicy, SlotError> {
        SlotPolicy::new(
            TimeSlot::parse(&self.open_time)?,
            TimeSlot::parse(&self.close_time)?,
            self.slot_minutes,
            self.include_closing_slot,
            self.weekend_contact_channel.clone(),
        )
    }
}

// --- Session Persistence Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub store_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: ".clinic_session.json".to_string(),
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub clinic: ClinicConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
