use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::journal::{DayClock, DayRecordStore, FileBackend, RegistryError, SectionRegistry};

/// Distinguishes runtime behavior for different stages of the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }

    /// Log level used when `DAYBOOK_LOG_LEVEL` is unset.
    pub const fn default_log_level(self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Test => "warn",
            Self::Production => "info",
        }
    }
}

/// Which calendar a day key is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    Utc,
    Local,
}

impl DayBoundary {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            _ => Err(ConfigError::InvalidDayBoundary(value.to_string())),
        }
    }

    pub fn clock(self) -> DayClock {
        match self {
            Self::Utc => DayClock::Utc,
            Self::Local => DayClock::Local,
        }
    }
}

/// Top-level configuration for the journal.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub storage: StorageConfig,
    pub journal: JournalConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("DAYBOOK_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data_dir = env::var("DAYBOOK_DATA_DIR").unwrap_or_else(|_| ".daybook".to_string());
        let key = env::var("DAYBOOK_STORAGE_KEY").unwrap_or_else(|_| "trackerData".to_string());
        if key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ConfigError::InvalidStorageKey(key));
        }

        let day_boundary = DayBoundary::parse(
            &env::var("DAYBOOK_DAY_BOUNDARY").unwrap_or_else(|_| "utc".to_string()),
        )?;
        let sections_path = env::var("DAYBOOK_SECTIONS")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let log_level = env::var("DAYBOOK_LOG_LEVEL")
            .unwrap_or_else(|_| environment.default_log_level().to_string());

        Ok(Self {
            environment,
            storage: StorageConfig {
                data_dir: PathBuf::from(data_dir),
                key,
            },
            journal: JournalConfig {
                day_boundary,
                sections_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Location of the persisted journal.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub key: String,
}

impl StorageConfig {
    pub fn backend(&self) -> FileBackend {
        FileBackend::new(&self.data_dir, &self.key)
    }

    pub fn open_store(&self) -> DayRecordStore<FileBackend> {
        DayRecordStore::new(self.backend())
    }
}

/// Questionnaire and day-key settings.
#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub day_boundary: DayBoundary,
    pub sections_path: Option<PathBuf>,
}

impl JournalConfig {
    /// The configured registry, or the built-in questionnaire when none is set.
    pub fn registry(&self) -> Result<SectionRegistry, RegistryError> {
        match &self.sections_path {
            Some(path) => SectionRegistry::from_json_path(path),
            None => Ok(SectionRegistry::standard()),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyStorageKey,
    InvalidStorageKey(String),
    InvalidDayBoundary(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyStorageKey => write!(f, "DAYBOOK_STORAGE_KEY must not be empty"),
            ConfigError::InvalidStorageKey(key) => {
                write!(f, "DAYBOOK_STORAGE_KEY '{}' must be a plain file stem", key)
            }
            ConfigError::InvalidDayBoundary(value) => {
                write!(f, "DAYBOOK_DAY_BOUNDARY '{}' must be 'utc' or 'local'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
