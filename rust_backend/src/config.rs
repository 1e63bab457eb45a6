//! Configuration file support.
//!
//! Settings are read from a TOML file. Every section is optional and falls back
//! to the defaults below:
//!
//! ```toml
//! [grid]
//! slot_size_minutes = 15
//! week_starts_on = "monday"
//!
//! [export]
//! rate_tier = "national"
//! break_on_day = true
//!
//! [session]
//! store = "file"
//! path = "invoicing-session.json"
//!
//! [calendar]
//! public_holidays = ["2026-12-25"]
//! ```

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::calendar::{ListedHolidays, WeekendClassifier};
use crate::codes::RateTier;
use crate::db::factory::StoreType;
use crate::error::{TimesheetError, TimesheetResult};
use crate::grid::{DayIndex, SlotSize};

pub const CONFIG_FILE_NAME: &str = "timesheet.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimesheetConfig {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    #[serde(default = "default_slot_size_minutes")]
    pub slot_size_minutes: u32,
    #[serde(default = "default_week_starts_on")]
    pub week_starts_on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_rate_tier")]
    pub rate_tier: String,
    #[serde(default = "default_break_on_day")]
    pub break_on_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_store")]
    pub store: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(default)]
    pub public_holidays: Vec<NaiveDate>,
}

fn default_slot_size_minutes() -> u32 {
    SlotSize::DEFAULT.minutes()
}

fn default_week_starts_on() -> String {
    "monday".to_string()
}

fn default_rate_tier() -> String {
    "national".to_string()
}

fn default_break_on_day() -> bool {
    true
}

fn default_store() -> String {
    "memory".to_string()
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            slot_size_minutes: default_slot_size_minutes(),
            week_starts_on: default_week_starts_on(),
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            rate_tier: default_rate_tier(),
            break_on_day: default_break_on_day(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            store: default_store(),
            path: None,
        }
    }
}

impl TimesheetConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(TimesheetConfig)` if the file was read, parsed and validated
    /// * `Err(TimesheetError::ConfigurationError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> TimesheetResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TimesheetError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> TimesheetResult<Self> {
        let config: TimesheetConfig = toml::from_str(content).map_err(|e| {
            TimesheetError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `timesheet.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> TimesheetResult<Self> {
        let search_paths = [
            PathBuf::from(CONFIG_FILE_NAME),
            Path::new("rust_backend").join(CONFIG_FILE_NAME),
            Path::new("..").join(CONFIG_FILE_NAME),
        ];

        for path in &search_paths {
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
        }

        Err(TimesheetError::ConfigurationError(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Checks every setting converts to its typed value.
    pub fn validate(&self) -> TimesheetResult<()> {
        self.slot_size()?;
        self.week_starts_on()?;
        self.rate_tier()?;
        self.store_type()?;
        Ok(())
    }

    pub fn slot_size(&self) -> TimesheetResult<SlotSize> {
        SlotSize::new(self.grid.slot_size_minutes)
            .map_err(|e| TimesheetError::ConfigurationError(e.to_string()))
    }

    pub fn week_starts_on(&self) -> TimesheetResult<DayIndex> {
        Weekday::from_str(&self.grid.week_starts_on)
            .map(DayIndex::from_weekday)
            .map_err(|_| {
                TimesheetError::ConfigurationError(format!(
                    "Unknown week start day: {}",
                    self.grid.week_starts_on
                ))
            })
    }

    pub fn rate_tier(&self) -> TimesheetResult<RateTier> {
        RateTier::from_str(&self.export.rate_tier).map_err(TimesheetError::ConfigurationError)
    }

    pub fn break_on_day(&self) -> bool {
        self.export.break_on_day
    }

    pub fn store_type(&self) -> TimesheetResult<StoreType> {
        StoreType::from_str(&self.session.store).map_err(TimesheetError::ConfigurationError)
    }

    /// Weekend classification plus the configured public holidays.
    pub fn classifier(&self) -> ListedHolidays<WeekendClassifier> {
        ListedHolidays::new(
            self.calendar.public_holidays.iter().copied(),
            WeekendClassifier,
        )
    }
}
