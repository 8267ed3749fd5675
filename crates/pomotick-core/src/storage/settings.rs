//! The persisted settings record.
//!
//! A flat record of user preferences:
//! - interval durations in minutes
//! - auto-advance between intervals
//! - dark mode (stored for the presentation layer, unused by the timer)
//!
//! The timer never reads this record itself. The integrating layer calls
//! [`Settings::apply_to`] after loading and [`Settings::capture_from`]
//! before saving.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::timer::{
    Durations, TickSource, Timer, DEFAULT_FOCUS_MINUTES, DEFAULT_LONG_BREAK_MINUTES,
    DEFAULT_SHORT_BREAK_MINUTES,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_short_break_minutes")]
    pub short_break_minutes: u32,
    #[serde(default = "default_long_break_minutes")]
    pub long_break_minutes: u32,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default)]
    pub dark_mode: bool,
}

fn default_focus_minutes() -> u32 {
    DEFAULT_FOCUS_MINUTES
}
fn default_short_break_minutes() -> u32 {
    DEFAULT_SHORT_BREAK_MINUTES
}
fn default_long_break_minutes() -> u32 {
    DEFAULT_LONG_BREAK_MINUTES
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            short_break_minutes: default_short_break_minutes(),
            long_break_minutes: default_long_break_minutes(),
            auto_advance: true,
            dark_mode: false,
        }
    }
}

impl Settings {
    /// The configured durations, if all three are positive.
    pub fn durations(&self) -> Result<Durations, ValidationError> {
        Durations::new(
            self.focus_minutes,
            self.short_break_minutes,
            self.long_break_minutes,
        )
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.durations().map(|_| ())
    }

    /// Push these settings into `timer` and reset it so the current mode
    /// picks up its new duration.
    ///
    /// The timer is left untouched if any duration is invalid.
    pub fn apply_to<T: TickSource>(&self, timer: &mut Timer<T>) -> Result<(), ValidationError> {
        let durations = self.durations()?;
        timer.set_durations(durations);
        timer.set_auto_advance(self.auto_advance);
        timer.reset();
        Ok(())
    }

    /// Build the record to persist from the timer's current configuration.
    /// `dark_mode` is owned by the presentation layer and passed through.
    pub fn capture_from<T: TickSource>(timer: &Timer<T>, dark_mode: bool) -> Self {
        let durations = timer.durations();
        Self {
            focus_minutes: durations.focus_minutes(),
            short_break_minutes: durations.short_break_minutes(),
            long_break_minutes: durations.long_break_minutes(),
            auto_advance: timer.auto_advance(),
            dark_mode,
        }
    }

    /// Get a value as a string by field name.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by field name, parsed according to the field's type.
    ///
    /// Nothing changes if the key is unknown, the value does not parse, or
    /// the result would hold a zero duration.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .trim()
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number of minutes")))?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(key.to_string(), new_value);

        let updated: Settings =
            serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate().map_err(|e| invalid(e.to_string()))?;
        *self = updated;
        Ok(())
    }

    /// Field names accepted by [`Settings::get`] and [`Settings::set`].
    pub fn keys() -> &'static [&'static str] {
        &[
            "focus_minutes",
            "short_break_minutes",
            "long_break_minutes",
            "auto_advance",
            "dark_mode",
        ]
    }
}
