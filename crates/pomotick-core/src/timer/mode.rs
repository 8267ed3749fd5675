use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Every Nth completed focus interval is followed by a long break.
pub const LONG_BREAK_EVERY: u64 = 4;

pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;

/// The kind of interval the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "focus" | "pomodoro" => Ok(Mode::Focus),
            "short_break" | "shortbreak" => Ok(Mode::ShortBreak),
            "long_break" | "longbreak" => Ok(Mode::LongBreak),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Configured interval lengths, in minutes.
///
/// All three values are positive. The only ways in are [`Durations::new`],
/// `Default`, deserialization (which goes through `new`) and the timer's
/// setters, and all of them reject zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDurations")]
pub struct Durations {
    focus_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
}

#[derive(Deserialize)]
struct RawDurations {
    focus_minutes: u32,
    short_break_minutes: u32,
    long_break_minutes: u32,
}

impl TryFrom<RawDurations> for Durations {
    type Error = ValidationError;

    fn try_from(raw: RawDurations) -> Result<Self, Self::Error> {
        Durations::new(
            raw.focus_minutes,
            raw.short_break_minutes,
            raw.long_break_minutes,
        )
    }
}

impl Durations {
    pub fn new(
        focus_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
    ) -> Result<Self, ValidationError> {
        validate_minutes(Mode::Focus, focus_minutes)?;
        validate_minutes(Mode::ShortBreak, short_break_minutes)?;
        validate_minutes(Mode::LongBreak, long_break_minutes)?;
        Ok(Self {
            focus_minutes,
            short_break_minutes,
            long_break_minutes,
        })
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn short_break_minutes(&self) -> u32 {
        self.short_break_minutes
    }

    pub fn long_break_minutes(&self) -> u32 {
        self.long_break_minutes
    }

    pub fn for_mode(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    /// Interval length for `mode` in seconds.
    pub fn seconds_for(&self, mode: Mode) -> u64 {
        u64::from(self.for_mode(mode)).saturating_mul(60)
    }

    pub(crate) fn set(&mut self, mode: Mode, minutes: u32) -> Result<(), ValidationError> {
        validate_minutes(mode, minutes)?;
        match mode {
            Mode::Focus => self.focus_minutes = minutes,
            Mode::ShortBreak => self.short_break_minutes = minutes,
            Mode::LongBreak => self.long_break_minutes = minutes,
        }
        Ok(())
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
        }
    }
}

pub(crate) fn validate_minutes(mode: Mode, minutes: u32) -> Result<(), ValidationError> {
    if minutes == 0 {
        return Err(ValidationError::InvalidDuration { mode, minutes });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let d = Durations::default();
        assert_eq!(d.for_mode(Mode::Focus), 25);
        assert_eq!(d.for_mode(Mode::ShortBreak), 5);
        assert_eq!(d.for_mode(Mode::LongBreak), 15);
        assert_eq!(d.seconds_for(Mode::Focus), 1500);
    }

    #[test]
    fn zero_minutes_rejected() {
        let err = Durations::new(25, 0, 15).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDuration {
                mode: Mode::ShortBreak,
                minutes: 0
            }
        );
    }

    #[test]
    fn deserialize_validates_minutes() {
        let ok: Durations = serde_json::from_str(
            r#"{"focus_minutes":50,"short_break_minutes":10,"long_break_minutes":30}"#,
        )
        .unwrap();
        assert_eq!(ok, Durations::new(50, 10, 30).unwrap());

        let zero = serde_json::from_str::<Durations>(
            r#"{"focus_minutes":0,"short_break_minutes":0,"long_break_minutes":0}"#,
        );
        assert!(zero.is_err());
        let err = toml::from_str::<Durations>(
            "focus_minutes = 25\nshort_break_minutes = 5\nlong_break_minutes = 0\n",
        );
        assert!(err.is_err());
    }

    #[test]
    fn durations_serialize_field_names() {
        let json = serde_json::to_value(Durations::default()).unwrap();
        assert_eq!(json["focus_minutes"], 25);
        assert_eq!(json["long_break_minutes"], 15);
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("pomodoro".parse::<Mode>().unwrap(), Mode::Focus);
        assert_eq!("short-break".parse::<Mode>().unwrap(), Mode::ShortBreak);
        assert_eq!("LongBreak".parse::<Mode>().unwrap(), Mode::LongBreak);
        assert!("lunch".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Mode::ShortBreak).unwrap(), "\"short_break\"");
        assert_eq!(Mode::LongBreak.to_string(), "long_break");
    }
}
