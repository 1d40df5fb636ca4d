//! Value types shared by the clock state, the sampler, and the API.

use std::fmt;

use jiff::Zoned;
use serde::{Deserialize, Serialize};

/// Rejected hour-mode value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("hour mode must be 12 or 24, got {0}")]
pub struct InvalidHourMode(pub i64);

/// Whether the display shows a 12-hour or 24-hour clock.
///
/// Serialized as the bare integer `12` or `24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub enum HourMode {
    /// 12-hour clock (1 through 12).
    Twelve,
    /// 24-hour clock (0 through 23).
    #[default]
    TwentyFour,
}

impl HourMode {
    /// The integer form used on the wire and on disk.
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Twelve => 12,
            Self::TwentyFour => 24,
        }
    }

    /// Map a 0-23 hour to the value the display should show.
    ///
    /// In 12-hour mode midnight and noon both show as 12.
    pub const fn display_hour(self, hour: u8) -> u8 {
        match self {
            Self::TwentyFour => hour,
            Self::Twelve => match hour % 12 {
                0 => 12,
                h => h,
            },
        }
    }
}

impl TryFrom<i64> for HourMode {
    type Error = InvalidHourMode;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            12 => Ok(Self::Twelve),
            24 => Ok(Self::TwentyFour),
            other => Err(InvalidHourMode(other)),
        }
    }
}

impl From<HourMode> for u8 {
    fn from(mode: HourMode) -> Self {
        mode.as_u8()
    }
}

impl fmt::Display for HourMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Date and time fields sampled from the wall clock in one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSample {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Minute, 0-59.
    pub minute: u8,
    /// Second, 0-59.
    pub second: u8,
    /// Calendar year.
    pub year: i16,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
}

impl TimeSample {
    /// Extract the fields of a zoned datetime.
    pub fn from_zoned(zoned: &Zoned) -> Self {
        // jiff reports these as small signed integers that are never negative.
        let narrow = |v: i8| u8::try_from(v).unwrap_or_default();
        Self {
            hour: narrow(zoned.hour()),
            minute: narrow(zoned.minute()),
            second: narrow(zoned.second()),
            year: zoned.year(),
            month: narrow(zoned.month()),
            day: narrow(zoned.day()),
        }
    }
}

/// A consistent copy of the full clock record.
///
/// This is also the JSON body of `GET /api/time`, hence the short field
/// names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    /// Hour of day, 0-23, independent of [`HourMode`].
    #[serde(rename = "h")]
    pub hour: u8,
    /// Minute, 0-59.
    #[serde(rename = "m")]
    pub minute: u8,
    /// Second, 0-59.
    #[serde(rename = "s")]
    pub second: u8,
    /// Calendar year.
    #[serde(rename = "y")]
    pub year: i16,
    /// Month, 1-12.
    #[serde(rename = "mo")]
    pub month: u8,
    /// Day of month, 1-31.
    #[serde(rename = "d")]
    pub day: u8,
    /// Whether the display should be showing the time.
    pub running: bool,
    /// IANA zone identifier the clock samples in.
    pub timezone: String,
    /// Display hour mode.
    pub hour_mode: HourMode,
}

impl ClockSnapshot {
    /// A record with zeroed time fields, running, in the given zone and mode.
    pub fn initial(timezone: String, hour_mode: HourMode) -> Self {
        Self {
            hour: 0,
            minute: 0,
            second: 0,
            year: 0,
            month: 0,
            day: 0,
            running: true,
            timezone,
            hour_mode,
        }
    }

    /// Overwrite the time fields from a sample.
    pub const fn apply(&mut self, sample: &TimeSample) {
        self.hour = sample.hour;
        self.minute = sample.minute;
        self.second = sample.second;
        self.year = sample.year;
        self.month = sample.month;
        self.day = sample.day;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn twenty_four_hour_mode_is_identity() {
        for hour in 0..24 {
            assert_eq!(HourMode::TwentyFour.display_hour(hour), hour);
        }
    }

    #[test]
    fn twelve_hour_mode_mapping() {
        let mode = HourMode::Twelve;
        assert_eq!(mode.display_hour(0), 12);
        assert_eq!(mode.display_hour(1), 1);
        assert_eq!(mode.display_hour(11), 11);
        assert_eq!(mode.display_hour(12), 12);
        assert_eq!(mode.display_hour(13), 1);
        assert_eq!(mode.display_hour(23), 11);
    }

    #[test]
    fn hour_mode_accepts_only_12_and_24() {
        assert_eq!(HourMode::try_from(12), Ok(HourMode::Twelve));
        assert_eq!(HourMode::try_from(24), Ok(HourMode::TwentyFour));
        for bad in [0, 13, -1, 23, 25] {
            assert_eq!(HourMode::try_from(bad), Err(InvalidHourMode(bad)));
        }
    }

    #[test]
    fn hour_mode_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&HourMode::Twelve).unwrap(), "12");
        let parsed: HourMode = serde_json::from_str("24").unwrap();
        assert_eq!(parsed, HourMode::TwentyFour);
        assert!(serde_json::from_str::<HourMode>("13").is_err());
    }

    #[test]
    fn snapshot_uses_short_field_names() {
        let snap = ClockSnapshot::initial(String::from("Europe/Paris"), HourMode::Twelve);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["h"], 0);
        assert_eq!(json["mo"], 0);
        assert_eq!(json["running"], true);
        assert_eq!(json["timezone"], "Europe/Paris");
        assert_eq!(json["hour_mode"], 12);
    }

    #[test]
    fn sample_from_zoned_fields() {
        let zoned: Zoned = "2024-03-09T23:05:07[Asia/Dhaka]".parse().unwrap();
        let sample = TimeSample::from_zoned(&zoned);
        assert_eq!(
            sample,
            TimeSample {
                hour: 23,
                minute: 5,
                second: 7,
                year: 2024,
                month: 3,
                day: 9,
            }
        );
    }
}
