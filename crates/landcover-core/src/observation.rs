//! Manually entered field observations: weather reports and fauna sightings.
//!
//! Records are validated before they become store documents. Timestamps are
//! taken at UTC−05:00 (Bogotá, no daylight saving).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ObservationError;

/// Offset of the monitoring region, seconds east of UTC.
pub const LOCAL_OFFSET_SECS: i32 = -5 * 3600;

/// Current time at [`LOCAL_OFFSET_SECS`].
pub fn now_local() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(LOCAL_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset)
}

// ── Location ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ObservationError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ObservationError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ObservationError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Parse `"lat,lon"` or `"lat lon"` (commas and whitespace both separate).
    pub fn parse(s: &str) -> Result<Self, ObservationError> {
        let (lat, lon) = Self::parse_pair(s)?;
        Self::new(lat, lon)
    }

    /// Like [`Location::parse`] but without the latitude/longitude range
    /// check. Non-finite numbers are still rejected.
    pub fn parse_unchecked(s: &str) -> Result<Self, ObservationError> {
        let (lat, lon) = Self::parse_pair(s)?;
        if !(lat.is_finite() && lon.is_finite()) {
            return Err(ObservationError::BadLocation(s.to_string()));
        }
        Ok(Self { lat, lon })
    }

    fn parse_pair(s: &str) -> Result<(f64, f64), ObservationError> {
        let bad = || ObservationError::BadLocation(s.to_string());
        let normalized = s.replace(',', " ");
        let mut parts = normalized.split_whitespace();
        let lat: f64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        let lon: f64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok((lat, lon))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

impl FromStr for Location {
    type Err = ObservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ── Enumerations ──────────────────────────────────────────────────────────────

/// Declares a kebab-case enum with `as_str`, `ALL`, and `FromStr`.
macro_rules! labelled_enum {
    ($name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ObservationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ObservationError::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }
    };
}

labelled_enum!(RainStatus, "rain status" {
    No => "no",
    Drizzle => "drizzle",
    LightRain => "light-rain",
    HeavyRain => "heavy-rain",
});

labelled_enum!(SpeciesKind, "species kind" {
    Bird => "bird",
    Mammal => "mammal",
    Reptile => "reptile",
    Amphibian => "amphibian",
    Fish => "fish",
    Insect => "insect",
    Other => "other",
});

labelled_enum!(Behaviour, "behaviour" {
    Feeding => "feeding",
    Resting => "resting",
    Flying => "flying",
    Swimming => "swimming",
    Nesting => "nesting",
    InGroup => "in-group",
    Solitary => "solitary",
    SocialInteraction => "social-interaction",
});

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
    pub rain: RainStatus,
    /// 1–10.
    pub intensity: u8,
    /// −10 to 50 °C.
    pub temperature_c: f64,
    pub notes: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl WeatherObservation {
    pub fn validate(&self) -> Result<(), ObservationError> {
        Location::new(self.location.lat, self.location.lon)?;
        if !(1..=10).contains(&self.intensity) {
            return Err(ObservationError::IntensityOutOfRange(self.intensity));
        }
        if !(-10.0..=50.0).contains(&self.temperature_c) {
            return Err(ObservationError::TemperatureOutOfRange(self.temperature_c));
        }
        Ok(())
    }

    /// Validate, then map to a store document.
    pub fn to_document(&self) -> Result<Value, ObservationError> {
        self.validate()?;
        Ok(json!({
            "date": self.date.to_string(),
            "time": self.time.to_string(),
            "location": self.location.to_string(),
            "rain": self.rain.as_str(),
            "intensity": self.intensity,
            "temperature": self.temperature_c,
            "notes": self.notes,
            "timestamp": self.timestamp.to_rfc3339(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaunaSighting {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
    pub kind: SpeciesKind,
    /// Species name, empty when unknown.
    pub species: String,
    pub count: u32,
    pub behaviours: Vec<Behaviour>,
    pub description: String,
    pub conditions: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl FaunaSighting {
    pub fn validate(&self) -> Result<(), ObservationError> {
        Location::new(self.location.lat, self.location.lon)?;
        if self.count == 0 {
            return Err(ObservationError::ZeroCount);
        }
        Ok(())
    }

    pub fn to_document(&self) -> Result<Value, ObservationError> {
        self.validate()?;
        let behaviour: Vec<&str> = self.behaviours.iter().map(|b| b.as_str()).collect();
        Ok(json!({
            "date": self.date.to_string(),
            "time": self.time.to_string(),
            "location": self.location.to_string(),
            "kind": self.kind.as_str(),
            "species": self.species,
            "count": self.count,
            "behaviour": behaviour,
            "description": self.description,
            "conditions": self.conditions,
            "timestamp": self.timestamp.to_rfc3339(),
        }))
    }
}
