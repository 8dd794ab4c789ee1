use std::cmp::{Ordering, Reverse};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;
use uuid::Uuid;

use super::eye::Eye;
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Refraction {
    pub id: Uuid,
    pub eye: Eye,
    pub kind: RefractionKind,
    /// Diopters.
    pub spherical: f64,
    /// Diopters, minus-cylinder or plus-cylinder as recorded.
    pub cylinder: f64,
    /// Degrees, 0..=180.
    pub axis: u16,
    #[ts(type = "string")]
    pub visual_acuity: VisualAcuity,
    pub recorded_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RefractionKind {
    Static,
    Dynamic,
    Cycloplegic,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RefractionInput {
    pub eye: Eye,
    pub kind: RefractionKind,
    pub spherical: f64,
    #[serde(default)]
    pub cylinder: f64,
    #[serde(default)]
    pub axis: u16,
    #[ts(type = "string")]
    pub visual_acuity: VisualAcuity,
}

impl Refraction {
    pub fn from_input(input: RefractionInput, now: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            eye: input.eye,
            kind: input.kind,
            spherical: input.spherical,
            cylinder: input.cylinder,
            // Axis carries no meaning without cylinder.
            axis: if input.cylinder == 0.0 { 0 } else { input.axis },
            visual_acuity: input.visual_acuity,
            recorded_at: now,
        }
    }

    pub fn spherical_equivalent(&self) -> f64 {
        self.spherical + self.cylinder / 2.0
    }
}

/// Best-corrected visual acuity, in Snellen notation or a low-vision category.
///
/// Serialized as its clinical notation: `"20/40"`, `"CF"`, `"HM"`, `"LP"`,
/// `"NLP"`. Parsing also accepts the Portuguese abbreviations `CD`, `MM`,
/// `PL` and `SPL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualAcuity {
    /// 20/`denominator`.
    Snellen { denominator: u16 },
    CountingFingers,
    HandMotion,
    LightPerception,
    NoLightPerception,
}

impl VisualAcuity {
    /// Decimal acuity for Snellen values, `None` for low-vision categories.
    pub fn decimal(self) -> Option<f64> {
        match self {
            VisualAcuity::Snellen { denominator } => Some(20.0 / f64::from(denominator)),
            _ => None,
        }
    }

    fn rank(self) -> (u8, Reverse<u16>) {
        match self {
            VisualAcuity::NoLightPerception => (0, Reverse(0)),
            VisualAcuity::LightPerception => (1, Reverse(0)),
            VisualAcuity::HandMotion => (2, Reverse(0)),
            VisualAcuity::CountingFingers => (3, Reverse(0)),
            VisualAcuity::Snellen { denominator } => (4, Reverse(denominator)),
        }
    }
}

/// Worse acuity compares less than better acuity.
impl Ord for VisualAcuity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for VisualAcuity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VisualAcuity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualAcuity::Snellen { denominator } => write!(f, "20/{denominator}"),
            VisualAcuity::CountingFingers => f.write_str("CF"),
            VisualAcuity::HandMotion => f.write_str("HM"),
            VisualAcuity::LightPerception => f.write_str("LP"),
            VisualAcuity::NoLightPerception => f.write_str("NLP"),
        }
    }
}

impl FromStr for VisualAcuity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "CF" | "CD" => return Ok(VisualAcuity::CountingFingers),
            "HM" | "MM" => return Ok(VisualAcuity::HandMotion),
            "LP" | "PL" => return Ok(VisualAcuity::LightPerception),
            "NLP" | "SPL" => return Ok(VisualAcuity::NoLightPerception),
            _ => {}
        }

        let invalid = || CoreError::InvalidVisualAcuity(s.to_string());
        let (numerator, denominator) = normalized.split_once('/').ok_or_else(invalid)?;
        if numerator.trim() != "20" {
            return Err(invalid());
        }
        let denominator: u16 = denominator.trim().parse().map_err(|_| invalid())?;
        if denominator == 0 {
            return Err(invalid());
        }
        Ok(VisualAcuity::Snellen { denominator })
    }
}

impl Serialize for VisualAcuity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VisualAcuity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
