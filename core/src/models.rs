use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Repetitive-dive group letter ("GPS").
///
/// MN90 uses A through P, but any letter parses: the loaded residual
/// nitrogen table decides which groups exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct GroupCode(char);

impl GroupCode {
    pub fn letter(self) -> char {
        self.0
    }
}

impl TryFrom<char> for GroupCode {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let c = c.to_ascii_uppercase();
        if c.is_ascii_uppercase() {
            Ok(GroupCode(c))
        } else {
            Err(format!("group code must be a letter, got '{c}'"))
        }
    }
}

impl std::str::FromStr for GroupCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => GroupCode::try_from(c),
            _ => Err(format!("group code must be a single letter, got '{s}'")),
        }
    }
}

impl From<GroupCode> for char {
    fn from(code: GroupCode) -> char {
        code.0
    }
}

impl fmt::Display for GroupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The five fixed MN90 stop depths, deepest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopDepth {
    M15,
    M12,
    M9,
    M6,
    M3,
}

impl StopDepth {
    pub const ALL: [StopDepth; 5] = [
        StopDepth::M15,
        StopDepth::M12,
        StopDepth::M9,
        StopDepth::M6,
        StopDepth::M3,
    ];

    pub fn meters(self) -> u32 {
        match self {
            StopDepth::M15 => 15,
            StopDepth::M12 => 12,
            StopDepth::M9 => 9,
            StopDepth::M6 => 6,
            StopDepth::M3 => 3,
        }
    }

    /// Column name in the decompression table.
    pub fn column(self) -> &'static str {
        match self {
            StopDepth::M15 => "15m",
            StopDepth::M12 => "12m",
            StopDepth::M9 => "9m",
            StopDepth::M6 => "6m",
            StopDepth::M3 => "3m",
        }
    }

    fn index(self) -> usize {
        match self {
            StopDepth::M15 => 0,
            StopDepth::M12 => 1,
            StopDepth::M9 => 2,
            StopDepth::M6 => 3,
            StopDepth::M3 => 4,
        }
    }
}

/// Mandatory stop minutes at each of the five stop depths. Zero means no stop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopSchedule {
    minutes: [u32; 5],
}

impl StopSchedule {
    /// Build a schedule from minutes ordered 15m, 12m, 9m, 6m, 3m.
    pub fn new(minutes: [u32; 5]) -> Self {
        StopSchedule { minutes }
    }

    pub fn minutes_at(&self, depth: StopDepth) -> u32 {
        self.minutes[depth.index()]
    }

    /// All five stop depths, deepest first, including zero entries.
    pub fn iter(&self) -> impl Iterator<Item = (StopDepth, u32)> + '_ {
        StopDepth::ALL.iter().map(move |&d| (d, self.minutes_at(d)))
    }

    /// Only the stops that must actually be made.
    pub fn stops(&self) -> impl Iterator<Item = (StopDepth, u32)> + '_ {
        self.iter().filter(|&(_, m)| m > 0)
    }

    pub fn total_minutes(&self) -> u32 {
        self.minutes.iter().sum()
    }

    pub fn has_stops(&self) -> bool {
        self.minutes.iter().any(|&m| m > 0)
    }
}

/// How the time penalty of a repetitive dive is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepetitiveDive {
    /// First dive of the sequence.
    #[default]
    None,
    /// Penalty minutes supplied directly by the diver.
    Manual { penalty_minutes: u32 },
    /// Penalty looked up from the previous dive's group and the surface interval.
    Tabled {
        group: GroupCode,
        surface_interval_minutes: u32,
    },
}

/// Diver-supplied parameters for one planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiveParameters {
    /// Maximum depth (m)
    pub depth_m: f64,
    /// Time at depth before starting the ascent (min)
    pub bottom_time_min: f64,
    #[serde(default)]
    pub repetitive: RepetitiveDive,
    /// Ascent speed (m/min)
    pub ascent_speed_m_min: f64,
    /// Surface air consumption (L/min at 1 bar)
    pub sac_l_min: f64,
    /// Tank water volume (L)
    pub tank_capacity_l: f64,
    /// Fill pressure (bar)
    pub fill_pressure_bar: f64,
    /// Pressure that must remain at the surface (bar)
    pub reserve_bar: f64,
}

impl DiveParameters {
    /// Reject values no computation can start from.
    pub fn validate(&self) -> Result<(), InputError> {
        let positive = [
            ("depth", self.depth_m),
            ("bottom_time", self.bottom_time_min),
            ("ascent_speed", self.ascent_speed_m_min),
            ("sac", self.sac_l_min),
            ("tank_capacity", self.tank_capacity_l),
            ("fill_pressure", self.fill_pressure_bar),
        ];
        for (field, value) in positive {
            require_positive(field, value)?;
        }
        require_non_negative("reserve", self.reserve_bar)
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::invalid(field, value))
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<(), InputError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::invalid(field, value))
    }
}
