use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stored or submitted code does not name a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnknownCode {
    #[error("unknown shift type `{0}`")]
    ShiftType(String),
    #[error("unknown downtime kind `{0}`")]
    DowntimeKind(String),
    #[error("unknown activity `{0}`")]
    Activity(String),
}

/// Part of the production day a report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftType {
    Day,
    Night,
    Plan,
}

impl ShiftType {
    pub const ALL: [ShiftType; 3] = [ShiftType::Day, ShiftType::Night, ShiftType::Plan];

    /// Code stored in the database and used in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
            ShiftType::Plan => "plan",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShiftType::Day => "Day",
            ShiftType::Night => "Night",
            ShiftType::Plan => "Plan",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShiftType {
    type Err = UnknownCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ShiftType::ALL
            .into_iter()
            .find(|shift| {
                shift.as_str().eq_ignore_ascii_case(value.trim())
                    || shift.label().eq_ignore_ascii_case(value.trim())
            })
            .ok_or_else(|| UnknownCode::ShiftType(value.to_string()))
    }
}

/// Fixed catalogue of downtime reasons recorded per shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DowntimeKind {
    Maintenance,
    Production,
    Material,
    Utility,
    Qc,
    Cleaning,
    Qa,
    Changeover,
}

impl DowntimeKind {
    pub const ALL: [DowntimeKind; 8] = [
        DowntimeKind::Maintenance,
        DowntimeKind::Production,
        DowntimeKind::Material,
        DowntimeKind::Utility,
        DowntimeKind::Qc,
        DowntimeKind::Cleaning,
        DowntimeKind::Qa,
        DowntimeKind::Changeover,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DowntimeKind::Maintenance => "maintenance",
            DowntimeKind::Production => "production",
            DowntimeKind::Material => "material",
            DowntimeKind::Utility => "utility",
            DowntimeKind::Qc => "qc",
            DowntimeKind::Cleaning => "cleaning",
            DowntimeKind::Qa => "qa",
            DowntimeKind::Changeover => "changeover",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DowntimeKind::Maintenance => "Maintenance DT",
            DowntimeKind::Production => "Production DT",
            DowntimeKind::Material => "Material DT",
            DowntimeKind::Utility => "Utility DT",
            DowntimeKind::Qc => "QC DT",
            DowntimeKind::Cleaning => "Cleaning DT",
            DowntimeKind::Qa => "QA DT",
            DowntimeKind::Changeover => "Changeover DT",
        }
    }
}

impl FromStr for DowntimeKind {
    type Err = UnknownCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DowntimeKind::ALL
            .into_iter()
            .find(|kind| {
                kind.as_str().eq_ignore_ascii_case(value.trim())
                    || kind.label().eq_ignore_ascii_case(value.trim())
            })
            .ok_or_else(|| UnknownCode::DowntimeKind(value.to_string()))
    }
}

/// What a machine was doing during one recorded slice of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Production,
    Downtime(DowntimeKind),
}

const PRODUCTION_CODE: &str = "production";
const DOWNTIME_PREFIX: &str = "downtime:";

impl ActivityKind {
    /// Stored representation: `production` or `downtime:<kind>`.
    pub fn code(&self) -> String {
        match self {
            ActivityKind::Production => PRODUCTION_CODE.to_string(),
            ActivityKind::Downtime(kind) => format!("{DOWNTIME_PREFIX}{}", kind.as_str()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityKind::Production => "Production",
            ActivityKind::Downtime(kind) => kind.label(),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, ActivityKind::Production)
    }
}

impl FromStr for ActivityKind {
    type Err = UnknownCode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == PRODUCTION_CODE {
            return Ok(ActivityKind::Production);
        }

        value
            .strip_prefix(DOWNTIME_PREFIX)
            .and_then(|kind| kind.parse::<DowntimeKind>().ok())
            .map(ActivityKind::Downtime)
            .ok_or_else(|| UnknownCode::Activity(value.to_string()))
    }
}

impl Serialize for ActivityKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for ActivityKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Option entry rendered in select boxes.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub fn shift_type_options() -> Vec<ChoiceOption> {
    ShiftType::ALL
        .iter()
        .map(|shift| ChoiceOption {
            value: shift.as_str(),
            label: shift.label(),
        })
        .collect()
}

pub fn downtime_kind_options() -> Vec<ChoiceOption> {
    DowntimeKind::ALL
        .iter()
        .map(|kind| ChoiceOption {
            value: kind.as_str(),
            label: kind.label(),
        })
        .collect()
}
