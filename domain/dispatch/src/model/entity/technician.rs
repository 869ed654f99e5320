use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::work_order::UnknownVariant;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechnicianId(String);

impl TechnicianId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TechnicianId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TechnicianId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for TechnicianId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Used for visual coding on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicianStatus {
    #[default]
    Available,
    Busy,
    OffDuty,
}

impl TechnicianStatus {
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

impl fmt::Display for TechnicianStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::OffDuty => "off_duty",
        })
    }
}

impl FromStr for TechnicianStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "available" => Self::Available,
            "busy" => Self::Busy,
            "off_duty" | "offduty" => Self::OffDuty,
            _ => return Err(UnknownVariant(s.to_owned())),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: TechnicianId,
    pub name: String,
    pub status: TechnicianStatus,
}

impl Technician {
    pub fn new(id: impl Into<TechnicianId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: TechnicianStatus::Available,
        }
    }
}
