//! Faculty workload classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fewest weekly hours counted as a normal load
pub const NORMAL_MIN_HOURS: u32 = 14;

/// Most weekly hours counted as a normal load
pub const NORMAL_MAX_HOURS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkloadStatus {
    Underload,
    Normal,
    Overload,
}

impl WorkloadStatus {
    pub fn classify(total_hours: u32) -> Self {
        if total_hours < NORMAL_MIN_HOURS {
            WorkloadStatus::Underload
        } else if total_hours > NORMAL_MAX_HOURS {
            WorkloadStatus::Overload
        } else {
            WorkloadStatus::Normal
        }
    }
}

impl fmt::Display for WorkloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkloadStatus::Underload => "Underload",
            WorkloadStatus::Normal => "Normal",
            WorkloadStatus::Overload => "Overload",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyLoad {
    pub name: String,
    pub department: String,
    pub lecture_hours: u32,
    pub lab_hours: u32,
}

impl FacultyLoad {
    /// Weekly hours, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        self.lecture_hours.saturating_add(self.lab_hours)
    }

    pub fn status(&self) -> WorkloadStatus {
        WorkloadStatus::classify(self.total())
    }
}
