//! Session skill levels
//!
//! Sessions store the skill level as an integer code. Unknown codes are kept
//! as-is so that a schedule never fails on unexpected data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Unknown(i64),
}

impl SkillLevel {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SkillLevel::Beginner,
            2 => SkillLevel::Intermediate,
            3 => SkillLevel::Advanced,
            other => SkillLevel::Unknown(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Unknown(code) => *code,
        }
    }

    /// Human-readable description shown next to a session
    pub fn description(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Unknown(_) => "Unknown",
        }
    }
}
