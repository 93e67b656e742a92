use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 事项优先级
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityLevel {
    #[default]
    None = 0,
    Low = 1,
    Medium = 2,
    High = 3,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 4] = [
        PriorityLevel::None,
        PriorityLevel::Low,
        PriorityLevel::Medium,
        PriorityLevel::High,
    ];

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            PriorityLevel::None => "None",
            PriorityLevel::Low => "Low",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::High => "High",
        }
    }
}

impl TryFrom<i32> for PriorityLevel {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        PriorityLevel::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .ok_or_else(|| DomainError::invalid_value(format!("unknown priority level: {value}")))
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
