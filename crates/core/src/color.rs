//! Per-task display colors
//!
//! Every task carries a [`TaskColor`] that tags its output prefix. The color is
//! purely cosmetic and is fixed for the lifetime of the task.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Palette of prefix colors a task can be rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl TaskColor {
    pub const PALETTE: [TaskColor; 7] = [
        TaskColor::Red,
        TaskColor::Green,
        TaskColor::Yellow,
        TaskColor::Blue,
        TaskColor::Magenta,
        TaskColor::Cyan,
        TaskColor::White,
    ];

    /// Get a consistent color for a fully-qualified task name
    pub fn for_name(fqdn: &str) -> Self {
        // Same simple byte hash for every run so a task keeps its color
        let hash = fqdn
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

        Self::PALETTE[(hash % Self::PALETTE.len() as u64) as usize]
    }
}

impl From<TaskColor> for colored::Color {
    fn from(color: TaskColor) -> Self {
        match color {
            TaskColor::Red => colored::Color::Red,
            TaskColor::Green => colored::Color::Green,
            TaskColor::Yellow => colored::Color::Yellow,
            TaskColor::Blue => colored::Color::Blue,
            TaskColor::Magenta => colored::Color::Magenta,
            TaskColor::Cyan => colored::Color::Cyan,
            TaskColor::White => colored::Color::White,
        }
    }
}
