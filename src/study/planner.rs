//! Study planner stub. Goals are never stored, so listing always returns the
//! same two entries and adding only echoes its input.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A study goal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GoalRecord {
    pub text: String,
    pub deadline: String,
}

impl GoalRecord {
    pub fn new(text: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            deadline: deadline.into(),
        }
    }
}

/// The fixed planner contents
pub fn planned_goals() -> Vec<GoalRecord> {
    vec![
        GoalRecord::new("Study Math", "2023-10-01"),
        GoalRecord::new("Finish Project", "2023-10-05"),
    ]
}

/// Confirmation for an added goal
pub fn goal_added_message(goal: &GoalRecord) -> String {
    format!("Goal '{}' added with deadline {}", goal.text, goal.deadline)
}
