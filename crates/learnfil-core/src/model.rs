//! Core data model types for LearnFIL.
//!
//! These are the records persisted in the key-value store: curriculum
//! modules and lessons, the validation tests embedded in lessons, and the
//! per-user progress records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level curriculum unit containing an ordered set of lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Short description shown in module listings.
    #[serde(default)]
    pub description: String,
    /// Ordering key among modules.
    #[serde(default)]
    pub order_index: u32,
}

/// A single learning unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier.
    pub id: String,
    /// Owning module identifier.
    pub module_id: String,
    /// Human-readable title.
    pub title: String,
    /// Lesson text in the lightweight markdown-like format.
    #[serde(default)]
    pub content: String,
    /// Code placed in the editor when the lesson is opened.
    #[serde(default)]
    pub starter_code: String,
    /// Ordered validation tests run against submitted code.
    #[serde(default)]
    pub validation_tests: Vec<ValidationTest>,
    /// Ordering key, unique within the owning module.
    #[serde(default)]
    pub order_index: u32,
}

impl Lesson {
    /// Lesson content with a leading `# ` heading removed, since the title is
    /// displayed separately.
    pub fn body(&self) -> String {
        let mut lines: Vec<&str> = self.content.lines().collect();
        if let Some(first) = lines.iter().position(|l| !l.trim().is_empty()) {
            if lines[first].starts_with("# ") {
                lines.remove(first);
            }
        }
        lines.join("\n")
    }

    /// Whether this lesson offers a code exercise.
    pub fn has_exercise(&self) -> bool {
        !self.starter_code.trim().is_empty()
    }
}

/// A description plus an expected/actual comparison used to grade code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationTest {
    /// What the test checks, shown to the learner.
    pub description: String,
    /// The value the check must produce.
    #[serde(default = "default_expected")]
    pub expected: serde_json::Value,
    /// How the actual value is produced from the submitted code.
    pub check: Check,
}

fn default_expected() -> serde_json::Value {
    serde_json::Value::Bool(true)
}

/// How a validation test derives its actual value from submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// `true` iff the code text contains `needle`.
    Contains { needle: String },
    /// Execute the code; if `harness` is non-empty it is evaluated after the
    /// code in the same scope, otherwise the code's own return value is used.
    Evaluate {
        #[serde(default)]
        harness: String,
    },
}

/// Persisted fact that a user completed a lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// The completed lesson.
    pub lesson_id: String,
    /// Completion flag. A lesson counts as complete only when this is set.
    pub completed: bool,
    /// When the lesson was last marked complete.
    pub completed_at: DateTime<Utc>,
    /// The code submitted with the completion.
    #[serde(default)]
    pub code: String,
}

/// Completion counts for one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleSummary {
    pub module: Module,
    pub total_lessons: usize,
    pub completed_lessons: usize,
}

impl ModuleSummary {
    /// Every lesson in the module is complete.
    pub fn is_complete(&self) -> bool {
        self.completed_lessons == self.total_lessons
    }
}

/// The result of grading one validation test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub description: String,
    pub passed: bool,
    pub message: String,
}
