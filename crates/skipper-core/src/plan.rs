//! Plan files.
//!
//! A plan is a JSON document listing the tasks a run executes in order.
//! Task ids are stable handles used to correlate progress events; titles
//! are what the dashboard shows; prompts are what the agent receives.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid plan json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plan has no tasks")]
    Empty,

    #[error("duplicate task id: {0}")]
    DuplicateId(String),
}

/// One unit of work handed to the agent CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTask {
    pub id: String,
    pub title: String,
    pub prompt: String,
}

/// An ordered list of tasks plus a display title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub title: String,
    pub tasks: Vec<PlanTask>,
}

impl Plan {
    /// Load and validate a plan from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path)?;
        let plan: Plan = serde_json::from_str(&content)?;
        plan.validate()?;
        Ok(plan)
    }

    fn validate(&self) -> Result<(), PlanError> {
        if self.tasks.is_empty() {
            return Err(PlanError::Empty);
        }
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(PlanError::DuplicateId(task.id.clone()));
            }
        }
        Ok(())
    }

    pub fn total_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Built-in plan used by demo mode when no plan file is given.
    pub fn sample() -> Self {
        Self {
            title: "Sample refactor".to_string(),
            tasks: vec![
                PlanTask {
                    id: "audit".to_string(),
                    title: "Audit error handling".to_string(),
                    prompt: "Find call sites that swallow errors and list them.".to_string(),
                },
                PlanTask {
                    id: "refactor".to_string(),
                    title: "Refactor the worst offenders".to_string(),
                    prompt: "Propagate errors at the call sites found in the audit.".to_string(),
                },
                PlanTask {
                    id: "tests".to_string(),
                    title: "Add regression tests".to_string(),
                    prompt: "Cover the refactored paths with tests.".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_plan(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", json).unwrap();
        file
    }

    #[test]
    fn test_load_valid_plan() {
        let file = write_plan(
            r#"{
                "title": "Fix the parser",
                "tasks": [
                    {"id": "t1", "title": "Reproduce", "prompt": "Write a failing test"},
                    {"id": "t2", "title": "Fix", "prompt": "Make the test pass"}
                ]
            }"#,
        );

        let plan = Plan::load(file.path()).unwrap();
        assert_eq!(plan.title, "Fix the parser");
        assert_eq!(plan.total_tasks(), 2);
        assert_eq!(plan.tasks[0].id, "t1");
    }

    #[test]
    fn test_load_empty_tasks_is_an_error() {
        let file = write_plan(r#"{"title": "Nothing", "tasks": []}"#);
        assert!(matches!(Plan::load(file.path()), Err(PlanError::Empty)));
    }

    #[test]
    fn test_load_duplicate_id_is_an_error() {
        let file = write_plan(
            r#"{
                "title": "Dupes",
                "tasks": [
                    {"id": "t1", "title": "A", "prompt": "a"},
                    {"id": "t1", "title": "B", "prompt": "b"}
                ]
            }"#,
        );
        match Plan::load(file.path()) {
            Err(PlanError::DuplicateId(id)) => assert_eq!(id, "t1"),
            other => panic!("expected duplicate id error, got {:?}", other.map(|p| p.title)),
        }
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let file = write_plan("{not json");
        assert!(matches!(Plan::load(file.path()), Err(PlanError::Json(_))));
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(matches!(
            Plan::load(Path::new("/nonexistent/plan.json")),
            Err(PlanError::Io(_))
        ));
    }

    #[test]
    fn test_sample_plan_is_valid() {
        assert!(Plan::sample().validate().is_ok());
    }
}
