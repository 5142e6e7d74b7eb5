// Core workflow types and data structures for Cadence Workflows
//
// This module defines the immutable specification types supplied to the
// execution engine at run start, plus the validation types used when loading
// workflow definitions from disk.

use serde::{Deserialize, Serialize};

/// One labeled countdown with a fixed duration, executed in sequence.
///
/// Identity is positional within the workflow; a step has no independent
/// lifecycle once a run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedStep {
    /// Human-readable label, announced when the step starts
    pub label: String,
    /// Countdown duration in whole seconds
    pub duration_seconds: u32,
}

impl TimedStep {
    /// Create a new step
    pub fn new(label: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            label: label.into(),
            duration_seconds,
        }
    }
}

/// Default alert duration applied when a workflow definition omits it
fn default_alert_duration() -> u32 {
    3
}

/// Default toggle value for announcements and haptics
fn default_enabled() -> bool {
    true
}

/// A named ordered sequence of timed steps plus shared run settings.
///
/// Immutable for the duration of a run; the engine never persists or mutates
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    /// Human-readable workflow name
    pub name: String,
    /// Ordered steps, possibly empty (an empty workflow completes immediately)
    #[serde(default)]
    pub steps: Vec<TimedStep>,
    /// Duration of the inter-step rest/alert phase in seconds
    #[serde(default = "default_alert_duration")]
    pub alert_duration_seconds: u32,
    /// Whether spoken announcements are enabled for this run
    #[serde(default = "default_enabled")]
    pub announce_enabled: bool,
    /// Whether the haptic pattern accompanies the rest phase
    #[serde(default = "default_enabled")]
    pub haptic_enabled: bool,
}

impl Workflow {
    /// Create a workflow with the default settings
    pub fn new(name: impl Into<String>, steps: Vec<TimedStep>) -> Self {
        Self {
            name: name.into(),
            steps,
            alert_duration_seconds: default_alert_duration(),
            announce_enabled: default_enabled(),
            haptic_enabled: default_enabled(),
        }
    }

    /// Total scheduled countdown time across all steps, excluding rest phases
    pub fn total_step_seconds(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| u64::from(step.duration_seconds))
            .sum()
    }

    /// Validate the workflow definition
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::success();

        if self.name.trim().is_empty() {
            result = result.with_error("workflow name must not be empty".to_string());
        }

        if self.alert_duration_seconds < 1 {
            result = result.with_error(format!(
                "alert duration must be at least 1 second, got {}",
                self.alert_duration_seconds
            ));
        }

        for (index, step) in self.steps.iter().enumerate() {
            if step.label.trim().is_empty() {
                result = result.with_error(format!("step {} has an empty label", index));
            }
            if step.duration_seconds == 0 {
                result = result.with_error(format!(
                    "step {} ({}) has a zero duration",
                    index, step.label
                ));
            }
        }

        if self.steps.is_empty() {
            result = result
                .with_warning("workflow has no steps and will complete immediately".to_string());
        }

        result
    }
}

/// Result of workflow validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the workflow is valid
    pub is_valid: bool,
    /// Validation errors found
    pub errors: Vec<String>,
    /// Validation warnings
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error, marking the result invalid
    pub fn with_error(mut self, error: String) -> Self {
        self.is_valid = false;
        self.errors.push(error);
        self
    }

    /// Add a warning to the validation result
    pub fn with_warning(mut self, warning: String) -> Self {
        self.warnings.push(warning);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_workflow() -> Workflow {
        Workflow::new(
            "Morning Routine",
            vec![TimedStep::new("Stretch", 30), TimedStep::new("Plank", 60)],
        )
    }

    #[test]
    fn test_valid_workflow_passes_validation() {
        let result = sample_workflow().validate();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_zero_duration_step_is_rejected() {
        let mut workflow = sample_workflow();
        workflow.steps[1].duration_seconds = 0;

        let result = workflow.validate();
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Plank"));
    }

    #[test]
    fn test_empty_workflow_is_valid_with_warning() {
        let workflow = Workflow::new("Empty", Vec::new());

        let result = workflow.validate();
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_alert_duration_below_one_is_rejected() {
        let mut workflow = sample_workflow();
        workflow.alert_duration_seconds = 0;

        assert!(!workflow.validate().is_valid);
    }

    #[test]
    fn test_yaml_defaults_are_applied() {
        let yaml = r#"
name: Quick Stretch
steps:
  - label: Neck rolls
    duration_seconds: 20
"#;
        let workflow: Workflow = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(workflow.alert_duration_seconds, 3);
        assert!(workflow.announce_enabled);
        assert!(workflow.haptic_enabled);
    }

    #[test]
    fn test_total_step_seconds() {
        assert_eq!(sample_workflow().total_step_seconds(), 90);
    }
}
