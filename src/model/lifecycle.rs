use std::collections::HashMap;

use super::JobStatus;

/// Manages job lifecycle state transitions.
///
/// A single transition table backs every mutation that moves a job between
/// statuses, so route handlers cannot drift out of sync with each other.
pub struct JobLifecycle {
    valid_transitions: HashMap<JobStatus, Vec<JobStatus>>,
}

impl JobLifecycle {
    /// Create a lifecycle with the standard transition rules.
    ///
    /// Valid transitions:
    /// - Open -> Accepted (a driver takes the job)
    /// - Open -> Cancelled (the salesperson withdraws it)
    /// - Accepted -> InProgress (driver picks the vehicle up)
    /// - Accepted -> Cancelled (withdrawn before pickup)
    /// - InProgress -> Completed (vehicle delivered)
    pub fn new() -> Self {
        let mut valid_transitions = HashMap::new();

        valid_transitions.insert(
            JobStatus::Open,
            vec![JobStatus::Accepted, JobStatus::Cancelled],
        );

        valid_transitions.insert(
            JobStatus::Accepted,
            vec![JobStatus::InProgress, JobStatus::Cancelled],
        );

        valid_transitions.insert(JobStatus::InProgress, vec![JobStatus::Completed]);

        valid_transitions.insert(JobStatus::Completed, vec![]);
        valid_transitions.insert(JobStatus::Cancelled, vec![]);

        Self { valid_transitions }
    }

    /// Check if a transition between two statuses is allowed.
    pub fn can_transition(&self, from: JobStatus, to: JobStatus) -> bool {
        self.valid_transitions
            .get(&from)
            .map(|targets| targets.contains(&to))
            .unwrap_or(false)
    }

    /// Statuses reachable from `from`.
    pub fn targets(&self, from: JobStatus) -> &[JobStatus] {
        self.valid_transitions
            .get(&from)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for JobLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        let lifecycle = JobLifecycle::new();

        // Open transitions
        assert!(lifecycle.can_transition(JobStatus::Open, JobStatus::Accepted));
        assert!(lifecycle.can_transition(JobStatus::Open, JobStatus::Cancelled));
        assert!(!lifecycle.can_transition(JobStatus::Open, JobStatus::InProgress));
        assert!(!lifecycle.can_transition(JobStatus::Open, JobStatus::Completed));

        // Accepted transitions
        assert!(lifecycle.can_transition(JobStatus::Accepted, JobStatus::InProgress));
        assert!(lifecycle.can_transition(JobStatus::Accepted, JobStatus::Cancelled));
        assert!(!lifecycle.can_transition(JobStatus::Accepted, JobStatus::Completed));
        assert!(!lifecycle.can_transition(JobStatus::Accepted, JobStatus::Open));

        // InProgress transitions
        assert!(lifecycle.can_transition(JobStatus::InProgress, JobStatus::Completed));
        assert!(!lifecycle.can_transition(JobStatus::InProgress, JobStatus::Cancelled));

        // Terminal states
        assert!(!lifecycle.can_transition(JobStatus::Completed, JobStatus::Open));
        assert!(!lifecycle.can_transition(JobStatus::Cancelled, JobStatus::Open));
        assert!(!lifecycle.can_transition(JobStatus::Cancelled, JobStatus::Accepted));
    }

    #[test]
    fn test_no_self_transitions() {
        let lifecycle = JobLifecycle::new();
        for status in [
            JobStatus::Open,
            JobStatus::Accepted,
            JobStatus::InProgress,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            assert!(!lifecycle.can_transition(status, status));
        }
    }

    #[test]
    fn test_targets() {
        let lifecycle = JobLifecycle::new();
        assert_eq!(
            lifecycle.targets(JobStatus::Open),
            &[JobStatus::Accepted, JobStatus::Cancelled]
        );
        assert!(lifecycle.targets(JobStatus::Completed).is_empty());
    }
}
