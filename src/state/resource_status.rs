/// Resource status definitions
///
/// A resource starts `Pending`, becomes `Probed` once the liveness check
/// let it through, and ends in exactly one terminal state.
use crate::MirrorError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceStatus {
    // ===== Active States =====
    /// Not yet probed
    Pending,

    /// Liveness probe passed or was inconclusive; transfer may start
    Probed,

    // ===== Terminal States =====
    /// Body written to the destination path
    Downloaded,

    /// Origin answered not-found or forbidden; never retried
    Skipped,

    /// Transient failures exhausted the retry budget
    Failed,
}

impl ResourceStatus {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Probed)
    }

    /// Returns true if a `from -> to` move is part of the lifecycle
    ///
    /// `Probed -> Probed` covers a retry that probes again after a failed transfer.
    pub fn can_transition_to(&self, to: ResourceStatus) -> bool {
        use ResourceStatus::*;
        matches!(
            (self, to),
            (Pending, Probed)
                | (Pending, Skipped)
                | (Pending, Failed)
                | (Probed, Probed)
                | (Probed, Downloaded)
                | (Probed, Skipped)
                | (Probed, Failed)
        )
    }

    /// Moves to `to`, rejecting moves outside the lifecycle
    pub fn transition(self, to: ResourceStatus) -> Result<ResourceStatus, MirrorError> {
        if self.can_transition_to(to) {
            Ok(to)
        } else {
            Err(MirrorError::InvalidTransition { from: self, to })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Probed => "probed",
            Self::Downloaded => "downloaded",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!ResourceStatus::Pending.is_terminal());
        assert!(!ResourceStatus::Probed.is_terminal());

        assert!(ResourceStatus::Downloaded.is_terminal());
        assert!(ResourceStatus::Skipped.is_terminal());
        assert!(ResourceStatus::Failed.is_terminal());
    }

    #[test]
    fn test_happy_path_transitions() {
        let status = ResourceStatus::Pending
            .transition(ResourceStatus::Probed)
            .unwrap()
            .transition(ResourceStatus::Downloaded)
            .unwrap();
        assert_eq!(status, ResourceStatus::Downloaded);
    }

    #[test]
    fn test_probe_can_skip_directly() {
        assert!(ResourceStatus::Pending.can_transition_to(ResourceStatus::Skipped));
    }

    #[test]
    fn test_download_requires_probe() {
        assert!(!ResourceStatus::Pending.can_transition_to(ResourceStatus::Downloaded));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [
            ResourceStatus::Downloaded,
            ResourceStatus::Skipped,
            ResourceStatus::Failed,
        ] {
            for to in [
                ResourceStatus::Pending,
                ResourceStatus::Probed,
                ResourceStatus::Downloaded,
                ResourceStatus::Skipped,
                ResourceStatus::Failed,
            ] {
                assert!(!from.can_transition_to(to), "{from} -> {to} allowed");
            }
        }
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = ResourceStatus::Skipped
            .transition(ResourceStatus::Downloaded)
            .unwrap_err();
        assert!(matches!(
            err,
            MirrorError::InvalidTransition {
                from: ResourceStatus::Skipped,
                to: ResourceStatus::Downloaded
            }
        ));
    }
}
