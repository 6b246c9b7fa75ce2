use crate::traits::{MountRequest, MountedContainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerState {
    Idle,
    Resolving,
    Unsupported,
    NoBodyContent,
    Ready,
    NoMountTarget,
    Detached,
    AlreadyMounted,
    Mounted,
}

impl PlannerState {
    // Stable labels for logs; not derived from `Debug`.
    pub fn as_str(self) -> &'static str {
        match self {
            PlannerState::Idle => "idle",
            PlannerState::Resolving => "resolving",
            PlannerState::Unsupported => "unsupported",
            PlannerState::NoBodyContent => "no-body-content",
            PlannerState::Ready => "ready",
            PlannerState::NoMountTarget => "no-mount-target",
            PlannerState::Detached => "detached",
            PlannerState::AlreadyMounted => "already-mounted",
            PlannerState::Mounted => "mounted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountReport {
    pub request: MountRequest,
    pub container: MountedContainer,

    // The container stays in the page even if rendering into it failed.
    pub render_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    Unsupported { host: String },
    NoBodyContent { host: String },
    NoMountTarget { host: String },
    Detached,
    AlreadyMounted,
    Mounted(MountReport),
}

impl MountOutcome {
    pub fn state(&self) -> PlannerState {
        match self {
            MountOutcome::Unsupported { .. } => PlannerState::Unsupported,
            MountOutcome::NoBodyContent { .. } => PlannerState::NoBodyContent,
            MountOutcome::NoMountTarget { .. } => PlannerState::NoMountTarget,
            MountOutcome::Detached => PlannerState::Detached,
            MountOutcome::AlreadyMounted => PlannerState::AlreadyMounted,
            MountOutcome::Mounted(_) => PlannerState::Mounted,
        }
    }

    pub fn report(&self) -> Option<&MountReport> {
        match self {
            MountOutcome::Mounted(report) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_mounted_outcome_carries_a_report() {
        let outcomes = [
            MountOutcome::Unsupported { host: "a.org".into() },
            MountOutcome::NoBodyContent { host: "a.org".into() },
            MountOutcome::NoMountTarget { host: "a.org".into() },
            MountOutcome::Detached,
            MountOutcome::AlreadyMounted,
        ];
        let labels: Vec<&str> = outcomes.iter().map(|o| o.state().as_str()).collect();
        assert_eq!(
            labels,
            [
                "unsupported",
                "no-body-content",
                "no-mount-target",
                "detached",
                "already-mounted"
            ]
        );
        assert!(outcomes.iter().all(|o| o.report().is_none()));
    }
}
