/// Lifecycle of one capture session.
///
/// `Idle → Configuring → Running → (Accepted | Closed | Failed) → TornDown`,
/// with `Configuring → Failed` when the camera cannot be set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Configuring,
    Running,
    Accepted,
    Closed,
    Failed,
    TornDown,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Configuring)
                | (Configuring, Running)
                | (Configuring, Failed)
                | (Running, Accepted)
                | (Running, Closed)
                | (Running, Failed)
                | (Accepted, TornDown)
                | (Closed, TornDown)
                | (Failed, TornDown)
        )
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Configuring => "configuring",
            SessionState::Running => "running",
            SessionState::Accepted => "accepted",
            SessionState::Closed => "closed",
            SessionState::Failed => "failed",
            SessionState::TornDown => "torn down",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use SessionState::*;

    #[rstest]
    #[case(Idle, Configuring)]
    #[case(Configuring, Running)]
    #[case(Configuring, Failed)]
    #[case(Running, Accepted)]
    #[case(Running, Closed)]
    #[case(Running, Failed)]
    #[case(Accepted, TornDown)]
    #[case(Closed, TornDown)]
    #[case(Failed, TornDown)]
    fn test_allowed_transitions(#[case] from: SessionState, #[case] to: SessionState) {
        assert!(from.can_transition_to(to));
    }

    #[rstest]
    #[case(Idle, Running)]
    #[case(Configuring, Accepted)]
    #[case(Configuring, Closed)]
    #[case(Running, TornDown)]
    #[case(Accepted, Closed)]
    #[case(Closed, Accepted)]
    #[case(TornDown, Running)]
    #[case(TornDown, TornDown)]
    fn test_forbidden_transitions(#[case] from: SessionState, #[case] to: SessionState) {
        assert!(!from.can_transition_to(to));
    }
}
