use std::time::{Duration, Instant};

use strum::Display;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TransitionStage {
    #[default]
    Exited,
    Entering,
    Entered,
    Exiting,
}

/// Enter/exit lifecycle keyed off the open flag. Time is passed in so callers drive it from ticks.
#[derive(Debug, Clone)]
pub struct Transition {
    enabled: bool,
    timeout: Duration,
    stage: TransitionStage,
    since: Option<Instant>,
}

impl Transition {
    pub fn new(enabled: bool, timeout: Duration) -> Self {
        Self {
            enabled,
            timeout,
            stage: TransitionStage::Exited,
            since: None,
        }
    }

    pub fn stage(&self) -> TransitionStage {
        self.stage
    }

    /// Whether the panel is in the tree at all: open, or still animating out.
    pub fn is_mounted(&self) -> bool {
        self.stage != TransitionStage::Exited
    }

    pub fn is_animating(&self) -> bool {
        matches!(
            self.stage,
            TransitionStage::Entering | TransitionStage::Exiting
        )
    }

    pub fn set_in(&mut self, open: bool, now: Instant) {
        let next = match (self.enabled, open, self.stage) {
            (false, true, _) => TransitionStage::Entered,
            (false, false, _) => TransitionStage::Exited,
            (true, true, TransitionStage::Exited | TransitionStage::Exiting) => {
                TransitionStage::Entering
            }
            (true, false, TransitionStage::Entered | TransitionStage::Entering) => {
                TransitionStage::Exiting
            }
            (true, _, stage) => stage,
        };
        if next != self.stage {
            self.enter_stage(next, now);
        }
    }

    /// Finishes a running animation once the timeout has passed.
    pub fn tick(&mut self, now: Instant) {
        let Some(since) = self.since else {
            return;
        };
        if now.duration_since(since) < self.timeout {
            return;
        }
        match self.stage {
            TransitionStage::Entering => self.enter_stage(TransitionStage::Entered, now),
            TransitionStage::Exiting => self.enter_stage(TransitionStage::Exited, now),
            _ => self.since = None,
        }
    }

    fn enter_stage(&mut self, stage: TransitionStage, now: Instant) {
        debug!("Popover transition {} -> {stage}", self.stage);
        self.stage = stage;
        self.since = match stage {
            TransitionStage::Entering | TransitionStage::Exiting => Some(now),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(150);

    #[test]
    fn test_close_stays_mounted_for_timeout() {
        let start = Instant::now();
        let mut transition = Transition::new(true, TIMEOUT);
        transition.set_in(true, start);
        transition.tick(start + TIMEOUT);
        assert_eq!(transition.stage(), TransitionStage::Entered);

        let closed_at = start + Duration::from_secs(1);
        transition.set_in(false, closed_at);
        assert_eq!(transition.stage(), TransitionStage::Exiting);

        transition.tick(closed_at + Duration::from_millis(149));
        assert!(transition.is_mounted());

        transition.tick(closed_at + TIMEOUT);
        assert!(!transition.is_mounted());
    }

    #[test]
    fn test_without_transition_unmounts_immediately() {
        let now = Instant::now();
        let mut transition = Transition::new(false, TIMEOUT);

        transition.set_in(true, now);
        assert_eq!(transition.stage(), TransitionStage::Entered);
        transition.set_in(false, now);
        assert!(!transition.is_mounted());
    }

    #[test]
    fn test_reopen_while_exiting_enters_again() {
        let now = Instant::now();
        let mut transition = Transition::new(true, TIMEOUT);
        transition.set_in(true, now);
        transition.set_in(false, now + Duration::from_millis(50));

        transition.set_in(true, now + Duration::from_millis(60));
        assert_eq!(transition.stage(), TransitionStage::Entering);
        assert!(transition.is_animating());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(TransitionStage::Entering.to_string(), "entering");
    }
}
