use std::time::Duration;

/// Identifies one arming of a `HoldTimer`.
///
/// Whoever schedules the timeout hands the token back when it expires; a token from an
/// earlier arming no longer matches and is ignored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TimerToken(u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerState {
    /// No timer is pending, either because none was ever armed or because it was cleared.
    Idle,
    /// The timer will fire at `deadline`.
    Armed { token: TimerToken, deadline: Duration },
    /// The timer was armed, but it was cancelled before it could fire.
    Cancelled(TimerToken),
    /// The timer went off.
    Fired(TimerToken),
}

/// The single-shot timer that tells a hold apart from a tap.
///
/// There is at most one pending timer. Arming replaces whatever was there before, and
/// cancelling, clearing or firing an already dead timer does nothing.
#[derive(Clone, Debug)]
pub struct HoldTimer {
    state: TimerState,
    next_token: u64,
}

impl HoldTimer {
    pub fn new() -> HoldTimer {
        HoldTimer {
            state: TimerState::Idle,
            next_token: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Schedules the timer to go off `delay` after `now`.
    pub fn arm(&mut self, now: Duration, delay: Duration) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.state = TimerState::Armed {
            token,
            deadline: now.saturating_add(delay),
        };
        token
    }

    /// Stops a pending timer from firing, but remembers that there was one.
    pub fn cancel(&mut self) {
        if let TimerState::Armed { token, .. } = self.state {
            debug!("hold timer cancelled");
            self.state = TimerState::Cancelled(token);
        }
    }

    /// Forgets about the timer entirely.
    pub fn clear(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Fires the timer, if `token` belongs to the armed timer.
    ///
    /// Returns `true` if it fired.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        match self.state {
            TimerState::Armed { token: armed, .. } if armed == token => {
                self.state = TimerState::Fired(token);
                true
            }
            _ => {
                trace!("ignoring stale hold timeout {:?}", token);
                false
            }
        }
    }

    /// Returns the armed timer's token and deadline.
    pub fn deadline(&self) -> Option<(TimerToken, Duration)> {
        match self.state {
            TimerState::Armed { token, deadline } => Some((token, deadline)),
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.deadline().is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.state == TimerState::Idle
    }
}

impl Default for HoldTimer {
    fn default() -> HoldTimer {
        HoldTimer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn arm_and_fire() {
        let mut t = HoldTimer::new();
        assert!(t.is_idle());
        let tok = t.arm(ms(100), ms(600));
        assert_eq!(t.deadline(), Some((tok, ms(700))));
        assert!(t.fire(tok));
        assert_eq!(t.state(), TimerState::Fired(tok));
        // Firing twice is a no-op.
        assert!(!t.fire(tok));
        assert!(!t.is_idle());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut t = HoldTimer::new();
        let tok = t.arm(ms(0), ms(600));
        t.cancel();
        t.cancel();
        assert_eq!(t.state(), TimerState::Cancelled(tok));
        assert!(!t.fire(tok));
        assert!(!t.is_armed());
    }

    #[test]
    fn stale_tokens_are_ignored() {
        let mut t = HoldTimer::new();
        let old = t.arm(ms(0), ms(600));
        let new = t.arm(ms(10), ms(600));
        assert_ne!(old, new);
        assert!(!t.fire(old));
        assert!(t.is_armed());
        assert!(t.fire(new));
    }

    #[test]
    fn clear() {
        let mut t = HoldTimer::new();
        let tok = t.arm(ms(0), ms(600));
        t.clear();
        assert!(t.is_idle());
        assert!(!t.fire(tok));
        assert_eq!(t.deadline(), None);
    }
}
