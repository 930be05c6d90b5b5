// PIN gate - numeric screen-lock state machine
//
// Gates visibility of the rest of the UI. The stored PIN is compared in
// plaintext; the original design note flags this as a weakness and
// deliberately leaves it as-is.
//
// Invariant: the unlocked state is reachable iff the entered 4-digit
// sequence equals the stored PIN. A non-matching sequence holds a rejected
// state and clears the entry after a reset window.

use chrono::{DateTime, Duration, Utc};

/// PIN length accepted by the gate
pub const PIN_LEN: usize = 4;

/// How long a rejected entry is shown before the input resets (milliseconds)
pub const REJECT_RESET_MS: i64 = 2000;

fn reject_reset() -> Duration {
    Duration::milliseconds(REJECT_RESET_MS)
}

/// What a key press did to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    /// Digit accepted, entry still incomplete
    Accepted,

    /// 4th digit matched the stored PIN
    Unlocked,

    /// 4th digit completed a non-matching sequence
    Rejected,

    /// Input ignored (already unlocked, or inside the rejected window)
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Locked {
        entered: String,
        /// Set when a full sequence mismatched; cleared by tick() after the reset window
        rejected_at: Option<DateTime<Utc>>,
    },
    Unlocked,
}

#[derive(Debug, Clone)]
pub struct PinGate {
    pin: Option<String>,
    state: GateState,
}

impl PinGate {
    /// Create a gate for the stored PIN. No PIN configured means nothing to
    /// gate: the UI starts unlocked.
    pub fn new(pin: Option<String>) -> Self {
        let state = match pin {
            Some(_) => GateState::Locked {
                entered: String::new(),
                rejected_at: None,
            },
            None => GateState::Unlocked,
        };
        PinGate { pin, state }
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    /// Digits entered so far (for masked dot rendering)
    pub fn entered_len(&self) -> usize {
        match &self.state {
            GateState::Locked { entered, .. } => entered.len(),
            GateState::Unlocked => 0,
        }
    }

    /// True while a rejected sequence is displayed
    pub fn is_rejected(&self) -> bool {
        matches!(
            &self.state,
            GateState::Locked {
                rejected_at: Some(_),
                ..
            }
        )
    }

    /// Feed one key press. Non-digit characters are ignored.
    pub fn push_digit(&mut self, c: char, now: DateTime<Utc>) -> PinOutcome {
        self.tick(now);

        if !c.is_ascii_digit() {
            return PinOutcome::Ignored;
        }

        let pin = match &self.pin {
            Some(pin) => pin.clone(),
            None => return PinOutcome::Ignored,
        };

        match &mut self.state {
            GateState::Unlocked => PinOutcome::Ignored,
            GateState::Locked { rejected_at: Some(_), .. } => PinOutcome::Ignored,
            GateState::Locked {
                entered,
                rejected_at,
            } => {
                entered.push(c);
                if entered.len() < PIN_LEN {
                    return PinOutcome::Accepted;
                }

                if *entered == pin {
                    self.state = GateState::Unlocked;
                    PinOutcome::Unlocked
                } else {
                    *rejected_at = Some(now);
                    PinOutcome::Rejected
                }
            }
        }
    }

    /// Remove the last entered digit
    pub fn backspace(&mut self) {
        if let GateState::Locked {
            entered,
            rejected_at: None,
        } = &mut self.state
        {
            entered.pop();
        }
    }

    /// Advance time: clears a rejected entry once the reset window has elapsed
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let GateState::Locked {
            rejected_at: Some(at),
            ..
        } = self.state
        {
            if now.signed_duration_since(at) >= reject_reset() {
                self.state = GateState::Locked {
                    entered: String::new(),
                    rejected_at: None,
                };
            }
        }
    }

    /// Re-lock the gate (only meaningful when a PIN is configured)
    pub fn lock(&mut self) {
        if self.pin.is_some() {
            self.state = GateState::Locked {
                entered: String::new(),
                rejected_at: None,
            };
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn enter(gate: &mut PinGate, digits: &str, now: DateTime<Utc>) -> Vec<PinOutcome> {
        digits.chars().map(|c| gate.push_digit(c, now)).collect()
    }

    #[test]
    fn test_no_pin_starts_unlocked() {
        let gate = PinGate::new(None);
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_pin_starts_locked() {
        let gate = PinGate::new(Some("1234".to_string()));
        assert!(!gate.is_unlocked());
        assert_eq!(gate.entered_len(), 0);
    }

    #[test]
    fn test_correct_pin_unlocks() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let now = Utc::now();

        let outcomes = enter(&mut gate, "1234", now);
        assert_eq!(
            outcomes,
            vec![
                PinOutcome::Accepted,
                PinOutcome::Accepted,
                PinOutcome::Accepted,
                PinOutcome::Unlocked,
            ]
        );
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_wrong_pin_rejects() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let now = Utc::now();

        let outcomes = enter(&mut gate, "9999", now);
        assert_eq!(*outcomes.last().unwrap(), PinOutcome::Rejected);
        assert!(!gate.is_unlocked());
        assert!(gate.is_rejected());
    }

    #[test]
    fn test_rejected_entry_resets_after_timeout() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let t0 = Utc::now();

        enter(&mut gate, "0000", t0);
        assert!(gate.is_rejected());
        assert_eq!(gate.entered_len(), PIN_LEN);

        // before the timeout nothing changes
        gate.tick(t0 + Duration::milliseconds(500));
        assert!(gate.is_rejected());

        // after the timeout the entry clears and the gate accepts again
        gate.tick(t0 + reject_reset());
        assert!(!gate.is_rejected());
        assert_eq!(gate.entered_len(), 0);

        let t1 = t0 + reject_reset() + Duration::seconds(1);
        enter(&mut gate, "1234", t1);
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_digits_ignored_during_rejected_window() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let t0 = Utc::now();

        enter(&mut gate, "0000", t0);

        // still inside the window: digits bounce off
        let outcome = gate.push_digit('1', t0 + Duration::milliseconds(100));
        assert_eq!(outcome, PinOutcome::Ignored);
        assert!(!gate.is_unlocked());
    }

    #[test]
    fn test_push_digit_past_timeout_starts_fresh_entry() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let t0 = Utc::now();

        enter(&mut gate, "0000", t0);

        // push_digit ticks internally, so the stale rejection clears first
        let t1 = t0 + reject_reset() + Duration::seconds(1);
        assert_eq!(gate.push_digit('1', t1), PinOutcome::Accepted);
        assert_eq!(gate.entered_len(), 1);
    }

    #[test]
    fn test_non_digit_ignored() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let now = Utc::now();

        assert_eq!(gate.push_digit('x', now), PinOutcome::Ignored);
        assert_eq!(gate.entered_len(), 0);
    }

    #[test]
    fn test_backspace() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let now = Utc::now();

        enter(&mut gate, "12", now);
        assert_eq!(gate.entered_len(), 2);

        gate.backspace();
        assert_eq!(gate.entered_len(), 1);

        gate.backspace();
        gate.backspace(); // empty entry is a no-op
        assert_eq!(gate.entered_len(), 0);
    }

    #[test]
    fn test_lock_after_unlock() {
        let mut gate = PinGate::new(Some("1234".to_string()));
        let now = Utc::now();

        enter(&mut gate, "1234", now);
        assert!(gate.is_unlocked());

        gate.lock();
        assert!(!gate.is_unlocked());
        assert_eq!(gate.entered_len(), 0);
    }

    #[test]
    fn test_lock_without_pin_is_noop() {
        let mut gate = PinGate::new(None);
        gate.lock();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn test_unlocked_ignores_digits() {
        let mut gate = PinGate::new(None);
        assert_eq!(gate.push_digit('1', Utc::now()), PinOutcome::Ignored);
    }
}
