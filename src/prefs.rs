// User preferences - the local-storage-backed flags of the original UI
//
// Read once at startup, written on toggle through the store.

use crate::pin::PIN_LEN;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// BACKUP CADENCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupCadence {
    Off,
    Daily,
    Weekly,
    Monthly,
}

impl BackupCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupCadence::Off => "off",
            BackupCadence::Daily => "daily",
            BackupCadence::Weekly => "weekly",
            BackupCadence::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<BackupCadence> {
        match s.to_lowercase().as_str() {
            "off" => Some(BackupCadence::Off),
            "daily" => Some(BackupCadence::Daily),
            "weekly" => Some(BackupCadence::Weekly),
            "monthly" => Some(BackupCadence::Monthly),
            _ => None,
        }
    }

    /// Next cadence in the settings cycle
    pub fn next(&self) -> BackupCadence {
        match self {
            BackupCadence::Off => BackupCadence::Daily,
            BackupCadence::Daily => BackupCadence::Weekly,
            BackupCadence::Weekly => BackupCadence::Monthly,
            BackupCadence::Monthly => BackupCadence::Off,
        }
    }

    /// Interval after which a new backup is due (None for Off)
    pub fn interval(&self) -> Option<Duration> {
        match self {
            BackupCadence::Off => None,
            BackupCadence::Daily => Some(Duration::days(1)),
            BackupCadence::Weekly => Some(Duration::days(7)),
            BackupCadence::Monthly => Some(Duration::days(30)),
        }
    }
}

// ============================================================================
// PREFERENCES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Render amounts as dots (shoulder-surfing guard)
    pub blur_amounts: bool,

    /// Include fiduciary entries in totals
    pub show_fiduciary: bool,

    /// 4-digit screen-lock PIN, None when the lock is off.
    /// Stored and compared in plaintext (known weakness, kept as-is).
    pub pin: Option<String>,

    pub backup_cadence: BackupCadence,

    /// When the last backup export succeeded
    pub last_backup_at: Option<DateTime<Utc>>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            blur_amounts: false,
            show_fiduciary: false,
            pin: None,
            backup_cadence: BackupCadence::Off,
            last_backup_at: None,
        }
    }
}

impl Preferences {
    /// Set the PIN. Rejects anything that is not exactly 4 ASCII digits.
    pub fn set_pin(&mut self, pin: &str) -> Result<(), String> {
        if pin.len() != PIN_LEN || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("PIN must be exactly {} digits", PIN_LEN));
        }
        self.pin = Some(pin.to_string());
        Ok(())
    }

    pub fn clear_pin(&mut self) {
        self.pin = None;
    }

    /// A backup is due when the cadence is on and the last backup is older
    /// than the cadence interval (or never happened).
    pub fn backup_due(&self, now: DateTime<Utc>) -> bool {
        let Some(interval) = self.backup_cadence.interval() else {
            return false;
        };
        match self.last_backup_at {
            None => true,
            Some(at) => now.signed_duration_since(at) >= interval,
        }
    }

    pub fn mark_backed_up(&mut self, now: DateTime<Utc>) {
        self.last_backup_at = Some(now);
    }
}

// ============================================================================
// TESTS
// ============================================================================
