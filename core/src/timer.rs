use core::time::Duration;
use serde::{Deserialize, Serialize};

/// How often the host should deliver a tick while the timer runs.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Seconds a game may run before it is lost on time.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;

/// Stamp handed out when the timer starts. Ticks carrying an older stamp are
/// dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u64);

/// Tracks whether ticks should be accepted. Wall time is owned by the host, which
/// schedules one tick per [`TICK_INTERVAL`] with the token from [`start`].
///
/// Every start and stop moves to a new epoch, so a tick scheduled for an earlier
/// run can never be mistaken for a current one.
///
/// [`start`]: TimerDriver::start
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDriver {
    epoch: u64,
    running: bool,
}

impl TimerDriver {
    pub fn start(&mut self) -> TickToken {
        self.epoch = self.epoch.wrapping_add(1);
        self.running = true;
        TickToken(self.epoch)
    }

    pub fn stop(&mut self) {
        if self.running {
            self.epoch = self.epoch.wrapping_add(1);
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn token(&self) -> Option<TickToken> {
        self.running.then_some(TickToken(self.epoch))
    }

    pub fn accepts(&self, token: TickToken) -> bool {
        self.running && token.0 == self.epoch
    }

    /// A stopped driver for a replacement session. No token issued by `self`
    /// will be accepted by it.
    pub fn successor(&self) -> Self {
        Self {
            epoch: self.epoch.wrapping_add(1),
            running: false,
        }
    }
}

/// How close the clock is to running out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimePressure {
    Calm,
    Warning,
    Critical,
}

impl TimePressure {
    pub const fn from_remaining(remaining_secs: u32) -> Self {
        match remaining_secs {
            0..=30 => Self::Critical,
            31..=60 => Self::Warning,
            _ => Self::Calm,
        }
    }
}
