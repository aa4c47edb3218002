//! Clock model - accelerated day/hour/minute game time

use serde::{Deserialize, Serialize};

use crate::config::ClockConfig;

const MINUTES_PER_DAY: u64 = 24 * 60;

/// Persisted clock fields. Signed so out-of-range saves still parse and
/// get clamped instead of rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
}

/// What the time bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub is_night: bool,
}

impl ClockReading {
    pub fn display(&self) -> String {
        format!("Day {}, {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

#[derive(Debug, Clone)]
pub struct ClockModel {
    day: u32,
    hour: u32,
    minute: u32,
    /// Fractional game minutes not yet applied
    carry_minutes: f64,
    config: ClockConfig,
}

impl ClockModel {
    pub fn new(config: ClockConfig) -> Self {
        let mut clock = Self {
            day: 1,
            hour: 0,
            minute: 0,
            carry_minutes: 0.0,
            config,
        };
        clock.set_time(
            config.start_day as i64,
            config.start_hour as i64,
            config.start_minute as i64,
        );
        clock
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Advance by `delta_ms` of real time
    pub fn update(&mut self, delta_ms: f32) {
        let seconds = f64::from(delta_ms.max(0.0)) / 1000.0;
        self.carry_minutes += seconds * self.config.game_minutes_per_real_second;

        let whole = self.carry_minutes.floor();
        if whole >= 1.0 {
            self.carry_minutes -= whole;
            self.advance_minutes(whole as u64);
        }
        if !self.carry_minutes.is_finite() {
            self.carry_minutes = 0.0;
        }
    }

    /// Cascade minutes into hours and days. Whole days are taken off first
    /// so the cascade runs at most a day's worth of hours.
    pub fn advance_minutes(&mut self, minutes: u64) {
        let total = u64::from(self.minute).saturating_add(minutes);
        self.add_days(total / MINUTES_PER_DAY);

        let mut minute = total % MINUTES_PER_DAY;
        while minute >= 60 {
            minute -= 60;
            self.hour += 1;
            if self.hour >= 24 {
                self.hour -= 24;
                self.add_days(1);
            }
        }
        self.minute = minute as u32;
    }

    /// Day count saturates at `u32::MAX`
    fn add_days(&mut self, days: u64) {
        self.day = u32::try_from(u64::from(self.day).saturating_add(days)).unwrap_or(u32::MAX);
    }

    /// Set the time, clamping each field, and drop any fractional carry
    pub fn set_time(&mut self, day: i64, hour: i64, minute: i64) {
        self.day = day.clamp(1, i64::from(u32::MAX)) as u32;
        self.hour = hour.clamp(0, 23) as u32;
        self.minute = minute.clamp(0, 59) as u32;
        self.carry_minutes = 0.0;
    }

    pub fn is_night_time(&self) -> bool {
        self.hour >= self.config.night_start_hour || self.hour < self.config.day_start_hour
    }

    pub fn is_day_time(&self) -> bool {
        !self.is_night_time()
    }

    pub fn reading(&self) -> ClockReading {
        ClockReading {
            day: self.day,
            hour: self.hour,
            minute: self.minute,
            is_night: self.is_night_time(),
        }
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            day: i64::from(self.day),
            hour: i64::from(self.hour),
            minute: i64::from(self.minute),
        }
    }

    pub fn restore(&mut self, snapshot: ClockSnapshot) {
        self.set_time(snapshot.day, snapshot.hour, snapshot.minute);
    }
}
