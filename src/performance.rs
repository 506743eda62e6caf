//! # Performance and memory pressure service.
//!
//! Tracks renderer-reported animation health and host memory warnings and
//! tells the scheduler when queued low-priority work should be shed.
//!
//! The monitor is an ordinary value: the engine builder creates one per
//! engine and moves it into the scheduler, which drops it on shutdown. There
//! is no process-wide instance.
//!
//! ## Rules
//! - `on_memory_warning` always asks for shedding (`LowMemory`)
//! - `on_animation` asks for shedding (`PerformanceOptimization`) only when
//!   `frame_drops` exceeds the configured budget
//! - A budget of `0` disables performance shedding

use std::time::Duration;

use crate::config::ToastConfig;
use crate::notification::DropReason;

/// What the scheduler should do after a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pressure {
    /// Nothing to do.
    Nominal,
    /// Shed queued `Normal` items with this reason.
    Shed(DropReason),
}

/// Counters kept by [`PerformanceMonitor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceStats {
    /// Animation reports received.
    pub animation_reports: u64,
    /// Reports whose frame drops exceeded the budget.
    pub over_budget: u64,
    /// Memory warnings received.
    pub memory_warnings: u64,
    /// Most recent animation report.
    pub last_animation: Option<(u32, Duration)>,
}

/// Explicitly owned performance/memory service.
#[derive(Debug)]
pub struct PerformanceMonitor {
    frame_drop_budget: Option<u32>,
    stats: PerformanceStats,
}

impl PerformanceMonitor {
    /// Creates a monitor; `None` never sheds on animation reports.
    pub fn new(frame_drop_budget: Option<u32>) -> Self {
        Self {
            frame_drop_budget,
            stats: PerformanceStats::default(),
        }
    }

    pub fn from_config(cfg: &ToastConfig) -> Self {
        Self::new(cfg.frame_drop_budget())
    }

    /// Records one animation report.
    pub fn on_animation(&mut self, frame_drops: u32, duration: Duration) -> Pressure {
        self.stats.animation_reports += 1;
        self.stats.last_animation = Some((frame_drops, duration));
        match self.frame_drop_budget {
            Some(budget) if frame_drops > budget => {
                self.stats.over_budget += 1;
                Pressure::Shed(DropReason::PerformanceOptimization)
            }
            _ => Pressure::Nominal,
        }
    }

    /// Records a host memory warning.
    pub fn on_memory_warning(&mut self) -> Pressure {
        self.stats.memory_warnings += 1;
        Pressure::Shed(DropReason::LowMemory)
    }

    pub fn stats(&self) -> PerformanceStats {
        self.stats
    }

    /// Forgets all counters (session reset).
    pub fn reset(&mut self) {
        self.stats = PerformanceStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheds_only_over_budget() {
        let mut m = PerformanceMonitor::new(Some(30));
        assert_eq!(m.on_animation(30, Duration::from_millis(250)), Pressure::Nominal);
        assert_eq!(
            m.on_animation(31, Duration::from_millis(250)),
            Pressure::Shed(DropReason::PerformanceOptimization)
        );
        let stats = m.stats();
        assert_eq!(stats.animation_reports, 2);
        assert_eq!(stats.over_budget, 1);
        assert_eq!(stats.last_animation, Some((31, Duration::from_millis(250))));
    }

    #[test]
    fn disabled_budget_never_sheds() {
        let mut m = PerformanceMonitor::new(None);
        assert_eq!(m.on_animation(u32::MAX, Duration::ZERO), Pressure::Nominal);
    }

    #[test]
    fn memory_warning_always_sheds() {
        let mut m = PerformanceMonitor::from_config(&ToastConfig::default());
        assert_eq!(m.on_memory_warning(), Pressure::Shed(DropReason::LowMemory));
        m.reset();
        assert_eq!(m.stats(), PerformanceStats::default());
    }
}
