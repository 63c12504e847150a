//! Timing data produced by one update pass.

use std::time::Duration;

use engine_component::{ComponentTypeId, Frame};

/// Timing for a single component system within an update pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemTiming {
    /// Key of the component type.
    pub type_id: ComponentTypeId,
    /// Name of the component type.
    pub name: &'static str,
    /// Number of enabled components the system processed.
    pub processed: usize,
    /// Wall-clock time spent in the system's update.
    pub elapsed: Duration,
}

/// Result of [`Registry::update`](crate::Registry::update).
///
/// `systems` is in registration order, which is also the order the systems ran in.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateReport {
    /// The frame that was processed.
    pub frame: Frame,
    /// Wall-clock time for the whole pass.
    pub elapsed: Duration,
    /// Per-system breakdown.
    pub systems: Vec<SystemTiming>,
}

impl UpdateReport {
    /// Total number of components processed across all systems.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.systems.iter().map(|s| s.processed).sum()
    }

    /// Names of the systems in the order they ran.
    pub fn order(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|s| s.name)
    }

    /// The slowest system of the pass, if any ran.
    #[must_use]
    pub fn slowest(&self) -> Option<&SystemTiming> {
        self.systems.iter().max_by_key(|s| s.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(name: &'static str, processed: usize, micros: u64) -> SystemTiming {
        SystemTiming {
            type_id: ComponentTypeId::from_name(name),
            name,
            processed,
            elapsed: Duration::from_micros(micros),
        }
    }

    #[test]
    fn test_report_aggregates() {
        let report = UpdateReport {
            frame: Frame::new(1, 0.5),
            elapsed: Duration::from_micros(40),
            systems: vec![timing("Position", 3, 10), timing("Velocity", 2, 25)],
        };
        assert_eq!(report.processed(), 5);
        assert_eq!(report.order().collect::<Vec<_>>(), vec!["Position", "Velocity"]);
        assert_eq!(report.slowest().map(|s| s.name), Some("Velocity"));
    }

    #[test]
    fn test_empty_report() {
        let report = UpdateReport {
            frame: Frame::new(1, 0.5),
            elapsed: Duration::ZERO,
            systems: Vec::new(),
        };
        assert_eq!(report.processed(), 0);
        assert!(report.slowest().is_none());
    }
}
