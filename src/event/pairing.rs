use chrono::{DateTime, Utc};

use crate::predict::{Marker, MarkerKind};

/// A matched rise/set pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingState {
    Idle,
    Pending(DateTime<Utc>),
}

/// Turns a chronological marker stream into AOS/LOS intervals.
///
/// Passes that do not both start and end inside the stream are dropped: a set
/// with no pending rise is ignored, and a rise still pending when the stream
/// ends never produces an interval.
#[derive(Debug)]
pub struct Pairer {
    state: PairingState,
}

impl Default for Pairer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pairer {
    pub fn new() -> Self {
        Self {
            state: PairingState::Idle,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> PairingState {
        self.state
    }

    pub fn feed(&mut self, marker: &Marker) -> Option<Interval> {
        match (self.state, marker.kind) {
            (_, MarkerKind::Culmination) => None,
            (PairingState::Idle, MarkerKind::Rise) => {
                self.state = PairingState::Pending(marker.at);
                None
            }
            (PairingState::Pending(previous), MarkerKind::Rise) => {
                log::debug!("Rise at {} superseded by rise at {}", previous, marker.at);
                self.state = PairingState::Pending(marker.at);
                None
            }
            (PairingState::Idle, MarkerKind::Set) => {
                log::debug!("Ignoring set at {} with no pending rise", marker.at);
                None
            }
            (PairingState::Pending(aos), MarkerKind::Set) => {
                self.state = PairingState::Idle;
                Some(Interval { aos, los: marker.at })
            }
        }
    }

    /// Consume the pairer, returning the rise that never saw a set.
    pub fn finish(self) -> Option<DateTime<Utc>> {
        match self.state {
            PairingState::Idle => None,
            PairingState::Pending(aos) => {
                log::debug!("Dropping pass rising at {} with no set", aos);
                Some(aos)
            }
        }
    }
}

pub fn pair_markers(markers: &[Marker]) -> Vec<Interval> {
    let mut pairer = Pairer::new();
    let intervals = markers
        .iter()
        .filter_map(|marker| pairer.feed(marker))
        .collect();
    pairer.finish();
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::t;

    fn rise(s: i64) -> Marker {
        Marker::new(t(s), MarkerKind::Rise)
    }

    fn culm(s: i64) -> Marker {
        Marker::new(t(s), MarkerKind::Culmination)
    }

    fn set(s: i64) -> Marker {
        Marker::new(t(s), MarkerKind::Set)
    }

    #[test]
    fn single_pass() {
        let intervals = pair_markers(&[rise(0), set(600)]);
        assert_eq!(
            intervals,
            vec![Interval {
                aos: t(0),
                los: t(600)
            }]
        );
    }

    #[test]
    fn trailing_rise_is_dropped() {
        let intervals = pair_markers(&[rise(0), culm(60), set(600), rise(700)]);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].los, t(600));
    }

    #[test]
    fn leading_set_is_ignored() {
        let intervals = pair_markers(&[set(30), rise(100), culm(300), set(500)]);
        assert_eq!(
            intervals,
            vec![Interval {
                aos: t(100),
                los: t(500)
            }]
        );
    }

    #[test]
    fn culmination_does_not_change_state() {
        let mut pairer = Pairer::new();
        assert_eq!(pairer.feed(&culm(0)), None);
        assert_eq!(pairer.state(), PairingState::Idle);
        pairer.feed(&rise(10));
        pairer.feed(&culm(20));
        assert_eq!(pairer.state(), PairingState::Pending(t(10)));
        assert_eq!(pairer.finish(), Some(t(10)));
    }

    #[test]
    fn repeated_rise_keeps_the_latest() {
        let intervals = pair_markers(&[rise(0), rise(50), set(100)]);
        assert_eq!(intervals[0].aos, t(50));
    }

    #[test]
    fn intervals_are_ordered_and_disjoint() {
        let mut markers = Vec::new();
        markers.push(set(5));
        for orbit in 0..12 {
            let base = 200 + orbit * 5_580;
            markers.extend([rise(base), culm(base + 300), set(base + 610)]);
        }
        markers.push(rise(100_000));

        let intervals = pair_markers(&markers);
        assert_eq!(intervals.len(), 12);
        assert!(intervals.iter().all(|i| i.aos < i.los));
        assert!(intervals.windows(2).all(|w| w[0].los <= w[1].aos));
    }
}
