//! Proportional bubbles anchored at country centroids.
//!
//! [`bubble_layout`] gives the target state for the current counts.
//! [`BubbleTransitions`] animates between successive layouts: new bubbles
//! grow from zero, surviving ones move to their new radius, and bubbles whose
//! country dropped out shrink to zero before being removed.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::aggregate::CountryCounts;
use crate::projection::ProjectedFeature;
use crate::scale::SqrtScale;

/// Duration of enter and update transitions.
pub const UPDATE_DURATION: Duration = Duration::from_millis(500);

/// Duration of exit transitions.
pub const EXIT_DURATION: Duration = Duration::from_millis(400);

/// Target state of one bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub name: String,
    pub count: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

/// Lays out one bubble per country with a positive count and a centroid.
pub fn bubble_layout(counts: &CountryCounts, features: &[ProjectedFeature]) -> Vec<Bubble> {
    let centroids: HashMap<&str, (f64, f64)> = features
        .iter()
        .filter_map(|f| f.centroid.map(|c| (f.name.as_str(), c)))
        .collect();
    let scale = SqrtScale::new(counts.max() as f64);

    counts
        .iter()
        .filter(|&(_, count)| count > 0)
        .filter_map(|(name, count)| {
            let &(x, y) = centroids.get(name)?;
            Some(Bubble {
                name: name.to_string(),
                count,
                x,
                y,
                radius: scale.radius(count as f64),
            })
        })
        .collect()
}

/// A bubble as drawn at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleFrame {
    pub name: String,
    pub count: usize,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Exiting bubbles no longer respond to the pointer.
    pub exiting: bool,
}

#[derive(Debug, Clone)]
struct Track {
    count: usize,
    x: f64,
    y: f64,
    from: f64,
    to: f64,
    start: Duration,
    duration: Duration,
    exiting: bool,
}

impl Track {
    fn radius_at(&self, now: Duration) -> f64 {
        let t = progress(self.start, self.duration, now);
        self.from + (self.to - self.from) * ease_cubic_in_out(t)
    }

    fn finished(&self, now: Duration) -> bool {
        now >= self.start + self.duration
    }
}

/// Keyed enter/update/exit animation state for the bubble layer.
///
/// Time is an offset from any fixed origin chosen by the caller.
#[derive(Debug, Clone, Default)]
pub struct BubbleTransitions {
    tracks: BTreeMap<String, Track>,
}

impl BubbleTransitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts transitions from the current picture towards `target`.
    pub fn retarget(&mut self, target: &[Bubble], now: Duration) {
        let mut next = BTreeMap::new();

        for bubble in target {
            let from = self
                .tracks
                .get(&bubble.name)
                .map(|track| track.radius_at(now))
                .unwrap_or(0.0);
            next.insert(
                bubble.name.clone(),
                Track {
                    count: bubble.count,
                    x: bubble.x,
                    y: bubble.y,
                    from,
                    to: bubble.radius,
                    start: now,
                    duration: UPDATE_DURATION,
                    exiting: false,
                },
            );
        }

        for (name, track) in std::mem::take(&mut self.tracks) {
            if next.contains_key(&name) {
                continue;
            }
            let from = track.radius_at(now);
            let exiting = if track.exiting {
                track
            } else {
                Track {
                    from,
                    to: 0.0,
                    start: now,
                    duration: EXIT_DURATION,
                    exiting: true,
                    ..track
                }
            };
            next.insert(name, exiting);
        }

        self.tracks = next;
    }

    /// Samples every bubble at `now` and drops exits that have completed.
    pub fn frame(&mut self, now: Duration) -> Vec<BubbleFrame> {
        self.tracks
            .retain(|_, track| !(track.exiting && track.finished(now)));
        self.tracks
            .iter()
            .map(|(name, track)| BubbleFrame {
                name: name.clone(),
                count: track.count,
                x: track.x,
                y: track.y,
                radius: track.radius_at(now),
                exiting: track.exiting,
            })
            .collect()
    }

    /// Whether any transition is still running at `now`.
    pub fn is_animating(&self, now: Duration) -> bool {
        self.tracks.values().any(|track| !track.finished(now))
    }
}

fn progress(start: Duration, duration: Duration, now: Duration) -> f64 {
    if duration.is_zero() || now >= start + duration {
        return 1.0;
    }
    let elapsed = now.saturating_sub(start);
    elapsed.as_secs_f64() / duration.as_secs_f64()
}

fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::record::{Band, RawBand};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn bubble(name: &str, radius: f64) -> Bubble {
        Bubble {
            name: name.to_string(),
            count: 1,
            x: 10.0,
            y: 20.0,
            radius,
        }
    }

    fn radius_of(frames: &[BubbleFrame], name: &str) -> Option<f64> {
        frames.iter().find(|f| f.name == name).map(|f| f.radius)
    }

    #[test]
    fn test_layout_uses_centroids_and_sqrt_scale() {
        let bands: Vec<Band> = ["Norway", "Norway", "Norway", "Norway", "Sweden", "Atlantis"]
            .iter()
            .map(|origin| {
                Band::from_raw(RawBand {
                    band_name: "X".to_string(),
                    formed: "1990".to_string(),
                    origin: origin.to_string(),
                    ..Default::default()
                })
                .unwrap()
            })
            .collect();
        let counts = crate::aggregate::aggregate(&bands, &FilterState::new());
        let features = vec![
            ProjectedFeature { name: "Norway".to_string(), path: String::new(), centroid: Some((1.0, 2.0)) },
            ProjectedFeature { name: "Sweden".to_string(), path: String::new(), centroid: Some((3.0, 4.0)) },
            ProjectedFeature { name: "Finland".to_string(), path: String::new(), centroid: None },
        ];

        let layout = bubble_layout(&counts, &features);

        assert_eq!(layout.len(), 2);
        assert_eq!(layout[0].name, "Norway");
        assert_eq!(layout[0].radius, SqrtScale::MAX_RADIUS);
        assert_eq!((layout[1].x, layout[1].y), (3.0, 4.0));
        assert_eq!(layout[1].radius, 2.0 + 18.0 * 0.5);
    }

    #[test]
    fn test_enter_grows_from_zero() {
        let mut transitions = BubbleTransitions::new();
        transitions.retarget(&[bubble("Norway", 10.0)], ms(0));

        assert_eq!(radius_of(&transitions.frame(ms(0)), "Norway"), Some(0.0));
        assert_eq!(radius_of(&transitions.frame(ms(250)), "Norway"), Some(5.0));
        assert_eq!(radius_of(&transitions.frame(ms(500)), "Norway"), Some(10.0));
        assert!(!transitions.is_animating(ms(500)));
    }

    #[test]
    fn test_update_starts_from_current_radius() {
        let mut transitions = BubbleTransitions::new();
        transitions.retarget(&[bubble("Norway", 10.0)], ms(0));
        transitions.retarget(&[bubble("Norway", 4.0)], ms(1000));

        assert_eq!(radius_of(&transitions.frame(ms(1000)), "Norway"), Some(10.0));
        assert_eq!(radius_of(&transitions.frame(ms(1500)), "Norway"), Some(4.0));
    }

    #[test]
    fn test_exit_shrinks_then_removes() {
        let mut transitions = BubbleTransitions::new();
        transitions.retarget(&[bubble("Norway", 10.0), bubble("Sweden", 6.0)], ms(0));
        transitions.retarget(&[bubble("Norway", 10.0)], ms(1000));

        let frames = transitions.frame(ms(1200));
        let sweden = frames.iter().find(|f| f.name == "Sweden").unwrap();
        assert!(sweden.exiting);
        assert_eq!(sweden.radius, 3.0);
        assert!(transitions.is_animating(ms(1200)));

        let frames = transitions.frame(ms(1400));
        assert_eq!(radius_of(&frames, "Sweden"), None);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_reentering_bubble_grows_from_exit_radius() {
        let mut transitions = BubbleTransitions::new();
        transitions.retarget(&[bubble("Norway", 10.0)], ms(0));
        transitions.retarget(&[], ms(1000));
        transitions.retarget(&[bubble("Norway", 10.0)], ms(1200));

        let frames = transitions.frame(ms(1200));
        assert_eq!(radius_of(&frames, "Norway"), Some(5.0));
        assert!(!frames[0].exiting);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
    }
}
