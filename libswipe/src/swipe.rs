use std::time::Duration;

use crate::geom::{detect_edge, Angle, Direction, Edge, Point, Rect, Vector};

/// Everything we know about a single contact, from the moment it touched down until it was
/// lifted.
///
/// A `Swipe` is created by the `Recognizer` when a contact starts, and it is the payload
/// that gets passed to every gesture handler. The derived metrics are filled in when the
/// contact ends, and only the ones that make sense for the recognized gesture are set.
#[derive(Clone, Debug, PartialEq)]
pub struct Swipe {
    /// When the contact touched down.
    pub start_time: Duration,
    /// Where the contact touched down.
    pub start: Point,
    /// The last position we saw the contact at, if it moved at all.
    pub end: Option<Point>,
    /// The part of the region's boundary that the contact started close to.
    pub edge: Edge,
    /// `end - start`.
    pub delta: Option<Vector>,
    /// The length of `delta`, in whole pixels. Only set for swipes.
    pub distance: Option<i32>,
    /// How long the contact lasted. Always set once the contact has ended.
    pub duration: Option<Duration>,
    /// Pixels per millisecond. Only set for swipes.
    pub velocity: Option<f64>,
    /// Only set for swipes.
    pub angle: Option<Angle>,
    /// Only set for swipes.
    pub direction: Option<Direction>,
}

impl Swipe {
    /// Starts tracking a new contact.
    ///
    /// The edge is worked out here, against `bounds` as they are right now, and it is never
    /// recomputed.
    pub fn new(start: Point, start_time: Duration, bounds: &Rect, threshold: i32) -> Swipe {
        Swipe {
            start_time,
            start,
            end: None,
            edge: detect_edge(start, bounds, threshold),
            delta: None,
            distance: None,
            duration: None,
            velocity: None,
            angle: None,
            direction: None,
        }
    }

    /// Has the contact moved since it touched down?
    pub fn moved(&self) -> bool {
        self.end.is_some()
    }

    /// The time since touch down, or zero if `now` is somehow earlier than that.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.checked_sub(self.start_time).unwrap_or_default()
    }

    /// Fills in the length and speed of the movement.
    ///
    /// A zero duration is counted as one millisecond, so that the velocity stays finite.
    pub(crate) fn measure(&mut self, delta: Vector, duration: Duration) {
        let distance = (delta.x as f64).hypot(delta.y as f64) as i32;
        let millis = duration.as_millis().max(1) as f64;
        self.distance = Some(distance);
        self.velocity = Some(distance as f64 / millis);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{point2, vec2};

    fn bounds() -> Rect {
        Rect::new(point2(0, 0), point2(100, 100))
    }

    #[test]
    fn fresh_swipe() {
        let s = Swipe::new(point2(50, 2), Duration::from_millis(10), &bounds(), 5);
        assert_eq!(s.edge, Edge::Top);
        assert!(!s.moved());
        assert_eq!(s.delta, None);
        assert_eq!(s.duration, None);
        assert_eq!(s.angle, None);
        assert_eq!(s.direction, None);
    }

    #[test]
    fn elapsed_saturates() {
        let s = Swipe::new(point2(50, 50), Duration::from_millis(100), &bounds(), 5);
        assert_eq!(s.elapsed(Duration::from_millis(350)), Duration::from_millis(250));
        assert_eq!(s.elapsed(Duration::from_millis(50)), Duration::from_millis(0));
    }

    #[test]
    fn measure() {
        let mut s = Swipe::new(point2(50, 50), Duration::from_millis(0), &bounds(), 5);
        s.measure(vec2(30, 40), Duration::from_millis(100));
        assert_eq!(s.distance, Some(50));
        assert_eq!(s.velocity, Some(0.5));

        // The length is truncated, not rounded.
        s.measure(vec2(1, 1), Duration::from_millis(0));
        assert_eq!(s.distance, Some(1));
        assert_eq!(s.velocity, Some(1.0));
    }
}
