use std::f64::consts::PI;
use std::fmt;

pub use euclid::{point2, vec2};

/// The unit of screen coordinates: whole pixels, with y growing downwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Px;

pub type Point = euclid::Point2D<i32, Px>;
pub type Vector = euclid::Vector2D<i32, Px>;

/// A bounding box. `min` is the top-left corner and `max` the bottom-right one.
pub type Rect = euclid::Box2D<i32, Px>;

/// A compass angle in whole degrees.
///
/// Zero points up and angles increase clockwise, so 90 is right and 180 is down. Like any
/// angle, this type doesn't differentiate between multiples of full rotations.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Angle {
    degrees: u16,
}

impl Angle {
    /// Creates an `Angle` from a number of degrees.
    ///
    /// The result doesn't change if `d` changes by a multiple of `360`.
    ///
    /// ```
    /// use libswipe::geom::Angle;
    /// assert_eq!(Angle::from_degrees(-90).to_degrees(), 270);
    /// assert_eq!(Angle::from_degrees(360).to_degrees(), 0);
    /// ```
    pub fn from_degrees(d: i32) -> Angle {
        Angle {
            degrees: d.rem_euclid(360) as u16,
        }
    }

    /// Converts an `Angle` to degrees.
    ///
    /// The result is guaranteed to be in the interval `[0, 360)`.
    pub fn to_degrees(&self) -> u16 {
        self.degrees
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}°", self.degrees)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Rounds an angle to the nearest compass direction.
    ///
    /// The quadrants are not quite symmetric: 45 and 315 both round up, 135 rounds right and
    /// 225 rounds down.
    ///
    /// ```
    /// use libswipe::geom::{Angle, Direction};
    /// assert_eq!(Direction::from_angle(Angle::from_degrees(45)), Direction::Up);
    /// assert_eq!(Direction::from_angle(Angle::from_degrees(46)), Direction::Right);
    /// assert_eq!(Direction::from_angle(Angle::from_degrees(315)), Direction::Up);
    /// ```
    pub fn from_angle(angle: Angle) -> Direction {
        match angle.to_degrees() {
            a if a <= 45 || a >= 315 => Direction::Up,
            a if a <= 135 => Direction::Right,
            a if a <= 225 => Direction::Down,
            _ => Direction::Left,
        }
    }

    pub fn to_angle(&self) -> Angle {
        use self::Direction::*;

        match *self {
            Up => Angle::from_degrees(0),
            Right => Angle::from_degrees(90),
            Down => Angle::from_degrees(180),
            Left => Angle::from_degrees(270),
        }
    }

    pub fn name(&self) -> &'static str {
        use self::Direction::*;

        match *self {
            Up => "up",
            Right => "right",
            Down => "down",
            Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The part of a region's boundary that a point is close to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// The point isn't close to any part of the boundary.
    None,
}

impl Edge {
    pub fn name(&self) -> &'static str {
        match *self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::TopLeft => "top-left",
            Edge::TopRight => "top-right",
            Edge::BottomLeft => "bottom-left",
            Edge::BottomRight => "bottom-right",
            Edge::None => "none",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finds the part of the boundary of `bounds` that `p` lies within `threshold` pixels of.
///
/// Corners are checked before sides, so a point near both the top and the left is
/// `TopLeft` and never just `Top` or `Left`. Points outside the box count as near the
/// sides they overshoot.
///
/// ```
/// use libswipe::geom::{detect_edge, point2, Edge, Rect};
/// let bounds = Rect::new(point2(0, 0), point2(100, 100));
/// assert_eq!(detect_edge(point2(3, 2), &bounds, 5), Edge::TopLeft);
/// assert_eq!(detect_edge(point2(50, 98), &bounds, 5), Edge::Bottom);
/// assert_eq!(detect_edge(point2(50, 50), &bounds, 5), Edge::None);
/// ```
pub fn detect_edge(p: Point, bounds: &Rect, threshold: i32) -> Edge {
    let t = threshold;
    let top = p.y.saturating_sub(t) <= bounds.min.y;
    let bottom = p.y.saturating_add(t) >= bounds.max.y;
    let left = p.x.saturating_sub(t) <= bounds.min.x;
    let right = p.x.saturating_add(t) >= bounds.max.x;

    if top && left {
        Edge::TopLeft
    } else if top && right {
        Edge::TopRight
    } else if bottom && left {
        Edge::BottomLeft
    } else if bottom && right {
        Edge::BottomRight
    } else if top {
        Edge::Top
    } else if bottom {
        Edge::Bottom
    } else if left {
        Edge::Left
    } else if right {
        Edge::Right
    } else {
        Edge::None
    }
}

/// Computes the compass angle of a movement.
///
/// Movements along an axis are handled exactly. Anything else goes through the arctangent
/// of the absolute slope, truncated to whole degrees, and is then placed in the right
/// quadrant. A zero vector counts as pointing down.
///
/// ```
/// use libswipe::geom::{classify_angle, vec2};
/// assert_eq!(classify_angle(vec2(0, -10)).to_degrees(), 0);
/// assert_eq!(classify_angle(vec2(10, 0)).to_degrees(), 90);
/// assert_eq!(classify_angle(vec2(50, 50)).to_degrees(), 135);
/// assert_eq!(classify_angle(vec2(-50, -50)).to_degrees(), 315);
/// ```
pub fn classify_angle(delta: Vector) -> Angle {
    let (dx, dy) = (delta.x, delta.y);

    if dx == 0 {
        return Angle::from_degrees(if dy < 0 { 0 } else { 180 });
    }
    if dy == 0 {
        return Angle::from_degrees(if dx < 0 { 270 } else { 90 });
    }

    let radians = ((dy as f64).abs() / (dx as f64).abs()).atan();
    let deg = (radians * (180.0 / PI)) as i32;

    let compass = match (dx < 0, dy < 0) {
        (true, true) => 360 - (90 - deg),
        (true, false) => 360 - deg - 90,
        (false, false) => deg + 90,
        (false, true) => 90 - deg,
    };
    Angle::from_degrees(compass)
}

/// Rounds an angle to a compass direction. See `Direction::from_angle`.
pub fn classify_direction(angle: Angle) -> Direction {
    Direction::from_angle(angle)
}
