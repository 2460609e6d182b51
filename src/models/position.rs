use serde::{Deserialize, Serialize};

use super::constants::FIXED_ONE;

/// A map position in whole pixels.
/// X increases left-to-right, Y increases top-to-bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Point {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Integer Euclidean distance, rounded down.
    pub fn distance(self, other: Point) -> i32 {
        let dx = (other.x - self.x) as i64;
        let dy = (other.y - self.y) as i64;
        ((dx * dx + dy * dy) as u64).isqrt() as i32
    }

    pub fn to_exact(self) -> ExactPoint {
        ExactPoint {
            x: self.x * FIXED_ONE,
            y: self.y * FIXED_ONE,
        }
    }
}

/// A sub-pixel position, 1/256 pixel per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ExactPoint {
    pub x: i32,
    pub y: i32,
}

impl ExactPoint {
    pub fn to_point(self) -> Point {
        Point {
            x: self.x.div_euclid(FIXED_ONE),
            y: self.y.div_euclid(FIXED_ONE),
        }
    }

    /// Moves `speed` exact units toward `target`.
    /// Returns true when the target was reached this step.
    pub fn step_toward(&mut self, target: ExactPoint, speed: i32) -> bool {
        let dx = (target.x - self.x) as i64;
        let dy = (target.y - self.y) as i64;
        let remaining = ((dx * dx + dy * dy) as u64).isqrt() as i64;
        if remaining <= speed.max(0) as i64 {
            *self = target;
            return true;
        }
        self.x += (dx * speed as i64 / remaining) as i32;
        self.y += (dy * speed as i64 / remaining) as i32;
        false
    }
}

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn around(center: Point, radius: i32) -> Rect {
        Rect {
            left: center.x - radius,
            top: center.y - radius,
            right: center.x + radius,
            bottom: center.y + radius,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.left..=self.right).contains(&p.x) && (self.top..=self.bottom).contains(&p.y)
    }

    /// Distance from `p` to the closest point of the rectangle; 0 inside.
    pub fn distance_to(&self, p: Point) -> i32 {
        let x = p.x.clamp(self.left, self.right);
        let y = p.y.clamp(self.top, self.bottom);
        p.distance(Point { x, y })
    }
}

/// tan((k + 0.5) * 360 / 256 deg) * 65536, the rounding thresholds of the
/// first octant.
const TAN_THRESHOLDS: [i64; 32] = [
    804, 2414, 4026, 5644, 7268, 8901, 10545, 12202, 13874, 15564, 17273, 19005, 20762, 22546,
    24360, 26208, 28093, 30018, 31986, 34002, 36071, 38196, 40382, 42636, 44963, 47369, 49863,
    52451, 55144, 57950, 60880, 63947,
];

/// sin(k * 360 / 256 deg) * 256 for the first quarter turn.
const SIN_TABLE: [i32; 65] = [
    0, 6, 13, 19, 25, 31, 38, 44, 50, 56, 62, 68, 74, 80, 86, 92, 98, 104, 109, 115, 121, 126,
    132, 137, 142, 147, 152, 157, 162, 167, 172, 177, 181, 185, 190, 194, 198, 202, 206, 209, 213,
    216, 220, 223, 226, 229, 231, 234, 237, 239, 241, 243, 245, 247, 248, 250, 251, 252, 253, 254,
    255, 255, 256, 256, 256,
];

fn octant_steps(small: i64, large: i64) -> i32 {
    TAN_THRESHOLDS
        .iter()
        .filter(|&&t| small * 65536 > t * large)
        .count() as i32
}

/// Compass direction from `from` to `to` in 256 steps: 0 is north and the
/// value grows clockwise. Integer only, so identical on every platform.
pub fn direction_between(from: Point, to: Point) -> u8 {
    let dx = (to.x - from.x) as i64;
    let dy = (to.y - from.y) as i64;
    if dx == 0 && dy == 0 {
        return 0;
    }
    let (ax, ay) = (dx.abs(), dy.abs());
    let angle = if ax <= ay {
        octant_steps(ax, ay)
    } else {
        64 - octant_steps(ay, ax)
    };
    let direction = if dx >= 0 && dy < 0 {
        angle
    } else if dx > 0 {
        128 - angle
    } else if dy > 0 {
        128 + angle
    } else {
        256 - angle
    };
    (direction & 0xff) as u8
}

fn sin_256(direction: u8) -> i32 {
    let quarter = direction / 64;
    let rest = (direction % 64) as usize;
    match quarter {
        0 => SIN_TABLE[rest],
        1 => SIN_TABLE[64 - rest],
        2 => -SIN_TABLE[rest],
        _ => -SIN_TABLE[64 - rest],
    }
}

/// Offset of length `length` pointing toward `direction`.
pub fn direction_vector(direction: u8, length: i32) -> (i32, i32) {
    let x = sin_256(direction) * length / FIXED_ONE;
    let y = -sin_256(direction.wrapping_add(64)) * length / FIXED_ONE;
    (x, y)
}
