//! World ↔ screen mapping.

/// A point in either world pixels or screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Uniform scale followed by a translation:
/// `screen = world × scale + translation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Screen pixels per world pixel. Always `> 0`.
    pub scale: f64,
    /// Screen-space offset of the world origin.
    pub translation: Point,
}

impl ViewportTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Point::new(0.0, 0.0),
    };

    pub fn to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.translation.x,
            y: world.y * self.scale + self.translation.y,
        }
    }

    pub fn to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.translation.x) / self.scale,
            y: (screen.y - self.translation.y) / self.scale,
        }
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
