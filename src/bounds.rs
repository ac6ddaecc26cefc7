//! The cuboid the ball lives in.
//!
//! The box is centred on the origin and described by its half extent. Each of
//! its six faces is a [`Wall`]; collision is a per-axis half-space test
//! against the ball's bounding radius.
//!
//! # Example
//!
//! ```
//! use bouncebox::{Ball, Cuboid, Vec3};
//!
//! let room = Cuboid::cube(12.0);
//! let mut ball = Ball::new(Vec3::new(5.8, 0.0, 0.0), Vec3::new(25.0, 0.0, 0.0), 0.5);
//!
//! let hits = room.reflect(&mut ball);
//! assert_eq!(hits.count(), 1);
//! assert!(ball.velocity.x < 0.0);
//! ```

use glam::Vec3;

use crate::body::Ball;

/// One of the three coordinate axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in component order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index into a `Vec3`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Which end of an axis a wall sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Negative,
    Positive,
}

impl Side {
    /// `-1.0` or `1.0`.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Negative => -1.0,
            Side::Positive => 1.0,
        }
    }

    fn of(value: f32) -> Self {
        if value < 0.0 {
            Side::Negative
        } else {
            Side::Positive
        }
    }
}

/// One of the six boundary planes of the cuboid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Wall {
    pub axis: Axis,
    pub side: Side,
}

impl Wall {
    pub const RIGHT: Wall = Wall::new(Axis::X, Side::Positive);
    pub const LEFT: Wall = Wall::new(Axis::X, Side::Negative);
    pub const TOP: Wall = Wall::new(Axis::Y, Side::Positive);
    pub const BOTTOM: Wall = Wall::new(Axis::Y, Side::Negative);
    pub const BACK: Wall = Wall::new(Axis::Z, Side::Negative);
    pub const FRONT: Wall = Wall::new(Axis::Z, Side::Positive);

    /// Right, left, top, bottom, back, front.
    pub const ALL: [Wall; 6] = [
        Wall::RIGHT,
        Wall::LEFT,
        Wall::TOP,
        Wall::BOTTOM,
        Wall::BACK,
        Wall::FRONT,
    ];

    pub const fn new(axis: Axis, side: Side) -> Self {
        Self { axis, side }
    }

    /// Unit normal pointing into the box.
    pub fn normal(self) -> Vec3 {
        -self.side.sign() * self.axis.unit()
    }

    /// Plane coordinate along `axis` for a box with the given half extent.
    pub fn offset(self, half_extent: Vec3) -> f32 {
        self.side.sign() * half_extent[self.axis.index()]
    }

    /// Human-readable name, used in log output.
    pub fn name(self) -> &'static str {
        match (self.axis, self.side) {
            (Axis::X, Side::Positive) => "right",
            (Axis::X, Side::Negative) => "left",
            (Axis::Y, Side::Positive) => "top",
            (Axis::Y, Side::Negative) => "bottom",
            (Axis::Z, Side::Negative) => "back",
            (Axis::Z, Side::Positive) => "front",
        }
    }

    fn bit(self) -> u8 {
        let slot = Wall::ALL
            .iter()
            .position(|w| *w == self)
            .unwrap_or_default();
        1 << slot
    }
}

/// Set of walls the ball bounced off during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reflections {
    bits: u8,
}

impl Reflections {
    pub fn insert(&mut self, wall: Wall) {
        self.bits |= wall.bit();
    }

    pub fn contains(&self, wall: Wall) -> bool {
        self.bits & wall.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Walls hit, in [`Wall::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = Wall> + '_ {
        Wall::ALL.into_iter().filter(|w| self.contains(*w))
    }
}

/// Drawn geometry of a wall: a thin box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlab {
    pub wall: Wall,
    pub center: Vec3,
    pub size: Vec3,
}

/// Axis-aligned box centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
    pub half_extent: Vec3,
}

impl Cuboid {
    /// Box with the given full edge lengths.
    pub fn new(size: Vec3) -> Self {
        Self {
            half_extent: size * 0.5,
        }
    }

    /// Cube with edge length `size`.
    pub fn cube(size: f32) -> Self {
        Self::new(Vec3::splat(size))
    }

    /// Full edge lengths.
    pub fn size(&self) -> Vec3 {
        self.half_extent * 2.0
    }

    /// Which wall along `axis` the ball's bounding sphere pokes through, if any.
    ///
    /// The test is `|p| + r > half`, so a ball exactly touching a wall does
    /// not count.
    pub fn penetrates(&self, ball: &Ball, axis: Axis) -> Option<Side> {
        let i = axis.index();
        let p = ball.position[i];
        if p.abs() + ball.radius > self.half_extent[i] {
            Some(Side::of(p))
        } else {
            None
        }
    }

    /// Whether the ball is entirely inside the box.
    pub fn contains(&self, ball: &Ball) -> bool {
        Axis::ALL
            .iter()
            .all(|axis| self.penetrates(ball, *axis).is_none())
    }

    /// Reflect the ball's velocity off any wall it penetrates.
    ///
    /// A component is flipped only while it still points out of the box, so a
    /// ball that needs several ticks to leave the wall band is reflected once
    /// per crossing instead of every tick.
    pub fn reflect(&self, ball: &mut Ball) -> Reflections {
        let mut hits = Reflections::default();

        for axis in Axis::ALL {
            let Some(side) = self.penetrates(ball, axis) else {
                continue;
            };
            let i = axis.index();
            if ball.velocity[i] * side.sign() > 0.0 {
                ball.velocity[i] = -ball.velocity[i];
                hits.insert(Wall::new(axis, side));
            }
        }

        hits
    }

    /// Slab geometry for each wall, `thickness` thick and centred on the plane.
    pub fn wall_slabs(&self, thickness: f32) -> impl Iterator<Item = WallSlab> + '_ {
        let size = self.size();
        Wall::ALL.into_iter().map(move |wall| {
            let i = wall.axis.index();
            let mut center = Vec3::ZERO;
            center[i] = wall.offset(self.half_extent);
            let mut slab = size;
            slab[i] = thickness;
            WallSlab {
                wall,
                center,
                size: slab,
            }
        })
    }
}
