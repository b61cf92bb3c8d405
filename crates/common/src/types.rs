use glam::IVec3;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB color. Serializes as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Multiply each channel by `factor`, saturating at the channel limits.
    pub fn scaled(self, factor: f32) -> Rgb {
        let f = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Rgb(f(self.0), f(self.1), f(self.2))
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

/// One of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The component of `coord` along this axis.
    pub fn of(self, coord: IVec3) -> i32 {
        coord[self.index()]
    }
}

/// A closed integer interval `[lo, hi]` along one axis.
///
/// `i32::MIN` / `i32::MAX` bounds mean "unbounded" and survive offsetting, so
/// a relative query line stays infinite after it is resolved against a cell.
/// Every constructor keeps `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    lo: i32,
    hi: i32,
}

impl Extent {
    pub const UNBOUNDED: Extent = Extent {
        lo: i32::MIN,
        hi: i32::MAX,
    };

    /// Build from two bounds in either order.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn single(v: i32) -> Self {
        Self { lo: v, hi: v }
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    pub fn contains(&self, v: i32) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// The value when the extent degenerates to one coordinate.
    pub fn as_single(&self) -> Option<i32> {
        (self.lo == self.hi).then_some(self.lo)
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::UNBOUNDED
    }

    /// Number of integer values covered.
    pub fn width(&self) -> u64 {
        (self.hi as i64 - self.lo as i64 + 1) as u64
    }

    /// Shift by `by`, keeping infinite bounds infinite.
    pub fn offset(&self, by: i32) -> Self {
        let lo = if self.lo == i32::MIN {
            i32::MIN
        } else {
            self.lo.saturating_add(by)
        };
        let hi = if self.hi == i32::MAX {
            i32::MAX
        } else {
            self.hi.saturating_add(by)
        };
        Self { lo, hi }
    }

    pub fn intersect(&self, other: &Extent) -> Option<Extent> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Extent { lo, hi })
    }
}

/// A closed axis-aligned box of grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellBox {
    pub x: Extent,
    pub y: Extent,
    pub z: Extent,
}

impl CellBox {
    /// Box spanning `[min(x1,x2), max(x1,x2)] x ...`.
    pub fn new(x1: i32, x2: i32, y1: i32, y2: i32, z1: i32, z2: i32) -> Self {
        Self {
            x: Extent::new(x1, x2),
            y: Extent::new(y1, y2),
            z: Extent::new(z1, z2),
        }
    }

    pub fn from_extents(x: Extent, y: Extent, z: Extent) -> Self {
        Self { x, y, z }
    }

    pub fn point(c: IVec3) -> Self {
        Self {
            x: Extent::single(c.x),
            y: Extent::single(c.y),
            z: Extent::single(c.z),
        }
    }

    /// Cube of half-width `radius` around `center`.
    pub fn around(center: IVec3, radius: i32) -> Self {
        let r = radius.max(0);
        Self::new(
            center.x.saturating_sub(r),
            center.x.saturating_add(r),
            center.y.saturating_sub(r),
            center.y.saturating_add(r),
            center.z.saturating_sub(r),
            center.z.saturating_add(r),
        )
    }

    /// The infinite line along `axis` through the origin.
    pub fn line(axis: Axis) -> Self {
        let mut b = Self::point(IVec3::ZERO);
        *b.extent_mut(axis) = Extent::UNBOUNDED;
        b
    }

    pub fn extent(&self, axis: Axis) -> Extent {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn extent_mut(&mut self, axis: Axis) -> &mut Extent {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    pub fn contains(&self, c: IVec3) -> bool {
        self.x.contains(c.x) && self.y.contains(c.y) && self.z.contains(c.z)
    }

    /// Translate a box given relative to a cell into absolute coordinates.
    pub fn offset(&self, by: IVec3) -> Self {
        Self {
            x: self.x.offset(by.x),
            y: self.y.offset(by.y),
            z: self.z.offset(by.z),
        }
    }

    pub fn intersect(&self, other: &CellBox) -> Option<CellBox> {
        Some(Self {
            x: self.x.intersect(&other.x)?,
            y: self.y.intersect(&other.y)?,
            z: self.z.intersect(&other.z)?,
        })
    }
}

/// One of the three phases of an automaton tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Cells announce themselves, typically by spawning placeholders.
    Signal,
    /// Cells count their neighborhood into rule-local state.
    Observe,
    /// Cells apply their fate from the observed count.
    Transition,
}

impl Phase {
    /// Phase of the given cycle number (`cycle mod 3`).
    pub fn from_cycle(cycle: u64) -> Self {
        match cycle % 3 {
            0 => Phase::Signal,
            1 => Phase::Observe,
            _ => Phase::Transition,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Phase::Signal => 0,
            Phase::Observe => 1,
            Phase::Transition => 2,
        }
    }
}
