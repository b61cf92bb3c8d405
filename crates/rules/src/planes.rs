use cellspace_common::{Axis, CellBox};
use cellspace_kernel::CellContext;
use glam::IVec3;
use std::fmt;

/// Tag carried by anchor cells.
pub const ANCHOR_TAG: &str = "anchor";

/// An axis-aligned plane through a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Plane {
    Xy,
    Yz,
    Zx,
}

impl Plane {
    pub const ALL: [Plane; 3] = [Plane::Xy, Plane::Yz, Plane::Zx];

    /// Tag a cell carries to declare this plane.
    pub fn tag(self) -> &'static str {
        match self {
            Plane::Xy => "xy",
            Plane::Yz => "yz",
            Plane::Zx => "zx",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Plane> {
        Plane::ALL.into_iter().find(|p| p.tag() == tag)
    }

    fn bit(self) -> u8 {
        match self {
            Plane::Xy => 1,
            Plane::Yz => 2,
            Plane::Zx => 4,
        }
    }

    /// True if the plane contains lines parallel to `axis`.
    pub fn spans(self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (Plane::Xy, Axis::X | Axis::Y) | (Plane::Yz, Axis::Y | Axis::Z) | (Plane::Zx, Axis::Z | Axis::X)
        )
    }

    /// The eight in-plane Moore neighbors.
    pub fn offsets(self) -> [IVec3; 8] {
        let mut out = [IVec3::ZERO; 8];
        let mut i = 0;
        for a in -1..=1 {
            for b in -1..=1 {
                if a == 0 && b == 0 {
                    continue;
                }
                out[i] = match self {
                    Plane::Xy => IVec3::new(a, b, 0),
                    Plane::Yz => IVec3::new(0, a, b),
                    Plane::Zx => IVec3::new(a, 0, b),
                };
                i += 1;
            }
        }
        out
    }
}

/// A set of planes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlaneSet(u8);

impl PlaneSet {
    pub const EMPTY: PlaneSet = PlaneSet(0);
    pub const ALL: PlaneSet = PlaneSet(7);

    pub fn only(plane: Plane) -> Self {
        PlaneSet(plane.bit())
    }

    pub fn insert(&mut self, plane: Plane) {
        self.0 |= plane.bit();
    }

    pub fn contains(self, plane: Plane) -> bool {
        self.0 & plane.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Plane> {
        Plane::ALL.into_iter().filter(move |p| self.contains(*p))
    }

    /// Union of the planes' offsets, each listed once.
    pub fn offsets(self) -> Vec<IVec3> {
        let mut out: Vec<IVec3> = Vec::with_capacity(8 * self.len());
        for plane in self.iter() {
            for off in plane.offsets() {
                if !out.contains(&off) {
                    out.push(off);
                }
            }
        }
        out
    }
}

impl FromIterator<Plane> for PlaneSet {
    fn from_iter<I: IntoIterator<Item = Plane>>(iter: I) -> Self {
        let mut set = PlaneSet::EMPTY;
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl fmt::Debug for PlaneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Plane::tag)).finish()
    }
}

/// Decides which planes are active for a cell on a given run.
///
/// A cell's own plane tags always count. When following anchors, the tags of
/// every other cell on each of the three infinite axis lines through the cell
/// are pooled; if the pool holds an anchor tag, each plane tag in it whose
/// plane spans that line is switched on. The anchor and the plane tag may
/// come from different cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneActivation {
    follow_anchors: bool,
}

impl Default for PlaneActivation {
    fn default() -> Self {
        Self {
            follow_anchors: true,
        }
    }
}

impl PlaneActivation {
    /// Only the cell's own tags count.
    pub fn own_tags_only() -> Self {
        Self {
            follow_anchors: false,
        }
    }

    pub fn resolve(&self, ctx: &CellContext<'_>) -> PlaneSet {
        let mut active: PlaneSet = Plane::ALL
            .into_iter()
            .filter(|p| ctx.has_tag(p.tag()))
            .collect();
        if !self.follow_anchors {
            return active;
        }

        for axis in Axis::ALL {
            let tags = ctx.tags_in_box(&CellBox::line(axis));
            if !tags.contains(ANCHOR_TAG) {
                continue;
            }
            for plane in Plane::ALL {
                if plane.spans(axis) && tags.contains(plane.tag()) {
                    active.insert(plane);
                }
            }
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_lie_in_plane() {
        for off in Plane::Xy.offsets() {
            assert_eq!(off.z, 0);
            assert_ne!(off, IVec3::ZERO);
        }
        for off in Plane::Yz.offsets() {
            assert_eq!(off.x, 0);
        }
        for off in Plane::Zx.offsets() {
            assert_eq!(off.y, 0);
        }
    }

    #[test]
    fn union_offsets_are_unique() {
        // two planes share the two offsets on their common axis
        assert_eq!(PlaneSet::only(Plane::Xy).offsets().len(), 8);
        let both: PlaneSet = [Plane::Xy, Plane::Zx].into_iter().collect();
        assert_eq!(both.offsets().len(), 14);
        assert_eq!(PlaneSet::ALL.offsets().len(), 18);
        assert!(PlaneSet::EMPTY.offsets().is_empty());
    }

    #[test]
    fn planes_span_their_axes() {
        assert!(Plane::Xy.spans(Axis::X) && Plane::Xy.spans(Axis::Y));
        assert!(!Plane::Xy.spans(Axis::Z));
        assert!(Plane::Zx.spans(Axis::X) && !Plane::Zx.spans(Axis::Y));
    }

    #[test]
    fn plane_tag_names() {
        for p in Plane::ALL {
            assert_eq!(Plane::from_tag(p.tag()), Some(p));
        }
        assert_eq!(Plane::from_tag("anchor"), None);
        assert_eq!(format!("{:?}", PlaneSet::ALL), r#"{"xy", "yz", "zx"}"#);
    }
}
