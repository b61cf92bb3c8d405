use cellspace_common::{CellBox, Phase, Rgb};
use glam::IVec3;
use std::collections::BTreeSet;
use std::fmt;

use crate::world::{Cell, CellId, VoxelWorld};

/// Name of a rule variant, used for type queries and cataloguing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKind(&'static str);

impl RuleKind {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Behavior of a cell.
///
/// The engine calls [`run`](Rule::run) once per cycle with the cycle's
/// phase. A rule only ever acts through its [`CellContext`], whose offsets are
/// relative to the executing cell.
pub trait Rule: fmt::Debug {
    fn kind(&self) -> RuleKind;

    /// Further kinds this rule answers to in type tests (an alive anchor is
    /// also alive).
    fn answers_to(&self) -> &'static [RuleKind] {
        &[]
    }

    /// Color given to cells spawned with this rule; white when `None`.
    fn color(&self) -> Option<Rgb> {
        None
    }

    /// Relative offsets this rule inspects or spawns into.
    fn neighborhood(&self) -> Vec<IVec3> {
        Vec::new()
    }

    fn run(&mut self, ctx: &mut CellContext<'_>, phase: Phase);
}

/// The world as seen from the executing cell.
///
/// Every coordinate argument is an offset from the cell, and every query
/// excludes the cell itself. Tag operations only touch the executing cell.
pub struct CellContext<'w> {
    world: &'w mut VoxelWorld,
    id: CellId,
    origin: IVec3,
}

impl<'w> CellContext<'w> {
    pub(crate) fn new(world: &'w mut VoxelWorld, id: CellId, origin: IVec3) -> Self {
        Self { world, id, origin }
    }

    /// Absolute coordinate of the executing cell.
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    /// False once the cell has deleted or replaced itself.
    pub fn is_alive(&self) -> bool {
        self.world.contains_id(self.id)
    }

    /// Spawn a cell at `offset`. Silently ignored if occupied.
    pub fn spawn<R: Rule + 'static>(&mut self, offset: IVec3, rule: R) -> bool {
        self.world.spawn(self.origin + offset, rule).is_some()
    }

    /// Type test at `offset`; `None` when nothing is there.
    pub fn is_kind(&self, offset: IVec3, kind: RuleKind) -> Option<bool> {
        self.world.is_kind_at(self.origin + offset, kind)
    }

    pub fn query_box(&self, relative: &CellBox) -> Vec<&Cell> {
        self.world
            .query_cells(&relative.offset(self.origin), Some(self.id))
    }

    pub fn kinds_in_box(&self, relative: &CellBox) -> BTreeSet<RuleKind> {
        self.world
            .kinds_in_box(&relative.offset(self.origin), Some(self.id))
    }

    pub fn tags_in_box(&self, relative: &CellBox) -> BTreeSet<String> {
        self.world
            .tags_in_box(&relative.offset(self.origin), Some(self.id))
    }

    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        self.world.add_tag(self.id, tag.into())
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.world.remove_tag(self.id, tag)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.world.get(self.id).is_some_and(|c| c.has_tag(tag))
    }

    /// Remove the executing cell.
    pub fn delete_self(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.world.delete(self.origin)
    }

    /// Delete the executing cell and spawn `rule` in its place.
    pub fn replace_self<R: Rule + 'static>(&mut self, rule: R) -> bool {
        self.delete_self();
        self.world.spawn(self.origin, rule).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutomatonEngine;
    use cellspace_common::Axis;

    const SCOUT: RuleKind = RuleKind::new("scout");
    const SEED: RuleKind = RuleKind::new("seed");

    /// Records what it sees on its first run.
    #[derive(Debug, Default)]
    struct Scout {
        seen_line: usize,
        seen_tags: BTreeSet<String>,
        had_own_tag: bool,
    }

    impl Rule for Scout {
        fn kind(&self) -> RuleKind {
            SCOUT
        }
        fn run(&mut self, ctx: &mut CellContext<'_>, _phase: Phase) {
            ctx.add_tag("me");
            self.had_own_tag = ctx.has_tag("me");
            self.seen_line = ctx.query_box(&CellBox::line(Axis::X)).len();
            self.seen_tags = ctx.tags_in_box(&CellBox::line(Axis::X));
        }
    }

    #[derive(Debug)]
    struct Seed;

    impl Rule for Seed {
        fn kind(&self) -> RuleKind {
            SEED
        }
        fn run(&mut self, ctx: &mut CellContext<'_>, _phase: Phase) {
            ctx.add_tag("seed");
            ctx.spawn(IVec3::Y, Seed);
            ctx.replace_self(Scout::default());
        }
    }

    #[test]
    fn offsets_resolve_against_the_executing_cell() {
        let mut world = VoxelWorld::new();
        world.spawn(IVec3::new(10, 5, 0), Seed);
        AutomatonEngine::new().cycle(&mut world);

        // replaced in place, and its spawn landed one above
        assert_eq!(world.cell_at(IVec3::new(10, 5, 0)).unwrap().kind(), SCOUT);
        assert_eq!(world.cell_at(IVec3::new(10, 6, 0)).unwrap().kind(), SEED);
        // the replacement starts with a fresh tag set
        assert!(world.cell_at(IVec3::new(10, 5, 0)).unwrap().tags().is_empty());
    }

    #[test]
    fn queries_exclude_self_and_tags_stay_local() {
        let mut world = VoxelWorld::new();
        world.spawn(IVec3::ZERO, Scout::default());
        world.spawn(IVec3::new(3, 0, 0), Scout::default());
        world.spawn(IVec3::new(0, 1, 0), Scout::default());
        AutomatonEngine::new().cycle(&mut world);

        let origin = world.cell_at(IVec3::ZERO).unwrap();
        let state = format!("{:?}", origin.rule().unwrap());
        assert!(state.contains("seen_line: 1"));
        assert!(state.contains("had_own_tag: true"));
        // the far scout ran second and saw the origin's tag
        let far = world.cell_at(IVec3::new(3, 0, 0)).unwrap();
        assert!(format!("{:?}", far.rule().unwrap()).contains("\"me\""));
        for cell in world.cells() {
            assert_eq!(cell.tags().len(), 1);
        }
    }
}
