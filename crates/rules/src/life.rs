use cellspace_common::{Phase, Rgb};
use cellspace_kernel::{CellContext, Rule, RuleKind};
use glam::IVec3;

use crate::planes::{ANCHOR_TAG, PlaneActivation, PlaneSet};

pub const ALIVE: RuleKind = RuleKind::new("alive");
pub const DEAD: RuleKind = RuleKind::new("dead");
pub const ALIVE_ANCHOR: RuleKind = RuleKind::new("alive-anchor");
pub const DEAD_ANCHOR: RuleKind = RuleKind::new("dead-anchor");

pub const ALIVE_COLOR: Rgb = Rgb(0, 255, 255);
pub const DEAD_COLOR: Rgb = Rgb(0, 64, 255);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vitality {
    Alive,
    Dead,
}

/// Conway's Life embedded in 3D along one or more planes through the cell.
///
/// - signal: an alive cell fills every empty active-plane neighbor with a
///   dead placeholder, so empty neighborhoods become observable;
/// - observe: count alive neighbors over the active planes;
/// - transition: alive with fewer than 2 or more than 3 dies, dead with
///   exactly 3 is born, dead with none is removed (anchors are kept).
#[derive(Debug, Clone)]
pub struct LifeCell {
    vitality: Vitality,
    anchor: bool,
    initial: PlaneSet,
    /// Planes resolved on the latest run; the initial planes before that.
    active: PlaneSet,
    activation: PlaneActivation,
    neighbor_count: usize,
    initialized: bool,
}

impl LifeCell {
    fn new(vitality: Vitality, anchor: bool, planes: PlaneSet) -> Self {
        Self {
            vitality,
            anchor,
            initial: planes,
            active: planes,
            activation: PlaneActivation::default(),
            neighbor_count: 0,
            initialized: false,
        }
    }

    pub fn alive(planes: PlaneSet) -> Self {
        Self::new(Vitality::Alive, false, planes)
    }

    pub fn dead(planes: PlaneSet) -> Self {
        Self::new(Vitality::Dead, false, planes)
    }

    pub fn alive_anchor(planes: PlaneSet) -> Self {
        Self::new(Vitality::Alive, true, planes)
    }

    pub fn dead_anchor(planes: PlaneSet) -> Self {
        Self::new(Vitality::Dead, true, planes)
    }

    /// An alive anchor on all three planes.
    pub fn universal_anchor() -> Self {
        Self::alive_anchor(PlaneSet::ALL)
    }

    pub fn with_activation(mut self, activation: PlaneActivation) -> Self {
        self.activation = activation;
        self
    }

    /// The cell that takes this one's place, keeping anchor-ness and strategy.
    fn successor(&self, vitality: Vitality, planes: PlaneSet) -> LifeCell {
        Self::new(vitality, self.anchor, planes).with_activation(self.activation)
    }

    fn tag_self(&mut self, ctx: &mut CellContext<'_>) {
        for plane in self.initial.iter() {
            ctx.add_tag(plane.tag());
        }
        if self.anchor {
            ctx.add_tag(ANCHOR_TAG);
        }
        self.initialized = true;
    }

    fn signal(&self, ctx: &mut CellContext<'_>, active: PlaneSet) {
        if self.vitality != Vitality::Alive {
            return;
        }
        for plane in active.iter() {
            for offset in plane.offsets() {
                let placeholder =
                    LifeCell::dead(PlaneSet::only(plane)).with_activation(self.activation);
                ctx.spawn(offset, placeholder);
            }
        }
    }

    fn observe(&mut self, ctx: &CellContext<'_>) {
        self.neighbor_count = self
            .neighborhood()
            .into_iter()
            .filter(|off| ctx.is_kind(*off, ALIVE) == Some(true))
            .count();
    }

    fn transition(&self, ctx: &mut CellContext<'_>, active: PlaneSet) {
        let n = self.neighbor_count;
        match self.vitality {
            Vitality::Alive if !(2..=3).contains(&n) => {
                ctx.replace_self(self.successor(Vitality::Dead, active));
            }
            Vitality::Dead if n == 3 => {
                ctx.replace_self(self.successor(Vitality::Alive, active));
            }
            Vitality::Dead if n == 0 && !self.anchor => {
                ctx.delete_self();
            }
            _ => {}
        }
    }
}

impl Rule for LifeCell {
    fn kind(&self) -> RuleKind {
        match (self.vitality, self.anchor) {
            (Vitality::Alive, false) => ALIVE,
            (Vitality::Dead, false) => DEAD,
            (Vitality::Alive, true) => ALIVE_ANCHOR,
            (Vitality::Dead, true) => DEAD_ANCHOR,
        }
    }

    fn answers_to(&self) -> &'static [RuleKind] {
        match (self.vitality, self.anchor) {
            (Vitality::Alive, true) => &[ALIVE],
            (Vitality::Dead, true) => &[DEAD],
            _ => &[],
        }
    }

    fn color(&self) -> Option<Rgb> {
        Some(match self.vitality {
            Vitality::Alive => ALIVE_COLOR,
            Vitality::Dead => DEAD_COLOR,
        })
    }

    fn neighborhood(&self) -> Vec<IVec3> {
        self.active.offsets()
    }

    fn run(&mut self, ctx: &mut CellContext<'_>, phase: Phase) {
        if !self.initialized {
            self.tag_self(ctx);
        }
        let active = self.activation.resolve(ctx);
        self.active = active;
        match phase {
            Phase::Signal => self.signal(ctx, active),
            Phase::Observe => self.observe(ctx),
            Phase::Transition => self.transition(ctx, active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Plane;
    use cellspace_kernel::{AutomatonEngine, VoxelWorld};
    use std::collections::BTreeSet;

    fn xy() -> PlaneSet {
        PlaneSet::only(Plane::Xy)
    }

    fn alive_coords(world: &VoxelWorld) -> BTreeSet<(i32, i32, i32)> {
        world
            .cells()
            .filter(|c| c.is_kind(ALIVE))
            .map(|c| (c.coord().x, c.coord().y, c.coord().z))
            .collect()
    }

    #[test]
    fn kinds_and_colors() {
        assert_eq!(LifeCell::alive(xy()).kind(), ALIVE);
        assert_eq!(LifeCell::dead(xy()).color(), Some(DEAD_COLOR));
        let anchor = LifeCell::universal_anchor();
        assert_eq!(anchor.kind(), ALIVE_ANCHOR);
        assert_eq!(anchor.answers_to(), &[ALIVE]);
        assert_eq!(anchor.color(), Some(ALIVE_COLOR));
        assert_eq!(anchor.neighborhood().len(), 18);
    }

    #[test]
    fn isolated_live_cell_dies_then_vanishes() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::ZERO, LifeCell::alive(xy()));

        engine.step(&mut world);
        let center = world.cell_at(IVec3::ZERO).unwrap();
        assert_eq!(center.kind(), DEAD);
        assert!(alive_coords(&world).is_empty());
        // the placeholders that saw the lone cell are still around
        assert_eq!(world.len(), 9);

        engine.step(&mut world);
        assert!(world.is_empty());
    }

    #[test]
    fn placeholders_fill_the_plane_during_signal() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::ZERO, LifeCell::alive(xy()));
        engine.cycle(&mut world);

        assert_eq!(world.len(), 9);
        for off in Plane::Xy.offsets() {
            let cell = world.cell_at(off).unwrap();
            assert_eq!(cell.kind(), DEAD);
        }
        assert!(world.cell_at(IVec3::Z).is_none());
    }

    #[test]
    fn blinker_oscillates() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        for x in -1..=1 {
            world.spawn(IVec3::new(x, 0, 0), LifeCell::alive(xy()));
        }
        let horizontal: BTreeSet<_> = [(-1, 0, 0), (0, 0, 0), (1, 0, 0)].into();
        let vertical: BTreeSet<_> = [(0, -1, 0), (0, 0, 0), (0, 1, 0)].into();

        engine.step(&mut world);
        assert_eq!(alive_coords(&world), vertical);
        engine.step(&mut world);
        assert_eq!(alive_coords(&world), horizontal);
        engine.step(&mut world);
        assert_eq!(alive_coords(&world), vertical);
        assert!(world.check_consistency().is_ok());
    }

    #[test]
    fn block_is_still_life() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        let block: BTreeSet<_> = [(0, 0, 0), (1, 0, 0), (0, 1, 0), (1, 1, 0)].into();
        for &(x, y, z) in &block {
            world.spawn(IVec3::new(x, y, z), LifeCell::alive(xy()));
        }
        for _ in 0..4 {
            engine.step(&mut world);
            assert_eq!(alive_coords(&world), block);
        }
    }

    #[test]
    fn dead_anchor_is_never_collected() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::ZERO, LifeCell::dead_anchor(xy()));
        world.spawn(IVec3::new(10, 10, 10), LifeCell::dead(xy()));
        engine.step(&mut world);

        assert_eq!(world.len(), 1);
        let kept = world.cell_at(IVec3::ZERO).unwrap();
        assert_eq!(kept.kind(), DEAD_ANCHOR);
        assert!(kept.has_tag(ANCHOR_TAG) && kept.has_tag("xy"));
    }

    #[test]
    fn alive_anchor_dies_into_dead_anchor() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::ZERO, LifeCell::alive_anchor(xy()));
        engine.step(&mut world);
        assert_eq!(world.cell_at(IVec3::ZERO).unwrap().kind(), DEAD_ANCHOR);
    }

    #[test]
    fn anchors_activate_planes_along_axis_lines() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        // the anchor runs first, so its tags exist when the other cell looks
        world.spawn(IVec3::ZERO, LifeCell::alive_anchor(xy()));
        let target = IVec3::new(0, 5, 0);
        world.spawn(target, LifeCell::alive(PlaneSet::only(Plane::Yz)));
        engine.cycle(&mut world);

        // (1,5,0) is only in the xy plane through the target
        assert!(world.cell_at(target + IVec3::X).is_some());
        assert!(world.cell_at(target + IVec3::Z).is_some());
    }

    #[test]
    fn own_tags_only_ignores_anchors() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::ZERO, LifeCell::alive_anchor(xy()));
        let target = IVec3::new(0, 5, 0);
        world.spawn(
            target,
            LifeCell::alive(PlaneSet::only(Plane::Yz))
                .with_activation(PlaneActivation::own_tags_only()),
        );
        engine.cycle(&mut world);

        assert!(world.cell_at(target + IVec3::X).is_none());
        assert!(world.cell_at(target + IVec3::Z).is_some());
    }

    #[test]
    fn anchor_and_plane_tags_pool_along_a_line() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        // an xy cell and a yz anchor on the target's y line, neither alone an xy anchor
        world.spawn(IVec3::new(0, 2, 0), LifeCell::alive(xy()));
        world.spawn(IVec3::new(0, -2, 0), LifeCell::alive_anchor(PlaneSet::only(Plane::Yz)));
        let target = IVec3::new(0, 8, 0);
        world.spawn(target, LifeCell::alive(PlaneSet::only(Plane::Yz)));
        engine.cycle(&mut world);

        assert!(world.cell_at(target + IVec3::X).is_some());
    }

    #[test]
    fn plane_tag_without_an_anchor_on_the_line_stays_off() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::new(0, 2, 0), LifeCell::alive(xy()));
        let target = IVec3::new(0, 8, 0);
        world.spawn(target, LifeCell::alive(PlaneSet::only(Plane::Yz)));
        engine.cycle(&mut world);

        assert!(world.cell_at(target + IVec3::X).is_none());
        assert!(world.cell_at(target + IVec3::Z).is_some());
    }

    #[test]
    fn neighborhood_follows_the_resolved_planes() {
        let mut world = VoxelWorld::new();
        let mut engine = AutomatonEngine::new();
        world.spawn(IVec3::ZERO, LifeCell::alive_anchor(xy()));
        let target = IVec3::new(0, 5, 0);
        world.spawn(target, LifeCell::alive(PlaneSet::only(Plane::Yz)));
        assert_eq!(world.cell_at(target).unwrap().rule().unwrap().neighborhood().len(), 8);

        engine.cycle(&mut world);
        // xy and yz share the two y neighbors
        let rule = world.cell_at(target).unwrap().rule().unwrap();
        assert_eq!(rule.neighborhood().len(), 14);
    }
}
