use cellspace_common::Rgb;
use cellspace_kernel::{AutomatonEngine, VoxelWorld};
use glam::IVec3;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world and engine for debugging
/// and CLI output.
pub struct WorldInspector;

impl WorldInspector {
    pub fn summary(world: &VoxelWorld, engine: &AutomatonEngine) -> WorldSummary {
        let mut kinds: BTreeMap<String, usize> = BTreeMap::new();
        let mut bounds: Option<(IVec3, IVec3)> = None;
        for cell in world.cells() {
            *kinds.entry(cell.kind().name().to_string()).or_default() += 1;
            let c = cell.coord();
            bounds = Some(match bounds {
                None => (c, c),
                Some((lo, hi)) => (lo.min(c), hi.max(c)),
            });
        }
        WorldSummary {
            cycle: engine.cycles(),
            tick: engine.ticks(),
            live: world.len(),
            kinds,
            min: bounds.map(|b| b.0),
            max: bounds.map(|b| b.1),
            spawned_total: world.spawned_total(),
            deleted_total: world.deleted_total(),
            pending_events: world.events().len(),
        }
    }

    pub fn inspect_cell(world: &VoxelWorld, coord: IVec3) -> Option<CellInfo> {
        world.cell_at(coord).map(|cell| CellInfo {
            coord,
            kind: cell.kind().name().to_string(),
            color: cell.color(),
            tags: cell.tags().iter().cloned().collect(),
            neighborhood: cell.rule().map(|r| r.neighborhood()).unwrap_or_default(),
        })
    }

    /// Coordinates of all live cells, in spawn order.
    pub fn list_cells(world: &VoxelWorld) -> Vec<IVec3> {
        world.cells().map(|c| c.coord()).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSummary {
    pub cycle: u64,
    pub tick: u64,
    pub live: usize,
    /// Live cells per rule kind.
    pub kinds: BTreeMap<String, usize>,
    pub min: Option<IVec3>,
    pub max: Option<IVec3>,
    pub spawned_total: u64,
    pub deleted_total: u64,
    pub pending_events: usize,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: tick={} cycle={} live={} spawned={} deleted={} pending_events={}",
            self.tick, self.cycle, self.live, self.spawned_total, self.deleted_total, self.pending_events
        )?;
        if let (Some(lo), Some(hi)) = (self.min, self.max) {
            write!(
                f,
                " bounds=({}, {}, {})..({}, {}, {})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            )?;
        }
        for (kind, count) in &self.kinds {
            write!(f, "\n  {kind}: {count}")?;
        }
        Ok(())
    }
}

/// Detailed info about a single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellInfo {
    pub coord: IVec3,
    pub kind: String,
    pub color: Rgb,
    pub tags: Vec<String>,
    /// Offsets the cell's rule inspects or spawns into.
    pub neighborhood: Vec<IVec3>,
}

impl fmt::Display for CellInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rgb(r, g, b) = self.color;
        write!(
            f,
            "Cell ({}, {}, {}) kind={} color=#{r:02x}{g:02x}{b:02x} tags=[{}] neighborhood={}",
            self.coord.x,
            self.coord.y,
            self.coord.z,
            self.kind,
            self.tags.join(","),
            self.neighborhood.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellspace_rules::{LifeCell, Plane, PlaneSet, Virus};

    fn xy() -> PlaneSet {
        PlaneSet::only(Plane::Xy)
    }

    #[test]
    fn summary_empty_world() {
        let summary = WorldInspector::summary(&VoxelWorld::new(), &AutomatonEngine::new());
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.live, 0);
        assert!(summary.kinds.is_empty());
        assert_eq!(summary.min, None);
        assert!(!summary.to_string().contains("bounds"));
    }

    #[test]
    fn summary_counts_kinds_and_bounds() {
        let mut world = VoxelWorld::new();
        world.spawn(IVec3::new(-2, 0, 1), LifeCell::alive(xy()));
        world.spawn(IVec3::new(3, 4, 0), LifeCell::alive(xy()));
        world.spawn(IVec3::new(0, -1, 5), Virus);
        let summary = WorldInspector::summary(&world, &AutomatonEngine::new());

        assert_eq!(summary.live, 3);
        assert_eq!(summary.kinds.get("alive"), Some(&2));
        assert_eq!(summary.kinds.get("virus"), Some(&1));
        assert_eq!(summary.min, Some(IVec3::new(-2, -1, 0)));
        assert_eq!(summary.max, Some(IVec3::new(3, 4, 5)));
        assert_eq!(summary.pending_events, 3);
        let text = summary.to_string();
        assert!(text.contains("live=3"));
        assert!(text.contains("alive: 2"));
    }

    #[test]
    fn summary_tracks_the_engine() {
        let mut world = VoxelWorld::new();
        world.spawn(IVec3::ZERO, LifeCell::alive(xy()));
        let mut engine = AutomatonEngine::new();
        engine.step(&mut world);
        let summary = WorldInspector::summary(&world, &engine);
        assert_eq!((summary.tick, summary.cycle), (1, 3));
        assert_eq!(summary.live, 9);
        assert_eq!(summary.kinds.get("dead"), Some(&9));
    }

    #[test]
    fn inspect_cell_found_and_missing() {
        let mut world = VoxelWorld::new();
        world.spawn(IVec3::new(1, 2, 3), Virus);
        let info = WorldInspector::inspect_cell(&world, IVec3::new(1, 2, 3)).unwrap();
        assert_eq!(info.kind, "virus");
        assert!(info.to_string().contains("color=#00ff7f"));
        assert_eq!(info.neighborhood.len(), 6);
        assert!(info.to_string().ends_with("neighborhood=6"));
        assert!(WorldInspector::inspect_cell(&world, IVec3::ZERO).is_none());
        assert_eq!(WorldInspector::list_cells(&world), vec![IVec3::new(1, 2, 3)]);
    }
}
