use cellspace_common::{Axis, CellBox, Phase, Rgb};
use glam::IVec3;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;

use crate::rule::{Rule, RuleKind};

/// Handle to a cell slot in the world arena.
///
/// The generation makes stale handles harmless: once a cell is deleted its
/// handle never resolves again, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    index: u32,
    generation: u32,
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A record produced by every mutation to the world.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// A cell was created at `coord`.
    Spawned { coord: IVec3, kind: RuleKind },
    /// The cell at `coord` was removed.
    Deleted { coord: IVec3, kind: RuleKind },
    /// The world was emptied wholesale.
    Cleared { removed: usize },
    /// The engine completed one cycle over the population.
    Cycled { cycle: u64, phase: Phase, live: usize },
}

/// Events kept before the oldest ones are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// Bounded FIFO of world events. Once full, recording a new event drops the
/// oldest one.
#[derive(Debug)]
struct EventLog {
    events: VecDeque<WorldEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
            capacity: DEFAULT_EVENT_CAPACITY,
            dropped: 0,
        }
    }
}

impl EventLog {
    fn push(&mut self, event: WorldEvent) {
        if self.capacity == 0 {
            self.dropped += 1;
            return;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.events.len() > capacity {
            self.events.pop_front();
            self.dropped += 1;
        }
    }
}

/// A live cell: coordinate, color, tags and the rule that drives it.
pub struct Cell {
    coord: IVec3,
    color: Rgb,
    tags: BTreeSet<String>,
    kind: RuleKind,
    answers_to: &'static [RuleKind],
    /// Empty only while the rule is executing.
    rule: Option<Box<dyn Rule>>,
}

impl Cell {
    pub fn coord(&self) -> IVec3 {
        self.coord
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// True if the cell's rule is `kind` or declares that it answers to it.
    pub fn is_kind(&self, kind: RuleKind) -> bool {
        self.kind == kind || self.answers_to.contains(&kind)
    }

    pub fn rule(&self) -> Option<&dyn Rule> {
        self.rule.as_deref()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("coord", &self.coord)
            .field("kind", &self.kind)
            .field("color", &self.color)
            .field("tags", &self.tags)
            .finish()
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    cell: Option<Cell>,
}

/// The authoritative sparse voxel world.
///
/// Cells live in a generational arena. The coordinate map and the three
/// per-axis indices (axis value -> cells sharing it) only hold [`CellId`]s.
/// `order` is the live-cell enumeration in spawn order; deleted entries are
/// dropped lazily.
#[derive(Debug, Default)]
pub struct VoxelWorld {
    slots: Vec<Slot>,
    free: Vec<u32>,
    by_coord: HashMap<IVec3, CellId>,
    axes: [BTreeMap<i32, BTreeSet<CellId>>; 3],
    order: Vec<CellId>,
    stale: usize,
    horizon: Option<CellBox>,
    spawned_total: u64,
    deleted_total: u64,
    event_log: EventLog,
}

impl VoxelWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live cells.
    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    /// Cells spawned since the world was created.
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Cells deleted since the world was created, including by `clear`.
    pub fn deleted_total(&self) -> u64 {
        self.deleted_total
    }

    /// Pending events, oldest first.
    pub fn events(&self) -> &VecDeque<WorldEvent> {
        &self.event_log.events
    }

    /// Drain and return the pending events.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.event_log.events.drain(..).collect()
    }

    /// Most events kept pending; older ones are dropped first.
    pub fn event_capacity(&self) -> usize {
        self.event_log.capacity
    }

    pub fn set_event_capacity(&mut self, capacity: usize) {
        self.event_log.set_capacity(capacity);
    }

    /// Events dropped because the log was full.
    pub fn dropped_events(&self) -> u64 {
        self.event_log.dropped
    }

    /// Restrict every query to `horizon`. `None` lifts the restriction.
    pub fn set_horizon(&mut self, horizon: Option<CellBox>) {
        self.horizon = horizon;
    }

    pub fn horizon(&self) -> Option<CellBox> {
        self.horizon
    }

    /// Exact lookup, ignoring the horizon.
    pub fn cell_at(&self, coord: IVec3) -> Option<&Cell> {
        self.by_coord.get(&coord).and_then(|id| self.get(*id))
    }

    pub fn id_at(&self, coord: IVec3) -> Option<CellId> {
        self.by_coord.get(&coord).copied()
    }

    pub fn is_occupied(&self, coord: IVec3) -> bool {
        self.by_coord.contains_key(&coord)
    }

    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.cell.as_ref())
    }

    fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.cell.as_mut())
    }

    pub fn contains_id(&self, id: CellId) -> bool {
        self.get(id).is_some()
    }

    /// Live cells in spawn order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Handles of the live cells in spawn order.
    pub fn live_ids(&self) -> Vec<CellId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.contains_id(*id))
            .collect()
    }

    /// Create a cell at `coord` driven by `rule`.
    ///
    /// Returns `None` without touching anything if `coord` is occupied.
    pub fn spawn<R: Rule + 'static>(&mut self, coord: IVec3, rule: R) -> Option<CellId> {
        if self.is_occupied(coord) {
            return None;
        }
        self.spawn_boxed(coord, Box::new(rule))
    }

    /// Like [`spawn`](Self::spawn) for an already boxed rule.
    pub fn spawn_boxed(&mut self, coord: IVec3, rule: Box<dyn Rule>) -> Option<CellId> {
        if self.is_occupied(coord) {
            return None;
        }
        let kind = rule.kind();
        let cell = Cell {
            coord,
            color: rule.color().unwrap_or(Rgb::WHITE),
            tags: BTreeSet::new(),
            kind,
            answers_to: rule.answers_to(),
            rule: Some(rule),
        };

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.cell = Some(cell);
                CellId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    cell: Some(cell),
                });
                CellId {
                    index,
                    generation: 0,
                }
            }
        };

        self.by_coord.insert(coord, id);
        for axis in Axis::ALL {
            self.axes[axis.index()]
                .entry(axis.of(coord))
                .or_default()
                .insert(id);
        }
        self.order.push(id);
        self.spawned_total += 1;
        self.record(WorldEvent::Spawned { coord, kind });
        tracing::trace!(?coord, kind = kind.name(), %id, "spawned cell");
        Some(id)
    }

    /// Remove the cell at `coord`. Returns false if there was none.
    pub fn delete(&mut self, coord: IVec3) -> bool {
        let Some(id) = self.by_coord.remove(&coord) else {
            return false;
        };
        for axis in Axis::ALL {
            let index = &mut self.axes[axis.index()];
            let key = axis.of(coord);
            if let Some(bucket) = index.get_mut(&key) {
                bucket.remove(&id);
                if bucket.is_empty() {
                    index.remove(&key);
                }
            }
        }

        let slot = &mut self.slots[id.index as usize];
        let kind = slot.cell.take().map(|c| c.kind);
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        self.stale += 1;
        if self.stale > 32 && self.stale * 2 > self.order.len() {
            self.compact_order();
        }

        self.deleted_total += 1;
        if let Some(kind) = kind {
            self.record(WorldEvent::Deleted { coord, kind });
            tracing::trace!(?coord, kind = kind.name(), %id, "deleted cell");
        }
        true
    }

    /// Remove every cell. Map, arena, indices and order are emptied together.
    pub fn clear(&mut self) {
        let removed = self.len();
        let horizon = self.horizon;
        let (spawned_total, deleted_total) = (self.spawned_total, self.deleted_total);
        let events = std::mem::take(&mut self.event_log);
        *self = Self {
            horizon,
            spawned_total,
            deleted_total: deleted_total + removed as u64,
            event_log: events,
            ..Self::default()
        };
        self.record(WorldEvent::Cleared { removed });
        tracing::debug!(removed, "world cleared");
    }

    fn compact_order(&mut self) {
        let slots = &self.slots;
        self.order.retain(|id| {
            slots
                .get(id.index as usize)
                .is_some_and(|s| s.generation == id.generation && s.cell.is_some())
        });
        self.stale = 0;
    }

    fn clip(&self, bx: &CellBox) -> Option<CellBox> {
        match &self.horizon {
            Some(h) => bx.intersect(h),
            None => Some(*bx),
        }
    }

    /// True if `coord` lies inside the horizon (always true without one).
    pub fn is_visible(&self, coord: IVec3) -> bool {
        self.horizon.is_none_or(|h| h.contains(coord))
    }

    /// All cells inside `bx` (and the horizon), except `exclude`.
    ///
    /// Candidates come from the smallest bucket of a degenerate axis, else
    /// from a range over the narrowest bounded axis, else from a full scan.
    /// The result set always equals [`query_box_brute`](Self::query_box_brute).
    pub fn query_box(&self, bx: &CellBox, exclude: Option<CellId>) -> Vec<CellId> {
        let Some(bx) = self.clip(bx) else {
            return Vec::new();
        };
        let keep = |id: CellId| {
            Some(id) != exclude && self.get(id).is_some_and(|c| bx.contains(c.coord))
        };

        let mut seed: Option<&BTreeSet<CellId>> = None;
        for axis in Axis::ALL {
            if let Some(v) = bx.extent(axis).as_single() {
                match self.axes[axis.index()].get(&v) {
                    None => return Vec::new(),
                    Some(bucket) => {
                        if seed.is_none_or(|s| bucket.len() < s.len()) {
                            seed = Some(bucket);
                        }
                    }
                }
            }
        }
        if let Some(bucket) = seed {
            return bucket.iter().filter(|id| keep(**id)).copied().collect();
        }

        let narrowest = Axis::ALL
            .into_iter()
            .filter(|a| !bx.extent(*a).is_unbounded())
            .min_by_key(|a| bx.extent(*a).width());
        match narrowest {
            Some(axis) => {
                let e = bx.extent(axis);
                self.axes[axis.index()]
                    .range(e.lo()..=e.hi())
                    .flat_map(|(_, bucket)| bucket.iter())
                    .filter(|id| keep(**id))
                    .copied()
                    .collect()
            }
            None => self.order.iter().filter(|id| keep(**id)).copied().collect(),
        }
    }

    /// Reference implementation of [`query_box`](Self::query_box): a scan over
    /// every live cell.
    pub fn query_box_brute(&self, bx: &CellBox, exclude: Option<CellId>) -> Vec<CellId> {
        self.live_ids()
            .into_iter()
            .filter(|id| Some(*id) != exclude)
            .filter(|id| {
                self.get(*id)
                    .is_some_and(|c| bx.contains(c.coord) && self.is_visible(c.coord))
            })
            .collect()
    }

    pub fn query_cells(&self, bx: &CellBox, exclude: Option<CellId>) -> Vec<&Cell> {
        self.query_box(bx, exclude)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// `Some(true)` if the cell at `coord` answers to `kind`, `Some(false)` if
    /// it does not, `None` if the coordinate is empty or beyond the horizon.
    pub fn is_kind_at(&self, coord: IVec3, kind: RuleKind) -> Option<bool> {
        if !self.is_visible(coord) {
            return None;
        }
        self.cell_at(coord).map(|c| c.is_kind(kind))
    }

    /// Distinct rule kinds present in `bx`.
    pub fn kinds_in_box(&self, bx: &CellBox, exclude: Option<CellId>) -> BTreeSet<RuleKind> {
        self.query_cells(bx, exclude)
            .into_iter()
            .map(|c| c.kind)
            .collect()
    }

    /// Union of the tags carried by cells in `bx`.
    pub fn tags_in_box(&self, bx: &CellBox, exclude: Option<CellId>) -> BTreeSet<String> {
        self.query_cells(bx, exclude)
            .into_iter()
            .flat_map(|c| c.tags.iter().cloned())
            .collect()
    }

    pub(crate) fn add_tag(&mut self, id: CellId, tag: String) -> bool {
        self.get_mut(id).is_some_and(|c| c.tags.insert(tag))
    }

    pub(crate) fn remove_tag(&mut self, id: CellId, tag: &str) -> bool {
        self.get_mut(id).is_some_and(|c| c.tags.remove(tag))
    }

    /// Move the rule out of a cell so it can run against `&mut self`.
    pub(crate) fn take_rule(&mut self, id: CellId) -> Option<(IVec3, Box<dyn Rule>)> {
        let cell = self.get_mut(id)?;
        let rule = cell.rule.take()?;
        Some((cell.coord, rule))
    }

    /// Hand a rule back after it ran. Dropped if its cell is gone.
    pub(crate) fn restore_rule(&mut self, id: CellId, rule: Box<dyn Rule>) {
        if let Some(cell) = self.get_mut(id) {
            cell.rule.get_or_insert(rule);
        }
    }

    pub(crate) fn record(&mut self, event: WorldEvent) {
        self.event_log.push(event);
    }

    /// Verify that map, arena, axis indices and live order agree.
    pub fn check_consistency(&self) -> Result<(), String> {
        let live: BTreeSet<CellId> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.cell.is_some())
            .map(|(i, s)| CellId {
                index: i as u32,
                generation: s.generation,
            })
            .collect();
        if live.len() != self.by_coord.len() {
            return Err(format!(
                "arena holds {} cells but map holds {}",
                live.len(),
                self.by_coord.len()
            ));
        }
        for (coord, id) in &self.by_coord {
            match self.get(*id) {
                Some(c) if c.coord == *coord => {}
                _ => return Err(format!("map entry {coord:?} -> {id} is stale")),
            }
        }
        for axis in Axis::ALL {
            let mut seen = 0;
            for (key, bucket) in &self.axes[axis.index()] {
                if bucket.is_empty() {
                    return Err(format!("{axis:?} index keeps empty bucket {key}"));
                }
                for id in bucket {
                    match self.get(*id) {
                        Some(c) if axis.of(c.coord) == *key => seen += 1,
                        _ => return Err(format!("{axis:?} index bucket {key} holds {id}")),
                    }
                }
            }
            if seen != live.len() {
                return Err(format!(
                    "{axis:?} index holds {seen} entries for {} cells",
                    live.len()
                ));
            }
        }
        let ordered: BTreeSet<CellId> = self.live_ids().into_iter().collect();
        if ordered != live {
            return Err("live order disagrees with the arena".into());
        }
        Ok(())
    }
}
