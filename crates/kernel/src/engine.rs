use cellspace_common::Phase;

use crate::rule::CellContext;
use crate::world::{VoxelWorld, WorldEvent};

/// Outcome of one engine cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub phase: Phase,
    /// Rules invoked this cycle.
    pub ran: usize,
    pub spawned: u64,
    pub deleted: u64,
    /// Live cells after the cycle.
    pub live: usize,
}

/// Drives the population through cycles.
///
/// Each cycle runs `phase = cycle mod 3` on every cell that was alive when the
/// cycle began, in spawn order. Cells spawned during a cycle wait for the next
/// one, so all observations of a tick complete before any transition starts.
#[derive(Debug, Default)]
pub struct AutomatonEngine {
    cycle: u64,
}

impl AutomatonEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cycles completed so far.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    /// Full ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.cycle / 3
    }

    /// Phase the next cycle will run.
    pub fn next_phase(&self) -> Phase {
        Phase::from_cycle(self.cycle)
    }

    /// Run one phase over the whole population.
    pub fn cycle(&mut self, world: &mut VoxelWorld) -> CycleReport {
        let phase = self.next_phase();
        let _span = tracing::info_span!("automaton_cycle", cycle = self.cycle, ?phase).entered();
        let (spawned_before, deleted_before) = (world.spawned_total(), world.deleted_total());

        let batch = world.live_ids();
        let mut ran = 0;
        for id in batch {
            // cells deleted earlier in this cycle yield nothing here
            let Some((origin, mut rule)) = world.take_rule(id) else {
                continue;
            };
            rule.run(&mut CellContext::new(world, id, origin), phase);
            world.restore_rule(id, rule);
            ran += 1;
        }

        let report = CycleReport {
            cycle: self.cycle,
            phase,
            ran,
            spawned: world.spawned_total() - spawned_before,
            deleted: world.deleted_total() - deleted_before,
            live: world.len(),
        };
        world.record(WorldEvent::Cycled {
            cycle: self.cycle,
            phase,
            live: report.live,
        });
        self.cycle += 1;

        tracing::debug!(
            ran,
            spawned = report.spawned,
            deleted = report.deleted,
            live = report.live,
            "cycle complete"
        );
        report
    }

    /// Run cycles until the next one would start a fresh tick.
    ///
    /// From an aligned counter this is exactly signal, observe, transition.
    pub fn step(&mut self, world: &mut VoxelWorld) -> Vec<CycleReport> {
        let mut reports = vec![self.cycle(world)];
        while self.cycle % 3 != 0 {
            reports.push(self.cycle(world));
        }
        reports
    }

    /// The population was cleared externally. The cycle counter carries on.
    pub fn on_cells_cleared(&mut self) {
        tracing::debug!(cycle = self.cycle, "cells cleared");
    }
}
