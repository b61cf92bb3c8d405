use cellspace_common::SplitMix64;
use glam::IVec3;

/// A starting population, as catalog rule names at coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Period-two oscillator along x on the xy plane.
    Blinker,
    /// Five-cell glider on the xy plane.
    Glider,
    /// A single virus at the origin.
    Virus,
    /// Live xy cells scattered over a square of the z = 0 plane.
    Random { seed: u64, count: usize, radius: i32 },
}

impl Scenario {
    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Blinker => "blinker",
            Scenario::Glider => "glider",
            Scenario::Virus => "virus",
            Scenario::Random { .. } => "random",
        }
    }

    /// Cells to spawn. Duplicate coordinates may appear for random
    /// populations; the later spawn is ignored.
    pub fn cells(&self) -> Vec<(IVec3, &'static str)> {
        match *self {
            Scenario::Blinker => [-1, 0, 1]
                .into_iter()
                .map(|x| (IVec3::new(x, 0, 0), "alive-xy"))
                .collect(),
            Scenario::Glider => [(1, 2), (2, 1), (0, 0), (1, 0), (2, 0)]
                .into_iter()
                .map(|(x, y)| (IVec3::new(x, y, 0), "alive-xy"))
                .collect(),
            Scenario::Virus => vec![(IVec3::ZERO, "virus")],
            Scenario::Random {
                seed,
                count,
                radius,
            } => {
                let mut rng = SplitMix64::new(seed);
                let r = radius.max(0);
                (0..count)
                    .map(|_| {
                        let x = rng.range_i32(-r, r);
                        let y = rng.range_i32(-r, r);
                        (IVec3::new(x, y, 0), "alive-xy")
                    })
                    .collect()
            }
        }
    }
}
