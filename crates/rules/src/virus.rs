use cellspace_common::{Phase, Rgb};
use cellspace_kernel::{CellContext, Rule, RuleKind};
use glam::IVec3;

pub const VIRUS: RuleKind = RuleKind::new("virus");
pub const VIRUS_COLOR: Rgb = Rgb(0, 255, 127);

const FACE_OFFSETS: [IVec3; 6] = [
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

/// Spreads into its six face neighbors and removes itself, every cycle,
/// whatever the phase. The infected shell grows by one voxel per cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Virus;

impl Rule for Virus {
    fn kind(&self) -> RuleKind {
        VIRUS
    }

    fn color(&self) -> Option<Rgb> {
        Some(VIRUS_COLOR)
    }

    fn neighborhood(&self) -> Vec<IVec3> {
        FACE_OFFSETS.to_vec()
    }

    fn run(&mut self, ctx: &mut CellContext<'_>, _phase: Phase) {
        for offset in self.neighborhood() {
            ctx.spawn(offset, Virus);
        }
        ctx.delete_self();
    }
}
