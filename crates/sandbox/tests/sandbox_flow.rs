use cellspace_input::{Action, MoveKey};
use cellspace_rules::{ALIVE, DEAD};
use cellspace_sandbox::{Sandbox, SandboxConfig, Scenario};
use glam::IVec3;
use std::collections::BTreeSet;
use std::io::Write;

fn alive_cells(sandbox: &Sandbox) -> BTreeSet<[i32; 3]> {
    sandbox
        .world()
        .cells()
        .filter(|c| c.is_kind(ALIVE))
        .map(|c| c.coord().to_array())
        .collect()
}

fn small_config(render_distance: i32) -> SandboxConfig {
    let mut config = SandboxConfig::default();
    config.width = 96;
    config.height = 72;
    config.camera.position = [0.0, 0.0, -6.0];
    config.camera.render_distance = render_distance;
    config
}

#[test]
fn config_file_drives_a_blinker() {
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    write!(
        tmp,
        "width: 96\nheight: 72\nbackground: [0, 0, 0]\ncamera:\n  position: [0.0, 0.0, -8.0]\n  render_distance: 12\n"
    )
    .unwrap();
    let config = SandboxConfig::load(tmp.path()).unwrap();
    let mut sandbox = Sandbox::new(&config).unwrap();
    sandbox.seed(&Scenario::Blinker).unwrap();

    let horizontal: BTreeSet<[i32; 3]> = [[-1, 0, 0], [0, 0, 0], [1, 0, 0]].into();
    let vertical: BTreeSet<[i32; 3]> = [[0, -1, 0], [0, 0, 0], [0, 1, 0]].into();
    sandbox.run_ticks(1);
    assert_eq!(alive_cells(&sandbox), vertical);
    sandbox.run_ticks(1);
    assert_eq!(alive_cells(&sandbox), horizontal);
    assert!(sandbox.world().check_consistency().is_ok());

    let frame = sandbox.render();
    assert_eq!((frame.width(), frame.height()), (96, 72));
    assert!(frame.count_not(config.background) > 0);
    assert_eq!(sandbox.summary().tick, 2);
}

#[test]
fn isolated_cell_dies_and_is_collected() {
    let mut sandbox = Sandbox::new(&small_config(10)).unwrap();
    sandbox.spawn_named(IVec3::ZERO, "alive-xy").unwrap();

    sandbox.run_ticks(1);
    assert_eq!(sandbox.world().len(), 9);
    assert!(sandbox.world().cells().all(|c| c.is_kind(DEAD)));

    sandbox.run_ticks(1);
    assert!(sandbox.world().is_empty());
}

#[test]
fn horizon_hides_neighbors_from_the_rules() {
    let run = |render_distance: i32| {
        let mut sandbox = Sandbox::new(&small_config(render_distance)).unwrap();
        for x in 5..=7 {
            sandbox.spawn_named(IVec3::new(x, 0, 0), "alive-xy").unwrap();
        }
        sandbox.run_ticks(1);
        sandbox.world().cell_at(IVec3::new(6, 0, 0)).map(|c| c.kind())
    };
    // the middle of a blinker survives while it can see both ends
    assert_eq!(run(10), Some(ALIVE));
    // with x = 7 beyond the horizon it only sees one neighbor
    assert_eq!(run(6), Some(DEAD));
}

#[test]
fn actions_fly_place_and_remove() {
    let mut config = small_config(10);
    config.start_paused = true;
    let mut sandbox = Sandbox::new(&config).unwrap();
    let center = (48.0, 36.0);
    sandbox.spawn_named(IVec3::new(0, 0, 2), "virus").unwrap();

    sandbox
        .apply(Action::Primary {
            x: center.0,
            y: center.1,
        })
        .unwrap();
    assert!(sandbox.world().is_occupied(IVec3::new(0, 0, 1)));

    // fly back two units, then remove what is under the cursor
    sandbox.apply(Action::KeyDown(MoveKey::Backward)).unwrap();
    for _ in 0..4 {
        sandbox.update(0.1);
    }
    sandbox.apply(Action::KeyUp(MoveKey::Backward)).unwrap();
    assert_eq!(sandbox.camera().voxel(), IVec3::new(0, 0, -8));

    sandbox
        .apply(Action::Secondary {
            x: center.0,
            y: center.1,
        })
        .unwrap();
    assert!(!sandbox.world().is_occupied(IVec3::new(0, 0, 1)));
    assert!(sandbox.world().is_occupied(IVec3::new(0, 0, 2)));
}

#[test]
fn virus_grows_one_step_per_cycle() {
    let mut config = small_config(20);
    config.start_paused = true;
    let mut sandbox = Sandbox::new(&config).unwrap();
    sandbox.seed(&Scenario::Virus).unwrap();

    sandbox.cycle();
    let faces: BTreeSet<[i32; 3]> = sandbox
        .world()
        .cells()
        .map(|c| c.coord().to_array())
        .collect();
    assert_eq!(faces.len(), 6);
    assert!(!faces.contains(&[0, 0, 0]));

    for n in 2..=4 {
        sandbox.cycle();
        assert!(
            sandbox
                .world()
                .cells()
                .all(|c| c.coord().abs().element_sum() <= n)
        );
    }
}
