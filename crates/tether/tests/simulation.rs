use glam::Vec3;
use tether::frame::spawn_cube_grid;
use tether::{
    FixedTimestep, Input, InputFlags, ObjectRegistry, OrbitCamera, PhysicsEngine, PlayerDirector,
    PlayerTuning, RapierPhysics, SceneConfig, Simulate, SimulationConfig, Simulator, TickHistory,
};

const TICK: f64 = 1.0 / 60.0;

// Player drops beside the grid, not onto it.
fn small_scene() -> SceneConfig {
    SceneConfig {
        player_start: Vec3::new(5.0, 3.0, 5.0),
        grid_width: 3,
        ..SceneConfig::default()
    }
}

fn build(config: &SceneConfig) -> Simulator<PlayerDirector, RapierPhysics> {
    let mut physics = RapierPhysics::new();
    let mut registry = ObjectRegistry::new();
    let scene = spawn_cube_grid(config, OrbitCamera::default(), &mut physics, &mut registry);

    let history = TickHistory::new(TickHistory::slots_for(1.0, TICK), &scene.frame);
    Simulator::with_history(
        scene.frame,
        FixedTimestep::new(TICK),
        history,
        PlayerDirector::new(scene.player, PlayerTuning::default()),
        physics,
    )
}

fn run(sim: &mut impl Simulate, seconds: f64, input: &Input) {
    let frames = (seconds / TICK).round() as usize;
    for _ in 0..frames {
        sim.update(TICK, input);
    }
}

#[test]
fn player_falls_and_lands() {
    let mut sim = build(&small_scene());
    let start = sim.future().poses[0].position;

    run(&mut sim, 0.1, &Input::default());
    assert!(sim.future().poses[0].position.y < start.y);
    assert_eq!(sim.future().active_indices.as_slice(), &[0]);

    run(&mut sim, 3.0, &Input::default());
    let resting = sim.future().poses[0].position;
    assert!((resting.y - 0.5).abs() < 0.05, "player rests at {resting}");
    assert_eq!(sim.future().camera.target, resting);
}

#[test]
fn resting_grid_stays_still() {
    let config = small_scene();
    let mut sim = build(&config);
    let before: Vec<_> = sim.future().poses[1..].to_vec();

    run(&mut sim, 0.5, &Input::default());

    for (index, pose) in sim.future().poses[1..].iter().enumerate() {
        assert_eq!(*pose, before[index], "cube {} moved", index + 1);
    }
}

#[test]
fn jump_lifts_grounded_player() {
    let mut sim = build(&small_scene());
    run(&mut sim, 3.0, &Input::default());
    let grounded_y = sim.future().poses[0].position.y;

    let jump = Input::new(Vec3::ZERO, InputFlags::JUMP);
    sim.update(TICK, &jump);
    run(&mut sim, 0.2, &Input::default());

    let y = sim.future().poses[0].position.y;
    assert!(y > grounded_y + 0.5, "player only reached {y}");
    assert_eq!(sim.director().jumps_used(), 1);
}

#[test]
fn identical_runs_are_identical() {
    let config = small_scene();
    let mut a = build(&config);
    let mut b = build(&config);
    let push = Input::new(Vec3::X, InputFlags::empty());

    for tick in 0..120 {
        let input = if tick % 40 == 0 {
            Input::new(Vec3::X, InputFlags::JUMP)
        } else {
            push
        };
        a.update(TICK, &input);
        b.update(TICK, &input);
    }

    assert_eq!(a.future(), b.future());
    assert_eq!(a.tick_count(), 120);
}

#[test]
fn rendered_frame_lies_between_ticks() {
    let mut sim = build(&small_scene());
    run(&mut sim, 0.25, &Input::default());

    sim.update(TICK * 0.5, &Input::default());
    let past = sim.past().poses[0].position.y;
    let future = sim.future().poses[0].position.y;
    let drawn = sim.current_world_frame().poses[0].position.y;

    assert!(future < past);
    assert!(drawn < past && drawn > future, "{future} < {drawn} < {past}");
    assert!((sim.alpha() - 0.5).abs() < 1e-3);
}

#[test]
fn long_stall_is_clamped() {
    let config = small_scene();
    let mut stalled = build(&config);
    let mut smooth = build(&config);

    let ticks = stalled.update(5.0, &Input::default());
    assert_eq!(ticks, smooth.update(0.25, &Input::default()));
    assert!((14..=15).contains(&ticks));
    assert_eq!(stalled.future(), smooth.future());
}

#[test]
fn history_keeps_recent_inputs() {
    let mut sim = build(&small_scene());
    let jump = Input::new(Vec3::ZERO, InputFlags::JUMP);

    sim.update(TICK, &Input::default());
    sim.update(TICK, &jump);

    let history = sim.history();
    assert_eq!(history.input(2), Some(&jump));
    assert_eq!(history.input(1), Some(&Input::default()));
    assert_eq!(history.frame(2).map(|frame| frame.index), Some(2));
}

#[test]
fn physics_reports_grounded_player() {
    let config = small_scene();
    let mut physics = RapierPhysics::new();
    let mut registry = ObjectRegistry::new();
    let scene = spawn_cube_grid(&config, OrbitCamera::default(), &mut physics, &mut registry);
    assert!(!physics.is_grounded(scene.player));

    let mut frame = scene.frame.clone();
    for _ in 0..180 {
        frame.active_indices.clear();
        physics.step(TICK, &mut frame);
    }
    assert!(physics.is_grounded(scene.player));
    assert_eq!(registry.name(scene.player), "player");
    assert_eq!(registry.name(scene.ground), "ground");
}

#[test]
fn default_config_builds_the_full_grid() {
    let (sim, registry) = Simulator::from_config(&SimulationConfig::default());

    assert_eq!(sim.future().pose_count(), 1 + 30 * 30);
    assert_eq!(sim.physics().dynamic_body_count(), 1 + 30 * 30);
    assert_eq!(sim.physics().static_body_count(), 1);
    // ground, player and every anonymous cube
    assert_eq!(registry.len(), 2 + 30 * 30);
    assert!(sim.history().capacity() >= 15);
    assert!((sim.timestep().timestep() - TICK).abs() < 1e-12);
}
