use super::config::SimulationConfig;
use super::history::TickHistory;
use super::timestep::FixedTimestep;
use crate::debug::{DataLogger, NoOpLogger, Timer};
use crate::director::{GameDirector, PlayerDirector};
use crate::frame::{spawn_cube_grid, OrbitCamera, WorldFrame};
use crate::input::Input;
use crate::objects::ObjectRegistry;
use crate::physics::{PhysicsEngine, RapierPhysics};

/// Something that advances with wall-clock time and can be drawn.
pub trait Simulate {
    /// Runs as many ticks as `delta_time` seconds cover and returns how many.
    fn update(&mut self, delta_time: f64, input: &Input) -> u32;

    fn current_world_frame(&self) -> WorldFrame;
}

/// Fixed-timestep simulation with a double-buffered world.
///
/// Each tick snapshots `future` into `past`, then lets the director and the
/// physics engine build the next `future` in place. Rendering blends the two
/// with the timestep's leftover fraction.
pub struct Simulator<D, P> {
    timestep: FixedTimestep,
    past: WorldFrame,
    future: WorldFrame,
    history: TickHistory,
    director: D,
    physics: P,
    ticks: u32,
}

impl<D: GameDirector, P: PhysicsEngine> Simulator<D, P> {
    pub fn new(initial: WorldFrame, timestep: FixedTimestep, director: D, physics: P) -> Self {
        let history = TickHistory::new(TickHistory::slots_for(0.0, timestep.timestep()), &initial);
        Self::with_history(initial, timestep, history, director, physics)
    }

    pub fn with_history(
        initial: WorldFrame,
        timestep: FixedTimestep,
        history: TickHistory,
        director: D,
        physics: P,
    ) -> Self {
        Self {
            timestep,
            past: initial.clone(),
            future: initial,
            history,
            director,
            physics,
            ticks: 0,
        }
    }

    pub fn update(&mut self, delta_time: f64, input: &Input) -> u32 {
        self.update_timed(delta_time, input, &mut NoOpLogger)
    }

    /// [`Simulator::update`] that reports each tick's duration in
    /// milliseconds to `logger`.
    pub fn update_timed<L: DataLogger<f64>>(
        &mut self,
        delta_time: f64,
        input: &Input,
        logger: &mut L,
    ) -> u32 {
        let Self {
            timestep,
            past,
            future,
            history,
            director,
            physics,
            ticks,
        } = self;

        timestep.update(delta_time, |dt| {
            let timer = Timer::start();

            past.copy_from(future);
            future.active_indices.clear();

            director.pre_physics(dt, input, future, &mut *physics);
            physics.step(dt, future);
            director.post_physics(dt, input, future, &mut *physics);

            *ticks += 1;
            future.index = *ticks;
            history.record(*ticks, input, future);

            logger.log(timer.elapsed_ms());
        })
    }

    pub fn current_world_frame(&self) -> WorldFrame {
        let mut out = self.past.clone();
        self.interpolate_into(&mut out);
        out
    }

    /// Interpolated frame written into `out`, which must have the same pose
    /// count as the simulated frames.
    pub fn interpolate_into(&self, out: &mut WorldFrame) {
        WorldFrame::interpolate(&self.past, &self.future, self.timestep.alpha(), out);
    }

    pub fn tick_count(&self) -> u32 {
        self.ticks
    }

    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    pub fn past(&self) -> &WorldFrame {
        &self.past
    }

    pub fn future(&self) -> &WorldFrame {
        &self.future
    }

    pub fn history(&self) -> &TickHistory {
        &self.history
    }

    pub fn director(&self) -> &D {
        &self.director
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }
}

impl Simulator<PlayerDirector, RapierPhysics> {
    /// The player-and-cube-grid game described by `config`, plus the
    /// registry naming its objects.
    pub fn from_config(config: &SimulationConfig) -> (Self, ObjectRegistry) {
        let mut physics = RapierPhysics::new();
        let mut registry = ObjectRegistry::new();
        let scene = spawn_cube_grid(
            &config.scene,
            OrbitCamera::default(),
            &mut physics,
            &mut registry,
        );

        let timestep = config.timestep();
        let slots = TickHistory::slots_for(config.history_duration, timestep.timestep());
        let history = TickHistory::new(slots, &scene.frame);
        let director = PlayerDirector::new(scene.player, config.player);
        log::debug!(
            "simulating at {} Hz, {} ticks of history",
            config.tick_rate,
            slots
        );

        let simulator = Self::with_history(scene.frame, timestep, history, director, physics);
        (simulator, registry)
    }
}

impl<D: GameDirector, P: PhysicsEngine> Simulate for Simulator<D, P> {
    fn update(&mut self, delta_time: f64, input: &Input) -> u32 {
        Simulator::update(self, delta_time, input)
    }

    fn current_world_frame(&self) -> WorldFrame {
        Simulator::current_world_frame(self)
    }
}
