pub mod config;
pub mod error;
pub mod evolve;
pub mod grid;
pub mod partition;
pub mod render;
pub mod rng;
pub mod seed;
pub mod sink;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use config::Params;
use error::Result;
use evolve::Engine;
use grid::{DoubleBuffer, Grid};
use sink::FrameSink;

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

pub struct RunSummary {
    /// Ticks completed, i.e. `evolve` calls.
    pub ticks: u64,
    pub cancelled: bool,
    pub timings: Vec<Timing>,
}

/// Driver: owns the double buffer and the tick counter, and feeds frames to sinks
/// strictly between steps.
pub struct Simulation {
    engine: Engine,
    buffers: DoubleBuffer<bool>,
    tick: u64,
    steps: u64,
    delay: Duration,
}

impl Simulation {
    /// Random initial field from `params.density` and `params.seed`.
    pub fn new(params: &Params) -> Result<Self> {
        let mut grid = Grid::try_new(params.width, params.height)?;
        seed::random_fill(&mut grid, params.density, params.seed)?;
        Self::from_grid(grid, params)
    }

    /// Start from a caller-supplied field. Size fields of `params` are ignored.
    pub fn from_grid(grid: Grid<bool>, params: &Params) -> Result<Self> {
        grid.validate()?;
        let engine = Engine::new(params.split)?;
        Ok(Self {
            engine,
            buffers: DoubleBuffer::new(grid),
            tick: 0,
            steps: params.steps,
            delay: params.frame_delay(),
        })
    }

    pub fn current(&self) -> &Grid<bool> {
        self.buffers.read()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn is_done(&self) -> bool {
        self.tick >= self.steps
    }

    /// One generation: evolve into the back slot, then flip roles.
    pub fn tick(&mut self) -> Result<()> {
        let (current, next) = self.buffers.split();
        self.engine.evolve(current, next)?;
        self.buffers.swap();
        self.tick += 1;
        Ok(())
    }

    pub fn run(&mut self, sinks: &mut [&mut dyn FrameSink]) -> Result<RunSummary> {
        self.run_until(sinks, |_| false)
    }

    /// Run the remaining ticks. Frame `t` is the field before step `t`.
    /// `should_stop` is polled before each tick with the tick index.
    pub fn run_until<F>(&mut self, sinks: &mut [&mut dyn FrameSink], mut should_stop: F) -> Result<RunSummary>
    where
        F: FnMut(u64) -> bool,
    {
        let total_start = Instant::now();
        let mut sink_ms = 0.0;
        let mut evolve_ms = 0.0;
        let mut ticks = 0;
        let mut cancelled = false;

        info!(
            w = self.current().w,
            h = self.current().h,
            steps = self.steps,
            workers = self.engine.workers(),
            alive = self.current().alive(),
            "starting run"
        );

        while !self.is_done() {
            if should_stop(self.tick) {
                cancelled = true;
                info!(tick = self.tick, "run cancelled");
                break;
            }

            let t = Instant::now();
            for sink in sinks.iter_mut() {
                sink.frame(self.tick, self.buffers.read())?;
            }
            sink_ms += t.elapsed().as_secs_f64() * 1000.0;

            let t = Instant::now();
            self.tick()?;
            evolve_ms += t.elapsed().as_secs_f64() * 1000.0;
            ticks += 1;

            debug!(tick = self.tick, alive = self.current().alive(), "evolved");

            if !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
        }

        let timings = vec![
            Timing { name: "sinks", ms: sink_ms },
            Timing { name: "evolve", ms: evolve_ms },
            Timing {
                name: "TOTAL",
                ms: total_start.elapsed().as_secs_f64() * 1000.0,
            },
        ];

        info!(ticks, alive = self.current().alive(), "run finished");

        Ok(RunSummary {
            ticks,
            cancelled,
            timings,
        })
    }
}
