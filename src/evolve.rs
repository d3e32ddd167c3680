use rayon::prelude::*;
use tracing::trace;

use crate::error::{LifeError, Result};
use crate::grid::{Grid, neighbors8_wrap};
use crate::partition::{QuadrantMut, split_mut};

/// Workers per side by default (2x2 = four workers).
pub const DEFAULT_SPLIT: usize = 2;

/// Largest accepted workers-per-side (64 threads).
pub const MAX_SPLIT: usize = 8;

/// Live cells among the eight toroidal neighbors of `(x, y)`.
#[inline]
pub fn count_live_neighbours(current: &Grid<bool>, x: usize, y: usize) -> u8 {
    neighbors8_wrap(x, y, current.w, current.h)
        .filter(|&(nx, ny)| current.get(nx, ny))
        .count() as u8
}

/// B3/S23: born on three, survives on two or three.
#[inline]
pub fn next_state(alive: bool, live_neighbours: u8) -> bool {
    live_neighbours == 3 || (live_neighbours == 2 && alive)
}

/// Compute every cell of one quadrant from `current`. Writes go only through `view`.
pub fn evolve_quadrant(current: &Grid<bool>, view: &mut QuadrantMut<'_, bool>) {
    let x0 = view.quadrant.x.start;
    for (y, row) in view.rows_mut() {
        for (dx, cell) in row.iter_mut().enumerate() {
            let x = x0 + dx;
            let n = count_live_neighbours(current, x, y);
            *cell = next_state(current.get(x, y), n);
        }
    }
}

/// Fork-join Game of Life stepper over a fixed `split x split` spatial decomposition.
///
/// Each call dispatches one task per quadrant onto a dedicated pool of exactly
/// `split * split` threads and joins them before returning.
pub struct Engine {
    split: usize,
    pool: rayon::ThreadPool,
}

impl Engine {
    pub fn new(split: usize) -> Result<Self> {
        let workers = split
            .checked_mul(split)
            .filter(|_| (1..=MAX_SPLIT).contains(&split))
            .ok_or(LifeError::InvalidSplit(split))?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("evolve-{i}"))
            .build()?;
        Ok(Self { split, pool })
    }

    pub fn split(&self) -> usize {
        self.split
    }

    pub fn workers(&self) -> usize {
        self.split * self.split
    }

    /// Write the generation after `current` into `next`.
    ///
    /// Cells outside every quadrant (the trailing rows/columns when a side is not
    /// divisible by `split`) are left as `next` held them. Dimension errors are
    /// reported before anything is written.
    pub fn evolve(&self, current: &Grid<bool>, next: &mut Grid<bool>) -> Result<()> {
        current.validate()?;
        if next.dims() != current.dims() {
            return Err(LifeError::DimensionMismatch {
                expected: current.dims(),
                found: next.dims(),
            });
        }
        next.validate()?;

        let views = split_mut(next, self.split);
        self.pool.install(|| {
            views.into_par_iter().for_each(|mut view| {
                trace!(worker = view.quadrant.index, x = ?view.quadrant.x, y = ?view.quadrant.y, "evolving quadrant");
                evolve_quadrant(current, &mut view);
            });
        });

        Ok(())
    }

    /// Evolve into a freshly allocated all-dead grid.
    pub fn step(&self, current: &Grid<bool>) -> Result<Grid<bool>> {
        let mut next = Grid::new(current.w, current.h);
        self.evolve(current, &mut next)?;
        Ok(next)
    }
}
