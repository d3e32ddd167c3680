use crate::error::{LifeError, Result};
use crate::grid::{Grid, wrap_xy};
use crate::rng::Rng;

const SALT_FILL: u64 = 0x6017_F111_0000_0001;

/// A named still life, oscillator or spaceship, as `(x, y)` offsets from its top-left.
pub struct Pattern {
    pub name: &'static str,
    pub cells: &'static [(usize, usize)],
}

pub const BLOCK: Pattern = Pattern {
    name: "block",
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

/// Horizontal phase.
pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    cells: &[(0, 0), (1, 0), (2, 0)],
};

pub const TOAD: Pattern = Pattern {
    name: "toad",
    cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
};

pub const BEACON: Pattern = Pattern {
    name: "beacon",
    cells: &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
};

/// Travels down-right, one cell every four generations.
pub const GLIDER: Pattern = Pattern {
    name: "glider",
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "r-pentomino",
    cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
};

pub const PATTERNS: &[Pattern] = &[BLOCK, BLINKER, TOAD, BEACON, GLIDER, R_PENTOMINO];

pub fn pattern(name: &str) -> Result<&'static Pattern> {
    PATTERNS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| LifeError::UnknownPattern(name.to_string()))
}

/// Overwrite every cell: alive with probability `density`.
pub fn random_fill(grid: &mut Grid<bool>, density: f32, seed: u64) -> Result<()> {
    if !(0.0..=1.0).contains(&density) {
        return Err(LifeError::InvalidDensity(density));
    }
    let mut rng = Rng::new(seed ^ SALT_FILL);
    for cell in &mut grid.data {
        *cell = rng.chance(density);
    }
    Ok(())
}

/// Set the cells of `pattern` alive with its top-left at `(x, y)`, wrapping at the edges.
pub fn stamp(grid: &mut Grid<bool>, pattern: &Pattern, x: usize, y: usize) {
    for &(dx, dy) in pattern.cells {
        let (px, py) = wrap_xy((x + dx) as i64, (y + dy) as i64, grid.w, grid.h);
        grid.set(px, py, true);
    }
}
