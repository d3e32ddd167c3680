use std::ops::Range;

use crate::evolve::MAX_SPLIT;
use crate::grid::Grid;

/// One rectangular block of the grid, owned by a single worker during a step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Quadrant {
    /// Worker index, `0..split * split`.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub x: Range<usize>,
    pub y: Range<usize>,
}

impl Quadrant {
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }

    pub fn len(&self) -> usize {
        self.x.len() * self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Static `split x split` decomposition of a `w x h` grid.
///
/// Worker `index` gets `row = index % split`, `col = index / split`. Sides are
/// `w / split` and `h / split` with truncating division, so when a side is not
/// divisible by `split` the trailing columns/rows belong to no quadrant and are
/// never written by a step.
///
/// Panics unless `split` lies in `1..=MAX_SPLIT`; [`Engine::new`](crate::evolve::Engine::new)
/// reports the same condition as an error.
pub fn quadrants(w: usize, h: usize, split: usize) -> Vec<Quadrant> {
    assert!((1..=MAX_SPLIT).contains(&split), "split {split} outside 1..={MAX_SPLIT}");
    let qw = w / split;
    let qh = h / split;
    (0..split * split)
        .map(|index| {
            let row = index % split;
            let col = index / split;
            Quadrant {
                index,
                row,
                col,
                x: col * qw..(col + 1) * qw,
                y: row * qh..(row + 1) * qh,
            }
        })
        .collect()
}

/// Cells of the grid covered by no quadrant, in row-major order.
pub fn remainder_cells(w: usize, h: usize, split: usize) -> Vec<(usize, usize)> {
    let xs = (w / split) * split;
    let ys = (h / split) * split;
    (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| x >= xs || y >= ys)
        .collect()
}

/// Mutable window onto one quadrant of a grid: one slice per quadrant row.
/// Every slice comes from a disjoint part of the same buffer.
pub struct QuadrantMut<'a, T> {
    pub quadrant: Quadrant,
    rows: Vec<&'a mut [T]>,
}

impl<T> QuadrantMut<'_, T> {
    /// Rows of the window paired with their absolute `y`.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [T])> {
        let y0 = self.quadrant.y.start;
        self.rows
            .iter_mut()
            .enumerate()
            .map(move |(dy, row)| (y0 + dy, &mut **row))
    }

    /// Write an absolute grid coordinate. Panics outside the quadrant.
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        assert!(self.quadrant.contains(x, y), "({x}, {y}) outside quadrant {}", self.quadrant.index);
        let (x0, y0) = (self.quadrant.x.start, self.quadrant.y.start);
        self.rows[y - y0][x - x0] = v;
    }
}

/// Carve `grid` into one mutable window per quadrant, indexed by worker index.
/// The caller must have checked `grid` against its dimension contract.
pub fn split_mut<T>(grid: &mut Grid<T>, split: usize) -> Vec<QuadrantMut<'_, T>> {
    let (w, h) = (grid.w, grid.h);
    let qw = w / split;
    let qh = h / split;

    let mut views: Vec<QuadrantMut<'_, T>> = quadrants(w, h, split)
        .into_iter()
        .map(|quadrant| QuadrantMut {
            quadrant,
            rows: Vec::with_capacity(qh),
        })
        .collect();

    for (y, row) in grid.data.chunks_mut(w).take(qh * split).enumerate() {
        let qrow = y / qh;
        let mut rest = &mut row[..qw * split];
        for col in 0..split {
            let (segment, tail) = std::mem::take(&mut rest).split_at_mut(qw);
            rest = tail;
            views[col * split + qrow].rows.push(segment);
        }
    }

    views
}
