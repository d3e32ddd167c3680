use crate::error::{LifeError, Result};

/// Row-major flat grid. No per-cell objects.
/// Both axes wrap (toroidal topology).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    pub data: Vec<T>,
    pub w: usize,
    pub h: usize,
}

impl<T: Copy + Default> Grid<T> {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            data: vec![T::default(); w * h],
            w,
            h,
        }
    }

    /// Like [`Grid::new`] for untrusted sizes: zero sides, an overflowing `w * h`
    /// or a failed allocation give `InvalidDimension` instead of a panic or abort.
    pub fn try_new(w: usize, h: usize) -> Result<Self> {
        let invalid = LifeError::InvalidDimension { width: w, height: h };
        let n = match w.checked_mul(h) {
            Some(n) if n > 0 => n,
            _ => return Err(invalid),
        };
        let mut data = Vec::new();
        data.try_reserve_exact(n).map_err(|_| invalid)?;
        data.resize(n, T::default());
        Ok(Self { data, w, h })
    }

    /// Wrap an existing row-major buffer. Fails if the buffer does not hold `w * h` cells
    /// or either side is zero.
    pub fn from_cells(w: usize, h: usize, data: Vec<T>) -> Result<Self> {
        let grid = Self { data, w, h };
        grid.validate()?;
        Ok(grid)
    }

    /// Check the dimension contract: both sides positive, storage exactly `w * h`.
    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 || self.data.len() != self.w * self.h {
            return Err(LifeError::InvalidDimension {
                width: self.w,
                height: self.h,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.w && y < self.h);
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: T) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Read with both coordinates wrapped onto the torus.
    #[inline]
    pub fn get_wrapped(&self, x: i64, y: i64) -> T {
        let (x, y) = wrap_xy(x, y, self.w, self.h);
        self.get(x, y)
    }
}

impl Grid<bool> {
    pub fn alive(&self) -> usize {
        self.data.iter().filter(|&&c| c).count()
    }
}

/// Wrap both coordinates. Equivalent to `(i + w) % w` for offsets of at least `-w`.
#[inline]
pub fn wrap_xy(x: i64, y: i64, w: usize, h: usize) -> (usize, usize) {
    let wx = x.rem_euclid(w as i64) as usize;
    let wy = y.rem_euclid(h as i64) as usize;
    (wx, wy)
}

/// 8-connected (Moore) neighbors with toroidal wrapping.
///
/// Always yields eight positions. On grids narrower than three cells the same position
/// can appear more than once, or be the center itself; callers counting neighbors
/// count each occurrence.
pub fn neighbors8_wrap(x: usize, y: usize, w: usize, h: usize) -> impl Iterator<Item = (usize, usize)> {
    let offsets: [(i64, i64); 8] = [
        (-1, -1), (0, -1), (1, -1),
        (-1, 0),           (1, 0),
        (-1, 1),  (0, 1),  (1, 1),
    ];
    offsets
        .into_iter()
        .map(move |(dx, dy)| wrap_xy(x as i64 + dx, y as i64 + dy, w, h))
}

/// Two grid slots whose read/write roles flip on every [`DoubleBuffer::swap`].
/// Nothing is copied; only the role index changes.
#[derive(Clone, Debug)]
pub struct DoubleBuffer<T> {
    slots: [Grid<T>; 2],
    front: usize,
}

impl<T: Copy + Default> DoubleBuffer<T> {
    /// `initial` becomes the readable slot, the writable slot starts at `T::default()`.
    pub fn new(initial: Grid<T>) -> Self {
        let back = Grid::new(initial.w, initial.h);
        Self {
            slots: [initial, back],
            front: 0,
        }
    }

    pub fn read(&self) -> &Grid<T> {
        &self.slots[self.front]
    }

    pub fn write(&mut self) -> &mut Grid<T> {
        &mut self.slots[1 - self.front]
    }

    /// Borrow the readable slot and the writable slot at the same time.
    pub fn split(&mut self) -> (&Grid<T>, &mut Grid<T>) {
        let [a, b] = &mut self.slots;
        if self.front == 0 { (&*a, b) } else { (&*b, a) }
    }

    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }
}
