use rayon::prelude::*;

use crate::grid::Grid;

const ALIVE: [u8; 4] = [235, 235, 225, 255];
const DEAD: [u8; 4] = [18, 24, 36, 255];

/// Render cells as RGBA, each cell a `scale x scale` block.
/// Output is `(w * scale) x (h * scale)` pixels.
pub fn render_cells(grid: &Grid<bool>, scale: usize) -> Vec<u8> {
    let scale = scale.max(1);
    let pw = grid.w * scale;
    let ph = grid.h * scale;
    let mut rgba = vec![0u8; pw * ph * 4];

    rgba.par_chunks_mut(pw * 4)
        .enumerate()
        .for_each(|(py, row)| {
            let y = py / scale;
            for px in 0..pw {
                let color = if grid.get(px / scale, y) { ALIVE } else { DEAD };
                row[px * 4..px * 4 + 4].copy_from_slice(&color);
            }
        });

    rgba
}

/// Pixel dimensions of [`render_cells`] output.
pub fn image_size(grid: &Grid<bool>, scale: usize) -> (u32, u32) {
    let scale = scale.max(1);
    ((grid.w * scale) as u32, (grid.h * scale) as u32)
}
