use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::grid::Grid;
use crate::render;

/// Consumer of completed generations. Called by the driver between steps, never
/// while the engine is running.
pub trait FrameSink {
    fn frame(&mut self, step: u64, grid: &Grid<bool>) -> Result<()>;
}

/// `{prefix}-{step:05}.{ext}`
pub fn frame_file_name(prefix: &str, step: u64, ext: &str) -> String {
    format!("{prefix}-{step:05}.{ext}")
}

/// C `%e` formatting: six fraction digits, signed two-digit exponent.
fn sci(v: f64) -> String {
    let s = format!("{v:.6e}");
    let (mantissa, exp) = s.split_once('e').unwrap_or((&s, "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

/// Serialize one frame as VTK ImageData with raw appended Float32 cell data.
pub fn write_vti<W: Write>(out: &mut W, grid: &Grid<bool>, name: &str) -> Result<()> {
    let (w, h) = grid.dims();
    let spacing = 1.0;

    writeln!(out, "<?xml version=\"1.0\"?>")?;
    writeln!(
        out,
        "<VTKFile type=\"ImageData\" version=\"0.1\" byte_order=\"LittleEndian\" header_type=\"UInt64\">"
    )?;
    writeln!(
        out,
        "<ImageData WholeExtent=\"0 {} 0 {} 0 0\" Origin=\"0 0 0\" Spacing=\"{} {} {}\">",
        w as i64 - 1,
        h as i64 - 1,
        sci(spacing),
        sci(spacing),
        sci(0.0),
    )?;
    writeln!(out, "<CellData Scalars=\"{name}\">")?;
    writeln!(
        out,
        "<DataArray type=\"Float32\" Name=\"{name}\" format=\"appended\" offset=\"0\"/>"
    )?;
    writeln!(out, "</CellData>")?;
    writeln!(out, "</ImageData>")?;
    writeln!(out, "<AppendedData encoding=\"raw\">")?;
    write!(out, "_")?;

    let nbytes = (w * h * size_of::<f32>()) as u64;
    out.write_all(&nbytes.to_le_bytes())?;
    for &alive in &grid.data {
        let v: f32 = if alive { 1.0 } else { 0.0 };
        out.write_all(&v.to_le_bytes())?;
    }

    write!(out, "\n</AppendedData>\n")?;
    writeln!(out, "</VTKFile>")?;
    Ok(())
}

/// Writes one `.vti` file per frame into a directory.
pub struct VtiSink {
    dir: PathBuf,
    prefix: String,
}

impl VtiSink {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
        })
    }

    pub fn path_for(&self, step: u64) -> PathBuf {
        self.dir.join(frame_file_name(&self.prefix, step, "vti"))
    }
}

impl FrameSink for VtiSink {
    fn frame(&mut self, step: u64, grid: &Grid<bool>) -> Result<()> {
        let path = self.path_for(step);
        let mut out = BufWriter::new(File::create(&path)?);
        write_vti(&mut out, grid, &self.prefix)?;
        out.flush()?;
        debug!(path = %path.display(), "wrote vti frame");
        Ok(())
    }
}

/// ANSI renderer: homes the cursor and repaints the whole field, two columns per cell.
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn frame(&mut self, step: u64, grid: &Grid<bool>) -> Result<()> {
        let mut screen = String::with_capacity(grid.data.len() * 10 + 32);
        screen.push_str("\x1b[H");
        for row in grid.data.chunks(grid.w) {
            for &alive in row {
                screen.push_str(if alive { "\x1b[07m  \x1b[m" } else { "  " });
            }
            screen.push('\n');
        }
        screen.push_str(&format!("{step} timestep\n"));

        self.out.write_all(screen.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes one PNG per frame, each cell a `scale x scale` block.
pub struct PngSink {
    dir: PathBuf,
    prefix: String,
    scale: usize,
}

impl PngSink {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, scale: usize) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            prefix: prefix.into(),
            scale,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FrameSink for PngSink {
    fn frame(&mut self, step: u64, grid: &Grid<bool>) -> Result<()> {
        let path = self.dir.join(frame_file_name(&self.prefix, step, "png"));
        let rgba = render::render_cells(grid, self.scale);
        let (pw, ph) = render::image_size(grid, self.scale);
        image::save_buffer(&path, &rgba, pw, ph, image::ColorType::Rgba8)?;
        debug!(path = %path.display(), "wrote png frame");
        Ok(())
    }
}

/// Keeps a copy of every frame in memory.
#[derive(Default)]
pub struct MemorySink {
    pub frames: Vec<(u64, Grid<bool>)>,
}

impl FrameSink for MemorySink {
    fn frame(&mut self, step: u64, grid: &Grid<bool>) -> Result<()> {
        self.frames.push((step, grid.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sci_matches_c_printf() {
        assert_eq!(sci(1.0), "1.000000e+00");
        assert_eq!(sci(0.0), "0.000000e+00");
        assert_eq!(sci(0.015), "1.500000e-02");
    }

    #[test]
    fn file_names_are_zero_padded() {
        assert_eq!(frame_file_name("gol", 7, "vti"), "gol-00007.vti");
        assert_eq!(frame_file_name("gol", 123456, "png"), "gol-123456.png");
    }

    #[test]
    fn terminal_layout() {
        let mut g = Grid::new(2, 2);
        g.set(0, 0, true);
        let mut sink = TerminalSink::new(Vec::new());
        sink.frame(3, &g).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "\x1b[H\x1b[07m  \x1b[m  \n    \n3 timestep\n");
    }
}
