use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::evolve::DEFAULT_SPLIT;

/// All run parameters. Missing fields in a JSON body fall back to the defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    // Field
    pub width: usize,
    pub height: usize,
    pub density: f32,
    pub seed: u64,

    // Run
    pub steps: u64,
    pub split: usize,
    pub frame_delay_ms: u64,

    // Output
    pub prefix: String,
    pub out_dir: PathBuf,
    pub png_scale: usize,
    pub write_vti: bool,
    pub write_png: bool,
    pub show_terminal: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            density: 0.1,
            seed: 42,
            steps: 100,
            split: DEFAULT_SPLIT,
            frame_delay_ms: 200,
            prefix: "gol".to_string(),
            out_dir: PathBuf::from("frames"),
            png_scale: 8,
            write_vti: true,
            write_png: false,
            show_terminal: true,
        }
    }
}

impl Params {
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

/// Positive integer CLI argument, or `default` when missing, unparsable or `<= 0`.
pub fn positive_arg(arg: Option<&String>, default: usize) -> usize {
    arg.and_then(|s| s.parse::<i64>().ok())
        .filter(|&v| v > 0)
        .map_or(default, |v| v as usize)
}
