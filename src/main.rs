use anyhow::Context;
use tracing_subscriber::EnvFilter;

use lifegrid::Simulation;
use lifegrid::config::{Params, positive_arg};
use lifegrid::sink::{FrameSink, PngSink, TerminalSink, VtiSink};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let defaults = Params::default();
    let params = Params {
        width: positive_arg(args.get(1), defaults.width),
        height: positive_arg(args.get(2), defaults.height),
        steps: args.get(3).and_then(|s| s.parse().ok()).unwrap_or(defaults.steps),
        seed: args.get(4).and_then(|s| s.parse().ok()).unwrap_or(defaults.seed),
        write_png: std::env::var_os("LIFEGRID_PNG").is_some(),
        ..defaults
    };

    let mut vti = if params.write_vti {
        Some(
            VtiSink::new(&params.out_dir, params.prefix.clone())
                .with_context(|| format!("failed to create {}", params.out_dir.display()))?,
        )
    } else {
        None
    };
    let mut png = if params.write_png {
        Some(PngSink::new(&params.out_dir, params.prefix.clone(), params.png_scale)?)
    } else {
        None
    };
    let mut term = params.show_terminal.then(TerminalSink::stdout);

    let mut sinks: Vec<&mut dyn FrameSink> = Vec::new();
    if let Some(s) = term.as_mut() {
        sinks.push(s);
    }
    if let Some(s) = vti.as_mut() {
        sinks.push(s);
    }
    if let Some(s) = png.as_mut() {
        sinks.push(s);
    }

    let mut sim = Simulation::new(&params).context("failed to set up simulation")?;
    let summary = sim.run(&mut sinks).context("simulation failed")?;

    for t in &summary.timings {
        tracing::info!("  {:20} {:8.1} ms", t.name, t.ms);
    }
    tracing::info!(ticks = summary.ticks, out_dir = %params.out_dir.display(), "done");

    Ok(())
}
