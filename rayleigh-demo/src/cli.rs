use anyhow::{Context, Result, bail};
use rayleigh_core::wedge::WEDGE_LABELS;
use rayleigh_core::{Bounds, RetentionPolicy, Simulation, SimulationDesc, SimulationEvent};

/// Playfield used when no window decides the size
const HEADLESS_BOUNDS: Bounds = Bounds {
    width: 1920.0,
    height: 1080.0,
};

/// Command-line options shared by the GUI and headless modes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Run this many frames without a window, then print the tallies
    pub headless_frames: Option<u64>,
    /// Open a normal window instead of going fullscreen
    pub windowed: bool,
    pub seed: Option<u64>,
    /// Retire segments this many frames after they terminate
    pub retire_after: Option<u32>,
}

impl Options {
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => {
                    let frames = args.next().context("--headless needs a frame count")?;
                    options.headless_frames =
                        Some(frames.parse().context("invalid --headless frame count")?);
                }
                "--windowed" => options.windowed = true,
                "--seed" => {
                    let seed = args.next().context("--seed needs a value")?;
                    options.seed = Some(seed.parse().context("invalid --seed value")?);
                }
                "--retire-after" => {
                    let frames = args.next().context("--retire-after needs a frame count")?;
                    options.retire_after =
                        Some(frames.parse().context("invalid --retire-after frame count")?);
                }
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(options)
    }

    pub fn desc(&self) -> SimulationDesc {
        let mut desc = SimulationDesc::default();
        desc.seed = self.seed;
        desc.retention = match self.retire_after {
            Some(frames) => RetentionPolicy::retire_after(frames),
            None => RetentionPolicy::keep_all(),
        };
        desc
    }
}

/// Runs the simulation without a window and logs the final tallies.
pub fn run_headless(options: &Options, frames: u64) -> Result<()> {
    log::info!("=== Running headless simulation for up to {} frames ===", frames);

    let mut simulation = Simulation::new(options.desc(), HEADLESS_BOUNDS)
        .context("failed to create simulation")?;

    let mut strikes = 0usize;
    let mut collisions = 0usize;
    let mut terminations = 0usize;
    for _ in 0..frames {
        let report = simulation.step();
        for event in simulation.poll_events() {
            if event.is_termination() {
                terminations += 1;
            }
            match event {
                SimulationEvent::SphereStruck { .. } => strikes += 1,
                SimulationEvent::SegmentCollided { .. } => collisions += 1,
                _ => {}
            }
        }

        if simulation.is_settled() {
            log::info!("All segments settled after {} frames", report.frame);
            break;
        }
    }

    log::info!(
        "Frame {}: {} segments, {} terminated, {} collisions, {} sphere strikes",
        simulation.frame(),
        simulation.segments().len(),
        terminations,
        collisions,
        strikes
    );
    if let Some(timing) = simulation.last_timing() {
        log::info!("Last step took {} µs", timing.total_time_us);
    }

    for (index, counts) in simulation.tally().sectors().iter().enumerate() {
        log::info!("  {}: {}", WEDGE_LABELS[index], counts.label());
    }

    if simulation.tally().total() as usize != strikes {
        bail!(
            "tally total {} does not match {} recorded strikes",
            simulation.tally().total(),
            strikes
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let options = Options::parse(args(&[])).unwrap();
        assert_eq!(options, Options::default());
        assert!(!options.windowed);
        assert_eq!(options.desc().seed, None);
        assert_eq!(options.desc().retention, RetentionPolicy::keep_all());
    }

    #[test]
    fn test_parse_flags() {
        let options = Options::parse(args(&[
            "--headless",
            "500",
            "--seed",
            "42",
            "--windowed",
            "--retire-after",
            "120",
        ]))
        .unwrap();
        assert_eq!(options.headless_frames, Some(500));
        assert_eq!(options.seed, Some(42));
        assert!(options.windowed);

        let desc = options.desc();
        assert_eq!(desc.seed, Some(42));
        assert_eq!(desc.retention, RetentionPolicy::retire_after(120));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Options::parse(args(&["--headless"])).is_err());
        assert!(Options::parse(args(&["--seed", "abc"])).is_err());
        assert!(Options::parse(args(&["--fullscreen"])).is_err());
    }

    #[test]
    fn test_headless_run() {
        let options = Options {
            seed: Some(4),
            ..Default::default()
        };
        run_headless(&options, 3000).unwrap();
    }
}
