//! Command-line interface for `recoil`.
//!
//! # Examples
//!
//! ```bash
//! # Trace a spring from 0 to 1 at 60 FPS
//! recoil simulate --tension 50 --friction 10
//!
//! # Same spring tuned in legacy units, as JSON
//! recoil simulate --legacy-tension 40 --legacy-friction 7 --format json
//!
//! # Convert between unit systems
//! recoil convert --legacy-tension 40 --legacy-friction 7
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Damped-spring simulator for animation tuning.
#[derive(Parser, Debug, Clone)]
#[command(name = "recoil", author, version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// Overridden by the `RECOIL_LOG` environment variable.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Drive a spring frame by frame and print its trajectory
    Simulate(SimulateArgs),
    /// Convert tuning between physical and legacy units
    Convert(ConvertArgs),
}

/// Output format for `simulate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Csv,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Spring settings file (TOML, or JSON by extension)
    #[arg(long, short = 'c', env = "RECOIL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Physical tension
    #[arg(long, conflicts_with = "legacy_tension")]
    pub tension: Option<f64>,

    /// Physical friction
    #[arg(long, conflicts_with = "legacy_friction")]
    pub friction: Option<f64>,

    /// Tension as a legacy index
    #[arg(long)]
    pub legacy_tension: Option<f64>,

    /// Friction as a legacy index
    #[arg(long)]
    pub legacy_friction: Option<f64>,

    /// Speed below which the spring may rest
    #[arg(long)]
    pub rest_speed_threshold: Option<f64>,

    /// Distance from the target below which the spring may rest
    #[arg(long)]
    pub rest_displacement_threshold: Option<f64>,

    /// Stop at the target instead of overshooting it
    #[arg(long)]
    pub clamp_overshoot: bool,

    /// Starting value
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub from: f64,

    /// Target value
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub to: f64,

    /// Initial velocity
    #[arg(long, allow_hyphen_values = true)]
    pub velocity: Option<f64>,

    /// Frames per second of the simulated host loop
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Give up after this many frames
    #[arg(long, default_value_t = 600)]
    pub max_frames: usize,

    /// Alternate short and long frames around the nominal frame length
    #[arg(long)]
    pub jitter: bool,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

#[derive(Args, Debug, Clone)]
#[command(group(
    clap::ArgGroup::new("input")
        .required(true)
        .multiple(true)
        .args(["tension", "friction", "legacy_tension", "legacy_friction"])
))]
pub struct ConvertArgs {
    /// Physical tension to express in legacy units
    #[arg(long, conflicts_with_all = ["legacy_tension", "legacy_friction"])]
    pub tension: Option<f64>,

    /// Physical friction to express in legacy units
    #[arg(long, conflicts_with_all = ["legacy_tension", "legacy_friction"])]
    pub friction: Option<f64>,

    /// Legacy tension index to express in physical units
    #[arg(long)]
    pub legacy_tension: Option<f64>,

    /// Legacy friction index to express in physical units
    #[arg(long)]
    pub legacy_friction: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_simulate_defaults() {
        let cli = Cli::parse_from(["recoil", "simulate"]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.from, 0.0);
        assert_eq!(args.to, 1.0);
        assert_eq!(args.fps, 60);
        assert_eq!(args.format, Format::Csv);
        assert!(!args.jitter);
    }

    #[test]
    fn test_simulate_negative_values() {
        let cli = Cli::parse_from(["recoil", "simulate", "--from", "-5", "--to", "-1.5"]);
        let Command::Simulate(args) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.from, -5.0);
        assert_eq!(args.to, -1.5);
    }

    #[test]
    fn test_physical_and_legacy_tension_conflict() {
        let result = Cli::try_parse_from([
            "recoil",
            "simulate",
            "--tension",
            "50",
            "--legacy-tension",
            "40",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_requires_input() {
        assert!(Cli::try_parse_from(["recoil", "convert"]).is_err());
    }

    #[test]
    fn test_zero_fps_rejected() {
        assert!(Cli::try_parse_from(["recoil", "simulate", "--fps", "0"]).is_err());
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::parse_from(["recoil", "-vv", "convert", "--tension", "194"]);
        assert_eq!(cli.verbose, 2);
    }
}
