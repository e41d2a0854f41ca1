#![forbid(unsafe_code)]

//! # Recoil CLI
//!
//! A command-line host loop for [`recoil`] springs: it plays the part of a
//! render loop, ticking a [`SpringAnimator`] at a fixed frame rate and
//! printing each frame, so spring tunings can be inspected or plotted without
//! an application around them.

pub mod cli;

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use recoil::{
    SpringAnimator, SpringConfig, SpringSettings, friction_from_legacy,
    legacy_friction_from_friction, legacy_tension_from_tension, tension_from_legacy,
};
use serde::Serialize;
use tracing::info;

use crate::cli::{Command, ConvertArgs, Format, SimulateArgs};

/// One printed frame of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub frame: usize,
    pub time: f64,
    pub value: f64,
    pub velocity: f64,
    pub at_rest: bool,
}

/// A full simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub config: SpringConfig,
    pub settled: bool,
    pub samples: Vec<Sample>,
}

/// Runs a parsed command, writing its output to `out`.
pub fn run(command: &Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Simulate(args) => {
            let trajectory = simulate(args)?;
            write_trajectory(&trajectory, args.format, out)
        }
        Command::Convert(args) => convert(args, out),
    }
}

/// Resolves settings from the optional file with command-line overrides on
/// top.
pub fn resolve_settings(args: &SimulateArgs) -> Result<SpringSettings> {
    let mut settings = match &args.config {
        Some(path) => SpringSettings::load(path)
            .with_context(|| format!("failed to load spring settings from {}", path.display()))?,
        None => SpringSettings::default(),
    };

    if let Some(tension) = args.tension {
        settings.tension = Some(tension);
    }
    if let Some(friction) = args.friction {
        settings.friction = Some(friction);
    }
    // A legacy flag must beat a physical value coming from the file.
    if let Some(legacy) = args.legacy_tension {
        settings.legacy_tension = Some(legacy);
        settings.tension = None;
    }
    if let Some(legacy) = args.legacy_friction {
        settings.legacy_friction = Some(legacy);
        settings.friction = None;
    }
    if let Some(threshold) = args.rest_speed_threshold {
        settings.rest_speed_threshold = Some(threshold);
    }
    if let Some(threshold) = args.rest_displacement_threshold {
        settings.rest_displacement_threshold = Some(threshold);
    }
    if args.clamp_overshoot {
        settings.overshoot_clamping = Some(true);
    }

    settings.validate().context("invalid spring settings")?;
    Ok(settings)
}

/// Drives a spring described by `args` until it settles or the frame budget
/// runs out.
pub fn simulate(args: &SimulateArgs) -> Result<Trajectory> {
    let settings = resolve_settings(args)?;
    let spring = settings
        .builder()
        .start_value(args.from)
        .build()
        .context("failed to build spring")?;
    let config = spring.config();

    let mut animator = SpringAnimator::from_spring(spring);
    animator.set_end_value(args.to);
    if let Some(velocity) = args.velocity {
        animator.set_velocity(velocity);
    }

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let mut time = 0.0;
    let mut samples = vec![sample(0, time, &animator)];

    for index in 1..=args.max_frames {
        let delta = if args.jitter {
            jittered(frame, index)
        } else {
            frame
        };
        if !animator.tick(delta) {
            break;
        }
        time += delta.as_secs_f64();
        samples.push(sample(index, time, &animator));
    }

    let settled = animator.spring().is_at_rest();
    info!(
        frames = samples.len() - 1,
        settled,
        value = animator.current_value(),
        "Simulation finished"
    );

    Ok(Trajectory {
        config,
        settled,
        samples,
    })
}

fn sample(frame: usize, time: f64, animator: &SpringAnimator) -> Sample {
    Sample {
        frame,
        time,
        value: animator.current_value(),
        velocity: animator.velocity(),
        at_rest: animator.spring().is_at_rest(),
    }
}

/// Alternates half-length and one-and-a-half-length frames.
fn jittered(frame: Duration, index: usize) -> Duration {
    if index.is_multiple_of(2) {
        frame.mul_f64(1.5)
    } else {
        frame.mul_f64(0.5)
    }
}

/// Writes a trajectory as CSV or JSON.
pub fn write_trajectory(
    trajectory: &Trajectory,
    format: Format,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        Format::Csv => {
            writeln!(out, "frame,time,value,velocity,at_rest")?;
            for s in &trajectory.samples {
                writeln!(
                    out,
                    "{},{:.6},{:.6},{:.6},{}",
                    s.frame, s.time, s.value, s.velocity, s.at_rest
                )?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, trajectory)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Prints the converted values as TOML so they can be pasted into a settings
/// file.
fn convert(args: &ConvertArgs, out: &mut impl Write) -> Result<()> {
    let converted = SpringSettings {
        tension: args.legacy_tension.map(tension_from_legacy),
        friction: args.legacy_friction.map(friction_from_legacy),
        legacy_tension: args.tension.map(legacy_tension_from_tension),
        legacy_friction: args.friction.map(legacy_friction_from_friction),
        ..SpringSettings::default()
    };
    let rendered = toml::to_string(&converted).context("failed to render converted values")?;
    write!(out, "{rendered}")?;
    Ok(())
}
