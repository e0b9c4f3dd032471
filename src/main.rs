use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser, ValueHint};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod activity_reader;
mod annotations;
mod error;
mod gradient_color;
mod profile_export;
mod profile_renderer;
mod track_normalizer;
mod track_simplifier;

use activity_reader::{format_summary, read_activities, select_trackpoints};
use annotations::Annotations;
use error::ProfileError;
use profile_export::save_segments_to_csv;
use profile_renderer::{profile_segments, render_svg, write_svg, RenderOptions};
use track_normalizer::normalize_track;
use track_simplifier::simplify_track;

#[derive(Parser, Debug)]
#[command(author, version, about = "Slope-colored elevation map from a GPX track", long_about = None)]
struct Cli {
    /// GPX file to be read
    #[arg(short = 't', long = "track", value_hint = ValueHint::FilePath)]
    track: Option<PathBuf>,

    /// Activity (track) index to draw
    #[arg(short = 'a', long)]
    activity: Option<usize>,

    /// Lap (segment) index inside the activity
    #[arg(short = 'l', long)]
    lap: Option<usize>,

    /// Show file info and exit
    #[arg(short = 'i', long, action = ArgAction::SetTrue)]
    info: bool,

    /// Simplify by removing this percentage (0-100) of the samples
    #[arg(short = 's', long)]
    simplify: Option<f64>,

    /// Ignore trackpoints past this distance (meters)
    #[arg(long = "dist-limit")]
    dist_limit: Option<f64>,

    /// Downscale the image by this value
    #[arg(long, default_value_t = 10.0)]
    scale: f64,

    /// Font size for labels
    #[arg(long, default_value_t = 20.0)]
    fontsize: f64,

    /// YAML file with labels, height points and an optional color table
    #[arg(long, value_hint = ValueHint::FilePath)]
    labels: Option<PathBuf>,

    /// Output SVG path
    #[arg(short, long, default_value = "elevation.svg", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Also write the colored segments as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    csv: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Keep 2 and 3 free for the index errors
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if matches!(err, ProfileError::InputNotFound) {
                eprintln!("{}", Cli::command().render_help());
            }
            error!("{}", err);
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), ProfileError> {
    let track_path = cli.track.as_ref().ok_or(ProfileError::InputNotFound)?;
    let activities = read_activities(track_path)?;

    let annotations = match &cli.labels {
        Some(path) => Annotations::load(path)?,
        None => Annotations::default(),
    };
    let table = annotations.gradient_table()?;
    let options = RenderOptions {
        scale: cli.scale,
        font_size: cli.fontsize,
    };
    options.validate()?;

    let activity = match (cli.info, cli.activity, cli.lap) {
        (true, _, _) | (false, None, None) => {
            print!("{}", format_summary(&activities));
            return Ok(());
        }
        (false, activity, _) => activity.unwrap_or(0),
    };

    let trackpoints = select_trackpoints(&activities, activity, cli.lap)?;
    info!(
        "Activity {}, {}: {} trackpoints",
        activity,
        cli.lap.map_or("all laps".to_string(), |l| format!("lap {}", l)),
        trackpoints.len()
    );

    let track = normalize_track(&trackpoints, cli.dist_limit)?;
    let samples = match cli.simplify {
        Some(percent) => simplify_track(&track.samples, percent)?,
        None => track.samples.clone(),
    };

    let svg = render_svg(&samples, &track.stats, &table, &annotations, &options)?;
    write_svg(&cli.output, &svg)?;
    info!(
        "Wrote {} ({} samples, {:.0}m to {:.0}m altitude)",
        cli.output.display(),
        samples.len(),
        track.stats.min_altitude,
        track.stats.max_altitude
    );

    if let Some(csv_path) = &cli.csv {
        save_segments_to_csv(&profile_segments(&samples, &table), csv_path)?;
    }

    Ok(())
}
