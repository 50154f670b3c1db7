use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use nalgebra::Vector3;
use tracing_subscriber::EnvFilter;

use balloon_landfall::config::Settings;
use balloon_landfall::io::{csv, feed, json, weather};
use balloon_landfall::physics::WeatherObservation;
use balloon_landfall::sim;
use balloon_landfall::types::{Ecef, Geodetic, Release};

/// Balloon landing point estimator.
#[derive(Parser, Debug)]
#[command(name = "landfall", version, about)]
struct Cli {
    /// Settings file (RON). Missing file means defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace). RUST_LOG wins if set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Command,
}

/// Values that override the settings file.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Integration timestep, s.
    #[arg(long, global = true)]
    dt: Option<f64>,

    /// Give up after this many simulated seconds.
    #[arg(long, global = true)]
    max_time: Option<f64>,

    /// Payload mass, kg.
    #[arg(long, global = true)]
    mass: Option<f64>,

    /// Drag coefficient.
    #[arg(long, global = true)]
    cd: Option<f64>,

    /// Reference area, m^2.
    #[arg(long, global = true)]
    area: Option<f64>,
}

impl Overrides {
    fn apply(&self, settings: &mut Settings) {
        if let Some(dt) = self.dt {
            settings.simulation.dt = dt;
        }
        if let Some(t) = self.max_time {
            settings.simulation.max_time = t;
        }
        if let Some(m) = self.mass {
            settings.airframe.mass = m;
        }
        if let Some(cd) = self.cd {
            settings.airframe.cd = cd;
        }
        if let Some(a) = self.area {
            settings.airframe.area = a;
        }
    }
}

/// Where the wind comes from for a run.
#[derive(Args, Debug, Default)]
struct WindArgs {
    /// Forecast document (JSON) with a `current` wind block.
    #[arg(long, conflicts_with = "wind_speed")]
    weather: Option<PathBuf>,

    /// Surface wind speed, mph.
    #[arg(long, requires = "wind_bearing")]
    wind_speed: Option<f64>,

    /// Direction the wind blows from, degrees clockwise from north.
    #[arg(long, requires = "wind_speed")]
    wind_bearing: Option<f64>,
}

impl WindArgs {
    fn observation(&self) -> Result<Option<WeatherObservation>, Box<dyn std::error::Error>> {
        if let Some(path) = &self.weather {
            let text = read(path)?;
            return Ok(Some(weather::decode(&text)?));
        }
        Ok(match (self.wind_speed, self.wind_bearing) {
            (Some(speed), Some(bearing)) => Some(WeatherObservation::mph(speed, bearing)),
            _ => None,
        })
    }
}

/// Where to put results besides stdout.
#[derive(Args, Debug, Default)]
struct OutputArgs {
    /// Write the full trajectory as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the impact report to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the landing point of a feed fix given in ECEF meters.
    Impact {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
        #[command(flatten)]
        wind: WindArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Estimate the landing point of a release given in lat/lon/alt.
    Drop {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        alt: f64,
        /// Initial velocity east, north, up in m/s.
        #[arg(long, num_args = 3, value_names = ["E", "N", "U"], allow_negative_numbers = true)]
        velocity: Option<Vec<f64>>,
        #[command(flatten)]
        wind: WindArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Convert an ECEF position to WGS84 lat/lon/alt.
    Geodetic {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
    },
    /// Decode a feed document and list every complete fix in lat/lon/alt.
    Feed {
        /// Feed document. Defaults to the current hour's snapshot, e.g. `07.json`.
        path: Option<PathBuf>,
    },
    /// Write the effective settings to a RON file.
    InitConfig { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut settings = match Settings::load_or_default(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.overrides.apply(&mut settings);
    if let Some(level) = &cli.log_level {
        settings.log_level = level.clone();
    }
    init_logging(&settings.log_level);

    match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn read(path: &Path) -> Result<String, balloon_landfall::DataError> {
    std::fs::read_to_string(path).map_err(|source| balloon_landfall::DataError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn run(command: Command, settings: &Settings) -> Result<ExitCode, Box<dyn std::error::Error>> {
    settings.validate()?;

    match command {
        Command::Impact { x, y, z, wind, output } => {
            let fix = settings.geodesy.to_geodetic(&Ecef::new(x, y, z))?;
            log::info!(
                "feed fix ({x}, {y}, {z}) -> ({:.5}, {:.5}, {:.0} m)",
                fix.lat,
                fix.lon,
                fix.alt
            );
            estimate(Release::at(fix), &wind, &output, settings)
        }
        Command::Drop { lat, lon, alt, velocity, wind, output } => {
            let mut release = Release::at(Geodetic::new(lat, lon, alt));
            if let Some(v) = velocity {
                let [e, n, u] = v.as_slice() else {
                    let msg = format!("--velocity takes exactly 3 values, got {}", v.len());
                    return Err(msg.into());
                };
                release = release.with_velocity(Vector3::new(*e, *n, *u));
            }
            estimate(release, &wind, &output, settings)
        }
        Command::Geodetic { x, y, z } => {
            let g = settings.geodesy.to_geodetic(&Ecef::new(x, y, z))?;
            println!("{}", serde_json::to_string_pretty(&g)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Feed { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(feed::current_snapshot_name()));
            let positions = feed::decode(&read(&path)?)?;
            log::info!("{} complete fixes in {}", positions.len(), path.display());
            let mut fixes = Vec::with_capacity(positions.len());
            for p in &positions {
                match settings.geodesy.to_geodetic(p) {
                    Ok(g) => fixes.push(g),
                    Err(e) => log::warn!("skipping fix ({}, {}, {}): {e}", p.x, p.y, p.z),
                }
            }
            println!("{}", serde_json::to_string_pretty(&fixes)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { path } => {
            settings.save(&path)?;
            log::info!("wrote settings to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Simulate one descent and report it. Exit code 2 flags a timeout.
fn estimate(
    release: Release,
    wind: &WindArgs,
    output: &OutputArgs,
    settings: &Settings,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let obs = wind.observation()?;
    let config = &settings.simulation;
    let airframe = &settings.airframe;

    let trajectory = sim::simulate_trajectory(&release, airframe, obs.as_ref(), config)?;
    let impact = trajectory
        .last()
        .and_then(sim::Impact::from_snapshot)
        .ok_or("descent ended without a terminal snapshot")?;

    if let Some(path) = &output.csv {
        csv::write_trajectory_file(&path.to_string_lossy(), &trajectory)?;
        log::info!("wrote {} trajectory rows to {}", trajectory.len(), path.display());
    }

    let summary = json::DescentSummary::from_trajectory(&trajectory);
    let report = json::ImpactReport::new(&release.position, &impact).with_summary(summary);
    match &output.out {
        Some(path) => json::write_report_file(&path.to_string_lossy(), &report)?,
        None => json::write_report(&mut std::io::stdout().lock(), &report)?,
    }

    Ok(match impact.landed(config.max_time) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("{e}");
            ExitCode::from(2)
        }
    })
}
