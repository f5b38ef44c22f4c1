mod config;
mod device;
mod orchestrator;
mod poller;
mod reconcile;
mod session;
mod web;

use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use std::fmt::Display;
use std::process::ExitCode;
use std::sync::Arc;

use crate::config::Config;
use crate::device::{HttpDeviceClient, Mode, Motor};
use crate::orchestrator::PendingOrbitParams;
use crate::poller::{PollEvent, PollOutcome};
use crate::reconcile::{CatalogView, TrackingPanel, ViewState};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "orbigator-hud")]
#[command(about = "Status dashboard and command console for an Orbigator tracking mount")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    /// Device base URL, overrides the configuration file
    #[arg(long, global = true)]
    device: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web dashboard and API
    Serve,
    /// Print the current device status once
    Status,
    /// Print live telemetry until interrupted
    Watch,
    /// List the device's satellite catalog
    Satellites {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Select a satellite and start tracking it
    Track { satellite: String },
    /// Stop tracking
    Stop,
    /// Switch the device mode
    Mode { mode: Mode },
    /// Apply static orbit parameters, from the current orbit, a preset and/or explicit values
    Orbit(OrbitArgs),
    /// Load a TLE from a file holding two or three lines
    ManualTle {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        file: String,
    },
    /// Refresh the TLE of the selected satellite
    RefreshTle,
    /// Move a motor by a signed number of degrees
    Nudge {
        motor: Motor,
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },
    /// Print raw motor positions
    Motors,
    /// Wi-Fi provisioning
    Wifi {
        #[command(subcommand)]
        command: WifiCommands,
    },
}

#[derive(Args)]
struct OrbitArgs {
    /// Start from the parameters the device currently reports
    #[arg(long, conflicts_with = "preset")]
    current: bool,
    /// iss, leo or geo
    #[arg(long)]
    preset: Option<String>,
    #[arg(long)]
    altitude_km: Option<f64>,
    #[arg(long)]
    period_min: Option<f64>,
    #[arg(long)]
    eccentricity: Option<f64>,
    #[arg(long)]
    inclination_deg: Option<f64>,
}

#[derive(Subcommand)]
enum WifiCommands {
    /// List networks visible to the device
    Scan,
    /// Save credentials; the device restarts its network
    Connect { ssid: String, password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    if let Some(device) = cli.device {
        config.device.base_url = device;
    }

    let client = match HttpDeviceClient::new(&config.device.base_url, config.device.timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let interval = if matches!(cli.command, Commands::Watch) {
        config.polling.telemetry_interval
    } else {
        config.polling.interval
    };
    let session = Arc::new(Session::new(client, interval));

    match cli.command {
        Commands::Serve => serve(&config, session).await,
        Commands::Status => status(&session).await,
        Commands::Watch => watch(&session).await,
        Commands::Satellites { search } => report(session.satellites(&search).await, print_catalog),
        Commands::Track { satellite } => report(
            session.orchestrator().track_satellite(&satellite).await,
            |_| println!("Tracking {satellite}"),
        ),
        Commands::Stop => report(session.orchestrator().stop_tracking().await, |_| {
            println!("Tracking stopped")
        }),
        Commands::Mode { mode } => report(session.orchestrator().set_mode(mode).await, |_| {
            println!("Mode set to {mode}")
        }),
        Commands::Orbit(args) => orbit(&session, args).await,
        Commands::ManualTle { name, file } => manual_tle(&session, name.as_deref(), &file).await,
        Commands::RefreshTle => refresh_tle(&session).await,
        Commands::Nudge { motor, delta } => report(
            session.orchestrator().nudge_motor(motor, delta).await,
            |_| println!("Nudged {motor} by {delta}°"),
        ),
        Commands::Motors => report(session.motors().await, |m| {
            println!("AoV: {}", m.aov.map_or("—".to_string(), |v| format!("{v:.2}°")));
            println!("EQX: {}", m.eqx.map_or("—".to_string(), |v| format!("{v:.2}°")));
        }),
        Commands::Wifi { command } => match command {
            WifiCommands::Scan => report(session.orchestrator().scan_wifi().await, |networks| {
                for network in networks {
                    println!("{network}");
                }
            }),
            WifiCommands::Connect { ssid, password } => report(
                session
                    .orchestrator()
                    .save_wifi_config(&ssid, &password)
                    .await,
                |reply| println!("{}", reply.message),
            ),
        },
    }
}

fn report<T, E: Display>(result: Result<T, E>, print: impl FnOnce(T)) -> ExitCode {
    match result {
        Ok(value) => {
            print(value);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config: &Config, session: Arc<Session<HttpDeviceClient>>) -> ExitCode {
    let state = web::AppState {
        session,
        refresh_secs: config.polling.interval.as_secs().max(1),
    };
    match web::run_server(&config.web.bind, state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn status(session: &Session<HttpDeviceClient>) -> ExitCode {
    match session.refresh_now().await {
        PollOutcome::Applied(view) => {
            print_view(&view);
            ExitCode::SUCCESS
        }
        PollOutcome::Failed(message) => {
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
        PollOutcome::Discarded => {
            eprintln!("Error: status reply was superseded by a newer fetch");
            ExitCode::FAILURE
        }
    }
}

async fn watch(session: &Session<HttpDeviceClient>) -> ExitCode {
    let mut events = session.subscribe();
    session.start().await;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PollEvent::Applied { seq, view }) => {
                    log::debug!("Poll #{seq} applied");
                    print_view(&view);
                }
                Ok(PollEvent::Failed { seq, message }) => {
                    eprintln!("Poll #{} failed: {}", seq, message);
                }
                Err(e) => log::debug!("Telemetry stream: {}", e),
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.stop().await;
    ExitCode::SUCCESS
}

async fn orbit(session: &Session<HttpDeviceClient>, args: OrbitArgs) -> ExitCode {
    if args.current {
        if let PollOutcome::Failed(message) = session.refresh_now().await {
            eprintln!("Error: {}", message);
            return ExitCode::FAILURE;
        }
        if let Err(e) = session.load_current_orbit() {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }
    if let Some(preset) = args.preset.as_deref() {
        if let Err(e) = session.load_preset(preset) {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }
    session.edit_pending_orbit(PendingOrbitParams {
        altitude_km: args.altitude_km,
        period_min: args.period_min,
        eccentricity: args.eccentricity,
        inclination_deg: args.inclination_deg,
    });

    match session.apply_pending_orbit().await {
        Ok(outcome) => {
            println!("AoV rate: {:.6}°/s", outcome.rates.aov_rate);
            println!("EQX rate: {:.6}°/s", outcome.rates.eqx_rate);
            match outcome.mode_error {
                Some(e) => {
                    eprintln!("Parameters applied, but {}", e);
                    ExitCode::FAILURE
                }
                None => ExitCode::SUCCESS,
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn manual_tle(session: &Session<HttpDeviceClient>, name: Option<&str>, path: &str) -> ExitCode {
    let block = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    report(
        session.orchestrator().load_pasted_tle(name, &block).await,
        |reply| println!("{}", reply.message),
    )
}

async fn refresh_tle(session: &Session<HttpDeviceClient>) -> ExitCode {
    // The selection comes from the device, so learn it first.
    if let PollOutcome::Failed(message) = session.refresh_now().await {
        eprintln!("Error: {}", message);
        return ExitCode::FAILURE;
    }

    report(session.orchestrator().refresh_tle().await, |catalog| match catalog {
        Some(entries) => {
            let selected = session.view().and_then(|v| v.satellite.clone());
            for entry in entries
                .iter()
                .filter(|e| Some(&e.name) == selected.as_ref())
            {
                println!("{}: TLE age {}", entry.name, entry.tle_age);
            }
        }
        None => println!("No satellite selected"),
    })
}

fn print_view(view: &ViewState) {
    println!(
        "[{}] {} | {} | WiFi: {} | RTC: {} | {}",
        view.refreshed_at.format("%H:%M:%S"),
        view.mode,
        view.tracking_badge.label,
        view.connection_badge.label,
        view.rtc_badge.label,
        view.tle_badge.label,
    );
    if let TrackingPanel::Active {
        satellite,
        latitude,
        longitude,
        altitude,
    } = &view.tracking
    {
        println!(
            "  {}: {} {} {}",
            satellite.as_deref().unwrap_or("—"),
            latitude,
            longitude,
            altitude
        );
    }
    println!("  AoV {}  EQX {}", view.motors.aov, view.motors.eqx);
}

fn print_catalog(catalog: CatalogView) {
    match catalog {
        CatalogView::Empty { search } => println!("No satellites match \"{}\"", search),
        CatalogView::Entries { rows } => {
            for row in rows {
                println!(
                    "{} {:<24} {:>6}  {}",
                    if row.selected { "*" } else { " " },
                    row.name,
                    row.norad_id,
                    row.tle_badge.label
                );
            }
        }
    }
}
