use clap::Parser;

use time_warp_scan::camera::CameraSource;
use time_warp_scan::cli::{self, Args, Command, ConfigAction};
use time_warp_scan::config::{self, Config};
use time_warp_scan::display::DisplayWindow;
use time_warp_scan::recording::FfmpegSink;
use time_warp_scan::runner;
use time_warp_scan::session::SessionController;
use time_warp_scan::shutdown;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn run_scan(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let settings = cfg.session_settings()?;

    if let Err(e) = shutdown::setup_ctrlc_handler() {
        log::warn!("Could not set up Ctrl+C handler: {}", e);
    }

    let mut camera = CameraSource::open(cfg.camera_settings())?;

    // The first frame fixes the session size; decoded frames can differ from
    // the negotiated resolution on some backends.
    let first = match camera.next_frame() {
        Ok(frame) => frame,
        Err(e) => {
            log::error!("Camera stopped before the first frame: {}", e);
            return Ok(());
        }
    };
    let (width, height) = first.dimensions();
    log::info!(
        "Scanning {} at {}x{}, speed {}, filter {}",
        settings.axis,
        width,
        height,
        settings.speed,
        settings.filter
    );

    let mut window = DisplayWindow::open(width, height)?;
    let sink = FfmpegSink::new(&cfg.recording.ffmpeg, &cfg.recording.output_dir);
    let session = SessionController::new(settings, width, height, sink)?;

    let summary = runner::run(&mut camera, &mut window, session, shutdown::flag());
    log::info!(
        "Session ended ({}): {} frames, {} videos saved, {} unsaved frames discarded",
        summary.exit,
        summary.ticks,
        summary.exports,
        summary.discarded
    );

    if summary.exit.is_clean() {
        Ok(())
    } else {
        Err(summary.exit.to_string().into())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config_path = args.config.clone().unwrap_or_else(config::default_path);

    match &args.command {
        Some(Command::ListCameras) => {
            cli::list_cameras()?;
            return Ok(());
        }
        Some(Command::Config {
            action: ConfigAction::Init,
        }) => {
            cli::handle_config_action(ConfigAction::Init, &config_path, &Config::default())?;
            return Ok(());
        }
        _ => {}
    }

    let mut cfg = Config::load(Some(&config_path))?;
    args.apply_to(&mut cfg);

    if let Some(Command::Config { action }) = args.command {
        cli::handle_config_action(action, &config_path, &cfg)?;
        return Ok(());
    }

    run_scan(&cfg)
}
