use std::process::ExitCode;

use crate::app::cli::{Args, Command};
use crate::app::config::Settings;
use crate::app::demo;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::version::{build_time, git_hash};

/// Exit status when the run completed but resources remain registered
const EXIT_NOT_CLEAN: u8 = 2;

/// Parse arguments, start the runtime and run the selected command
pub fn startup() -> ExitCode {
    let detected_color = colored::control::SHOULD_COLORIZE.should_colorize();
    let args = match Args::parse_styled_from(std::env::args_os(), detected_color) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    runtime.block_on(run(args, detected_color))
}

async fn run(args: Args, detected_color: bool) -> ExitCode {
    let settings = Settings::load(&args).await;

    let (level, format, file, color) = match &settings {
        Ok(s) => (
            s.log_level.clone(),
            s.log_format.clone(),
            s.log_file.clone(),
            s.color.unwrap_or(detected_color),
        ),
        Err(_) => (None, None, None, args.color_choice().unwrap_or(detected_color)),
    };
    colored::control::set_override(color);

    let file = file.map(|p| p.to_string_lossy().to_string());
    if let Err(e) = init_logging(level.as_deref(), format.as_deref(), file.as_deref(), color) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            log_error_with_context(&e, "Configuration loading");
            return ExitCode::FAILURE;
        }
    };

    log::debug!(
        "scenesweep {} starting (built {}, {})",
        env!("CARGO_PKG_VERSION"),
        build_time(),
        git_hash()
    );
    log::debug!("Effective settings: {:?}", settings);

    let result = match &args.command {
        Command::Demo(demo_args) => demo::demo(demo_args, settings.cleanup.clone(), color).await,
        Command::Status { json } => demo::status(*json, color),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            log::warn!("Resources remain registered after cleanup");
            ExitCode::from(EXIT_NOT_CLEAN)
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
