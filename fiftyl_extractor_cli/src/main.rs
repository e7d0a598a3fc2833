//! # fiftyl_extractor_cli
//!
//! Part of the fiftyl_extractor crate family.
//!
//! This is the application to extract 50L waveforms from the command line.
//!
//! ## Use
//!
//! Make a template configuration, fill it out, and run it:
//!
//! ```bash
//! fiftyl_extractor_cli -p config.yml new
//! fiftyl_extractor_cli -p config.yml info
//! fiftyl_extractor_cli -p config.yml info -r 12
//! fiftyl_extractor_cli -p config.yml
//! ```
use clap::{Arg, Command};
use indicatif::{MultiProgress, ProgressBar};
use indicatif_log_bridge::LogWrapper;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;

use libfiftyl_extractor::channel_map::ChannelMap;
use libfiftyl_extractor::config::Config;
use libfiftyl_extractor::hardware_id::RecordId;
use libfiftyl_extractor::process::process;
use libfiftyl_extractor::session::Session;

fn make_template_config(path: &Path) {
    match Config::default().write_config_file(path) {
        Ok(()) => log::info!("Done."),
        Err(e) => log::error!("Could not write template config: {e}"),
    }
}

fn print_capture_info(config: &Config, record: Option<RecordId>) {
    let channel_map = match ChannelMap::new(config.channel_map_path.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    let mut session = match Session::open_with_map(&config.capture_path, channel_map) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Capture: {session}");
    log::info!("Run: {} Sub Run: {}", session.get_run_id(), session.get_sub_run_id());
    match session.get_runtime() {
        Ok(runtime) => log::info!("Run Time: {runtime}"),
        Err(e) => log::error!("{e}"),
    }
    log::info!("Records: {}", session.get_records().len());
    for record in session.get_records() {
        log::info!("  {}", record.group_name());
    }

    // Dry run of the configured selector on one record
    if let Some(record) = record {
        let selector = config.get_selector();
        match session.extract(&record, &selector) {
            Ok(adcs) => log::info!(
                "Record {}: selector {} gives {} samples x {} channels",
                record,
                selector,
                adcs.nrows(),
                adcs.ncols()
            ),
            Err(e) => log::error!("{e}"),
        }
    }
}

fn main() {
    // Create a cli
    let matches = Command::new("fiftyl_extractor_cli")
        .arg_required_else_help(true)
        .subcommand(Command::new("new").about("Make a template configuration yaml file"))
        .subcommand(
            Command::new("info")
                .about("Print the run and records of the configured capture")
                .arg(
                    Arg::new("record")
                        .short('r')
                        .long("record")
                        .value_parser(clap::value_parser!(RecordId))
                        .help("Record (number or number.sequence) to try the selector on"),
                ),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .required(true)
                .help("Path to the configuration file"),
        )
        .get_matches();

    // Initialize feedback
    let logger = simplelog::TermLogger::new(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    let pb_manager = MultiProgress::new();

    LogWrapper::new(pb_manager.clone(), logger)
        .try_init()
        .expect("Could not create logging/progress!");

    // Parse the cli
    let config_path = PathBuf::from(matches.get_one::<String>("path").expect("We require args"));

    if let Some(("new", _)) = matches.subcommand() {
        log::info!(
            "Making a template config at {}...",
            config_path.to_string_lossy()
        );
        make_template_config(&config_path);
        return;
    }

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");

    if let Some(("info", info_matches)) = matches.subcommand() {
        let record = info_matches.get_one::<RecordId>("record").copied();
        print_capture_info(&config, record);
        return;
    }

    log::info!("Capture Path: {}", config.capture_path.to_string_lossy());
    log::info!("HDF5 Path: {}", config.hdf_path.to_string_lossy());
    match &config.channel_map_path {
        Some(p) => log::info!("Channel Map Path: {}", p.to_string_lossy()),
        None => log::info!("Channel Map Path: default"),
    }
    log::info!("Selector: {}", config.get_selector());
    log::info!(
        "First Record: {:?} Last Record: {:?}",
        config.first_record,
        config.last_record
    );

    // Setup the progress bar
    let pb = pb_manager.add(ProgressBar::new(100));
    let (tx, rx) = channel();
    // Spawn the task!
    let handle = std::thread::spawn(move || process(config, tx));

    // The sender is dropped when processing ends, which ends this loop
    for status in rx.iter() {
        pb.set_position((status.progress * 100.0) as u64);
    }

    match handle.join() {
        Ok(result) => match result {
            Ok(_) => log::info!("Successfully extracted data!"),
            Err(e) => log::error!("Extraction failed with error: {e}"),
        },
        Err(_) => log::error!("Failed to join extraction task!"),
    }

    pb.finish();

    log::info!("Done.");
}
