use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use utm_builder::cli_args::{CommandLineArgs, RunMode};
use utm_builder::common::constants::SPINNER_TEMPLATE;
use utm_builder::common::FormInput;
use utm_builder::form::{confirm, prompt_form};
use utm_builder::history::{render_table, write_export, HistoryView};
use utm_builder::settings::Settings;
use utm_builder::store::{self, HistoryStore};
use utm_builder::utm::{LinkBuilder, Submission};

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let start_time = Instant::now();
    info!("UTM Builder v{} starting up...", env!("CARGO_PKG_VERSION"));

    let cli_args = CommandLineArgs::parse_args();

    debug!("Loading application settings...");
    let settings = load_settings(&cli_args)?;

    let mut store = store::open_store(&settings)?;
    let builder = LinkBuilder::new(settings.brand.clone());
    let mut history = HistoryView::new();

    let mode = cli_args.run_mode();
    let mut exit_code = ExitCode::SUCCESS;

    if mode.submits() {
        let submission = run_form(&cli_args, mode, &builder, store.as_mut())?;
        let saved = submission.as_ref().map_or(false, Submission::is_saved);
        if saved {
            history.invalidate();
        } else if mode.fails_on_rejected_submission() {
            exit_code = ExitCode::FAILURE;
        }
    }

    if !cli_args.no_history || cli_args.export.is_some() {
        show_history(&cli_args, &settings, &mut history, store.as_ref());
    }

    debug!(
        "Finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    Ok(exit_code)
}

fn load_settings(cli_args: &CommandLineArgs) -> Result<Settings> {
    let path = Settings::locate(cli_args.settings.as_deref())?;
    let settings = Settings::load(&path)?;
    settings
        .validate()
        .with_context(|| format!("Invalid settings in '{}'", path))?;
    info!("Settings loaded successfully");
    Ok(settings)
}

fn run_form(
    cli_args: &CommandLineArgs,
    mode: RunMode,
    builder: &LinkBuilder,
    store: &mut dyn HistoryStore,
) -> Result<Option<Submission>> {
    if mode == RunMode::Flags {
        let input = cli_args.to_form_input();
        return Ok(submit_and_report(builder, &input, store));
    }

    let mut reader = io::stdin().lock();
    let mut writer = io::stdout();
    let mut previous = FormInput::default();

    loop {
        let input = match prompt_form(&mut reader, &mut writer, &previous)? {
            Some(input) => input,
            None => {
                warn!("Input closed before the form was complete");
                return Ok(None);
            }
        };

        if let Some(submission) = submit_and_report(builder, &input, store) {
            return Ok(Some(submission));
        }

        if !confirm(&mut reader, &mut writer, "Edit the form and try again?")? {
            return Ok(None);
        }
        previous = input;
    }
}

/// Prints the link whenever one was generated, even if saving failed.
fn submit_and_report(
    builder: &LinkBuilder,
    input: &FormInput,
    store: &mut dyn HistoryStore,
) -> Option<Submission> {
    match builder.submit(input, store) {
        Ok(submission) => {
            println!("{}", submission.link());
            if let Err(e) = &submission.saved {
                error!("{}. Copy the link above manually or try again.", e);
            }
            Some(submission)
        }
        Err(e) if e.is_validation() => {
            warn!("{}", e);
            None
        }
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn show_history(
    cli_args: &CommandLineArgs,
    settings: &Settings,
    history: &mut HistoryView,
    store: &dyn HistoryStore,
) {
    let spinner = create_spinner("Loading history...");
    let result = history.load(store);
    spinner.finish_and_clear();

    let records = match result {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "{}. Link generation still works; the history view is unavailable.",
                e
            );
            return;
        }
    };

    if !cli_args.no_history {
        if records.is_empty() {
            info!("No links saved yet");
        } else {
            println!();
            println!("History of generated links ({})", records.len());
            println!("{}", render_table(records));
        }
    }

    if let Some(target) = &cli_args.export {
        let path = if target.is_empty() {
            PathBuf::from(&settings.export_file_name)
        } else {
            PathBuf::from(target)
        };
        if let Err(e) = write_export(records, &path) {
            error!("Could not export history: {:#}", e);
        }
    }
}
