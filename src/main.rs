use credentials_timeline::cli::Args;
use credentials_timeline::config::{CONFIG_FILE, TimelineConfig};
use credentials_timeline::entities::TimelineSection;
use credentials_timeline::paths::{self, PathConfig};
use credentials_timeline::widgets::timeline::TimelineView;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use log::{debug, info, warn};
use std::path::Path;

/// Main application state
struct TimelineApp {
    view: TimelineView,
    error_msg: Option<String>,
}

impl TimelineApp {
    fn new(section: TimelineSection, config: TimelineConfig) -> Self {
        Self {
            view: TimelineView::new(section, config),
            error_msg: None,
        }
    }

    /// Swap in a section dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(path) = dropped.into_iter().filter_map(|f| f.path).find(|p| is_json(p)) else {
            return;
        };

        info!("Loading dropped section: {}", path.display());
        match TimelineSection::from_json_file(&path) {
            Ok(section) => {
                self.view.replace_section(section);
                self.error_msg = None;
            }
            Err(e) => {
                warn!("{:#}", e);
                self.error_msg = Some(format!("{:#}", e));
            }
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl eframe::App for TimelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.view.section().title);
            if let Some(msg) = &self.error_msg {
                ui.colored_label(egui::Color32::from_rgb(230, 110, 100), msg);
            }
            ui.separator();
            self.view.show(ui);
        });
    }
}

fn init_logging(args: &Args, path_config: &PathConfig) -> Result<()> {
    let log_level = args.log_level();

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| paths::data_file("credentials-timeline.log", path_config));

        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .filter_module("eframe", log::LevelFilter::Info)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        // Console logging, respects RUST_LOG if set
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info)
            .filter_module("eframe", log::LevelFilter::Info)
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());

    init_logging(&args, &path_config)?;

    info!("Credentials timeline starting...");
    debug!("Command-line args: {:?}", args);

    let config_path = paths::config_file(CONFIG_FILE, &path_config);
    info!("Config path: {}", config_path.display());

    let mut config = TimelineConfig::load_or_default(&config_path);
    if args.reduced_motion {
        config.reduced_motion = true;
    }

    let section = match &args.data {
        Some(path) => {
            info!("Input file: {}", path.display());
            TimelineSection::from_json_file(path)?
        }
        None => {
            info!("No input file provided, showing built-in credentials");
            TimelineSection::credentials()
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "Credentials Timeline v{} • drop a section JSON to load it",
                env!("CARGO_PKG_VERSION")
            ))
            .with_inner_size([960.0, 720.0])
            .with_resizable(true)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let app = TimelineApp::new(section, config);
    eframe::run_native(
        "Credentials Timeline",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("eframe: {e}"))?;

    info!("Application exiting");
    Ok(())
}
