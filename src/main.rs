use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use eframe::egui;

use neo_viz::net::lookahead::NextApproachLoader;
use neo_viz::render::svg::render_svg;
use neo_viz::{NeoEngine, NeoError, Result, VizConfig};

mod app;

use app::NeoApp;

#[derive(Parser)]
#[command(name = "neo-viz", version, about = "Near-Earth object close-approach visualizer")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

/// Settings that override the configuration file.
#[derive(Args)]
struct Overrides {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Reference date (YYYY-MM-DD), default today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,
    /// Display threshold in lunar distances
    #[arg(long, global = true)]
    threshold: Option<f64>,
    /// Days after the reference date to search
    #[arg(long, global = true)]
    window: Option<u32>,
    /// Maximum rows requested from the API
    #[arg(long, global = true)]
    limit: Option<u32>,
    /// Seed for lane jitter
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive chart (default)
    View,
    /// Write the chart to an SVG file
    Export(ExportArgs),
}

#[derive(Args)]
struct ExportArgs {
    #[arg(short, long)]
    output: PathBuf,
    /// Skip the per-object next-approach lookups
    #[arg(long)]
    no_lookahead: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = resolve_config(&cli.overrides).and_then(|config| match cli.command {
        None | Some(Command::View) => view(config),
        Some(Command::Export(args)) => export(config, &args),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn resolve_config(overrides: &Overrides) -> Result<VizConfig> {
    let mut config = match overrides.config {
        Some(ref path) => VizConfig::load(path)?,
        None => VizConfig::default(),
    };
    if let Some(date) = overrides.date {
        config.reference_date = Some(date);
    }
    if let Some(threshold) = overrides.threshold {
        config.threshold_ld = threshold;
    }
    if let Some(window) = overrides.window {
        config.window_days = window;
    }
    if let Some(limit) = overrides.limit {
        config.limit = limit;
    }
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    config.validate()?;
    Ok(config)
}

fn export(config: VizConfig, args: &ExportArgs) -> Result<()> {
    let engine = NeoEngine::new(config)?;
    let mut result = engine.load()?;

    if !args.no_lookahead && !result.records.is_empty() {
        let mut loader = NextApproachLoader::new(
            engine.source(),
            result.config.lookahead_workers,
            result.config.lookahead_years,
            result.context.window_end(),
        )?;
        loader.request_all(&result.records);
        let resolved = loader.wait_all(&mut result.records);
        log::info!("resolved {} next-approach lookups", resolved);
    }

    let svg = render_svg(&result.scene());
    std::fs::write(&args.output, svg)?;
    println!(
        "wrote {} objects ({} fetched) to {}",
        result.records.len(),
        result.total_rows,
        args.output.display()
    );
    Ok(())
}

fn view(config: VizConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NEO Close Approaches",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            let mut app = NeoApp::new(config);
            app.reload(&cc.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| NeoError::Window(e.to_string()))
}

impl eframe::App for NeoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_fetch(ctx);
        self.poll_lookahead();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.draw_status(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_chart(ui);
        });
    }
}
