// Salon Agenda
// Command line entry point: fetch one professional's agenda and render it as HTML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use salon_agenda::models::agenda::AgendaMatrix;
use salon_agenda::models::settings::Settings;
use salon_agenda::models::ui::{AgendaQuery, ViewMode};
use salon_agenda::services::agenda::AgendaController;
use salon_agenda::services::api::HttpAgendaClient;
use salon_agenda::services::grid::build_grid;
use salon_agenda::services::render::render_html;
use salon_agenda::services::settings::SettingsService;
use salon_agenda::utils::date;

#[derive(Parser)]
#[command(name = "salon-agenda", version)]
#[command(about = "Render a professional's salon agenda as an HTML table")]
struct Cli {
    /// Settings file (defaults to the per-user config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Professional whose agenda is shown
    #[arg(long, short = 'p')]
    professional: Option<i64>,

    /// First day, YYYY-MM-DD (defaults to today)
    #[arg(long, short = 's')]
    start: Option<String>,

    /// Last day, YYYY-MM-DD; ignored when before the start date
    #[arg(long, short = 'e')]
    end: Option<String>,

    /// day or week
    #[arg(long)]
    view: Option<ViewMode>,

    /// Render a saved agenda response instead of calling the API
    #[arg(long)]
    matrix_file: Option<PathBuf>,

    /// Write the HTML here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("Starting Salon Agenda");

    let settings = load_settings(cli.config.as_deref())?;
    let today = date::today();

    let mut controller = AgendaController::new(AgendaQuery::new(today, settings.default_view));
    controller.set_professional(cli.professional.or(settings.default_professional_id));
    if let Some(view) = cli.view {
        controller.set_view_mode(view, today);
    }
    if let Some(start) = cli.start {
        controller.set_start_date(start);
    }
    if let Some(end) = cli.end {
        if !controller.set_end_date(end.clone()) && controller.query().end_date() != end {
            log::warn!(
                "Ignoring end date {} (start is {})",
                end,
                controller.query().start_date()
            );
        }
    }

    let grid = match cli.matrix_file {
        Some(path) => {
            let body = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let matrix = AgendaMatrix::from_json_str(&body)
                .with_context(|| format!("Failed to parse agenda in {}", path.display()))?;
            build_grid(&matrix)
        }
        None => {
            if controller.query().professional_id().is_none() {
                bail!("No professional selected: pass --professional or set default_professional_id");
            }
            let client = HttpAgendaClient::from_settings(&settings)
                .context("Failed to build API client")?;
            controller.refresh(&client);
            if let Some(message) = controller.last_error() {
                return Err(anyhow!(message.to_string()));
            }
            controller.grid()
        }
    };

    let html = render_html(&grid);
    match cli.output {
        Some(path) => {
            fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Agenda written to {}", path.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let service = match path {
        Some(path) => SettingsService::new(path),
        None => match SettingsService::from_default_location() {
            Some(service) => service,
            None => {
                log::warn!("No home directory found, using default settings");
                return SettingsService::defaults_with_env();
            }
        },
    };

    service.load_with_env()
}
