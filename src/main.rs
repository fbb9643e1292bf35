mod app;
mod config;
mod request;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup};
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "curbside")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal-friendly ride request console for drivers")]
struct Args {
    /// Load ride requests from a JSON file (a single object or an array)
    #[arg(short, long)]
    request: Option<PathBuf>,

    /// Use the built-in sample requests
    #[arg(short, long)]
    sample: bool,

    /// Validate a request file and print the rendered rows as JSON
    #[arg(long)]
    check: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Handle CLI-only commands
    if let Some(path) = args.check {
        return print_check(&path);
    }

    // Run TUI
    run_tui(args).await
}

/// Validate a request file and print the rows exactly as the sheet would
/// render them (fallbacks applied), as JSON for scripting.
fn print_check(path: &Path) -> Result<()> {
    let requests = request::load_requests(path)?;

    let rows: Vec<serde_json::Value> = requests
        .iter()
        .map(|r| {
            serde_json::json!({
                "customer": r.display_customer(),
                "pickup": r.display_pickup(),
                "dropoff": r.display_dropoff(),
            })
        })
        .collect();

    let output = serde_json::json!({
        "count": requests.len(),
        "requests": rows,
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn run_tui(args: Args) -> Result<()> {
    let config = AppConfig::load().unwrap_or_default();

    // Request source: --sample beats files; otherwise the CLI path, then the
    // configured one, then the built-in samples
    let source = if args.sample {
        None
    } else {
        args.request.clone().or_else(|| config.requests_file.clone())
    };

    let requests = match &source {
        Some(path) => request::load_requests(path)
            .with_context(|| format!("loading requests from {}", path.display()))?,
        None => request::sample_requests(),
    };

    tracing::info!("Starting with {} request(s)", requests.len());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(requests, source, config);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                        KeyCode::Char('c')
                            if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key).await {
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Periodic refresh
        let _ = app.tick().await;
    }
}

pub fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("taxi")
        .show()?;
    Ok(())
}
