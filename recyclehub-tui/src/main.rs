//! Terminal client for RecycleHub: eco shop, cart, recycle points, carbon estimates, pickups, and scans.

mod app;
mod config;
mod input;
mod ui;

#[cfg(test)]
mod testing;

use std::{io, path::Path, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use recyclehub_core::{CartStore, ScanImage, service::RecycleHubService};
use reqwest::Client;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::{App, parse_distance};
use crate::config::{Config, LogConfig};
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = init_logging(&config.log)?;

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(config.backend.user_agent.as_str())
        .timeout(StdDuration::from_secs(config.backend.timeout_secs))
        .build()?;

    let backend = recyclehub_backend::backend(
        client,
        config.backend.base_url.as_str(),
        config.backend.points_base_url.clone(),
    );
    let service = Arc::new(RecycleHubService::new(Arc::new(backend)));
    info!(
        base_url = %service.backend().base_url,
        points_base_url = %service.backend().points_base_url,
        "starting recyclehub"
    );

    // App state; the cart lives for this session only
    let app = App::new(
        service,
        CartStore::new(),
        config.location.into(),
        config.carbon,
    );

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "event loop failed");
    }
    res
}

/// Route `tracing` output to a log file; the terminal belongs to the UI.
fn init_logging(log: &LogConfig) -> Result<WorkerGuard> {
    let directory = log.resolved_directory();
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("cannot create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(&directory, "recyclehub.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(guard)
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::LoadProducts => {
                    start_loading(terminal, &mut app)?;
                    let res = app.service.products().await;

                    app.is_loading = false;
                    match res {
                        Ok(products) => app.set_products(products),
                        Err(err) => {
                            error!(error = %err, "catalog request failed");
                            app.error_message =
                                Some(format!("Failed to fetch products: {err}"));
                        }
                    }
                }
                Action::LoadRecyclePoints => {
                    start_loading(terminal, &mut app)?;
                    let res = app.service.recycle_points_near(app.user_location).await;

                    app.is_loading = false;
                    match res {
                        Ok(search) => app.apply_recycle_points(search),
                        Err(err) => {
                            error!(error = %err, "recycle point request failed");
                            app.error_message = Some(format!(
                                "Failed to load recycle points: {err}"
                            ));
                        }
                    }
                }
                Action::EstimateCarbon => {
                    let Some(distance) = parse_distance(&app.carbon_input) else {
                        app.error_message = Some("Enter a distance in km".into());
                        continue;
                    };

                    start_loading(terminal, &mut app)?;
                    let query = app.carbon_config.query(distance);
                    let res = app.service.estimate_carbon(query).await;

                    app.is_loading = false;
                    match res {
                        Ok(estimate) => app.carbon_result = Some(estimate),
                        Err(err) => {
                            error!(error = %err, "carbon estimate failed");
                            app.carbon_result = None;
                            app.error_message = Some(format!("Something went wrong: {err}"));
                        }
                    }
                }
                Action::ClassifyImage => {
                    let path_text = app.scan_input.trim().to_owned();
                    if path_text.is_empty() {
                        app.error_message = Some("Please select an image first!".into());
                        continue;
                    }

                    start_loading(terminal, &mut app)?;
                    let res = classify_file(&app.service, Path::new(&path_text)).await;

                    app.is_loading = false;
                    match res {
                        Ok(scan) => app.scan_result = Some(scan),
                        Err(err) => {
                            error!(error = %err, path = %path_text, "scan failed");
                            app.scan_result = None;
                            app.error_message = Some(format!("Upload failed: {err:#}"));
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn start_loading(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.is_loading = true;
    app.error_message = None;
    terminal.draw(|frame| ui::draw(frame, app))?;
    Ok(())
}

async fn classify_file(
    service: &RecycleHubService,
    path: &Path,
) -> Result<recyclehub_core::WasteClassification> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;

    let mut image = ScanImage::jpeg(bytes);
    if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
        name.clone_into(&mut image.filename);
    }
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
    {
        "image/png".clone_into(&mut image.mime);
    }

    Ok(service.classify(image).await?)
}
