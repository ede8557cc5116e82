pub mod app;
pub mod terminal;
pub mod ui;

use crate::catalog_api::CatalogClient;
use crate::config::Settings;
use crate::guide::SystemOpener;
use crate::session::Session;
use app::App;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Run the interactive browser until the user quits. The terminal is restored even when
/// the loop fails.
pub async fn run(settings: Settings, client: Arc<dyn CatalogClient>) -> Result<(), String> {
    let mut terminal = terminal::setup()?;
    let result = event_loop(&mut terminal, settings, client).await;
    terminal::restore(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut terminal::Tui,
    settings: Settings,
    client: Arc<dyn CatalogClient>,
) -> Result<(), String> {
    let (session, mut session_rx) = Session::new(Arc::clone(&client), settings.debounce());
    let (probe_tx, mut probe_rx) = mpsc::unbounded_channel();
    let mut app = App::new(session, settings, client, Box::new(SystemOpener), probe_tx);
    let mut keys = EventStream::new();

    log::info!("Interactive session started");
    loop {
        terminal
            .draw(|f| ui::draw(f, &mut app))
            .map_err(|e| format!("Failed to draw: {}", e))?;
        if app.should_quit {
            break;
        }

        tokio::select! {
            maybe_event = keys.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(format!("Terminal input error: {}", e)),
                None => break,
            },
            Some(event) = session_rx.recv() => app.on_session_event(event),
            Some(probe) = probe_rx.recv() => app.on_image_probe(probe),
        }
    }

    app.session.shutdown();
    log::info!("Interactive session ended");
    Ok(())
}
