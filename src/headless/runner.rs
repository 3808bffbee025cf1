//! Headless runner - event loop over stdin
//!
//! Mounts one view instance, renders it, then applies client events in
//! arrival order. Redirects are followed the way a browser host would,
//! and every step re-renders the page.

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::mpsc;

use auix_app::{Settings, ViewInstance};
use auix_compiler::CompiledSite;
use auix_core::prelude::*;
use auix_render::{render_view, BasicComponents};

use super::{ClientEvent, HeadlessEvent};

/// Mount `path` and process events from stdin until it closes.
pub async fn run_events(site: Arc<CompiledSite>, path: &str, settings: Settings) -> Result<()> {
    info!("Headless session starting at {}", path);

    let mut instance = ViewInstance::mount(site, path, settings)?;
    emit_page(&instance);

    let (tx, mut rx) = mpsc::channel::<ClientEvent>(32);
    std::thread::spawn(move || read_stdin_blocking(tx));

    while let Some(event) = rx.recv().await {
        instance = apply(instance, event)?;
        emit_page(&instance);
    }

    info!("Headless session finished at {}", instance.state().path);
    Ok(())
}

/// Apply one event, then follow whatever redirect it produced.
fn apply(mut instance: ViewInstance, event: ClientEvent) -> Result<ViewInstance> {
    if let ClientEvent::Patch { path } = &event {
        if let Err(e) = instance.patch(path) {
            warn!("Patch to {} rejected: {}", path, e);
            HeadlessEvent::Error {
                message: e.to_string(),
            }
            .emit();
        }
        return Ok(instance);
    }
    if let Some(message) = event.into_message() {
        instance.dispatch(message);
    }

    let Some(redirect) = instance.state().redirect.clone() else {
        return Ok(instance);
    };
    HeadlessEvent::Redirected {
        kind: redirect.kind,
        to: redirect.to.clone(),
    }
    .emit();

    let site = instance.site().clone();
    let settings = instance.state().settings.clone();
    let from = instance.state().path.clone();
    match instance.follow_redirect() {
        Ok(next) => Ok(next),
        Err(e) => {
            error!("Redirect to {} failed: {}", redirect.to, e);
            HeadlessEvent::Error {
                message: e.to_string(),
            }
            .emit();
            // The instance was consumed; mount where we were again.
            ViewInstance::mount(site, &from, settings)
        }
    }
}

fn emit_page(instance: &ViewInstance) {
    let state = instance.state();
    if let Some(flash) = &state.flash {
        HeadlessEvent::Flash {
            message: flash.message.clone(),
        }
        .emit();
    }
    match render_view(instance.site(), state, &BasicComponents) {
        Ok(markup) => HeadlessEvent::Rendered {
            path: state.path.clone(),
            html: markup.to_html(),
        }
        .emit(),
        Err(e) => HeadlessEvent::Error {
            message: e.to_string(),
        }
        .emit(),
    }
}

/// Blocking stdin reader; one JSON event per line.
fn read_stdin_blocking(tx: mpsc::Sender<ClientEvent>) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ClientEvent>(line) {
            Ok(event) => {
                debug!("Client event: {:?}", event);
                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("Ignoring malformed event {:?}: {}", line, e);
                HeadlessEvent::Error {
                    message: format!("malformed event: {}", e),
                }
                .emit();
            }
        }
    }
    debug!("Stdin closed");
}
