// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — document scanner with interactive envelope editing.
//
// Entry point. Initialises logging, loads settings, and launches the Dioxus
// UI. The scan flow is a three-step wizard: Capture (pick a photo) →
// Envelope (drag the document corners) → Result (rectified preview and
// export).

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::capture::Capture;
use pages::envelope::Envelope;
use pages::result::ScanResult;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Blattwerk starting");

    dioxus::launch(app);
}

/// Top-level route enum.
///
/// Navigating between routes is the hand-off boundary of the scan flow: the
/// envelope page stores the confirmed corner array in shared state before
/// pushing `ScanResult`, and pushes `Capture` with the state cleared on
/// cancel.
#[derive(Debug, Clone, Routable, PartialEq)]
enum Route {
    #[layout(WizardLayout)]
    #[route("/")]
    Capture {},
    #[route("/envelope")]
    Envelope {},
    #[route("/result")]
    ScanResult {},
}

/// Root component.
fn app() -> Element {
    // Load persisted settings; fall back to defaults on first run.
    let config = use_hook(|| match services::settings::load_config() {
        Some(cfg) => {
            tracing::info!("settings loaded");
            cfg
        }
        None => {
            tracing::info!("no stored settings, using defaults");
            blattwerk_core::AppConfig::default()
        }
    });

    use_context_provider(|| Signal::new(state::AppState::new(config)));

    rsx! {
        Router::<Route> {}
    }
}

/// Shared header wrapping all wizard steps.
#[component]
fn WizardLayout() -> Element {
    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; min-height: 100vh; font-family: system-ui, -apple-system, sans-serif; background: #f4f4f2;",

            header {
                style: "padding: 12px 16px; border-bottom: 1px solid #ddd; background: white;",
                h1 { style: "margin: 0; font-size: 18px;", "Blattwerk" }
                span { style: "color: #888; font-size: 13px;", "Scan a document in three steps" }
            }

            div { class: "page-content",
                style: "flex: 1; overflow-y: auto; padding: 16px;",
                Outlet::<Route> {}
            }
        }
    }
}
