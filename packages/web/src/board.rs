//! Token display: the token being served plus walk-in intake.

use dioxus::prelude::*;
use walkin_core::QueueSummary;

#[component]
pub fn TokenBoard() -> Element {
    let mut issued = use_signal(|| None::<(u64, f64)>);
    let mut error = use_signal(|| None::<String>);

    let mut current = use_resource(move || async move { api::current_token().await.ok() });
    let mut summary = use_resource(move || async move { api::queue_summary().await.ok() });

    let refresh = move |_| {
        current.restart();
        summary.restart();
    };

    let take_token = move |_| {
        spawn(async move {
            match api::enqueue_walk_in(None, None).await {
                Ok(response) => {
                    let eta = api::walk_in_eta(response.token_no.to_string())
                        .await
                        .map(|e| e.eta_minutes)
                        .unwrap_or(0.0);
                    issued.set(Some((response.token_no, eta)));
                    summary.restart();
                }
                Err(e) => error.set(Some(format!("Could not issue a token: {}", e))),
            }
        });
    };

    let now_serving = match current.read().as_ref() {
        Some(Some(response)) => response
            .token_no
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string()),
        _ => "-".to_string(),
    };

    let counts = summary
        .read()
        .as_ref()
        .cloned()
        .flatten()
        .unwrap_or_default();

    rsx! {
        div { class: "token-board",
            h1 { "Now serving" }
            div { class: "token-current", "{now_serving}" }

            if let Some(err) = error() {
                div { class: "error-banner",
                    span { "{err}" }
                    button { onclick: move |_| error.set(None), "×" }
                }
            }

            Counts { summary: counts }

            div { class: "token-actions",
                button { onclick: take_token, "Take a token" }
                button { onclick: refresh, "Refresh" }
            }

            if let Some((token, eta)) = issued() {
                div { class: "token-issued",
                    "Your token is {token}. Estimated wait: {eta} minutes."
                }
            }
        }
    }
}

#[component]
fn Counts(summary: QueueSummary) -> Element {
    rsx! {
        ul { class: "token-counts",
            li { "Waiting: {summary.waiting}" }
            li { "Called: {summary.called}" }
            li { "Completed: {summary.completed}" }
            li { "Skipped: {summary.skipped}" }
            li { "Issued today: {summary.total()}" }
        }
    }
}
