use dioxus::prelude::*;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{Coordinates, SoilProperty};
use crate::infra::SoilClient;
use crate::ui::components::{push_toast, CoordinateFields, ToastKind, ToastMessage};
use crate::ui::theme;

#[component]
pub fn SoilPage() -> Element {
    let config = use_context::<AppConfig>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let defaults = Coordinates::default();
    let latitude = use_signal(|| defaults.latitude.to_string());
    let longitude = use_signal(|| defaults.longitude.to_string());
    let mut properties = use_signal(|| None::<Vec<SoilProperty>>);
    let mut loading = use_signal(|| false);

    let client = use_hook(move || SoilClient::new(&config).map_err(|err| err.to_string()));

    let on_fetch = move |_| {
        if loading() {
            return;
        }
        let at = match Coordinates::parse(&latitude(), &longitude()) {
            Ok(at) => at,
            Err(err) => {
                push_toast(toasts, ToastKind::Error, err.to_string());
                return;
            }
        };
        let client = match &client {
            Ok(client) => client.clone(),
            Err(err) => {
                push_toast(toasts, ToastKind::Error, format!("Soil service unavailable: {err}"));
                return;
            }
        };

        loading.set(true);
        properties.set(None);
        spawn(async move {
            match client.properties(at).await {
                Ok(found) => {
                    info!(count = found.len(), "soil properties loaded");
                    properties.set(Some(found));
                }
                Err(err) => {
                    warn!(error = %err, "soil lookup failed");
                    push_toast(
                        toasts,
                        ToastKind::Error,
                        format!("Failed to fetch soil data: {err}"),
                    );
                }
            }
            loading.set(false);
        });
    };

    let found = properties();

    rsx! {
        h2 { class: theme::PAGE_TITLE, "Soil Properties" }
        div { class: theme::CARD,
            p { class: theme::MUTED, "Enter a location in India to look up gridded soil estimates." }
            CoordinateFields { latitude, longitude }
            button {
                class: theme::btn_primary(),
                disabled: loading(),
                onclick: on_fetch,
                if loading() { "Fetching..." } else { "Get Soil Data" }
            }
        }
        if let Some(found) = found {
            div { class: theme::CARD,
                h3 { class: theme::CARD_TITLE, "Soil Properties" }
                if found.is_empty() {
                    p { class: theme::MUTED, "No properties reported for this location." }
                }
                div { class: "property-grid",
                    for property in found {
                        div { key: "{property.code}", class: "property",
                            div { class: "property-name", "{property.name()}" }
                            div { class: "property-value", "{property.display_value()}" }
                        }
                    }
                }
            }
        }
    }
}
