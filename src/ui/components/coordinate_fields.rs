use dioxus::prelude::*;

use crate::ui::theme;

/// Latitude/longitude text inputs bound to the caller's signals.
#[component]
pub fn CoordinateFields(latitude: Signal<String>, longitude: Signal<String>) -> Element {
    let mut latitude = latitude;
    let mut longitude = longitude;

    rsx! {
        div { class: "stat-grid",
            label { class: "field",
                span { class: "field-label", "Latitude" }
                input {
                    class: theme::INPUT,
                    r#type: "number",
                    step: "any",
                    value: "{latitude}",
                    oninput: move |evt| latitude.set(evt.value()),
                }
            }
            label { class: "field",
                span { class: "field-label", "Longitude" }
                input {
                    class: theme::INPUT,
                    r#type: "number",
                    step: "any",
                    value: "{longitude}",
                    oninput: move |evt| longitude.set(evt.value()),
                }
            }
        }
    }
}
