use dioxus::prelude::*;

/// Clickable dashboard tile.
#[component]
pub fn TileCard(
    icon: &'static str,
    title: &'static str,
    #[props(default)] description: Option<&'static str>,
    onclick: EventHandler<()>,
) -> Element {
    rsx! {
        button {
            class: "tile",
            onclick: move |_| onclick.call(()),
            span { class: "tile-icon", "{icon}" }
            span { class: "tile-title", "{title}" }
            if let Some(description) = description {
                span { class: "tile-desc", "{description}" }
            }
        }
    }
}
