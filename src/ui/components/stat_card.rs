use dioxus::prelude::*;

#[component]
pub fn StatCard(
    #[props(into)] icon: String,
    #[props(into)] title: String,
    #[props(into)] value: String,
    caption: Option<String>,
) -> Element {
    rsx! {
        div { class: "stat",
            div { class: "stat-icon", "{icon}" }
            div { class: "stat-caption", "{title}" }
            div { class: "stat-value", "{value}" }
            if let Some(caption) = caption {
                div { class: "stat-caption", "{caption}" }
            }
        }
    }
}
