use dioxus::prelude::*;
use dioxus::router::Navigator;
use tracing::debug;

use crate::app::Route;
use crate::ui::components::{push_toast, TileCard, ToastKind, ToastMessage};
use crate::ui::theme;

#[derive(Clone, PartialEq)]
pub struct FeatureTile {
    pub name: &'static str,
    pub icon: &'static str,
    /// `None` for features without a screen yet.
    pub route: Option<Route>,
}

fn tile(name: &'static str, icon: &'static str, route: Option<Route>) -> FeatureTile {
    FeatureTile { name, icon, route }
}

/// Opens a tile's screen, or tells the user it is not available yet.
pub fn open_tile(tile: &FeatureTile, nav: Navigator, toasts: Signal<Vec<ToastMessage>>) {
    debug!(tile = tile.name, "tile pressed");
    match &tile.route {
        Some(route) => {
            nav.push(route.clone());
        }
        None => push_toast(
            toasts,
            ToastKind::Info,
            format!("{} is coming soon.", tile.name),
        ),
    }
}

pub fn home_sections() -> Vec<(&'static str, Vec<FeatureTile>)> {
    vec![
        (
            "AI & Data",
            vec![
                tile("Real-time Soil Estimation", "🌡️", Some(Route::Soil {})),
                tile("Weather Forecast", "⛅", Some(Route::Weather {})),
                tile("Market Prices", "💹", Some(Route::Market {})),
                tile("Crop Rotation Tracker", "🔄", None),
                tile("Crop Recommendations", "🌱", None),
                tile("Yield & Profit Forecast", "📊", None),
            ],
        ),
        (
            "Mobile App Features",
            vec![
                tile("Multilingual Support", "🌐", None),
                tile("Offline Mode", "📴", None),
                tile("Input Farm Data", "📝", None),
                tile("Text & Image Recommendations", "🖼️", None),
                tile("Voice & Chat Queries", "🎙️", None),
                tile("Dashboard Analytics", "📋", None),
            ],
        ),
        (
            "ML/AI Capabilities",
            vec![
                tile("Crop Selection Model", "🌾", None),
                tile("Predictive Analytics", "📈", None),
                tile("Disease Detection", "🌼", None),
                tile("Pest Diagnosis", "🐛", None),
                tile("Actionable Advice", "💡", None),
            ],
        ),
    ]
}

#[component]
pub fn TileSections(sections: Vec<(&'static str, Vec<FeatureTile>)>) -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let nav = use_navigator();

    rsx! {
        for (title, tiles) in sections {
            section { key: "{title}",
                h3 { class: theme::SECTION_TITLE, "{title}" }
                div { class: "tile-grid",
                    {tiles.into_iter().map(|feature| {
                        let (icon, name) = (feature.icon, feature.name);
                        rsx! {
                            TileCard {
                                key: "{name}",
                                icon,
                                title: name,
                                onclick: move |_| open_tile(&feature, nav, toasts),
                            }
                        }
                    })}
                }
            }
        }
    }
}

#[component]
pub fn HomePage() -> Element {
    rsx! {
        h2 { class: theme::PAGE_TITLE, "Dashboard" }
        TileSections { sections: home_sections() }
    }
}
