use dioxus::prelude::*;

use crate::app::Route;
use crate::ui::pages::home::{FeatureTile, TileSections};
use crate::ui::theme;

fn tile(name: &'static str, icon: &'static str) -> FeatureTile {
    FeatureTile {
        name,
        icon,
        route: None,
    }
}

pub fn market_sections() -> Vec<(&'static str, Vec<FeatureTile>)> {
    vec![
        (
            "Market Prices",
            vec![
                FeatureTile {
                    name: "Crop Prices",
                    icon: "💰",
                    route: Some(Route::CropPrices {}),
                },
                tile("Fertilizer Prices", "🧺"),
                tile("Seed Prices", "🌰"),
                tile("Equipment Prices", "🚜"),
            ],
        ),
        (
            "Insights & Analysis",
            vec![
                tile("Demand & Supply", "🥧"),
                tile("Market Trends", "📉"),
                tile("Competitor Analysis", "👥"),
                tile("Government Policies", "⚖️"),
            ],
        ),
        (
            "Marketplace",
            vec![tile("Buy/Sell Crops", "🛍️"), tile("Farming Services", "🤝")],
        ),
    ]
}

#[component]
pub fn MarketHubPage() -> Element {
    rsx! {
        h2 { class: theme::PAGE_TITLE, "Market" }
        TileSections { sections: market_sections() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_crop_prices_has_a_screen() {
        let routed: Vec<&str> = market_sections()
            .into_iter()
            .flat_map(|(_, tiles)| tiles)
            .filter(|tile| tile.route == Some(Route::CropPrices {}))
            .map(|tile| tile.name)
            .collect();
        assert_eq!(routed, ["Crop Prices"]);
    }
}
