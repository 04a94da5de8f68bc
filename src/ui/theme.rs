//! Class names shared across pages, backed by `assets/main.css`.

pub const PAGE_TITLE: &str = "page-title";
pub const SECTION_TITLE: &str = "section-title";
pub const CARD: &str = "card";
pub const CARD_TITLE: &str = "card-title";
pub const FORM: &str = "form";
pub const INPUT: &str = "input";
pub const SELECT: &str = "select";
pub const MUTED: &str = "muted";

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-btn active"
    } else {
        "nav-btn"
    }
}

pub fn btn_primary() -> &'static str {
    "btn btn-primary"
}

pub fn btn_secondary() -> &'static str {
    "btn btn-secondary"
}

pub fn btn_link() -> &'static str {
    "btn-link"
}

/// Row class for the past-week weather table.
pub fn weather_row(is_hot: bool) -> &'static str {
    if is_hot {
        "hot"
    } else {
        ""
    }
}
