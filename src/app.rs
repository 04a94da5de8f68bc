use dioxus::{prelude::*, signals::Signal};
use tracing::{info, warn};

use crate::{
    domain::AppState,
    ui::{
        components::{Toast, ToastMessage},
        pages::{
            CropPricesPage, ForgotPasswordPage, HomePage, LoginPage, MarketHubPage, SignupPage,
            SoilPage, WeatherPage,
        },
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/market")]
    Market {},
    #[route("/market/crop-prices")]
    CropPrices {},
    #[route("/weather")]
    Weather {},
    #[route("/soil")]
    Soil {},
    #[route("/login")]
    Login {},
    #[route("/signup")]
    Signup {},
    #[route("/forgot-password")]
    ForgotPassword {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state;
        move || {
            if let Some(saved) = load_persisted_state() {
                let logged_in = saved.session.is_some();
                state.with_mut(|st| st.apply_persisted(saved));
                info!(logged_in, "restored saved state");
            }
        }
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!(error = %err, "failed to persist user state");
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { Shell { HomePage {} } }
}

#[component]
pub fn Market() -> Element {
    rsx! { Shell { MarketHubPage {} } }
}

#[component]
pub fn CropPrices() -> Element {
    rsx! { Shell { CropPricesPage {} } }
}

#[component]
pub fn Weather() -> Element {
    rsx! { Shell { WeatherPage {} } }
}

#[component]
pub fn Soil() -> Element {
    rsx! { Shell { SoilPage {} } }
}

#[component]
pub fn Login() -> Element {
    rsx! { Shell { LoginPage {} } }
}

#[component]
pub fn Signup() -> Element {
    rsx! { Shell { SignupPage {} } }
}

#[component]
pub fn ForgotPassword() -> Element {
    rsx! { Shell { ForgotPasswordPage {} } }
}
