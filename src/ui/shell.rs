use dioxus::prelude::*;
use tracing::info;

use crate::app::{persist_user_state, Route};
use crate::domain::AppState;
use crate::ui::components::{push_toast, ToastKind, ToastMessage};
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME, APP_TAGLINE};

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let signed_in_as = state.with(|st| st.session.as_ref().map(|s| s.email.clone()));
    let version = version_label();

    let on_logout = move |_| {
        let mut state = state;
        state.with_mut(|st| st.logout());
        persist_user_state(&state);
        info!("user logged out");
        push_toast(toasts, ToastKind::Info, "Logged out.");
        nav.push(Route::Login {});
    };

    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                div {
                    h1 { class: "app-title", "{APP_NAME}" }
                    p { class: "app-tagline", "{APP_TAGLINE}" }
                }
                nav { class: "app-nav",
                    NavButton { active: matches!(current_route, Route::Home {}), to: Route::Home {}, label: "🏠 Home" }
                    NavButton {
                        active: matches!(current_route, Route::Market {} | Route::CropPrices {}),
                        to: Route::Market {},
                        label: "🛒 Market",
                    }
                    NavButton { active: matches!(current_route, Route::Weather {}), to: Route::Weather {}, label: "🌦 Weather" }
                    NavButton { active: matches!(current_route, Route::Soil {}), to: Route::Soil {}, label: "🌱 Soil" }
                    if let Some(email) = signed_in_as {
                        span { class: "app-tagline", "{email}" }
                        button { class: theme::nav_button(false), onclick: on_logout, "Log out" }
                    } else {
                        NavButton {
                            active: matches!(
                                current_route,
                                Route::Login {} | Route::Signup {} | Route::ForgotPassword {}
                            ),
                            to: Route::Login {},
                            label: "👤 Log in",
                        }
                    }
                }
            }
            main { class: "app-main", {children} }
            footer { class: "app-footer", "{APP_NAME} {version}" }
        }
    }
}

#[component]
fn NavButton(active: bool, to: Route, label: &'static str) -> Element {
    let nav = use_navigator();
    rsx! {
        button {
            class: theme::nav_button(active),
            onclick: move |_| {
                nav.push(to.clone());
            },
            "{label}"
        }
    }
}
