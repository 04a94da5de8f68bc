use dioxus::prelude::*;

use crate::domain::SelectOption;
use crate::ui::theme;

/// Label/value pair handed to [`SelectField`].
#[derive(Clone, Debug, PartialEq)]
pub struct Choice {
    pub label: String,
    pub value: String,
}

impl Choice {
    pub fn from_option<T: SelectOption>(option: &T) -> Self {
        Self {
            label: option.label().to_string(),
            value: option.value().to_string(),
        }
    }
}

pub fn choices<T: SelectOption>(options: &[T]) -> Vec<Choice> {
    options.iter().map(Choice::from_option).collect()
}

/// Maps the raw `<select>` value back to a selection; the placeholder is "none".
pub fn selection_from_value(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Native dropdown with a placeholder entry standing for "no selection".
#[component]
pub fn SelectField(
    #[props(into)] heading: String,
    #[props(into)] placeholder: String,
    choices: Vec<Choice>,
    selected: Option<String>,
    #[props(default)] disabled: bool,
    onchange: EventHandler<Option<String>>,
) -> Element {
    let current = selected.unwrap_or_default();

    rsx! {
        label { class: "field",
            span { class: "field-label", "{heading}" }
            select {
                class: theme::SELECT,
                disabled,
                value: "{current}",
                onchange: move |evt| onchange.call(selection_from_value(&evt.value())),
                option { value: "", selected: current.is_empty(), "{placeholder}" }
                for choice in choices {
                    option {
                        key: "{choice.value}",
                        value: "{choice.value}",
                        selected: choice.value == current,
                        "{choice.label}"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeographyOption, MarketOption};

    #[test]
    fn placeholder_value_means_no_selection() {
        assert_eq!(selection_from_value(""), None);
        assert_eq!(selection_from_value("M1"), Some("M1".to_string()));
    }

    #[test]
    fn choices_keep_server_order() {
        let markets = vec![MarketOption::new("M2", "Khanna"), MarketOption::new("M1", "Jagraon")];
        let values: Vec<String> = choices(&markets).into_iter().map(|c| c.value).collect();
        assert_eq!(values, vec!["M2", "M1"]);

        let geo = GeographyOption::new("3", "Punjab", "41", "Ludhiana");
        assert_eq!(
            Choice::from_option(&geo),
            Choice {
                label: "Punjab - Ludhiana".into(),
                value: "41".into()
            }
        );
    }
}
