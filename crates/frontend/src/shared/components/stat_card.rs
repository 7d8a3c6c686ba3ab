use crate::shared::icons::icon;
use leptos::prelude::*;

/// How to format the numeric value of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Decimal { decimals: u8 },
    Integer,
}

pub fn format_value(val: f64, fmt: ValueFormat) -> String {
    match fmt {
        ValueFormat::Decimal { decimals } => format_decimal(val, decimals),
        ValueFormat::Integer => format_decimal(val.round(), 0),
    }
}

fn format_decimal(val: f64, decimals: u8) -> String {
    let fixed = format!("{:.prec$}", val.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };
    // "-0.00" is printed as "0.00"
    let negative = val < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('\u{00a0}');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[component]
pub fn StatCard(
    /// Label displayed above the value
    #[prop(into)]
    label: String,
    /// Icon name from the icon() helper
    #[prop(optional, into)]
    icon_name: Option<String>,
    /// Primary numeric value (None = not loaded yet)
    #[prop(into)]
    value: Signal<Option<f64>>,
    /// How to format the value
    format: ValueFormat,
    /// Optional caption below the value
    #[prop(into, optional)]
    subtitle: Signal<Option<String>>,
    /// Accent border for the leading card
    #[prop(optional)]
    highlighted: bool,
) -> impl IntoView {
    let icon_name = icon_name.unwrap_or_else(|| "bar-chart".to_string());
    let class = if highlighted {
        "stat-card stat-card--highlighted"
    } else {
        "stat-card"
    };

    let formatted = move || match value.get() {
        Some(v) => format_value(v, format),
        None => "—".to_string(),
    };

    let subtitle_view = move || {
        subtitle.get().map(|s| {
            view! { <div class="stat-card__subtitle">{s}</div> }
        })
    };

    view! {
        <div class=class>
            <div class="stat-card__header">
                <div class="stat-card__label">{label}</div>
                <div class="stat-card__icon">{icon(&icon_name)}</div>
            </div>
            <div class="stat-card__content">
                <div class="stat-card__value">{formatted}</div>
                {subtitle_view}
            </div>
        </div>
    }
}
