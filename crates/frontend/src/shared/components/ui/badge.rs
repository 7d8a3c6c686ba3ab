use contracts::domain::a002_event::aggregate::DeliveryStatus;
use leptos::prelude::*;

/// Badge component with different variants
#[component]
pub fn Badge(
    /// Badge variant: "primary", "success", "warning", "error", "neutral" (default)
    #[prop(optional, into)]
    variant: MaybeProp<String>,
    /// Badge content
    children: Children,
) -> impl IntoView {
    let variant_class = move || match variant.get().as_deref().unwrap_or("neutral") {
        "primary" => "badge--primary",
        "success" => "badge--success",
        "warning" => "badge--warning",
        "error" => "badge--error",
        _ => "badge--neutral",
    };

    view! {
        <span class=move || format!("badge {}", variant_class())>
            {children()}
        </span>
    }
}

pub fn delivery_status_class(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Pending => "badge badge--status badge--status-pending",
        DeliveryStatus::Delivered => "badge badge--status badge--status-delivered",
        DeliveryStatus::Failed => "badge badge--status badge--status-failed",
    }
}

/// Delivery status of an event: PENDING / DELIVERED / FAILED
#[component]
pub fn DeliveryStatusBadge(status: DeliveryStatus) -> impl IntoView {
    view! {
        <span class=delivery_status_class(status)>
            {status.as_str()}
        </span>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_class() {
        assert!(delivery_status_class(DeliveryStatus::Delivered).ends_with("delivered"));
        assert!(delivery_status_class(DeliveryStatus::Failed).ends_with("failed"));
        assert!(delivery_status_class(DeliveryStatus::Pending).ends_with("pending"));
    }
}
