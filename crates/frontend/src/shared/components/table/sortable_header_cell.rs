//! Компонент сортируемой ячейки заголовка таблицы
//!
//! ```rust,ignore
//! <SortableHeaderCell
//!     label="Amount"
//!     sort_field="amount"
//!     current_sort_field=Signal::derive(move || state.with(|s| s.sort_field.clone()))
//!     sort_ascending=Signal::derive(move || state.with(|s| s.sort_ascending))
//!     on_sort=Callback::new(move |field| toggle_sort(field))
//! />
//! ```

use crate::shared::list_utils::{get_sort_class, get_sort_indicator};
use leptos::prelude::*;
use thaw::*;

/// Header cell that toggles sorting on click and shows ▲ / ▼ / ⇅.
///
/// Non-sortable columns render a plain label.
#[component]
pub fn SortableHeaderCell(
    #[prop(into)]
    label: String,

    #[prop(into)]
    sort_field: String,

    /// Текущее поле сортировки (None = без сортировки)
    #[prop(into)]
    current_sort_field: Signal<Option<String>>,

    #[prop(into)]
    sort_ascending: Signal<bool>,

    on_sort: Callback<String>,

    #[prop(optional, default = true)]
    sortable: bool,

    /// Выравнивание заголовка (left/right)
    #[prop(optional, default = "left")]
    align: &'static str,
) -> impl IntoView {
    let header_style = if align == "right" {
        "justify-content: flex-end; padding-right: 12px;"
    } else {
        "padding-right: 12px;"
    };

    if !sortable {
        return view! {
            <TableHeaderCell>
                <div class="table__header" style=header_style>{label}</div>
            </TableHeaderCell>
        }
        .into_any();
    }

    let field_for_click = sort_field.clone();
    let field_for_indicator = sort_field.clone();
    let field_for_class = sort_field;

    view! {
        <TableHeaderCell>
            <div
                class="table__sortable-header"
                style=format!("cursor: pointer; {}", header_style)
                on:click=move |_| on_sort.run(field_for_click.clone())
            >
                {label}
                <span class=move || {
                    get_sort_class(current_sort_field.get().as_deref(), &field_for_class)
                }>
                    {move || {
                        get_sort_indicator(
                            current_sort_field.get().as_deref(),
                            &field_for_indicator,
                            sort_ascending.get(),
                        )
                    }}
                </span>
            </div>
        </TableHeaderCell>
    }
    .into_any()
}
