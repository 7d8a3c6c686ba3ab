//! Small helpers shared by table headers and cards.

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: Option<&str>, field: &str, ascending: bool) -> &'static str {
    if current_field == Some(field) {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// CSS-класс индикатора: активная колонка подсвечивается
pub fn get_sort_class(current_field: Option<&str>, field: &str) -> &'static str {
    if current_field == Some(field) {
        "table__sort-indicator table__sort-indicator--active"
    } else {
        "table__sort-indicator"
    }
}

/// "amount" → "Amount"
pub fn capitalize_first_letter(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
