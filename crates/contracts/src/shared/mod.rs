pub mod page_params;
pub mod time_window;
