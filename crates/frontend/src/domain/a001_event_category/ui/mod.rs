pub mod empty_state;
pub mod list;
pub mod page;
