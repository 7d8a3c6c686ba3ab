pub mod a001_event_category;
pub mod a002_event;
