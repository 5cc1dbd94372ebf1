pub mod app;
pub mod events;
pub mod popup;
pub mod theme;
pub mod widgets;
