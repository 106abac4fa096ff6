pub mod app;
pub mod components;
pub mod editor;
pub mod export;
pub mod logging;
pub mod markdown;
pub mod store;
pub mod theme;
