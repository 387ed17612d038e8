//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod dashboard;
pub mod data_table;
pub mod detail;
pub mod entity_panel;
pub mod form_dialog;
pub mod login_panel;
pub mod permission_editor;
pub mod settings_panel;

pub use app::App;
