// simpledit library exports

pub mod app;
pub mod config;
pub mod dialogs;
pub mod logging;
pub mod menu;
pub mod status_manager;
pub mod text_width;
pub mod ui;
pub mod ui_state;

pub use app::App;
pub use config::Config;
pub use dialogs::TerminalDialogs;
pub use menu::Action;
pub use ui_state::UIState;
