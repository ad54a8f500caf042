//! Window-side integration of quire scripts.
//!
//! A [`ScriptableWindow`] turns the standalone script tree into a menu for
//! one window, runs the entries the user picks, and reports results through
//! a [`Notifier`]. It never owns scripts itself: every invocation goes back
//! through the [`ScriptManager`](quire_manager::ScriptManager).

mod about;
mod constants;
mod menu;
mod notify;
mod window;

pub use about::about_scripts;
pub use constants::STATUS_MESSAGE_DURATION;
pub use menu::{ActionId, MenuItem, ScriptAction};
pub use notify::{Notice, Notifier, RecordingNotifier};
pub use window::ScriptableWindow;
