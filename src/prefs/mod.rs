//! Daemon preferences (`amuleweb-main-prefs.php`).
//!
//! The page carries its current settings as JavaScript assignments into an
//! `initvals` object. A [`PreferenceMapping`] names which script keys feed
//! which [`PreferenceSet`] field; it is validated once when loaded, so
//! parsing is a plain table lookup per statement.
//!
//! The reverse direction, turning a [`PreferenceSet`] back into form
//! parameters, lives in [`crate::request::preference_params`].

mod mapping;
mod model;
mod script;

pub use mapping::PreferenceMapping;
pub use model::{PreferenceField, PreferenceSet, PreferenceValue, UnknownField, ValueKind};
pub use script::{apply_preferences, apply_script, parse_preferences};
