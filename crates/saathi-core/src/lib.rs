//! Shared foundations for the Saathi client: configuration, errors, domain
//! types, profile normalization, localization, and the notification slot.

pub mod config;
pub mod error;
pub mod i18n;
pub mod notify;
pub mod profile;
pub mod types;

pub use config::SaathiConfig;
pub use error::{Result, SaathiError};
pub use notify::{Notification, Notifier};
pub use profile::{ProfileField, ProfileForm, ProfileRecord};
pub use types::*;
