pub mod config;
pub mod error;
pub mod hooks;
pub mod i18n;
pub mod module;
pub mod nonce;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use hooks::{DEFAULT_PRIORITY, HookRegistry};
pub use i18n::{I18nHandler, I18nStore, StaticCatalog};
pub use module::Module;
pub use nonce::{HmacNonces, NonceCheck, NonceVerifier};
