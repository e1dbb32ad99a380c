pub mod config_identity;
pub mod config_service;
pub mod fs_photo_store;
pub mod paths;
pub mod storage;
pub mod toml_catalog_store;
pub mod toml_text_resolver;
pub mod tracing_notifier;

pub use crate::config_identity::ConfigIdentityProvider;
pub use crate::config_service::ConfigService;
pub use crate::fs_photo_store::FsPhotoStore;
pub use crate::paths::PoieditPaths;
pub use crate::toml_catalog_store::TomlCatalogStore;
pub use crate::toml_text_resolver::TomlTextResolver;
pub use crate::tracing_notifier::TracingNotifier;
