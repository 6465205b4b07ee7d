use std::sync::Arc;

use shelly_core::{AdminKey, ExportRoot, LoadedConfig, PathError, ResolvedConfig};

pub type SharedAdminKey = Arc<AdminKey>;

#[derive(Clone, Debug)]
pub struct AppState {
    pub admin_key: SharedAdminKey,
    pub exports: Arc<ExportRoot>,
    pub config: Arc<ResolvedConfig>,
}

impl AppState {
    pub fn new(admin_key: SharedAdminKey, exports: ExportRoot, config: ResolvedConfig) -> Self {
        Self {
            admin_key,
            exports: Arc::new(exports),
            config: Arc::new(config),
        }
    }

    /// Seed the admin key and open (creating if needed) the export directory
    pub fn from_loaded(loaded: LoadedConfig) -> Result<Self, PathError> {
        let LoadedConfig { resolved, settings } = loaded;
        let exports = ExportRoot::open(&settings.export.output_directory, true)?;
        let admin_key = Arc::new(AdminKey::new(settings.security.admin_api_key.as_ref()));
        Ok(Self::new(admin_key, exports, resolved))
    }
}
