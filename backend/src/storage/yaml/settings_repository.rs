//! Company settings stored in `settings.yaml`.

use anyhow::Result;
use log::info;
use shared::UserInfo;

use super::connection::{read_yaml, write_yaml, DataDirectory};
use crate::storage::SettingsStorage;

#[derive(Debug, Clone)]
pub struct SettingsRepository {
    connection: DataDirectory,
}

impl SettingsRepository {
    pub fn new(connection: DataDirectory) -> Self {
        Self { connection }
    }
}

impl SettingsStorage for SettingsRepository {
    fn load_user_info(&self) -> Result<Option<UserInfo>> {
        read_yaml(&self.connection.settings_file())
    }

    fn save_user_info(&self, info: &UserInfo) -> Result<()> {
        write_yaml(&self.connection.settings_file(), info)?;
        info!("Saved company settings for '{}'", info.company);
        Ok(())
    }
}
