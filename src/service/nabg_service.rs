//! New Accounts Be Gone: per-guild settings and the account age rule.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::DateTime;
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde::Serialize;

use crate::service::error::ServiceError;
use crate::service::store::JsonStore;

pub const NABG_FILE: &str = "nabg_config.json";
pub const DEFAULT_KICK_MESSAGE: &str = "Your account was created too recently to join this server.";
pub const KICK_REASON: &str = "Account created today - NABG protection";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct NabgSettings {
    pub enabled: bool,
    pub log_channel: Option<u64>,
    pub kick_message: String,
}

impl Default for NabgSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            log_channel: None,
            kick_message: DEFAULT_KICK_MESSAGE.to_string(),
        }
    }
}

pub type NabgDocument = BTreeMap<u64, NabgSettings>;

/// True when the account was created on the current UTC calendar day.
pub fn is_account_created_today(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    created_at.date_naive() == now.date_naive()
}

/// Whole days since the account was created.
pub fn account_age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days()
}

pub struct NabgService {
    store: JsonStore<NabgDocument>,
}

impl NabgService {
    pub async fn new(data_path: &Path) -> Result<Self, ServiceError> {
        Ok(Self {
            store: JsonStore::open(data_path.join(NABG_FILE)).await?,
        })
    }

    pub async fn settings(&self, guild_id: u64) -> NabgSettings {
        self.store
            .read(|doc| doc.get(&guild_id).cloned().unwrap_or_default())
            .await
    }

    pub async fn set_enabled(&self, guild_id: u64, enabled: bool) -> Result<(), ServiceError> {
        self.update(guild_id, |s| s.enabled = enabled).await?;
        info!(
            "NABG {} in guild {}",
            if enabled { "enabled" } else { "disabled" },
            guild_id
        );
        Ok(())
    }

    pub async fn set_log_channel(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
    ) -> Result<(), ServiceError> {
        self.update(guild_id, |s| s.log_channel = channel_id).await
    }

    pub async fn set_kick_message(&self, guild_id: u64, message: &str) -> Result<(), ServiceError> {
        self.update(guild_id, |s| s.kick_message = message.to_string())
            .await
    }

    async fn update(
        &self,
        guild_id: u64,
        f: impl FnOnce(&mut NabgSettings),
    ) -> Result<(), ServiceError> {
        self.store
            .update(|doc| {
                f(doc.entry(guild_id).or_default());
                Ok(())
            })
            .await
    }
}
