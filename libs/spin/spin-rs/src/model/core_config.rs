use std::env;

use serde::{Deserialize, Serialize};

use crate::model::offer::TriggerKind;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Where should spin store data, including logs?
    pub writeable_path: String,

    /// Should we log at all?
    pub logs: bool,
    /// Should logs be printed to stdout?
    pub stdout_logs: bool,
    /// Should logs be colored?
    pub colored_logs: bool,

    /// How many qualifying events must pass between two offers of a kind.
    pub thresholds: OfferThresholds,
}

impl Config {
    /// Configures spin for CLI use with no stdout logs. `writeable_path_subfolder` is generally a
    /// hardcoded client name like `"cli"`.
    pub fn cli_config(writeable_path_subfolder: &str) -> Config {
        Config {
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            logs: true,
            stdout_logs: false,
            colored_logs: true,
            thresholds: OfferThresholds::from_env(),
        }
    }

    /// Configures spin for the game clients with stdout logs. `writeable_path_subfolder` is
    /// generally a hardcoded client name like `"android"`.
    pub fn ui_config(writeable_path_subfolder: &str) -> Config {
        Config {
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            logs: true,
            stdout_logs: true,
            colored_logs: true,
            thresholds: OfferThresholds::from_env(),
        }
    }

    /// Produces a full writable path for spin to use based on environment variables and platform.
    pub fn writeable_path(writeable_path_subfolder: &str) -> String {
        let specified_path = env::var("SPIN_PATH");

        let default_path = env::var("HOME") // unix
            .or(env::var("HOMEPATH")) // windows
            .map(|home| format!("{home}/.spin/{writeable_path_subfolder}"));

        let Ok(writeable_path) = specified_path.or(default_path) else {
            panic!("no location for spin to initialize");
        };

        writeable_path
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct OfferThresholds {
    pub ad_view: u64,
    pub game_over: u64,
    pub shop_entry: u64,
}

impl Default for OfferThresholds {
    fn default() -> Self {
        Self { ad_view: 3, game_over: 3, shop_entry: 1 }
    }
}

impl OfferThresholds {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ad_view: Self::env_threshold("SPIN_AD_VIEW_THRESHOLD").unwrap_or(defaults.ad_view),
            game_over: Self::env_threshold("SPIN_GAME_OVER_THRESHOLD")
                .unwrap_or(defaults.game_over),
            shop_entry: Self::env_threshold("SPIN_SHOP_ENTRY_THRESHOLD")
                .unwrap_or(defaults.shop_entry),
        }
    }

    /// Clamped to at least one.
    pub fn get(&self, kind: TriggerKind) -> u64 {
        let threshold = match kind {
            TriggerKind::AdView => self.ad_view,
            TriggerKind::GameOver => self.game_over,
            TriggerKind::ShopEntry => self.shop_entry,
        };
        threshold.max(1)
    }

    fn env_threshold(var: &str) -> Option<u64> {
        env::var(var).ok().and_then(|val| val.parse::<u64>().ok())
    }
}
