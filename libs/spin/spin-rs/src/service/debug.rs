use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::io::Store;
use crate::model::catalog::Pack;
use crate::model::entitlement::UserEntitlement;
use crate::model::errors::SpinResult;
use crate::model::offer::{Tally, TriggerKind};
use crate::service::logging::PANIC_PREFIX;
use crate::{get_code_version, Spin};

/// Attached to support requests ("I paid but still see ads").
#[derive(Serialize)]
pub struct DebugInfo {
    pub time: String,
    pub spin_version: String,
    pub rust_triple: String,
    pub spin_dir: String,
    pub is_premium: bool,
    pub entitlement: UserEntitlement,
    pub owned_packs: Vec<Pack>,
    pub active_pack: Pack,
    pub tallies: Vec<(TriggerKind, Tally)>,
    pub panics: Vec<String>,
}

impl<P, S: Store> Spin<P, S> {
    pub fn debug_info(&self) -> SpinResult<String> {
        let info = DebugInfo {
            time: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S %Z")
                .to_string(),
            spin_version: get_code_version().to_string(),
            rust_triple: format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS),
            spin_dir: self.config.writeable_path.clone(),
            is_premium: self.is_premium(),
            entitlement: self.entitlement(),
            owned_packs: self.owned_packs().into_iter().collect(),
            active_pack: self.active_pack(),
            tallies: TriggerKind::ALL
                .iter()
                .map(|kind| (*kind, self.tally(*kind)))
                .collect(),
            panics: self.collect_panics()?,
        };

        Ok(serde_json::to_string_pretty(&info)?)
    }

    fn collect_panics(&self) -> SpinResult<Vec<String>> {
        let dir = Path::new(&self.config.writeable_path);
        if !dir.exists() {
            return Ok(vec![]);
        }

        let mut panics = vec![];
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_panic_log = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(PANIC_PREFIX) && name.ends_with(".log"))
                .unwrap_or(false);

            if is_panic_log {
                panics.push(fs::read_to_string(&path)?);
            }
        }
        panics.sort();

        Ok(panics)
    }
}
