use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

use crate::quickfix::QuickFixOptions;
use crate::symbols::WorkspaceScanOptions;

pub(crate) const SETTINGS_SECTION_KEY: &str = "cpp-assist";
const MIN_MAX_FILE_SIZE_KB: u64 = 16;
const MAX_MAX_FILE_SIZE_KB: u64 = 1024 * 64;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerSettings {
    pub quick_fix: QuickFixSettings,
    pub indexing: IndexingSettings,
    pub logging: LoggingSettings,
}

impl ServerSettings {
    pub fn from_lsp_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<ServerSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    fn apply_patch(
        &mut self,
        patch: ServerSettingsPatch,
    ) {
        if let Some(quick_fix) = patch.quick_fix {
            self.quick_fix.apply_patch(quick_fix);
        }
        if let Some(indexing) = patch.indexing {
            self.indexing.apply_patch(indexing);
        }
        if let Some(logging) = patch.logging {
            self.logging.apply_patch(logging);
        }
    }

    fn normalize(&mut self) {
        self.quick_fix.normalize();
        self.indexing.normalize();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuickFixSettings {
    pub enabled: bool,
    pub automatic: bool,
    pub disabled: Vec<String>,
}

impl Default for QuickFixSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            automatic: true,
            disabled: Vec::new(),
        }
    }
}

impl QuickFixSettings {
    fn apply_patch(
        &mut self,
        patch: QuickFixSettingsPatch,
    ) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(automatic) = patch.automatic {
            self.automatic = automatic;
        }
        if let Some(disabled) = patch.disabled {
            self.disabled = disabled;
        }
    }

    fn normalize(&mut self) {
        self.disabled = dedup_trimmed(&self.disabled);
    }

    pub fn options(&self) -> QuickFixOptions {
        QuickFixOptions {
            automatic: self.automatic,
            disabled: self.disabled.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexingSettings {
    pub enabled: bool,
    pub max_file_size_kb: u64,
    pub exclude_paths: Vec<String>,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_file_size_kb: 512,
            exclude_paths: Vec::new(),
        }
    }
}

impl IndexingSettings {
    fn apply_patch(
        &mut self,
        patch: IndexingSettingsPatch,
    ) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(max_file_size_kb) = patch.max_file_size_kb {
            self.max_file_size_kb = max_file_size_kb;
        }
        if let Some(exclude_paths) = patch.exclude_paths {
            self.exclude_paths = exclude_paths;
        }
    }

    fn normalize(&mut self) {
        self.max_file_size_kb = self
            .max_file_size_kb
            .clamp(MIN_MAX_FILE_SIZE_KB, MAX_MAX_FILE_SIZE_KB);
        self.exclude_paths = dedup_trimmed(&self.exclude_paths);
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb.saturating_mul(1024)
    }

    pub fn scan_options(&self) -> WorkspaceScanOptions {
        WorkspaceScanOptions {
            max_file_size_bytes: self.max_file_size_bytes(),
            exclude_paths: self.exclude_paths.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    pub level: LoggingLevel,
}

impl LoggingSettings {
    fn apply_patch(
        &mut self,
        patch: LoggingSettingsPatch,
    ) {
        if let Some(level) = patch.level {
            self.level = level;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LoggingLevel {
    pub fn allows_info(self) -> bool {
        self >= LoggingLevel::Info
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ServerSettingsPatch {
    quick_fix: Option<QuickFixSettingsPatch>,
    indexing: Option<IndexingSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct QuickFixSettingsPatch {
    enabled: Option<bool>,
    automatic: Option<bool>,
    disabled: Option<Vec<String>>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct IndexingSettingsPatch {
    enabled: Option<bool>,
    max_file_size_kb: Option<u64>,
    exclude_paths: Option<Vec<String>>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct LoggingSettingsPatch {
    level: Option<LoggingLevel>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = vec![payload.clone()];
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

fn dedup_trimmed(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src/server/settings_tests.rs"]
mod tests;
