use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Relative locations tried for `configs/synastry.toml`, matching how the
/// binaries are launched from the repo root or from a crate directory.
const CONFIG_PATHS: &[&str] = &["configs/synastry.toml", "../../configs/synastry.toml"];

#[derive(Debug, Clone, PartialEq)]
pub struct SynastrySettings {
    pub default_lang: String,
    pub max_tokens: Option<u32>,
    pub suggestion_limit: usize,
    pub log_filter: String,
    /// Prompt id overrides keyed by section or `tab_<tab>` id.
    pub prompts: HashMap<String, String>,
}

impl SynastrySettings {
    /// Prompt id for a narrative section, e.g. `overview` -> `synastry_overview`.
    pub fn section_prompt_id(&self, section: &str) -> String {
        self.prompts
            .get(section)
            .cloned()
            .unwrap_or_else(|| format!("synastry_{section}"))
    }

    /// Prompt id for a tab, e.g. `main` -> `synastry_tab_main`.
    pub fn tab_prompt_id(&self, tab: &str) -> String {
        self.prompts
            .get(&format!("tab_{tab}"))
            .cloned()
            .unwrap_or_else(|| format!("synastry_tab_{tab}"))
    }
}

impl Default for SynastrySettings {
    fn default() -> Self {
        Self {
            default_lang: default_lang(),
            max_tokens: None,
            suggestion_limit: default_suggestion_limit(),
            log_filter: default_log_filter(),
            prompts: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SynastryToml {
    #[serde(default = "default_lang")]
    default_lang: String,
    #[serde(default)]
    max_tokens: Option<u32>,
    #[serde(default = "default_suggestion_limit")]
    suggestion_limit: usize,
    #[serde(default = "default_log_filter")]
    log_filter: String,
    #[serde(default)]
    prompts: HashMap<String, String>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    synastry: Option<SynastryToml>,
}

/// Try the common relative paths for `configs/synastry.toml`.
pub fn read_synastry_toml_text() -> anyhow::Result<String> {
    for p in CONFIG_PATHS {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load synastry.toml from {:?}", CONFIG_PATHS);
}

pub fn parse_synastry_settings(text: &str) -> anyhow::Result<SynastrySettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse synastry.toml: {e}"))?;
    let Some(cfg) = root.synastry else {
        return Ok(SynastrySettings::default());
    };
    let SynastryToml {
        default_lang,
        max_tokens,
        suggestion_limit,
        log_filter,
        prompts,
    } = cfg;
    if default_lang.trim().is_empty() {
        anyhow::bail!("synastry.default_lang must not be empty");
    }
    if suggestion_limit == 0 {
        anyhow::bail!("synastry.suggestion_limit must be at least 1");
    }
    Ok(SynastrySettings {
        default_lang,
        max_tokens,
        suggestion_limit,
        log_filter,
        prompts,
    })
}

pub fn load_synastry_settings_from(path: &Path) -> anyhow::Result<SynastrySettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    parse_synastry_settings(&text)
}

pub fn load_synastry_settings() -> anyhow::Result<SynastrySettings> {
    let text = read_synastry_toml_text()?;
    parse_synastry_settings(&text)
}

/// Like [`load_synastry_settings`], but a missing file yields defaults.
/// A file that exists and fails to parse is still an error.
pub fn load_or_default() -> anyhow::Result<SynastrySettings> {
    match read_synastry_toml_text() {
        Ok(text) => parse_synastry_settings(&text),
        Err(_) => Ok(SynastrySettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = parse_synastry_settings("").unwrap();
        assert_eq!(settings, SynastrySettings::default());
        assert_eq!(settings.suggestion_limit, 5);
        assert_eq!(settings.default_lang, "en");
    }

    #[test]
    fn test_parse_overrides() {
        let text = r#"
            [synastry]
            default_lang = "ru"
            max_tokens = 1800
            suggestion_limit = 3

            [synastry.prompts]
            overview = "syn_overview_v2"
            tab_main = "syn_main_v4"
        "#;
        let settings = parse_synastry_settings(text).unwrap();
        assert_eq!(settings.default_lang, "ru");
        assert_eq!(settings.max_tokens, Some(1800));
        assert_eq!(settings.suggestion_limit, 3);
        assert_eq!(settings.section_prompt_id("overview"), "syn_overview_v2");
        assert_eq!(settings.section_prompt_id("intimacy"), "synastry_intimacy");
        assert_eq!(settings.tab_prompt_id("main"), "syn_main_v4");
        assert_eq!(settings.tab_prompt_id("composite"), "synastry_tab_composite");
    }

    #[test]
    fn test_zero_suggestion_limit_rejected() {
        let text = "[synastry]\nsuggestion_limit = 0\n";
        assert!(parse_synastry_settings(text).is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(parse_synastry_settings("[synastry\nfoo").is_err());
    }
}
