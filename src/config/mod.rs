use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "use_mock")]
    pub mock: Option<bool>,
    pub mock_count: Option<usize>,
    pub seed: Option<u64>,
    pub endpoint: Option<String>,
    pub mobile_code: Option<String>,
    pub desktop_code: Option<String>,
    pub breakpoint: Option<f64>,
    pub proxy: Option<String>,
    pub page_size: Option<usize>,
    pub load_delay_ms: Option<u64>,
    pub scroll_threshold: Option<f64>,
    pub viewport_width: Option<f64>,
    pub viewport_height: Option<f64>,
    pub scrolls: Option<usize>,
    pub scroll_interval_ms: Option<u64>,
    pub output: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".promogrid").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn parse_config(contents: &str) -> Result<ConfigFile, String> {
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| e.to_string())
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Promogrid config
#
# Location (default):
#   ~/.promogrid/config.yml

# Data source
mock: true
mock_count: 100
# seed: 42

# Live inventory API (used when mock is false)
endpoint: https://dapi.tourvis.com/api/inventory/getInventoryList
mobile_code: TV_IV_C_TOPBANNER
desktop_code: TV_IV_C_P_TOPBANNER
breakpoint: 768
# proxy: http://127.0.0.1:8080

# Paging
page_size: 12
load_delay_ms: 500
scroll_threshold: 100

# Simulated viewport
viewport_width: 1280
viewport_height: 800

# Scripted reader
scrolls: 10
scroll_interval_ms: 200

# Output (optional)
# output: ./promotions.html

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}
