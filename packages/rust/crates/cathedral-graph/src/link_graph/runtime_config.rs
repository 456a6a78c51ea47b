use crate::error::GardenError;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment override for `garden.content_root`.
pub const GARDEN_CONTENT_ROOT_ENV: &str = "CATHEDRAL_CONTENT_ROOT";
/// Environment override for `garden.cache.enabled`.
pub const GARDEN_CACHE_ENV: &str = "CATHEDRAL_CACHE";
pub(crate) const DEFAULT_CONTENT_ROOT: &str = "content";
pub(crate) const DEFAULT_RECENT_LIMIT: usize = 10;
pub(crate) const DEFAULT_RELATED_LIMIT: usize = 5;

static PROJECT_ROOT_CACHE: OnceLock<PathBuf> = OnceLock::new();
static GARDEN_CONFIG_FILE_OVERRIDE: OnceLock<PathBuf> = OnceLock::new();

/// Resolved garden settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GardenRuntimeConfig {
    /// Directory holding the notes.
    pub content_root: PathBuf,
    /// Extra directory names skipped during enumeration.
    pub exclude_dirs: Vec<String>,
    /// Whether the in-process snapshot cache is used.
    pub cache_enabled: bool,
    /// Default size of the recent-nodes listing.
    pub recent_limit: usize,
    /// Default size of the related-nodes ranking.
    pub related_limit: usize,
}

impl Default for GardenRuntimeConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from(DEFAULT_CONTENT_ROOT),
            exclude_dirs: Vec::new(),
            cache_enabled: false,
            recent_limit: DEFAULT_RECENT_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    }
}

/// CLI/runtime override for the exact garden config file path.
///
/// Used by `cathedral --conf <file>`; replaces the user-level config file.
///
/// # Errors
///
/// Returns [`GardenError::Config`] when a different override was already set.
pub fn set_garden_config_override(path: PathBuf) -> Result<(), GardenError> {
    let normalized = absolutize(path);
    if let Some(existing) = GARDEN_CONFIG_FILE_OVERRIDE.get() {
        if existing == &normalized {
            return Ok(());
        }
        return Err(GardenError::Config(format!(
            "garden config override already set to '{}' (requested '{}')",
            existing.display(),
            normalized.display()
        )));
    }
    GARDEN_CONFIG_FILE_OVERRIDE
        .set(normalized)
        .map_err(|_| GardenError::Config("failed to set garden config override".to_string()))
}

fn first_non_empty(values: &[Option<String>]) -> Option<String> {
    values.iter().flatten().find_map(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn resolve_project_root_uncached() -> PathBuf {
    if let Ok(raw) = std::env::var("PRJ_ROOT") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return absolutize(PathBuf::from(trimmed));
        }
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut cursor = cwd.clone();
    loop {
        if cursor.join(".git").exists() {
            return cursor;
        }
        match cursor.parent() {
            Some(parent) => cursor = parent.to_path_buf(),
            None => return cwd,
        }
    }
}

fn resolve_project_root() -> PathBuf {
    PROJECT_ROOT_CACHE
        .get_or_init(resolve_project_root_uncached)
        .clone()
}

fn resolve_prj_config_home(project_root: &Path) -> PathBuf {
    if let Ok(raw) = std::env::var("PRJ_CONFIG_HOME") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            let path = PathBuf::from(trimmed);
            return if path.is_absolute() {
                path
            } else {
                project_root.join(path)
            };
        }
    }
    project_root.join(".config")
}

fn read_yaml_file(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_yaml::from_str::<Value>(&content).ok()
}

/// Read one YAML settings file, failing loudly.
///
/// # Errors
///
/// Returns [`GardenError::Config`] when the file cannot be read or parsed.
pub fn load_settings_file(path: &Path) -> Result<Value, GardenError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GardenError::Config(format!("cannot read '{}': {e}", path.display())))?;
    serde_yaml::from_str::<Value>(&content)
        .map_err(|e| GardenError::Config(format!("cannot parse '{}': {e}", path.display())))
}

fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(existing) = base_map.get_mut(&key) {
                    deep_merge(existing, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn merged_garden_settings(project_root: &Path) -> Result<Value, GardenError> {
    let system_path = project_root.join("packages/conf/cathedral.yaml");
    let mut merged = Value::Mapping(Mapping::new());
    if let Some(system) = read_yaml_file(&system_path) {
        deep_merge(&mut merged, system);
    }
    if let Some(override_path) = GARDEN_CONFIG_FILE_OVERRIDE.get() {
        deep_merge(&mut merged, load_settings_file(override_path)?);
    } else {
        let user_path = resolve_prj_config_home(project_root).join("cathedral/cathedral.yaml");
        if let Some(user) = read_yaml_file(&user_path) {
            deep_merge(&mut merged, user);
        }
    }
    Ok(merged)
}

fn setting_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(value) => Some(value.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn setting_value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => parse_bool(text),
        Value::Number(number) => number.as_i64().map(|v| v != 0),
        _ => None,
    }
}

fn get_setting_value<'a>(settings: &'a Value, dotted_key: &str) -> Option<&'a Value> {
    let mut cursor = settings;
    for segment in dotted_key.split('.') {
        match cursor {
            Value::Mapping(map) => {
                let key = Value::String(segment.to_string());
                cursor = map.get(&key)?;
            }
            _ => return None,
        }
    }
    Some(cursor)
}

fn get_setting_string(settings: &Value, dotted_key: &str) -> Option<String> {
    get_setting_value(settings, dotted_key).and_then(setting_value_to_string)
}

fn get_setting_bool(settings: &Value, dotted_key: &str) -> Option<bool> {
    get_setting_value(settings, dotted_key).and_then(setting_value_to_bool)
}

fn get_setting_positive_usize(settings: &Value, dotted_key: &str) -> Option<usize> {
    get_setting_string(settings, dotted_key)
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

fn get_setting_string_list(settings: &Value, dotted_key: &str) -> Vec<String> {
    let Some(value) = get_setting_value(settings, dotted_key) else {
        return Vec::new();
    };
    match value {
        Value::String(single) => {
            let text = single.trim();
            if text.is_empty() {
                Vec::new()
            } else {
                vec![text.to_string()]
            }
        }
        Value::Sequence(items) => items
            .iter()
            .filter_map(setting_value_to_string)
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

impl GardenRuntimeConfig {
    /// Build a config from merged settings plus environment lookups.
    ///
    /// Environment values win over settings; a relative `content_root` is
    /// resolved against `project_root`.
    #[must_use]
    pub fn from_settings(
        settings: &Value,
        project_root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let content_root = first_non_empty(&[
            env(GARDEN_CONTENT_ROOT_ENV),
            get_setting_string(settings, "garden.content_root"),
        ])
        .map_or_else(|| PathBuf::from(DEFAULT_CONTENT_ROOT), PathBuf::from);
        let content_root = if content_root.is_absolute() {
            content_root
        } else {
            project_root.join(content_root)
        };

        let cache_enabled = env(GARDEN_CACHE_ENV)
            .as_deref()
            .and_then(parse_bool)
            .or_else(|| get_setting_bool(settings, "garden.cache.enabled"))
            .unwrap_or(false);

        let mut exclude_dirs = get_setting_string_list(settings, "garden.exclude_dirs");
        exclude_dirs.sort();
        exclude_dirs.dedup();

        Self {
            content_root,
            exclude_dirs,
            cache_enabled,
            recent_limit: get_setting_positive_usize(settings, "garden.recent_limit")
                .unwrap_or(DEFAULT_RECENT_LIMIT),
            related_limit: get_setting_positive_usize(settings, "garden.related_limit")
                .unwrap_or(DEFAULT_RELATED_LIMIT),
        }
    }
}

/// Resolve garden settings from the system file, the user (or `--conf`) file,
/// and the process environment.
///
/// # Errors
///
/// Returns [`GardenError::Config`] when an explicit `--conf` file cannot be
/// read or parsed. Missing implicit files are ignored.
pub fn resolve_garden_runtime() -> Result<GardenRuntimeConfig, GardenError> {
    let project_root = resolve_project_root();
    let settings = merged_garden_settings(&project_root)?;
    Ok(GardenRuntimeConfig::from_settings(
        &settings,
        &project_root,
        |key| std::env::var(key).ok(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(raw: &str) -> Value {
        serde_yaml::from_str(raw).unwrap_or(Value::Null)
    }

    #[test]
    fn test_defaults_when_settings_empty() {
        let config = GardenRuntimeConfig::from_settings(&Value::Null, Path::new("/prj"), |_| None);
        assert_eq!(config.content_root, PathBuf::from("/prj/content"));
        assert!(!config.cache_enabled);
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.related_limit, 5);
        assert!(config.exclude_dirs.is_empty());
    }

    #[test]
    fn test_settings_and_env_overrides() {
        let settings = yaml(
            "garden:\n  content_root: notes\n  exclude_dirs: [drafts, archive, drafts]\n  cache:\n    enabled: \"yes\"\n  recent_limit: 3\n  related_limit: 0\n",
        );
        let config = GardenRuntimeConfig::from_settings(&settings, Path::new("/prj"), |_| None);
        assert_eq!(config.content_root, PathBuf::from("/prj/notes"));
        assert_eq!(config.exclude_dirs, vec!["archive", "drafts"]);
        assert!(config.cache_enabled);
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.related_limit, 5);

        let config = GardenRuntimeConfig::from_settings(&settings, Path::new("/prj"), |key| {
            match key {
                GARDEN_CONTENT_ROOT_ENV => Some("/abs/garden".to_string()),
                GARDEN_CACHE_ENV => Some("off".to_string()),
                _ => None,
            }
        });
        assert_eq!(config.content_root, PathBuf::from("/abs/garden"));
        assert!(!config.cache_enabled);
    }

    #[test]
    fn test_deep_merge_overlays_nested_keys() {
        let mut base = yaml("garden:\n  recent_limit: 4\n  cache:\n    enabled: true\n");
        deep_merge(&mut base, yaml("garden:\n  cache:\n    enabled: false\n"));
        assert_eq!(get_setting_string(&base, "garden.recent_limit"), Some("4".to_string()));
        assert_eq!(get_setting_bool(&base, "garden.cache.enabled"), Some(false));
    }
}
