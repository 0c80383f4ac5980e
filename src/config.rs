use crate::error::{BugsinkError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_HOST: &str = "https://bugs.kopernici.cz";
pub const DOTFILE: &str = ".bugsink";

pub const API_KEY_VAR: &str = "BUGSINK_API_KEY";
pub const HOST_VAR: &str = "BUGSINK_HOST";
pub const PROJECT_ID_VAR: &str = "BUGSINK_PROJECT_ID";

static DOTFILE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PROJECT_ID=(\d+)$").expect("valid dotfile pattern"));

/// Source of environment variables.
pub trait Environment {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables, used in tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    vars: HashMap<String, String>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl Environment for MapEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Where the active project id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectSource {
    Env,
    File,
    /// Changed in this process while `BUGSINK_PROJECT_ID` blocked the write.
    Session,
    Unset,
}

#[derive(Debug, Clone)]
pub struct Config {
    api_key: Option<String>,
    host: String,
    project_id: Option<u64>,
    project_source: ProjectSource,
    /// `BUGSINK_PROJECT_ID` was set to a non-empty value, valid or not.
    project_env_set: bool,
    dotfile_path: PathBuf,
}

impl Config {
    /// Resolve configuration from the process environment and the current directory.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::resolve(&ProcessEnvironment, &cwd))
    }

    /// Resolve configuration from `env` and the dotfile in `dir`.
    ///
    /// Never fails: a missing API key is only reported by [`Config::validate`].
    pub fn resolve(env: &dyn Environment, dir: &Path) -> Self {
        let api_key = env.var(API_KEY_VAR);
        let host = env.var(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let dotfile_path = dir.join(DOTFILE);

        let env_value = env.var(PROJECT_ID_VAR).filter(|v| !v.is_empty());
        let project_env_set = env_value.is_some();

        let (project_id, project_source) = match env_value.as_deref().and_then(parse_positive) {
            Some(id) => (Some(id), ProjectSource::Env),
            None => {
                if let Some(raw) = env_value.as_deref() {
                    tracing::warn!(value = raw, "ignoring invalid {}", PROJECT_ID_VAR);
                }
                match read_dotfile(&dotfile_path) {
                    Some(id) => (Some(id), ProjectSource::File),
                    None => (None, ProjectSource::Unset),
                }
            }
        };

        Self {
            api_key,
            host,
            project_id,
            project_source,
            project_env_set,
            dotfile_path,
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn project_id(&self) -> Option<u64> {
        self.project_id
    }

    pub fn project_source(&self) -> ProjectSource {
        self.project_source
    }

    pub fn dotfile_path(&self) -> &Path {
        &self.dotfile_path
    }

    /// True when `BUGSINK_PROJECT_ID` shadows the dotfile.
    pub fn project_id_from_env(&self) -> bool {
        self.project_env_set
    }

    pub fn is_valid(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(BugsinkError::Config(format!(
                "{} environment variable is required",
                API_KEY_VAR
            )));
        }
        Ok(())
    }

    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.api_key.as_deref().unwrap_or_default())
    }

    /// Change the active project id.
    ///
    /// Persists to the dotfile unless `BUGSINK_PROJECT_ID` is set, in which
    /// case only the in-memory value changes. Returns whether the file was written.
    pub fn set_project_id(&mut self, id: u64) -> Result<bool> {
        let persisted = if self.project_env_set {
            self.project_source = ProjectSource::Session;
            false
        } else {
            std::fs::write(&self.dotfile_path, format!("PROJECT_ID={}\n", id))?;
            tracing::info!(path = %self.dotfile_path.display(), id, "wrote project id");
            self.project_source = ProjectSource::File;
            true
        };
        self.project_id = Some(id);
        Ok(persisted)
    }

    fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None | Some("") => "not set".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 17 {
                    return "********".to_string();
                }
                let head: String = chars[..9].iter().collect();
                let tail: String = chars[chars.len() - 8..].iter().collect();
                format!("{}...{}", head, tail)
            }
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let project = match (self.project_id, self.project_source) {
            (Some(id), ProjectSource::Env) => format!("{} (from env)", id),
            (Some(id), ProjectSource::File) => format!("{} (from file)", id),
            (Some(id), ProjectSource::Session | ProjectSource::Unset) => {
                format!("{} (not persisted)", id)
            }
            (None, _) => "not set".to_string(),
        };
        writeln!(f, "BugSink Configuration:")?;
        writeln!(f, "  Host: {}", self.host)?;
        writeln!(f, "  API Key: {}", self.masked_api_key())?;
        write!(f, "  Project ID: {}", project)
    }
}

fn parse_positive(value: &str) -> Option<u64> {
    match value.parse::<i64>() {
        Ok(n) if n > 0 => Some(n as u64),
        _ => None,
    }
}

fn read_dotfile(path: &Path) -> Option<u64> {
    let content = std::fs::read_to_string(path).ok()?;
    let caps = DOTFILE_LINE.captures(content.trim())?;
    caps.get(1)?.as_str().parse::<u64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env_with_project(value: &str) -> MapEnvironment {
        MapEnvironment::new().with(PROJECT_ID_VAR, value)
    }

    #[test]
    fn test_reads_api_key_and_default_host() {
        let dir = TempDir::new().unwrap();
        let env = MapEnvironment::new().with(API_KEY_VAR, "test-key");
        let config = Config::resolve(&env, dir.path());

        assert_eq!(config.api_key(), Some("test-key"));
        assert_eq!(config.host(), DEFAULT_HOST);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_host_override() {
        let dir = TempDir::new().unwrap();
        let env = MapEnvironment::new().with(HOST_VAR, "https://test.example.com");
        let config = Config::resolve(&env, dir.path());
        assert_eq!(config.host(), "https://test.example.com");
    }

    #[test]
    fn test_validate_rejects_missing_or_empty_key() {
        let dir = TempDir::new().unwrap();

        let config = Config::resolve(&MapEnvironment::new(), dir.path());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("BUGSINK_API_KEY"));

        let config = Config::resolve(&MapEnvironment::new().with(API_KEY_VAR, ""), dir.path());
        assert!(!config.is_valid());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_authorization_header() {
        let dir = TempDir::new().unwrap();
        let env = MapEnvironment::new().with(API_KEY_VAR, "test-key-123");
        let config = Config::resolve(&env, dir.path());
        assert_eq!(config.authorization_header(), "Bearer test-key-123");
    }

    #[test]
    fn test_project_id_from_env() {
        let dir = TempDir::new().unwrap();
        let config = Config::resolve(&env_with_project("42"), dir.path());
        assert_eq!(config.project_id(), Some(42));
        assert_eq!(config.project_source(), ProjectSource::Env);
    }

    #[test]
    fn test_env_overrides_dotfile() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DOTFILE), "PROJECT_ID=99\n").unwrap();

        let config = Config::resolve(&env_with_project("42"), dir.path());
        assert_eq!(config.project_id(), Some(42));
    }

    #[test]
    fn test_invalid_env_values_are_absent() {
        let dir = TempDir::new().unwrap();
        for value in ["invalid", "0", "-5", "", "4.2"] {
            let config = Config::resolve(&env_with_project(value), dir.path());
            assert_eq!(config.project_id(), None, "value {:?}", value);
        }
    }

    #[test]
    fn test_invalid_env_value_falls_through_to_dotfile() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DOTFILE), "PROJECT_ID=99\n").unwrap();

        let config = Config::resolve(&env_with_project("nope"), dir.path());
        assert_eq!(config.project_id(), Some(99));
        assert_eq!(config.project_source(), ProjectSource::File);
    }

    #[test]
    fn test_reads_dotfile() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DOTFILE), "PROJECT_ID=99\n").unwrap();

        let config = Config::resolve(&MapEnvironment::new(), dir.path());
        assert_eq!(config.project_id(), Some(99));
    }

    #[test]
    fn test_dotfile_missing_or_malformed() {
        let dir = TempDir::new().unwrap();
        let config = Config::resolve(&MapEnvironment::new(), dir.path());
        assert_eq!(config.project_id(), None);
        assert_eq!(config.project_source(), ProjectSource::Unset);

        for content in ["PROJECT=8\n", "PROJECT_ID=abc\n", "PROJECT_ID=8\nOTHER=1\n", ""] {
            std::fs::write(dir.path().join(DOTFILE), content).unwrap();
            let config = Config::resolve(&MapEnvironment::new(), dir.path());
            assert_eq!(config.project_id(), None, "content {:?}", content);
        }
    }

    #[test]
    fn test_set_project_id_writes_dotfile() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::resolve(&MapEnvironment::new(), dir.path());

        let persisted = config.set_project_id(42).unwrap();

        assert!(persisted);
        assert_eq!(config.project_id(), Some(42));
        let content = std::fs::read_to_string(dir.path().join(DOTFILE)).unwrap();
        assert_eq!(content, "PROJECT_ID=42\n");
    }

    #[test]
    fn test_set_project_id_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DOTFILE), "PROJECT_ID=1\n").unwrap();
        let mut config = Config::resolve(&MapEnvironment::new(), dir.path());

        config.set_project_id(7).unwrap();

        let content = std::fs::read_to_string(dir.path().join(DOTFILE)).unwrap();
        assert_eq!(content, "PROJECT_ID=7\n");
    }

    #[test]
    fn test_set_project_id_with_env_skips_file() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::resolve(&env_with_project("42"), dir.path());

        let persisted = config.set_project_id(99).unwrap();

        assert!(!persisted);
        assert_eq!(config.project_id(), Some(99));
        assert!(!dir.path().join(DOTFILE).exists());
    }

    #[test]
    fn test_display_after_blocked_write_is_not_from_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DOTFILE), "PROJECT_ID=8\n").unwrap();
        let mut config = Config::resolve(&env_with_project("abc"), dir.path());
        assert_eq!(config.project_source(), ProjectSource::File);

        assert!(!config.set_project_id(99).unwrap());

        assert_eq!(config.project_source(), ProjectSource::Session);
        let output = config.to_string();
        assert!(output.contains("Project ID: 99 (not persisted)"));
        assert!(!output.contains("from file"));
        let content = std::fs::read_to_string(dir.path().join(DOTFILE)).unwrap();
        assert_eq!(content, "PROJECT_ID=8\n");
    }

    #[test]
    fn test_display_with_project_from_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(DOTFILE), "PROJECT_ID=8\n").unwrap();
        let env = MapEnvironment::new()
            .with(API_KEY_VAR, "test-key-12345678901234567890")
            .with(HOST_VAR, "https://test.example.com");

        let output = Config::resolve(&env, dir.path()).to_string();
        assert!(output.contains("BugSink Configuration"));
        assert!(output.contains("https://test.example.com"));
        assert!(output.contains("test-key-...34567890"));
        assert!(output.contains("Project ID: 8 (from file)"));
    }

    #[test]
    fn test_display_with_project_from_env() {
        let dir = TempDir::new().unwrap();
        let env = env_with_project("42").with(API_KEY_VAR, "test-key-12345678901234567890");

        let output = Config::resolve(&env, dir.path()).to_string();
        assert!(output.contains("Project ID: 42 (from env)"));
    }

    #[test]
    fn test_display_when_unset() {
        let dir = TempDir::new().unwrap();
        let output = Config::resolve(&MapEnvironment::new(), dir.path()).to_string();
        assert!(output.contains("API Key: not set"));
        assert!(output.contains("Project ID: not set"));
    }

    #[test]
    fn test_short_api_key_is_fully_masked() {
        let dir = TempDir::new().unwrap();
        let env = MapEnvironment::new().with(API_KEY_VAR, "short");
        let output = Config::resolve(&env, dir.path()).to_string();
        assert!(output.contains("API Key: ********"));
        assert!(!output.contains("short"));
    }
}
