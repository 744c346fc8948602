use log::{debug, warn};
use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Environment the launcher runs with: the caller's process environment,
/// extended by values from the env file for keys the caller left unset.
///
/// Built once at startup and passed to every stage; the process-wide
/// environment itself is never modified. Keys and values are kept as OS
/// strings so the app receives the caller's environment byte for byte.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    vars: BTreeMap<OsString, OsString>,
    source: Option<PathBuf>,
}

impl Settings {
    /// Merge the env file at `path` under the current process environment.
    ///
    /// A missing or unreadable file is not an error: the process environment
    /// is used as-is.
    pub fn load(path: &Path) -> Self {
        let mut settings = Self::from_pairs(env::vars_os());
        settings.merge_env_file(path);
        settings
    }

    /// Settings from explicit key/value pairs, no env file.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            source: None,
        }
    }

    /// Add pairs from the env file for keys not already set.
    pub fn merge_env_file(&mut self, path: &Path) {
        let entries = match dotenvy::from_path_iter(path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No env file at {} ({}), using process environment", path.display(), e);
                return;
            }
        };

        let mut added = 0usize;
        for entry in entries {
            match entry {
                Ok((key, value)) => {
                    let key = OsString::from(key);
                    if !self.vars.contains_key(&key) {
                        self.vars.insert(key, OsString::from(value));
                        added += 1;
                    }
                }
                Err(dotenvy::Error::LineParse(line, index)) => {
                    warn!("Skipping malformed line in {} at {}: {}", path.display(), index, line);
                }
                Err(e) => {
                    warn!("Stopped reading {}: {}", path.display(), e);
                    return;
                }
            }
        }

        debug!("Loaded {} new variable(s) from {}", added, path.display());
        self.source = Some(path.to_path_buf());
    }

    /// Value for `key`, if set and valid UTF-8.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(OsStr::new(key)).and_then(|value| value.to_str())
    }

    /// Value for `key`, or `default` when unset.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Path of the env file, if it was read to the end.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}
