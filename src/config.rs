use crate::error::{Error, Result};
use crate::scheduler::heap::HeapOrder;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

const MIN_STACK_SIZE: usize = 16 * 1024;
const MAX_INITIAL_CAPACITY: usize = 1 << 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub heap_order: HeapOrder,
    pub initial_capacity: usize,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    pub lock_backoff_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heap_order: HeapOrder::Max,
            initial_capacity: 16,
            thread_name_prefix: "runq-thread".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            lock_backoff_attempts: 64,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(Error::config(format!(
                "initial_capacity too large (max {})",
                MAX_INITIAL_CAPACITY
            )));
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }
        if self.thread_name_prefix.contains('\0') {
            return Err(Error::config("thread_name_prefix must not contain NUL"));
        }

        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE {
                return Err(Error::config(format!(
                    "stack_size must be at least {} bytes",
                    MIN_STACK_SIZE
                )));
            }
        }

        if self.lock_backoff_attempts == 0 {
            return Err(Error::config("lock_backoff_attempts must be > 0"));
        }

        Ok(())
    }

    /// Reads `key = value` lines. Keys not listed here are rejected:
    /// `heap_order` (`max`/`min`), `initial_capacity`, `thread_name_prefix`,
    /// `stack_size` (bytes or `none`), `lock_backoff_attempts`.
    pub fn from_key_values(text: &str) -> Result<Config> {
        let values = KeyValues::parse(text)?;
        let mut builder = ConfigBuilder::new();

        for (key, value) in values.iter() {
            builder = match key {
                "heap_order" => builder.heap_order(value.parse()?),
                "initial_capacity" => builder.initial_capacity(parse_number(key, value)?),
                "thread_name_prefix" => builder.thread_name_prefix(value),
                "stack_size" if value.eq_ignore_ascii_case("none") => builder.no_stack_size(),
                "stack_size" => builder.stack_size(parse_number(key, value)?),
                "lock_backoff_attempts" => {
                    builder.lock_backoff_attempts(parse_number(key, value)?)
                }
                other => return Err(Error::config(format!("unknown key '{}'", other))),
            };
        }

        let config = builder.build()?;
        tracing::debug!(?config, "config loaded");
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let text = std::fs::read_to_string(path)?;
        Self::from_key_values(&text)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::config(format!("{}: '{}' is not a valid number", key, value)))
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn heap_order(mut self, order: HeapOrder) -> Self {
        self.config.heap_order = order;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Use the platform default stack size for spawned threads.
    pub fn no_stack_size(mut self) -> Self {
        self.config.stack_size = None;
        self
    }

    pub fn lock_backoff_attempts(mut self, attempts: u32) -> Self {
        self.config.lock_backoff_attempts = attempts;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Parsed `key = value` text. Blank lines and lines starting with `#` or `;`
/// are skipped. Later duplicates replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct KeyValues {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl KeyValues {
    pub fn parse(text: &str) -> Result<Self> {
        let mut values = KeyValues::default();

        for (n, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| Error::config(format!("line {}: expected key = value", n + 1)))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::config(format!("line {}: empty key", n + 1)));
            }

            values.insert(key, unquote(value.trim()));
        }

        Ok(values)
    }

    pub fn get_value(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value.to_string(),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value.to_string()));
            }
        }
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
