//! Command-line and config-file settings.
//!
//! Precedence is built-in defaults, then the optional TOML file, then flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::feed::DEFAULT_PAGE_SIZE;
use crate::sentinel::DEFAULT_PREFETCH_ROWS;

pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/posts";

#[derive(Parser, Debug, Default)]
#[command(version, about = "Page through a remote JSON collection in the terminal")]
pub struct Cli {
    /// Collection endpoint (JSON array, `_page`/`_limit` paging).
    #[arg(long)]
    pub url: Option<String>,
    /// Items requested per page.
    #[arg(long)]
    pub page_size: Option<u32>,
    /// Quiet interval before a search takes effect, in milliseconds.
    #[arg(long)]
    pub debounce_ms: Option<u64>,
    /// Rows before the end of the list at which the next page is fetched.
    #[arg(long)]
    pub prefetch_rows: Option<usize>,
    /// Start in "load more" mode instead of infinite scroll.
    #[arg(long)]
    pub no_infinite: bool,
    /// TOML file with any of the settings above.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write tracing output here (the terminal is taken by the UI).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub url: String,
    pub label: String,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub prefetch_rows: usize,
    pub infinite: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.into(),
            label: "Posts".into(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            prefetch_rows: DEFAULT_PREFETCH_ROWS,
            infinite: true,
            log_file: None,
        }
    }
}

impl Settings {
    /// Resolve the final settings from `cli`, reading its config file if one
    /// was given.
    pub fn load(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let settings = base.with_overrides(cli);
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.url {
            self.url = url.clone();
        }
        if let Some(page_size) = cli.page_size {
            self.page_size = page_size;
        }
        if let Some(debounce_ms) = cli.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if let Some(rows) = cli.prefetch_rows {
            self.prefetch_rows = rows;
        }
        if cli.no_infinite {
            self.infinite = false;
        }
        if let Some(path) = &cli.log_file {
            self.log_file = Some(path.clone());
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            bail!("url must not be empty");
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.debounce_ms == 0 {
            bail!("debounce_ms must be at least 1");
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_the_explorer() {
        let s = Settings::load(&Cli::default()).unwrap();
        assert_eq!(s.url, DEFAULT_URL);
        assert_eq!(s.page_size, 10);
        assert_eq!(s.debounce(), Duration::from_millis(350));
        assert_eq!(s.prefetch_rows, 10);
        assert!(s.infinite);
        assert!(s.log_file.is_none());
    }

    #[test]
    fn file_overrides_defaults_and_keeps_the_rest() {
        let file = write_config("page_size = 25\ninfinite = false\n");
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            ..Cli::default()
        };
        let s = Settings::load(&cli).unwrap();
        assert_eq!(s.page_size, 25);
        assert!(!s.infinite);
        assert_eq!(s.url, DEFAULT_URL);
    }

    #[test]
    fn flags_override_file() {
        let file = write_config("page_size = 25\nurl = \"http://file/posts\"\n");
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            page_size: Some(5),
            debounce_ms: Some(100),
            ..Cli::default()
        };
        let s = Settings::load(&cli).unwrap();
        assert_eq!(s.page_size, 5);
        assert_eq!(s.url, "http://file/posts");
        assert_eq!(s.debounce(), Duration::from_millis(100));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let cli = Cli {
            page_size: Some(0),
            ..Cli::default()
        };
        assert!(Settings::load(&cli).is_err());
    }

    #[test]
    fn empty_url_is_rejected() {
        let cli = Cli {
            url: Some("  ".into()),
            ..Cli::default()
        };
        assert!(Settings::load(&cli).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Cli::default()
        };
        let err = Settings::load(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.toml"));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["feed-explorer", "--page-size", "20", "--no-infinite"]);
        assert_eq!(cli.page_size, Some(20));
        assert!(cli.no_infinite);
    }
}
