//! Command-line surface and the immutable poll configuration built from it.
//!
//! The tool takes its two inputs from flags only: the API token and the path
//! of a file whose full contents become the comment. Flags may be spelled Go
//! style (`-token`, `-text-path=...`) or GNU style (`--token`).
use clap::{Parser, ValueEnum};
use promo_common::PromoError;
use promo_common::observability::{LogConfig, LogFormat};
use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed delay between timeline fetches.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Long flags that consume the following argument as their value.
const VALUE_FLAGS: &[&str] = &["token", "text-path", "log-format", "log-dir"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("open comment text file error: {}: {source}", .path.display())]
    OpenText {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("read comment text file error: {}: {source}", .path.display())]
    ReadText {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<ConfigError> for PromoError {
    fn from(err: ConfigError) -> Self {
        PromoError::Startup(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

/// Comment on today's vc.ru self-promo thread as soon as it appears.
#[derive(Clone, Parser)]
#[command(name = "promo", version)]
pub struct Cli {
    /// vc.ru API token
    #[arg(long, value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub token: String,

    /// Comment text file path
    #[arg(long = "text-path", value_parser = non_empty_path)]
    pub text_path: PathBuf,

    /// Diagnostic output encoding
    #[arg(long = "log-format", value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    /// Also write a daily rolling log file into this directory
    #[arg(long = "log-dir")]
    pub log_dir: Option<PathBuf>,
}

impl std::fmt::Debug for Cli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cli")
            .field("token", &"<redacted>")
            .field("text_path", &self.text_path)
            .field("log_format", &self.log_format)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_args() -> Result<Self, clap::Error> {
        Self::parse_from_iter(std::env::args_os())
    }

    /// Parse an explicit argument list; the first item is the program name.
    pub fn parse_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_flag_style(args))
    }

    /// Logging setup requested on the command line.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            app_name: "promo",
            log_dir: self.log_dir.clone(),
            format: match self.log_format {
                LogFormatArg::Text => LogFormat::Text,
                LogFormatArg::Json => LogFormat::Json,
            },
            ..LogConfig::default()
        }
    }
}

fn non_empty_path(raw: &str) -> Result<PathBuf, String> {
    if raw.is_empty() {
        return Err("comment text file path not passed".to_string());
    }
    Ok(PathBuf::from(raw))
}

/// Rewrite Go-style single-dash long flags (`-token`) as `--token`.
///
/// Short flags (`-h`, `-V`) and values that follow a value-taking flag are
/// left untouched, as is everything after a bare `--`.
///
/// ```
/// use promo_config::normalize_flag_style;
///
/// let out = normalize_flag_style(["promo", "-token", "-abc", "-text-path=a.txt", "-h"]);
/// let out: Vec<_> = out.iter().map(|s| s.to_str().unwrap()).collect();
/// assert_eq!(out, ["promo", "--token", "-abc", "--text-path=a.txt", "-h"]);
/// ```
pub fn normalize_flag_style<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut expects_value = false;
    let mut passthrough = false;

    for (idx, arg) in args.into_iter().map(Into::into).enumerate() {
        if idx == 0 || passthrough || expects_value {
            expects_value = false;
            out.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let long = if let Some(rest) = text.strip_prefix("--") {
            Some(rest)
        } else if text.len() > 2 && text.starts_with('-') {
            Some(&text[1..])
        } else {
            None
        };

        match long {
            Some(rest) => {
                let (name, inline_value) = match rest.split_once('=') {
                    Some((name, _)) => (name, true),
                    None => (rest, false),
                };
                expects_value = !inline_value && VALUE_FLAGS.contains(&name);
                out.push(OsString::from(format!("--{rest}")));
            }
            None => out.push(arg),
        }
    }

    out
}

/// Everything the poll loop needs, fixed for the life of the process.
#[derive(Clone)]
pub struct PollConfig {
    pub auth_token: String,
    pub comment_text: String,
    pub poll_interval: Duration,
}

impl std::fmt::Debug for PollConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollConfig")
            .field("auth_token", &"<redacted>")
            .field("comment_len", &self.comment_text.len())
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl PollConfig {
    /// Build the config from parsed flags, reading the comment file in full.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let comment_text = read_comment_text(&cli.text_path)?;
        tracing::debug!(
            path = %cli.text_path.display(),
            bytes = comment_text.len(),
            "config.comment_text.loaded"
        );
        Ok(Self {
            auth_token: cli.token.clone(),
            comment_text,
            poll_interval: POLL_INTERVAL,
        })
    }
}

/// Read the whole file as the comment body. Opening and reading fail with
/// distinct errors.
pub fn read_comment_text(path: &Path) -> Result<String, ConfigError> {
    let mut file = File::open(path).map_err(|source| ConfigError::OpenText {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|source| ConfigError::ReadText {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(args: &[&str]) -> Vec<String> {
        normalize_flag_style(args.iter().copied())
            .into_iter()
            .map(|s| s.into_string().unwrap())
            .collect()
    }

    #[test]
    fn single_dash_long_flags_are_doubled() {
        assert_eq!(
            normalized(&["promo", "-token", "abc", "-text-path", "c.txt"]),
            ["promo", "--token", "abc", "--text-path", "c.txt"]
        );
    }

    #[test]
    fn double_dash_flags_are_untouched() {
        assert_eq!(
            normalized(&["promo", "--token=abc", "--log-format", "json"]),
            ["promo", "--token=abc", "--log-format", "json"]
        );
    }

    #[test]
    fn values_that_look_like_flags_survive() {
        assert_eq!(
            normalized(&["promo", "-token", "-secret-", "-text-path", "-file"]),
            ["promo", "--token", "-secret-", "--text-path", "-file"]
        );
    }

    #[test]
    fn arguments_after_terminator_are_untouched() {
        assert_eq!(
            normalized(&["promo", "--", "-token"]),
            ["promo", "--", "-token"]
        );
    }

    #[test]
    fn go_style_command_line_parses() {
        let cli = Cli::parse_from_iter(["promo", "-token", "abc", "-text-path=c.txt"]).unwrap();
        assert_eq!(cli.token, "abc");
        assert_eq!(cli.text_path, PathBuf::from("c.txt"));
        assert_eq!(cli.log_format, LogFormatArg::Text);
        assert!(cli.log_dir.is_none());
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = Cli::parse_from_iter(["promo", "-text-path", "c.txt"])
            .err()
            .expect("token is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn missing_text_path_is_rejected() {
        let err = Cli::parse_from_iter(["promo", "-token", "abc"])
            .err()
            .expect("text path is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn empty_values_are_rejected() {
        assert!(Cli::parse_from_iter(["promo", "-token=", "-text-path", "c.txt"]).is_err());
        assert!(Cli::parse_from_iter(["promo", "-token", "abc", "-text-path="]).is_err());
    }

    #[test]
    fn log_flags_map_to_log_config() {
        let cli = Cli::parse_from_iter([
            "promo",
            "-token",
            "abc",
            "-text-path",
            "c.txt",
            "-log-format",
            "json",
            "-log-dir",
            "/tmp/promo-logs",
        ])
        .unwrap();
        let cfg = cli.log_config();
        assert_eq!(cfg.format, LogFormat::Json);
        assert_eq!(cfg.log_dir, Some(PathBuf::from("/tmp/promo-logs")));
        assert_eq!(cfg.default_filter, "info");
    }

    #[test]
    fn debug_output_hides_the_token() {
        let cli = Cli::parse_from_iter(["promo", "-token", "s3cret", "-text-path", "c.txt"])
            .unwrap();
        assert!(!format!("{cli:?}").contains("s3cret"));

        let cfg = PollConfig {
            auth_token: "s3cret".into(),
            comment_text: "hi".into(),
            poll_interval: POLL_INTERVAL,
        };
        assert!(!format!("{cfg:?}").contains("s3cret"));
    }

    #[test]
    fn config_error_becomes_startup_error() {
        let err: PromoError = ConfigError::OpenText {
            path: PathBuf::from("missing.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert!(matches!(err, PromoError::Startup(ref msg) if msg.contains("missing.txt")));
    }
}
