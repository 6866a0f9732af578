use parking_lot::Mutex;
/// Logging bridge for fontpair
///
/// Routes every `log::` macro call in the workspace to a debug log file:
/// `/tmp/fontpair_debug.log` on Unix/macOS, `%TEMP%\fontpair_debug.log`
/// on Windows. Keeping diagnostics out of stdout leaves command output
/// clean for piping (`fontpair preview > theme.css`).
///
/// When `RUST_LOG` is set, records are mirrored to stderr as well.
///
/// Level precedence: `--log-level` flag, then `RUST_LOG`, then the config
/// file's `log_level` (applied after the config is loaded).
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Crates whose records pass at any enabled level; everything else is
/// capped at `Warn`.
const OWN_TARGETS: &[&str] = &[
    "fontpair",
    "fontpair_catalog",
    "fontpair_config",
    "fontpair_favorites",
    "fontpair_selection",
    "fontpair_style",
];

/// Where the debug log is written.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/fontpair_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("fontpair_debug.log");
    path
}

struct LogBridge {
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl LogBridge {
    fn new(level: LevelFilter, mirror_stderr: bool) -> Self {
        let file = if level != LevelFilter::Off {
            // Silently run without a file if it can't be opened
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
                .ok()
        } else {
            None
        };

        let bridge = LogBridge {
            file: Mutex::new(file),
            mirror_stderr,
        };
        bridge.write_raw(&format!(
            "\n{}\nfontpair debug session started at {} (level={})\n{}\n",
            "=".repeat(80),
            get_timestamp(),
            level,
            "=".repeat(80)
        ));
        bridge
    }

    fn write_raw(&self, msg: &str) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }
}

fn is_own_target(target: &str) -> bool {
    OWN_TARGETS.iter().any(|own| {
        target == *own
            || target
                .strip_prefix(own)
                .is_some_and(|rest| rest.starts_with("::"))
    })
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let max = log::max_level();
        if is_own_target(metadata.target()) {
            metadata.level() <= max
        } else {
            metadata.level() <= max.min(LevelFilter::Warn)
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            get_timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_raw(&line);
        if self.mirror_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.flush();
        }
    }
}

static BRIDGE: OnceLock<()> = OnceLock::new();
static LEVEL_FROM_ENV_OR_CLI: OnceLock<bool> = OnceLock::new();

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Level named by a `RUST_LOG` value.
///
/// Accepts a bare level (`debug`) or `env_logger`-style directives
/// (`fontpair=debug,ureq=warn`); a directive for one of our crates wins
/// over a bare level.
pub fn level_from_rust_log(value: &str) -> Option<LevelFilter> {
    let mut bare = None;
    let mut own = None;
    for directive in value.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match directive.split_once('=') {
            Some((target, level)) => {
                if is_own_target(target.trim())
                    && let Ok(level) = level.trim().parse()
                {
                    own = Some(level);
                }
            }
            None => {
                if let Ok(level) = directive.parse() {
                    bare = Some(level);
                }
            }
        }
    }
    own.or(bare)
}

/// Install the logging bridge. Safe to call more than once; only the first
/// call installs.
///
/// Returns the level in effect.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) -> LevelFilter {
    let rust_log = std::env::var("RUST_LOG").ok();
    let env_level = rust_log.as_deref().and_then(level_from_rust_log);
    let explicit = cli_level.or(env_level);
    let level = explicit.unwrap_or(LevelFilter::Warn);

    BRIDGE.get_or_init(|| {
        let bridge = LogBridge::new(level, rust_log.is_some());
        if log::set_boxed_logger(Box::new(bridge)).is_ok() {
            log::set_max_level(level);
        }
        let _ = LEVEL_FROM_ENV_OR_CLI.set(explicit.is_some());
    });
    log::max_level()
}

/// Apply the config file's level unless the flag or `RUST_LOG` already
/// chose one.
pub fn apply_config_level(level: LevelFilter) {
    if LEVEL_FROM_ENV_OR_CLI.get().copied().unwrap_or(false) {
        return;
    }
    log::set_max_level(level);
}
