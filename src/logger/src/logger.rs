use std::{io::Write, time::Duration};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use env_logger::{Builder, Env, fmt::Color};
use once_cell::sync::OnceCell;
use thiserror::Error;

/// Environment variable overriding the command line verbosity.
pub const LOG_ENV_VAR: &str = "IMPUTE2_STATS_LOG";

static INSTANCE: OnceCell<Logger> = OnceCell::new();

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Logger was already initialized")]
    AlreadyInitialized,

    #[error("Failed to wrap logger with a multiprogress bar")]
    WrapProgress(#[source] log::SetLoggerError),
}

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Initialize the global logger.
    ///
    /// Verbosity: 0: error | 1: warn | 2: info | 3: debug | 4+: trace. `IMPUTE2_STATS_LOG`
    /// takes precedence when set.
    pub fn init(verbosity: u8) -> Result<(), LoggerError> {
        if INSTANCE.get().is_some() {
            return Err(LoggerError::AlreadyInitialized)
        }

        let env = Env::default().filter(LOG_ENV_VAR);
        let logger = Builder::new().filter_level(Self::u8_to_loglevel(verbosity))
            .format(|buf, record| {
                let (traceback, set_intensity) = match record.level() {
                    Level::Error => (format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)), true),
                    _            => (String::new(), false),
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(set_intensity);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        // Progress bar support.
        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger)
            .try_init()
            .map_err(LoggerError::WrapProgress)?;
        INSTANCE.set(Self{multi_pg}).map_err(|_| LoggerError::AlreadyInitialized)
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    /// Shared `MultiProgress`, if the logger was initialized.
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Spinner counting processed items. Hidden when the logger is uninitialized, or when
    /// `info` messages are filtered out.
    pub fn spinner(message: &'static str) -> ProgressBar {
        let visible = log::max_level() >= LevelFilter::Info;
        let spinner = match (Self::multi(), visible) {
            (Some(multi), true) => multi.add(ProgressBar::new_spinner()),
            _                   => return ProgressBar::hidden(),
        };
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}: {human_pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}
