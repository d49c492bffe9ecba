//! # Logging モジュール
//!
//! 射撃諸元計算のログ出力を初期化します。
//!
//! 計算結果は標準出力に書き出すため、コンソール向けのログは標準エラー出力へ
//! 送ります。ファイル出力はtracing-appenderの非同期書き込みでJSON形式です。
//!
//! ## 設定可能な出力先
//!
//! - `Console`: 標準エラー出力のみ
//! - `File`: ファイルのみ（logs/navalcalc.YYYY-MM-DD）
//! - `Both`: 標準エラー出力とファイルの両方

use std::str::FromStr;
use tracing::{Level};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Registry,
};
use tracing_appender::{non_blocking, rolling};

/// ログ出力先の設定
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogOutput {
    /// コンソールのみ
    Console,
    /// ファイルのみ
    File,
    /// コンソールとファイルの両方
    Both,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "console" | "stdout" => Ok(LogOutput::Console),
            "file" => Ok(LogOutput::File),
            "both" | "all" => Ok(LogOutput::Both),
            _ => Err(format!("invalid log output: {}. available: console, file, both", s)),
        }
    }
}

/// ログ設定構造体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// ログレベル
    pub level: Level,
    /// 出力先
    pub output: LogOutput,
    /// ログファイルのディレクトリ（Fileまたは Bothの場合）
    pub log_dir: String,
    /// ログファイル名のプレフィックス
    pub file_prefix: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            output: LogOutput::Console,
            log_dir: "logs".to_string(),
            file_prefix: "navalcalc".to_string(),
        }
    }
}

impl LogConfig {
    /// `-v` の回数からログレベルを決定（0: WARN, 1: INFO, 2: DEBUG, 3以上: TRACE）
    pub fn level_from_verbosity(verbose_level: u8) -> Level {
        match verbose_level {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// ファイル出力を含むかどうか
    pub fn writes_file(&self) -> bool {
        matches!(self.output, LogOutput::File | LogOutput::Both)
    }
}

/// ログシステムを初期化
/// 
/// 指定された設定に基づいてtracing-subscriberを設定し、
/// 非同期ログ出力システムを初期化します。
/// 
/// # 引数
/// 
/// * `config` - ログ設定
/// 
/// # 戻り値
/// 
/// 初期化に成功した場合はOk(())、失敗した場合はエラー
/// 
/// # 例
/// 
/// ```rust,no_run
/// use navalcalc::logging::{LogConfig, LogOutput, init_logging};
/// use tracing::Level;
///
/// let config = LogConfig {
///     level: Level::DEBUG,
///     output: LogOutput::Both,
///     log_dir: "logs".to_string(),
///     file_prefix: "navalcalc".to_string(),
/// };
///
/// init_logging(config).expect("ログ初期化に失敗");
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    // 環境変数（RUST_LOG）またはconfigからログレベルを設定
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.level.to_string()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // 計算結果は標準出力に出すため、コンソールログは標準エラー出力へ
    let console_layer = matches!(config.output, LogOutput::Console | LogOutput::Both).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .compact()
    });

    // ファイル出力（非同期、JSON）
    let (file_layer, guard) = if config.writes_file() {
        ensure_log_directory(&config.log_dir)?;
        let file_appender = rolling::daily(&config.log_dir, &config.file_prefix);
        let (non_blocking_appender, guard) = non_blocking(file_appender);
        let layer = fmt::layer()
            .with_writer(non_blocking_appender)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .json();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    // guardをリークさせて非同期書き込みを維持
    if let Some(guard) = guard {
        std::mem::forget(guard);
    }

    Ok(())
}

/// ログレベルを文字列から解析
/// 
/// # 引数
/// 
/// * `level_str` - ログレベル文字列 ("trace", "debug", "info", "warn", "error")
/// 
/// # 戻り値
/// 
/// 解析されたログレベル、無効な場合はWARN
pub fn parse_log_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("warning: invalid log level '{}', using WARN", level_str);
            Level::WARN
        }
    }
}

/// ログディレクトリを作成
/// 
/// ファイル出力が指定されている場合、ログディレクトリが存在しない時に作成します。
/// 
/// # 引数
/// 
/// * `log_dir` - ログディレクトリパス
/// 
/// # 戻り値
/// 
/// ディレクトリ作成に成功した場合はOk(())、失敗した場合はエラー
pub fn ensure_log_directory(log_dir: &str) -> Result<(), std::io::Error> {
    std::fs::create_dir_all(log_dir)?;
    Ok(())
}
