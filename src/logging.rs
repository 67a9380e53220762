//! 진단 로그 초기화 모듈
//!
//! `tracing-subscriber`로 라인별 처리 로그를 작업 폴더의 로그 파일에 기록합니다.
//! 로그 레벨은 `RUST_LOG` 환경 변수로 덮어쓸 수 있습니다 (기본값 `info`).

use anyhow::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// 작업 폴더에 생성되는 로그 파일 이름
pub const LOG_FILE_NAME: &str = "syslogexport.log";

/// 기본 로그 레벨
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// 로그 파일 경로
pub fn log_file_path(workdir: &Path) -> PathBuf {
    workdir.join(LOG_FILE_NAME)
}

/// 전역 tracing subscriber 초기화
///
/// 실행마다 로그 파일을 새로 만들며, 한 번만 호출해야 합니다.
///
/// # Arguments
/// * `workdir` - 로그 파일이 생성될 폴더
///
/// # Returns
/// 생성된 로그 파일 경로
pub fn init_logging(workdir: &Path) -> Result<PathBuf> {
    let path = log_file_path(workdir);
    let file = File::create(&path)
        .map_err(|e| anyhow::anyhow!("failed to create log file {:?}: {}", path, e))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?;

    Ok(path)
}
