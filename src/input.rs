//! 입력 수집 모듈
//!
//! 입력 경로(또는 glob 패턴)를 파일 목록으로 펼치고, 모든 파일의 라인을
//! 처리 전에 하나의 버퍼로 읽어 들입니다.

use glob::glob;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Result, Syslog2JsonError};

/// 메모리 매핑을 사용할 파일 크기 임계값 (10MB)
pub const MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;

/// 버퍼링된 입력
#[derive(Debug, Default)]
pub struct InputBuffer {
    /// 입력 순서대로 이어 붙인 라인
    pub lines: Vec<String>,
    /// 읽어 들인 파일
    pub files: Vec<PathBuf>,
    /// 찾지 못한 입력 (경로 또는 패턴)
    pub missing: Vec<String>,
    /// 읽은 총 바이트
    pub bytes_read: u64,
}

impl InputBuffer {
    /// 처리할 라인이 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// glob 메타 문자가 포함되어 있는지 확인
fn is_pattern(spec: &str) -> bool {
    spec.contains(['*', '?', '['])
}

/// 입력 지정자를 파일 경로 목록으로 펼침
///
/// # Arguments
/// * `spec` - 파일 경로 또는 glob 패턴 (예: `/var/log/syslog*`)
///
/// # Returns
/// 경로 목록 (패턴이면 정렬된 일치 목록, 아니면 경로 하나)
pub fn expand_input(spec: &str) -> Result<Vec<PathBuf>> {
    let spec = spec.trim();

    if !is_pattern(spec) {
        return Ok(vec![PathBuf::from(spec)]);
    }

    let entries = glob(spec).map_err(|_| Syslog2JsonError::InvalidPattern {
        pattern: spec.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    Ok(paths)
}

/// 파일 하나의 라인 읽기
///
/// # Returns
/// (라인 목록, 파일 크기)
pub fn read_lines(path: &Path) -> Result<(Vec<String>, u64)> {
    let read_error = |reason: String| Syslog2JsonError::InputReadError {
        file: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| read_error(e.to_string()))?;
    let file_size = file.metadata().map(|m| m.len()).unwrap_or(0);

    let lines = if file_size >= MMAP_THRESHOLD {
        // 대용량 파일: 메모리 매핑 사용
        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| read_error(format!("메모리 매핑 실패: {}", e)))?
        };
        split_lines(&mmap)
    } else {
        let bytes = std::fs::read(path).map_err(|e| read_error(e.to_string()))?;
        split_lines(&bytes)
    };

    Ok((lines, file_size))
}

/// 바이트를 라인 단위로 분리 (잘못된 UTF-8은 대체 문자로)
fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// 모든 입력을 순서대로 읽어 하나의 버퍼로 수집
///
/// 존재하지 않는 파일은 경고만 남기고 건너뜁니다.
pub fn collect_input(specs: &[String]) -> Result<InputBuffer> {
    let mut buffer = InputBuffer::default();

    for spec in specs {
        let paths = expand_input(spec)?;

        if paths.is_empty() {
            warn!("No input file matches pattern {:?}", spec);
            buffer.missing.push(spec.clone());
            continue;
        }

        for path in paths {
            if !path.is_file() {
                warn!("Source file {:?} not found, skipped", path);
                buffer.missing.push(path.display().to_string());
                continue;
            }

            let (lines, size) = read_lines(&path)?;
            info!(
                file = %path.display(),
                lines = lines.len(),
                "Data import from file completed"
            );
            buffer.lines.extend(lines);
            buffer.bytes_read += size;
            buffer.files.push(path);
        }
    }

    Ok(buffer)
}
