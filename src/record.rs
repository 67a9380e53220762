//! 로그 레코드 생성 모듈
//!
//! 구조 검증을 통과한 라인을 필드로 분해하여 [`LogRecord`]를 생성합니다.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, Syslog2JsonError};
use crate::layout::LineLayout;

/// `creationTimestamp` 포맷 (12시간제 + AM/PM + UTC 오프셋)
pub const CREATION_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%I:%M:%S%p%z";

/// `process[pid]:` 패턴
static SERVICE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.*)\[([0-9]+)\]:$").expect("service pattern is a valid regex")
});

/// 프로세스 이름과 PID
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub process: String,
    /// PID가 없거나 형식이 잘못되면 0
    pub pid: u64,
}

/// 레코드의 `data` 필드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    pub month: String,
    pub day: String,
    /// syslog 형식에는 연도가 없으므로 항상 `null`
    pub year: Option<u16>,
    pub time: String,
    pub hostname: String,
    pub service: Vec<ServiceEntry>,
    pub msg: String,
}

/// 한 라인에서 생성된 로그 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// 입력 라인 번호 (1부터 시작)
    pub id: usize,
    /// 정규화된 원본 라인
    pub message: String,
    /// 레코드 생성 시각 (로그 자체의 시각이 아님)
    pub creation_timestamp: String,
    pub data: RecordData,
}

/// 라인으로부터 로그 레코드 생성 (BSD 레이아웃)
///
/// # Arguments
/// * `line_number` - 1부터 시작하는 라인 번호 (레코드 `id`가 됨)
/// * `total_lines` - 전체 라인 수
/// * `line` - 구조 검증을 통과한 정규화된 라인
///
/// # Returns
/// 생성된 `LogRecord` 또는 필드가 부족할 때 `Syslog2JsonError::Build`
pub fn build_record(line_number: usize, total_lines: usize, line: &str) -> Result<LogRecord> {
    build_record_with(LineLayout::Bsd, line_number, total_lines, line)
}

/// 지정한 레이아웃으로 로그 레코드 생성
pub fn build_record_with(
    layout: LineLayout,
    line_number: usize,
    total_lines: usize,
    line: &str,
) -> Result<LogRecord> {
    let fields = layout
        .split_fields(line)
        .map_err(|reason| Syslog2JsonError::Build {
            line: line_number,
            reason: format!("{} (line {} of {})", reason, line_number, total_lines),
        })?;

    Ok(LogRecord {
        id: line_number,
        message: line.to_string(),
        creation_timestamp: creation_timestamp(),
        data: RecordData {
            month: fields.month.to_string(),
            day: fields.day.to_string(),
            year: None,
            time: fields.time.to_string(),
            hostname: fields.hostname.to_string(),
            service: vec![parse_service(fields.service)],
            msg: fields.msg.to_string(),
        },
    })
}

/// `process[pid]:` 토큰에서 프로세스 이름과 PID 추출
///
/// 패턴이 맞지 않으면 콜론을 제거한 토큰 전체를 프로세스 이름으로, PID는 0으로 둡니다.
///
/// # Examples
/// ```
/// use syslog2json::record::parse_service;
///
/// let entry = parse_service("sshd[1234]:");
/// assert_eq!((entry.process.as_str(), entry.pid), ("sshd", 1234));
///
/// let entry = parse_service("sshd:");
/// assert_eq!((entry.process.as_str(), entry.pid), ("sshd", 0));
/// ```
pub fn parse_service(token: &str) -> ServiceEntry {
    let captured = SERVICE_PATTERN.captures(token).and_then(|caps| {
        let pid = caps.get(2)?.as_str().parse::<u64>().ok()?;
        Some(ServiceEntry {
            process: caps.get(1)?.as_str().to_string(),
            pid,
        })
    });

    captured.unwrap_or_else(|| ServiceEntry {
        process: token.replace(':', ""),
        pid: 0,
    })
}

/// 현재 로컬 시각을 `creationTimestamp` 포맷으로 반환
pub fn creation_timestamp() -> String {
    Local::now().format(CREATION_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_record_fields() {
        let line = "Jan  5 10:22:04 host1 sshd[101]: Accepted password";
        let record = build_record(1, 1, line).unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.message, line);
        assert_eq!(record.data.month, "Jan");
        assert_eq!(record.data.day, "5");
        assert_eq!(record.data.year, None);
        assert_eq!(record.data.time, "10:22:04");
        assert_eq!(record.data.hostname, "host1");
        assert_eq!(
            record.data.service,
            vec![ServiceEntry {
                process: "sshd".to_string(),
                pid: 101
            }]
        );
        assert_eq!(record.data.msg, "Accepted password");
    }

    #[test]
    fn test_build_record_too_few_tokens() {
        let result = build_record(7, 10, "Jan 15 10:22:04 host1 sshd:");

        match result {
            Err(Syslog2JsonError::Build { line, .. }) => assert_eq!(line, 7),
            other => panic!("expected build error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_service_variants() {
        assert_eq!(parse_service("kernel:").process, "kernel");
        assert_eq!(parse_service("CRON[12]:").pid, 12);

        // 대괄호가 있어도 숫자가 아니면 PID 없음으로 처리
        let entry = parse_service("app[abc]:");
        assert_eq!(entry.process, "app[abc]");
        assert_eq!(entry.pid, 0);

        // 콜론이 없으면 패턴 불일치
        let entry = parse_service("app[12]");
        assert_eq!(entry.process, "app[12]");
        assert_eq!(entry.pid, 0);
    }

    #[test]
    fn test_parse_service_nested_brackets() {
        let entry = parse_service("systemd[1][2]:");
        assert_eq!(entry.process, "systemd[1]");
        assert_eq!(entry.pid, 2);
    }

    #[test]
    fn test_serialized_shape() {
        let record = build_record(3, 3, "Feb 28 01:02:03 box su: session opened").unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("creationTimestamp").is_some());
        assert!(value["data"]["year"].is_null());
        assert_eq!(value["data"]["service"][0]["process"], "su");
        assert_eq!(value["data"]["service"][0]["pid"], 0);
    }

    #[test]
    fn test_creation_timestamp_format() {
        let ts = creation_timestamp();

        assert!(ts.contains('T'));
        assert!(ts.contains("AM") || ts.contains("PM"));
        let offset = &ts[ts.len() - 5..];
        assert!(offset.starts_with('+') || offset.starts_with('-'));
    }
}
