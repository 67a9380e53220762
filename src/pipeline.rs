//! 라인 처리 파이프라인 모듈
//!
//! 입력 라인을 순서대로 정규화 → 구조 검증 → 레코드 생성 → (선택) 스키마 검증하여
//! [`ProcessingReport`]에 모읍니다. 한 라인의 실패가 나머지 라인 처리를 막지 않으며,
//! 모든 라인 단위 에러는 이 모듈 안에서 복구됩니다.

use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

use crate::error::{Result, Syslog2JsonError};
use crate::layout::LineLayout;
use crate::normalize::normalize_line;
use crate::record::{build_record_with, LogRecord};
use crate::schema::SchemaValidator;
use crate::validator::{validate_line_with, ValidationOutcome};

/// 파이프라인 옵션
#[derive(Debug, Default)]
pub struct PipelineOptions {
    /// 스키마 검증기 (None이면 검증 생략)
    pub schema: Option<SchemaValidator>,
    /// 라인 레이아웃
    pub layout: LineLayout,
}

impl PipelineOptions {
    /// 기본 옵션 생성 (스키마 검증 없음, BSD 레이아웃)
    pub fn new() -> Self {
        Self::default()
    }

    /// 스키마 검증기 설정
    pub fn with_schema(mut self, schema: Option<SchemaValidator>) -> Self {
        self.schema = schema;
        self
    }

    /// 스키마 파일을 불러와 설정
    ///
    /// 불러오기에 실패하면 경고를 남기고 실행 전체에서 검증을 끕니다.
    pub fn with_schema_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.schema = match SchemaValidator::load(path) {
            Ok(validator) => {
                info!(schema = %path.display(), "Schema file successfully imported");
                Some(validator)
            }
            Err(e) => {
                error!("Error while importing schema file: {}", e);
                warn!("Output JSON file verification disabled.");
                None
            }
        };
        self
    }

    /// 레이아웃 설정
    pub fn with_layout(mut self, layout: LineLayout) -> Self {
        self.layout = layout;
        self
    }

    /// 스키마 검증 활성화 여부
    pub fn schema_enabled(&self) -> bool {
        self.schema.is_some()
    }
}

/// 라인이 출력에서 제외된 사유
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 빈 라인 또는 공백만 있는 라인
    Blank,
    /// 구조 검증 실패
    Structural(ValidationOutcome),
    /// 구조 검증은 통과했지만 레코드 생성 실패
    Build(String),
}

/// 단일 라인 처리 결과
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// 레코드 생성됨 (스키마 검증 실패 시에도 출력에 포함)
    Recorded {
        record: LogRecord,
        schema_error: Option<String>,
    },
    /// 출력에서 제외됨
    Skipped(SkipReason),
}

/// 라인별 진행 상황
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineProgress {
    pub line_number: usize,
    pub total_lines: usize,
    /// 완료율 (0~100)
    pub percent: u8,
}

/// 출력 JSON 문서 (`{"syslog": [...]}`)
#[derive(Debug, Serialize)]
pub struct SyslogDocument<'a> {
    pub syslog: &'a [LogRecord],
}

/// 파이프라인 실행 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingReport {
    /// 생성된 레코드 (입력 순서)
    pub records: Vec<LogRecord>,
    /// 스키마 검증에 실패한 라인 번호
    pub schema_error_lines: Vec<usize>,
    /// 출력에서 제외된 라인 번호
    pub skipped_lines: Vec<usize>,
    /// 처리를 마친 마지막 라인 번호
    pub lines_processed: usize,
    /// 인터럽트로 중단되었는지 여부
    pub interrupted: bool,
}

impl ProcessingReport {
    /// 제외된 라인 수
    pub fn skipped_count(&self) -> usize {
        self.skipped_lines.len()
    }

    /// 출력 문서 뷰
    pub fn document(&self) -> SyslogDocument<'_> {
        SyslogDocument {
            syslog: &self.records,
        }
    }

    /// 출력 문서를 JSON 문자열로 직렬화
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let document = self.document();
        if pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        }
        .map_err(|e| Syslog2JsonError::SerializeError {
            reason: e.to_string(),
        })
    }

    /// 출력 문서를 writer에 기록
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        let document = self.document();
        if pretty {
            serde_json::to_writer_pretty(writer, &document)
        } else {
            serde_json::to_writer(writer, &document)
        }
        .map_err(|e| Syslog2JsonError::WriteError {
            reason: e.to_string(),
        })
    }
}

/// 완료율 계산: `round(current * 100 / total)` (반올림 시 짝수 쪽)
///
/// # Examples
/// ```
/// use syslog2json::pipeline::completion_percent;
///
/// assert_eq!(completion_percent(1, 3), 33);
/// assert_eq!(completion_percent(1, 8), 12);
/// assert_eq!(completion_percent(4, 4), 100);
/// ```
pub fn completion_percent(current: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (current as f64 * 100.0 / total as f64).round_ties_even();
    percent.clamp(0.0, 100.0) as u8
}

/// 라인 처리 파이프라인
#[derive(Debug, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// 새 파이프라인 생성
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// 파이프라인 옵션
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// 전체 라인 처리
    pub fn run<S: AsRef<str>>(&self, lines: &[S]) -> ProcessingReport {
        let never = AtomicBool::new(false);
        self.run_with(lines, &never, |_| {})
    }

    /// 중단 플래그와 진행 콜백을 받아 전체 라인 처리
    ///
    /// # Arguments
    /// * `lines` - 버퍼링된 입력 라인 (줄바꿈 제거됨)
    /// * `cancel` - 설정되면 다음 라인 경계에서 중단
    /// * `on_progress` - 라인 하나를 마칠 때마다 호출
    ///
    /// # Returns
    /// 중단 여부와 관계없이 항상 유효한 `ProcessingReport`
    pub fn run_with<S, F>(
        &self,
        lines: &[S],
        cancel: &AtomicBool,
        mut on_progress: F,
    ) -> ProcessingReport
    where
        S: AsRef<str>,
        F: FnMut(LineProgress),
    {
        let total_lines = lines.len();
        let mut report = ProcessingReport::default();

        for (idx, raw) in lines.iter().enumerate() {
            let line_number = idx + 1;

            if cancel.load(Ordering::SeqCst) {
                warn!(line = line_number, "Processing interrupted before line {}", line_number);
                report.interrupted = true;
                break;
            }

            match self.process_line(line_number, total_lines, raw.as_ref()) {
                LineOutcome::Recorded {
                    record,
                    schema_error,
                } => {
                    if schema_error.is_some() {
                        report.schema_error_lines.push(line_number);
                    }
                    report.records.push(record);
                }
                LineOutcome::Skipped(_) => report.skipped_lines.push(line_number),
            }

            report.lines_processed = line_number;
            on_progress(LineProgress {
                line_number,
                total_lines,
                percent: completion_percent(line_number, total_lines),
            });
        }

        report
    }

    /// 단일 라인 처리
    ///
    /// Pending → (Rejected | Validated) → Built → (SchemaChecked | SchemaSkipped)
    pub fn process_line(&self, line_number: usize, total_lines: usize, raw: &str) -> LineOutcome {
        let width = total_lines.to_string().len();
        info!("Row {:>width$} of {}", line_number, total_lines);

        if raw.trim().is_empty() {
            info!("Row {:>width$} processed with an error", line_number);
            error!("Empty `null` line in input file! Line number: {}", line_number);
            return LineOutcome::Skipped(SkipReason::Blank);
        }

        let line = normalize_line(raw);

        let outcome = validate_line_with(self.options.layout, &line);
        if !outcome.is_valid() {
            info!(
                "Log entry does not have the correct structure! Row# {}.",
                line_number
            );
            error!("Record structure error: `{:?}`", outcome.messages);
            error!("Error number: {}", outcome.failure_count);
            info!("Skip processing line {}", line_number);
            return LineOutcome::Skipped(SkipReason::Structural(outcome));
        }

        let record = match build_record_with(self.options.layout, line_number, total_lines, &line)
        {
            Ok(record) => record,
            Err(e) => {
                error!("{}", e);
                info!("Skip processing line {}", line_number);
                return LineOutcome::Skipped(SkipReason::Build(e.to_string()));
            }
        };

        let schema_error = match &self.options.schema {
            Some(schema) => match schema.check(&record) {
                Ok(()) => {
                    info!("JSON data in line {} is verified", line_number);
                    info!("Row {:>width$} processed successfully", line_number);
                    None
                }
                Err(e) => {
                    let detail = match e {
                        Syslog2JsonError::SchemaViolation { detail, .. } => detail,
                        other => other.to_string(),
                    };
                    error!("Data on line {} contains an error!", line_number);
                    error!("Error details:\n{}", detail);
                    warn!("Row {:>width$} processed with error!", line_number);
                    Some(detail)
                }
            },
            None => {
                info!("Row {:>width$} processing completed", line_number);
                None
            }
        };

        LineOutcome::Recorded {
            record,
            schema_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ServiceEntry;
    use crate::validator::MSG_HOSTNAME_CHARS;
    use serde_json::json;

    const GOOD: &str = "Jan  5 10:22:04 host1 sshd[101]: Accepted password";

    fn strict_hostname_schema() -> SchemaValidator {
        SchemaValidator::from_value(&json!({
            "properties": {
                "data": { "properties": { "hostname": { "const": "host1" } } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_single_good_line() {
        let report = Pipeline::default().run(&[GOOD]);

        assert_eq!(report.records.len(), 1);
        let data = &report.records[0].data;
        assert_eq!(data.month, "Jan");
        assert_eq!(data.day, "5");
        assert_eq!(data.time, "10:22:04");
        assert_eq!(data.hostname, "host1");
        assert_eq!(
            data.service,
            vec![ServiceEntry {
                process: "sshd".to_string(),
                pid: 101
            }]
        );
        assert_eq!(data.msg, "Accepted password");
        assert!(report.schema_error_lines.is_empty());
    }

    #[test]
    fn test_blank_line_skipped() {
        let pipeline = Pipeline::default();

        assert_eq!(
            pipeline.process_line(1, 1, ""),
            LineOutcome::Skipped(SkipReason::Blank)
        );

        let report = pipeline.run(&["", "  \t"]);
        assert!(report.records.is_empty());
        assert_eq!(report.skipped_lines, vec![1, 2]);
    }

    #[test]
    fn test_invalid_hostname_skipped() {
        let outcome =
            Pipeline::default().process_line(1, 1, "Jan  5 10:22:04 ho$t1 sshd[101]: x");

        match outcome {
            LineOutcome::Skipped(SkipReason::Structural(v)) => {
                assert_eq!(v.messages, vec![MSG_HOSTNAME_CHARS.to_string()]);
            }
            other => panic!("expected structural skip, got {:?}", other),
        }
    }

    #[test]
    fn test_build_error_is_recovered() {
        let lines = ["Jan 15 10:22:04 host1 sshd:", GOOD];
        let report = Pipeline::default().run(&lines);

        assert_eq!(report.skipped_lines, vec![1]);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].id, 2);
    }

    #[test]
    fn test_ids_follow_line_numbers() {
        let lines = [GOOD, "", "garbage", GOOD];
        let report = Pipeline::default().run(&lines);

        let ids: Vec<usize> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.lines_processed, 4);
    }

    #[test]
    fn test_schema_failure_keeps_record() {
        let options = PipelineOptions::new().with_schema(Some(strict_hostname_schema()));
        let pipeline = Pipeline::new(options);
        let lines = [GOOD, "Jan  5 10:22:04 other sshd[7]: x"];

        let report = pipeline.run(&lines);

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.schema_error_lines, vec![2]);
    }

    #[test]
    fn test_unavailable_schema_disables_validation() {
        let options = PipelineOptions::new().with_schema_file("/nonexistent/validation.json");
        assert!(!options.schema_enabled());

        let pipeline = Pipeline::new(options);
        let report = pipeline.run(&[GOOD, GOOD]);

        assert_eq!(report.records.len(), 2);
        assert!(report.schema_error_lines.is_empty());
    }

    #[test]
    fn test_quotes_normalized() {
        let report = Pipeline::default().run(&["Jan  5 10:22:04 host1 app: say \"hi\""]);

        assert_eq!(report.records[0].data.msg, "say 'hi'");
        assert!(!report.records[0].message.contains('"'));
    }

    #[test]
    fn test_idempotent_except_timestamp() {
        let lines = [GOOD, "", "Feb 29 00:00:01 db-2 postgres[9]: ready"];
        let pipeline = Pipeline::default();

        let strip = |report: ProcessingReport| -> Vec<LogRecord> {
            report
                .records
                .into_iter()
                .map(|mut r| {
                    r.creation_timestamp.clear();
                    r
                })
                .collect()
        };

        assert_eq!(strip(pipeline.run(&lines)), strip(pipeline.run(&lines)));
    }

    #[test]
    fn test_cancel_stops_at_line_boundary() {
        let lines = [GOOD, GOOD, GOOD];
        let cancel = AtomicBool::new(false);
        let pipeline = Pipeline::default();

        let report = pipeline.run_with(&lines, &cancel, |progress| {
            if progress.line_number == 2 {
                cancel.store(true, Ordering::SeqCst);
            }
        });

        assert!(report.interrupted);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.lines_processed, 2);
    }

    #[test]
    fn test_progress_percentages() {
        let lines = [GOOD; 8];
        let mut seen = Vec::new();

        Pipeline::default().run_with(&lines, &AtomicBool::new(false), |p| {
            seen.push(p.percent)
        });

        assert_eq!(seen, vec![12, 25, 38, 50, 62, 75, 88, 100]);
    }

    #[test]
    fn test_document_shape() {
        let report = Pipeline::default().run(&[GOOD]);
        let value: serde_json::Value =
            serde_json::from_str(&report.to_json(false).unwrap()).unwrap();

        assert_eq!(value["syslog"].as_array().unwrap().len(), 1);
        assert!(value["syslog"][0]["data"]["year"].is_null());

        let pretty = report.to_json(true).unwrap();
        assert!(pretty.contains("\n  \"syslog\""));
    }
}
