//! syslog2json - SYSLOG TO JSON CONVERTER
//!
//! BSD 형식 syslog 라인을 검증하여 구조화된 레코드로 만들고,
//! 모든 레코드를 하나의 JSON 문서로 모으는 CLI 도구입니다.
//!
//! # 처리 흐름
//!
//! 1. **정규화**: 앞뒤 공백 제거, raw 이스케이프, `"` → `'`
//! 2. **구조 검증**: 월 / 일 / 시간 / 호스트명 고정 위치 검사
//! 3. **레코드 생성**: 필드 분해, 프로세스 이름과 PID 추출
//! 4. **스키마 검증** (선택): 실패한 레코드도 출력에 포함하고 라인 번호만 기록
//!
//! 한 라인의 실패는 나머지 라인 처리에 영향을 주지 않습니다.
//!
//! # 예제
//!
//! ```
//! use syslog2json::{Pipeline, PipelineOptions};
//!
//! let pipeline = Pipeline::new(PipelineOptions::new());
//! let report = pipeline.run(&["Jan  5 10:22:04 host1 sshd[101]: Accepted password", ""]);
//!
//! assert_eq!(report.records.len(), 1);
//! assert_eq!(report.records[0].data.service[0].pid, 101);
//! assert_eq!(report.skipped_lines, vec![2]);
//! ```

pub mod cli;
pub mod error;
pub mod input;
pub mod layout;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod schema;
pub mod stats;
pub mod validator;

// Re-exports for convenient access
pub use cli::Args;
pub use error::{Result, Syslog2JsonError};
pub use layout::LineLayout;
pub use pipeline::{LineOutcome, LineProgress, Pipeline, PipelineOptions, ProcessingReport};
pub use record::{build_record, LogRecord, RecordData, ServiceEntry};
pub use schema::SchemaValidator;
pub use stats::{format_bytes, Statistics};
pub use validator::{validate_line, ValidationOutcome};
