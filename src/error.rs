//! 에러 타입 정의 모듈
//!
//! syslog2json에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! 라인 단위 에러(`Build`, `SchemaViolation`)는 파이프라인 내부에서 복구되며
//! 호출자에게 전파되지 않습니다.

use std::path::PathBuf;
use thiserror::Error;

/// syslog2json에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum Syslog2JsonError {
    /// 출력 폴더가 존재하지 않음
    #[error("출력 폴더를 찾을 수 없습니다: {path}")]
    WorkdirNotFound { path: PathBuf },

    /// 출력 폴더에 쓰기 권한 없음
    #[error("출력 폴더에 쓰기 권한이 없습니다: {path}")]
    WorkdirNotWritable { path: PathBuf },

    /// 입력 파일 읽기 실패
    #[error("파일을 읽을 수 없습니다 ({file}): {reason}")]
    InputReadError { file: PathBuf, reason: String },

    /// 유효하지 않은 입력 패턴
    #[error("유효하지 않은 입력 패턴: {pattern}")]
    InvalidPattern { pattern: String },

    /// 스키마 파일 없음
    #[error("스키마 파일을 찾을 수 없습니다: {path}")]
    SchemaNotFound { path: PathBuf },

    /// 스키마 JSON 파싱 실패
    #[error("스키마 파싱 실패 ({path}): {reason}")]
    SchemaParse { path: PathBuf, reason: String },

    /// 스키마 컴파일 실패 (유효하지 않은 JSON 스키마)
    #[error("스키마 컴파일 실패: {reason}")]
    SchemaCompile { reason: String },

    /// 레코드가 스키마 검증에 실패
    #[error("레코드 {id} 스키마 검증 실패: {detail}")]
    SchemaViolation { id: usize, detail: String },

    /// 구조 검증은 통과했지만 필드 분해에 실패
    #[error("라인 {line} 레코드 생성 실패: {reason}")]
    Build { line: usize, reason: String },

    /// JSON 직렬화 실패
    #[error("JSON 직렬화 실패: {reason}")]
    SerializeError { reason: String },

    /// 파일 쓰기 실패
    #[error("파일 쓰기 실패: {reason}")]
    WriteError { reason: String },
}

impl Syslog2JsonError {
    /// 스키마를 사용할 수 없는 에러인지 확인 (실행 전체에서 검증 비활성화 대상)
    pub fn is_schema_unavailable(&self) -> bool {
        matches!(
            self,
            Syslog2JsonError::SchemaNotFound { .. }
                | Syslog2JsonError::SchemaParse { .. }
                | Syslog2JsonError::SchemaCompile { .. }
        )
    }
}

/// syslog2json 결과 타입 별칭
pub type Result<T> = std::result::Result<T, Syslog2JsonError>;
