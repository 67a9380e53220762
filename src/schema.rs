//! JSON 스키마 검증 모듈
//!
//! `jsonschema` 크레이트를 감싸 레코드를 스키마로 검증합니다.
//! 스키마 자체를 불러오지 못하면 파이프라인은 실행 전체에서 검증을 끕니다.

use jsonschema::JSONSchema;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Result, Syslog2JsonError};
use crate::record::LogRecord;

/// 한 레코드에 대해 보고할 최대 스키마 에러 수
const MAX_REPORTED_ERRORS: usize = 8;

/// 컴파일된 JSON 스키마
pub struct SchemaValidator {
    compiled: JSONSchema,
    source: Option<PathBuf>,
}

impl SchemaValidator {
    /// 파일에서 스키마를 불러와 컴파일
    ///
    /// # Arguments
    /// * `path` - JSON 스키마 파일 경로
    ///
    /// # Returns
    /// 컴파일된 `SchemaValidator` 또는 스키마를 사용할 수 없는 에러
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Syslog2JsonError::SchemaNotFound {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|e| Syslog2JsonError::SchemaParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let schema: Value =
            serde_json::from_str(&text).map_err(|e| Syslog2JsonError::SchemaParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut validator = Self::from_value(&schema)?;
        validator.source = Some(path.to_path_buf());
        Ok(validator)
    }

    /// 이미 파싱된 스키마 값으로 생성
    pub fn from_value(schema: &Value) -> Result<Self> {
        let compiled =
            JSONSchema::compile(schema).map_err(|e| Syslog2JsonError::SchemaCompile {
                reason: e.to_string(),
            })?;

        Ok(Self {
            compiled,
            source: None,
        })
    }

    /// 스키마 파일 경로 (파일에서 불러온 경우)
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 레코드 검증
    ///
    /// # Returns
    /// 통과 시 `Ok(())`, 실패 시 에러 상세를 담은 `Syslog2JsonError::SchemaViolation`
    pub fn check(&self, record: &LogRecord) -> Result<()> {
        let instance =
            serde_json::to_value(record).map_err(|e| Syslog2JsonError::SerializeError {
                reason: e.to_string(),
            })?;

        let result = self.compiled.validate(&instance);

        match result {
            Ok(()) => Ok(()),
            Err(errors) => {
                let mut it = errors.into_iter();

                let mut shown = Vec::new();
                for error in it.by_ref().take(MAX_REPORTED_ERRORS) {
                    let location = error.instance_path.to_string();
                    let location = if location.is_empty() {
                        "/".to_string()
                    } else {
                        location
                    };
                    shown.push(format!("{} (at {})", error, location));
                }

                let more = it.count();
                let mut detail = shown.join("; ");
                if more > 0 {
                    detail.push_str(&format!(" … (+{more} more)"));
                }

                Err(Syslog2JsonError::SchemaViolation {
                    id: record.id,
                    detail,
                })
            }
        }
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::build_record;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn sample_record() -> LogRecord {
        build_record(1, 1, "Jan  5 10:22:04 host1 sshd[101]: Accepted password").unwrap()
    }

    #[test]
    fn test_permissive_schema_passes() {
        let validator = SchemaValidator::from_value(&json!({})).unwrap();
        assert!(validator.check(&sample_record()).is_ok());
    }

    #[test]
    fn test_violation_reports_detail() {
        let schema = json!({
            "type": "object",
            "properties": {
                "data": {
                    "type": "object",
                    "properties": { "hostname": { "maxLength": 3 } }
                }
            }
        });
        let validator = SchemaValidator::from_value(&schema).unwrap();

        match validator.check(&sample_record()) {
            Err(Syslog2JsonError::SchemaViolation { id, detail }) => {
                assert_eq!(id, 1);
                assert!(detail.contains("/data/hostname"));
            }
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_schema_does_not_compile() {
        let result = SchemaValidator::from_value(&json!({ "type": 12 }));

        let err = result.unwrap_err();
        assert!(err.is_schema_unavailable());
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchemaValidator::load("/nonexistent/validation.json").unwrap_err();

        assert!(matches!(err, Syslog2JsonError::SchemaNotFound { .. }));
        assert!(err.is_schema_unavailable());
    }

    #[test]
    fn test_load_broken_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("schema.json");
        fs::write(&path, "{ broken").unwrap();

        let err = SchemaValidator::load(&path).unwrap_err();
        assert!(matches!(err, Syslog2JsonError::SchemaParse { .. }));
    }

    #[test]
    fn test_bundled_schema_accepts_record() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("validation.json");
        let validator = SchemaValidator::load(&path).unwrap();

        assert_eq!(validator.source(), Some(path.as_path()));
        assert!(validator.check(&sample_record()).is_ok());
    }
}
