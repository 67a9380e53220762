//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// syslog2json CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "syslog2json",
    author = "YourName <your@email.com>",
    version,
    disable_version_flag = true,
    about = "SYSLOG TO JSON CONVERTER - BSD syslog 파일을 검증하여 JSON 문서로 변환하는 CLI 도구",
    long_about = r#"
SYSLOG TO JSON CONVERTER
========================

BSD 형식 syslog 파일의 각 라인을 구조 검증한 뒤
하나의 JSON 문서 ({"syslog": [...]})로 변환합니다.

특징:
  • 월/일/시간/호스트명 구조 검증
  • 프로세스 이름과 PID 추출
  • JSON 스키마를 이용한 출력 레코드 검증
  • 진행률 표시 및 처리 통계
  • 라인별 상세 로그 (작업 폴더의 syslogexport.log)

예제:
  syslog2json
  syslog2json -i /var/log/syslog /var/log/syslog.1 -o result.json
  syslog2json -i "/var/log/syslog*" -d ./out --format-json
  syslog2json -i ./auth.log --no-verify --no-progress
"#
)]
pub struct Args {
    /// 입력 syslog 파일 경로 (여러 개 또는 glob 패턴 가능)
    #[arg(
        short = 'i',
        long = "inlog",
        value_name = "LOGFILE",
        num_args = 1..,
        default_value = "/var/log/syslog"
    )]
    pub inputs: Vec<String>,

    /// 출력 JSON 파일 이름 (작업 폴더 기준)
    #[arg(
        short = 'o',
        long = "outjson",
        value_name = "OUTJSON",
        default_value = "syslog.json"
    )]
    pub output: String,

    /// 출력 JSON 파일과 로그 파일이 생성될 작업 폴더
    #[arg(short = 'd', long = "workdir", value_name = "DIR", default_value = "/tmp")]
    pub workdir: PathBuf,

    /// 진행률 바 표시 안 함
    #[arg(short = 'n', long)]
    pub no_progress: bool,

    /// 들여쓰기된 JSON 출력 (기본값: 압축)
    #[arg(short = 'f', long)]
    pub format_json: bool,

    /// JSON 스키마 파일 경로
    #[arg(
        short = 's',
        long,
        value_name = "JSONSCHEMA",
        default_value = "validation.json"
    )]
    pub schema: PathBuf,

    /// 출력 JSON 스키마 검증 안 함
    #[arg(short = 'c', long)]
    pub no_verify: bool,

    /// 버전 출력
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl Args {
    /// 출력 JSON 파일 전체 경로
    pub fn output_path(&self) -> PathBuf {
        self.workdir.join(&self.output)
    }

    /// 스키마 검증 요청 여부
    pub fn verify_enabled(&self) -> bool {
        !self.no_verify
    }

    /// 진행률 바 표시 여부
    pub fn show_progress(&self) -> bool {
        !self.no_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["syslog2json"]);

        assert_eq!(args.inputs, vec!["/var/log/syslog".to_string()]);
        assert_eq!(args.output_path(), PathBuf::from("/tmp/syslog.json"));
        assert!(args.verify_enabled());
        assert!(args.show_progress());
        assert!(!args.format_json);
        assert_eq!(args.schema, PathBuf::from("validation.json"));
    }

    #[test]
    fn test_multiple_inputs_and_flags() {
        let args = Args::parse_from([
            "syslog2json",
            "-i",
            "a.log",
            "b.log",
            "-o",
            "out.json",
            "-d",
            "./work",
            "-n",
            "-f",
            "-c",
        ]);

        assert_eq!(args.inputs, vec!["a.log".to_string(), "b.log".to_string()]);
        assert_eq!(args.output_path(), PathBuf::from("./work/out.json"));
        assert!(!args.show_progress());
        assert!(args.format_json);
        assert!(!args.verify_enabled());
    }

    #[test]
    fn test_version_short_flag() {
        let err = Args::try_parse_from(["syslog2json", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
