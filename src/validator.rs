//! 라인 구조 검증 모듈
//!
//! syslog 라인의 고정 위치 필드(월, 일, 시간, 호스트명)를 검사합니다.
//! 각 검사는 독립적으로 수행되며 하나가 실패해도 나머지 검사는 계속됩니다.
//! 단, 호스트명 검사는 단계별로 진행되어 첫 실패에서 호스트명 검사만 중단됩니다.

use chrono::NaiveTime;

use crate::layout::LineLayout;

/// 유효한 월 약어
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 호스트명 최대 길이 (미만이어야 함)
pub const HOSTNAME_MAX_LEN: usize = 63;

pub const MSG_EMPTY_LINE: &str = "Empty line!";
pub const MSG_MONTH: &str = "Month value error!";
pub const MSG_DAY: &str = "Invalid day of the month!";
pub const MSG_TIME: &str = "Wrong time format!";
pub const MSG_HOSTNAME_EMPTY: &str = "Incorrect hostname value!";
pub const MSG_HOSTNAME_LENGTH: &str = "Incorrect hostname lenght `> 63 chars`!";
pub const MSG_HOSTNAME_CHARS: &str = "Hostname contains an invalid character(s)!";
pub const MSG_HOSTNAME_FIRST_CHAR: &str =
    "1st character in the hostname must be a alphabet letter (a-zA-Z)!";

/// 구조 검증 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// 실패한 검사 수
    pub failure_count: usize,
    /// 수행된 검사 수
    pub total_checks: usize,
    /// 실패 메시지 (검사 순서대로)
    pub messages: Vec<String>,
}

impl ValidationOutcome {
    /// 검사 결과 기록
    fn check(&mut self, passed: bool, message: &str) -> bool {
        self.total_checks += 1;
        if !passed {
            self.failure_count += 1;
            self.messages.push(message.to_string());
        }
        passed
    }

    /// 구조적으로 유효한 라인인지 확인
    pub fn is_valid(&self) -> bool {
        self.failure_count == 0
    }

    /// 실패 메시지를 한 줄로 연결
    pub fn joined_messages(&self) -> String {
        self.messages.join(" ")
    }
}

/// BSD 레이아웃으로 라인 구조 검증
///
/// # Examples
/// ```
/// use syslog2json::validator::validate_line;
///
/// let outcome = validate_line("Jan  5 10:22:04 host1 sshd[101]: Accepted password");
/// assert!(outcome.is_valid());
/// ```
pub fn validate_line(line: &str) -> ValidationOutcome {
    validate_line_with(LineLayout::Bsd, line)
}

/// 지정한 레이아웃으로 라인 구조 검증
///
/// # Arguments
/// * `layout` - 필드 추출에 사용할 레이아웃
/// * `line` - 줄바꿈 문자가 제거된 라인
///
/// # Returns
/// 실패 수, 검사 수, 실패 메시지를 담은 `ValidationOutcome`
pub fn validate_line_with(layout: LineLayout, line: &str) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    if line.trim().is_empty() {
        outcome.check(false, MSG_EMPTY_LINE);
        return outcome;
    }

    let header = layout.header(line);

    outcome.check(is_valid_month(header.month), MSG_MONTH);
    outcome.check(is_valid_day(header.day), MSG_DAY);
    outcome.check(is_valid_time(header.time), MSG_TIME);
    check_hostname(&mut outcome, header.hostname);

    outcome
}

/// 월 약어 검사 (첫 글자 대문자, 나머지 소문자)
fn is_valid_month(month: &str) -> bool {
    MONTHS.contains(&month)
}

/// 1~31 범위의 날짜인지 검사 (숫자가 아니면 실패)
fn is_valid_day(day: &str) -> bool {
    day.trim()
        .parse::<u32>()
        .map(|d| (1..=31).contains(&d))
        .unwrap_or(false)
}

/// 24시간 형식 `HH:MM:SS` 검사
fn is_valid_time(time: &str) -> bool {
    NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok()
}

/// 호스트명 단계별 검사 (RFC 1123 라벨 규칙 기반)
fn check_hostname(outcome: &mut ValidationOutcome, hostname: &str) {
    let length = hostname.chars().count();

    if !outcome.check(length > 0, MSG_HOSTNAME_EMPTY) {
        return;
    }
    if !outcome.check(length < HOSTNAME_MAX_LEN, MSG_HOSTNAME_LENGTH) {
        return;
    }
    if !outcome.check(
        hostname.chars().all(|c| c.is_alphanumeric() || c == '-'),
        MSG_HOSTNAME_CHARS,
    ) {
        return;
    }
    outcome.check(
        hostname.chars().next().is_some_and(char::is_alphabetic),
        MSG_HOSTNAME_FIRST_CHAR,
    );
}
