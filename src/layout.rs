//! 라인 레이아웃 모듈
//!
//! syslog 라인을 필드로 나누는 문법을 정의합니다.
//! 구조 검증([`crate::validator`])과 레코드 생성([`crate::record`])은 오프셋을 직접
//! 다루지 않고 이 모듈의 [`LineLayout`]을 통해 필드를 얻습니다.
//!
//! # BSD 레이아웃
//! ```text
//! Mmm dd hh:mm:ss hostname process[pid]: message
//! 0  3  6 7      15 16
//! ```
//! 10일 미만의 날짜는 공백 한 칸 뒤에 숫자가 옵니다 (예: `Jan  5`).

/// 월 필드 이후 분리되는 최대 토큰 수 (day, time, hostname, service, message)
pub const FIELD_TOKENS: usize = 5;

/// 지원하는 라인 레이아웃
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineLayout {
    /// BSD syslog 고정 오프셋 레이아웃
    #[default]
    Bsd,
}

/// 구조 검증용 헤더 필드 (가공되지 않은 슬라이스)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields<'a> {
    pub month: &'a str,
    /// 앞 공백이 포함될 수 있음
    pub day: &'a str,
    pub time: &'a str,
    pub hostname: &'a str,
}

/// 레코드 생성용 의미 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub month: &'a str,
    pub day: &'a str,
    pub time: &'a str,
    pub hostname: &'a str,
    /// `process[pid]:` 토큰
    pub service: &'a str,
    /// 나머지 메시지 (내부 공백 유지)
    pub msg: &'a str,
}

impl LineLayout {
    /// 구조 검증에 필요한 헤더 필드를 추출합니다.
    ///
    /// 라인이 짧으면 해당 필드는 빈 문자열이 됩니다.
    pub fn header<'a>(&self, line: &'a str) -> HeaderFields<'a> {
        match self {
            LineLayout::Bsd => HeaderFields {
                month: char_slice(line, 0, Some(3)),
                day: char_slice(line, 3, Some(6)),
                time: char_slice(line, 7, Some(15)),
                hostname: char_slice(line, 16, None)
                    .split(' ')
                    .next()
                    .unwrap_or_default()
                    .trim(),
            },
        }
    }

    /// 라인을 의미 필드로 분리합니다.
    ///
    /// # Arguments
    /// * `line` - 구조 검증을 통과한 라인
    ///
    /// # Returns
    /// 분리된 필드 또는 토큰이 부족할 때의 사유
    pub fn split_fields<'a>(&self, line: &'a str) -> Result<LineFields<'a>, String> {
        match self {
            LineLayout::Bsd => {
                // 월은 고정 4글자, 나머지는 단일 공백 기준으로 최대 5개 토큰
                let month = char_slice(line, 0, Some(4)).trim();
                let tokens: Vec<&str> = char_slice(line, 4, None)
                    .trim()
                    .splitn(FIELD_TOKENS, ' ')
                    .collect();

                if tokens.len() < FIELD_TOKENS {
                    return Err(format!(
                        "expected {} fields after the month, found {}",
                        FIELD_TOKENS,
                        tokens.len()
                    ));
                }

                Ok(LineFields {
                    month,
                    day: tokens[0].trim(),
                    time: tokens[1].trim(),
                    hostname: tokens[2].trim(),
                    service: tokens[3].trim(),
                    msg: tokens[4].trim(),
                })
            }
        }
    }
}

/// 문자 단위 슬라이스 (범위를 벗어나면 잘라냄)
fn char_slice(s: &str, start: usize, end: Option<usize>) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    let from = byte_at(start);
    let to = end.map_or(s.len(), byte_at);

    if from >= to {
        ""
    } else {
        &s[from..to]
    }
}
