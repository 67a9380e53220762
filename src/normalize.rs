//! 라인 정규화 모듈
//!
//! 검증 전에 각 라인을 raw 문자열로 이스케이프하고
//! 큰따옴표를 작은따옴표로 바꿉니다.

use std::fmt::Write;

/// 라인 정규화: 앞뒤 공백 제거 → raw 이스케이프 → `"`를 `'`로 치환
///
/// # Examples
/// ```
/// use syslog2json::normalize::normalize_line;
///
/// assert_eq!(normalize_line("  say \"hi\"\t\n"), "say 'hi'");
/// assert_eq!(normalize_line("a\tb\\c"), "a\\tb\\\\c");
/// ```
pub fn normalize_line(line: &str) -> String {
    escape_raw(line.trim()).replace('"', "'")
}

/// 제어 문자, 백슬래시, 비 ASCII 문자를 이스케이프 시퀀스로 변환
///
/// - `\\`, `\t`, `\n`, `\r`은 두 글자 시퀀스로
/// - 그 외 0x20 미만 및 0x7f~0xff는 `\xhh`
/// - 0x100~0xffff는 `\uhhhh`, 그 이상은 `\Uhhhhhhhh`
pub fn escape_raw(s: &str) -> String {
    let mut out = String::with_capacity(s.len());

    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ' '..='\u{7e}' => out.push(c),
            c if (c as u32) <= 0xff => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if (c as u32) <= 0xffff => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(out, "\\U{:08x}", c as u32);
            }
        }
    }

    out
}
