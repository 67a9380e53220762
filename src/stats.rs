//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::pipeline::ProcessingReport;

/// 처리 통계 구조체
#[derive(Debug, Default)]
pub struct Statistics {
    /// 입력 라인 수
    pub total_lines: usize,
    /// 실제로 처리한 라인 수
    pub processed_lines: usize,
    /// 생성된 레코드 수
    pub records: usize,
    /// 제외된 라인 수
    pub skipped: usize,
    /// 스키마 검증 실패 수
    pub schema_errors: usize,
    /// 읽은 총 바이트
    pub bytes_read: u64,
    /// 쓴 총 바이트
    pub bytes_written: u64,
    /// 처리 시작 시간
    start_time: Option<Instant>,
    /// 처리 종료 시간
    end_time: Option<Instant>,
}

impl Statistics {
    /// 새 통계 인스턴스 생성 (시작 시간 기록)
    pub fn new(total_lines: usize) -> Self {
        Self {
            total_lines,
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// 파이프라인 결과 반영 (종료 시간 기록)
    pub fn absorb(&mut self, report: &ProcessingReport) {
        self.processed_lines = report.lines_processed;
        self.records = report.records.len();
        self.skipped = report.skipped_count();
        self.schema_errors = report.schema_error_lines.len();
        self.end_time = Some(Instant::now());
    }

    /// 읽은 바이트 추가
    pub fn add_bytes_read(&mut self, bytes: u64) {
        self.bytes_read += bytes;
    }

    /// 쓴 바이트 추가
    pub fn add_bytes_written(&mut self, bytes: u64) {
        self.bytes_written += bytes;
    }

    /// 입력 라인 중 레코드가 되지 않은 수 (중단 시 미처리 라인 포함)
    pub fn entries_skipped(&self) -> usize {
        self.total_lines.saturating_sub(self.records)
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// 라인당 평균 처리 시간 (ms)
    pub fn average_ms_per_line(&self) -> Option<f64> {
        if self.processed_lines == 0 {
            return None;
        }
        Some(self.elapsed().as_secs_f64() * 1000.0 / self.processed_lines as f64)
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 처리 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 라인:    {}",
            "📄".bright_cyan(),
            self.total_lines
        );
        println!(
            "  {} 레코드:       {}",
            "✅".bright_green(),
            self.records.to_string().green()
        );

        let skipped = self.entries_skipped();
        if skipped > 0 {
            println!(
                "  {} 건너뜀:       {}",
                "⚠️".bright_yellow(),
                skipped.to_string().yellow()
            );
        } else {
            println!("  {} 건너뜀:       {}", "✅".bright_green(), "0".green());
        }

        if self.schema_errors > 0 {
            println!(
                "  {} 스키마 오류:  {}",
                "❌".bright_red(),
                self.schema_errors.to_string().red()
            );
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(self.bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.bytes_written)
        );

        if self.total_lines > 0 {
            let success_rate = (self.records as f64 / self.total_lines as f64) * 100.0;
            println!(
                "  {} 변환율:       {:.1}%",
                "📈".bright_white(),
                success_rate
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_duration(self.elapsed())
        );

        if let Some(avg) = self.average_ms_per_line() {
            println!("  {} 라인당 평균:  {:.4}ms", "⏱️".bright_cyan(), avg);
        }

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Arguments
/// * `bytes` - 바이트 수
///
/// # Returns
/// 형식화된 문자열 (예: "1.25 MB")
///
/// # Examples
/// ```
/// use syslog2json::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// 경과 시간을 읽기 쉬운 형식으로 변환
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}시간 {}분", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        format!("{}분 {}초", mins, remaining_secs)
    } else if secs > 0 {
        format!("{}.{:03}초", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}
