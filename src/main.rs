//! syslog2json - SYSLOG TO JSON CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use syslog2json::{
    cli::Args,
    error::Syslog2JsonError,
    input::{collect_input, InputBuffer},
    logging::init_logging,
    pipeline::{Pipeline, PipelineOptions, ProcessingReport},
    stats::Statistics,
};

/// 화면에 표시하는 시각 포맷
const CLOCK_FORMAT: &str = "%Y-%m-%d@%I:%M:%S%p%z";

/// 인터럽트 시 종료 코드 (SIGINT)
const INTERRUPT_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let args = Args::parse();

    // 작업 폴더 확인
    validate_workdir(&args.workdir)?;

    // 헤더 출력
    print_header(&args);

    // 인터럽트 시그널 처리 (다음 라인 경계에서 중단)
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("시그널 핸들러 등록 실패")?;
    }

    // 로그 설정
    let log_path = init_logging(&args.workdir).context("로그 설정 실패")?;
    info!("--- Start of log file ---");

    // 입력 수집
    println!("\n{}", "📁 입력 데이터 가져오는 중...".bright_cyan());
    let input = collect_input(&args.inputs)?;
    print_import_result(&input);

    // 스키마 설정
    let options = build_options(&args);
    print_options(&args, &options);

    if input.is_empty() {
        println!(
            "\n{} {}\n",
            "⚠️ 처리할 내용이 없습니다!".yellow(),
            "입력 파일이 비어 있습니다."
        );
        info!("--- End of log file ---");
        return Ok(());
    }

    println!(
        "\n  {} 처리할 라인 수: {}",
        "📋".bright_white(),
        input.lines.len().to_string().bright_green()
    );

    // 통계 초기화
    let mut stats = Statistics::new(input.lines.len());
    stats.add_bytes_read(input.bytes_read);

    println!(
        "  {} 처리 시작: {}",
        "🕐".bright_white(),
        Local::now().format(CLOCK_FORMAT)
    );

    let pipeline = Pipeline::new(options);
    let report = run_pipeline(&args, &pipeline, &input.lines, &interrupted);
    stats.absorb(&report);

    if report.interrupted {
        warn!("Process interrupted by user!");
        info!("--- End of log file ---");
        println!(
            "\n{} 사용자에 의해 중단되었습니다. 출력 파일은 생성되지 않았습니다.",
            "🛑".bright_red()
        );
        println!("  상세 정보: {:?}", log_path);
        println!("  종료 시간: {}\n", Local::now().format(CLOCK_FORMAT));
        std::process::exit(INTERRUPT_EXIT_CODE);
    }

    // 스키마 검증 결과 출력
    if pipeline.options().schema_enabled() {
        print_schema_result(&report, &log_path);
    }

    // JSON 파일 저장
    println!("\n{}", "💾 JSON 파일 저장 중...".bright_cyan());
    let written = write_output(&args, &report)?;
    stats.add_bytes_written(written);

    println!(
        "  {} 처리 종료: {}",
        "🕐".bright_white(),
        Local::now().format(CLOCK_FORMAT)
    );

    // 통계 출력
    stats.print_summary();

    println!("\n{} 저장 완료: {:?}\n", "✅".bright_green(), args.output_path());
    info!("--- End of log file ---");

    Ok(())
}

/// 작업 폴더 유효성 검사 (존재 여부, 쓰기 권한)
fn validate_workdir(workdir: &Path) -> Result<()> {
    if !workdir.is_dir() {
        return Err(Syslog2JsonError::WorkdirNotFound {
            path: workdir.to_path_buf(),
        }
        .into());
    }

    // 임시 파일 생성으로 쓰기 권한 확인
    tempfile::tempfile_in(workdir).map_err(|_| Syslog2JsonError::WorkdirNotWritable {
        path: workdir.to_path_buf(),
    })?;

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 SYSLOG TO JSON CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());

    for input in &args.inputs {
        println!("  {} 입력 파일: {:?}", "📂".bright_cyan(), input);
    }
    println!("  {} 작업 폴더: {:?}", "📁".bright_cyan(), args.workdir);
    println!("  {} 출력 파일: {:?}", "📄".bright_green(), args.output_path());

    if args.format_json {
        println!(
            "  {} {}",
            "✨".bright_magenta(),
            "Pretty 출력 모드".magenta()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 입력 수집 결과 출력
fn print_import_result(input: &InputBuffer) {
    for path in &input.files {
        println!("  {} 가져오기 완료: {:?}", "✓".green(), path);
    }
    for missing in &input.missing {
        println!(
            "  {} 건너뜀! 입력 파일을 찾을 수 없습니다: {:?}",
            "ø".red(),
            missing
        );
    }
}

/// 파이프라인 옵션 생성 (스키마를 불러오지 못하면 검증 비활성화)
fn build_options(args: &Args) -> PipelineOptions {
    if !args.verify_enabled() {
        info!("Output JSON validation disabled by the user");
        return PipelineOptions::new();
    }

    let options = PipelineOptions::new().with_schema_file(&args.schema);
    if options.schema_enabled() {
        info!("Output JSON validation enabled");
    }
    options
}

/// 설정 상태 출력
fn print_options(args: &Args, options: &PipelineOptions) {
    let on_off = |enabled: bool| {
        if enabled {
            "true".bright_green().bold()
        } else {
            "false".yellow().bold()
        }
    };

    println!();
    println!("  {:35} {}", "Pretty-printed output JSON file:", on_off(args.format_json));
    println!(
        "  {:35} {}",
        "Output JSON file verification:",
        on_off(options.schema_enabled())
    );
    println!("  {:35} {}", "Progress bar:", on_off(args.show_progress()));

    if args.verify_enabled() && !options.schema_enabled() {
        println!(
            "  {} 스키마 파일을 불러오지 못해 검증을 건너뜁니다: {:?}",
            "⚠️".bright_yellow(),
            args.schema
        );
    }
}

/// 진행률 표시와 함께 파이프라인 실행
fn run_pipeline(
    args: &Args,
    pipeline: &Pipeline,
    lines: &[String],
    interrupted: &AtomicBool,
) -> ProcessingReport {
    println!("\n{}", "⚡ syslog 처리 중...".bright_cyan());
    info!("Start input syslog file(s) processing...");

    let report = if args.show_progress() {
        let pb = create_progress_bar(lines.len());
        let report = pipeline.run_with(lines, interrupted, |progress| {
            pb.set_position(progress.line_number as u64);
            pb.set_message(format!("{}%", progress.percent));
        });
        pb.finish_with_message("완료!");
        report
    } else {
        let width = lines.len().to_string().len();
        let report = pipeline.run_with(lines, interrupted, |progress| {
            print!(
                "\r  Row {:>width$} of {}",
                progress.line_number, progress.total_lines
            );
            let _ = std::io::stdout().flush();
        });
        println!();
        report
    };

    info!("End input syslog file(s) processing");
    report
}

/// 진행률 바 생성
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}

/// 스키마 검증 결과 출력
fn print_schema_result(report: &ProcessingReport, log_path: &Path) {
    if report.schema_error_lines.is_empty() {
        println!("\n  {} JSON 값 검증 완료", "✓".green());
        return;
    }

    println!("\n  {} JSON 값 검증 오류!", "×".bright_red());
    println!("  상세 오류 정보는 로그 파일에 저장되었습니다: {:?}", log_path);

    let lines: Vec<String> = report
        .schema_error_lines
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!("  오류 라인: {}", lines.join(" ").bright_white());
}

/// 출력 JSON 파일 작성
///
/// # Returns
/// 기록된 바이트 수
fn write_output(args: &Args, report: &ProcessingReport) -> Result<u64> {
    let output_path = args.output_path();
    let file = File::create(&output_path)
        .with_context(|| format!("출력 파일을 만들 수 없습니다: {:?}", output_path))?;

    let mut writer = BufWriter::new(file);
    report.write_json(&mut writer, args.format_json)?;
    writer.flush()?;

    let written = std::fs::metadata(&output_path)
        .map(|m| m.len())
        .unwrap_or(0);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args_for(workdir: &Path) -> Args {
        Args::parse_from([
            "syslog2json",
            "-d",
            workdir.to_str().unwrap(),
            "-o",
            "out.json",
            "-f",
        ])
    }

    #[test]
    fn test_validate_workdir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_workdir(temp_dir.path()).is_ok());
        assert!(validate_workdir(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_write_output_pretty() {
        let temp_dir = TempDir::new().unwrap();
        let args = args_for(temp_dir.path());
        let report = Pipeline::default().run(&["Jan  5 10:22:04 host1 sshd[101]: hi"]);

        let written = write_output(&args, &report).unwrap();
        let content = std::fs::read_to_string(args.output_path()).unwrap();

        assert_eq!(written, content.len() as u64);
        assert!(content.starts_with("{\n  \"syslog\": ["));
    }

    #[test]
    fn test_build_options_respects_no_verify() {
        let args = Args::parse_from(["syslog2json", "-c"]);
        assert!(!build_options(&args).schema_enabled());
    }
}
