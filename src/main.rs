use anyhow::Context;
use clap::Parser;
use dialoguer::{Confirm, Input};
use fairstay_client::cli::{Cli, Commands};
use fairstay_client::config::ApiConfig;
use fairstay_client::session::{FileSessionStore, SessionManager};
use fairstay_client::survey::build_survey;
use fairstay_client::{ApiClient, Inspector};
use chrono::{DateTime, Utc};
use fairstay_common::{format_confidence, millis_to_utc, InspectionReport, SurveyRatings};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match cli.env {
        Some(env) => {
            let mut config = ApiConfig::load().context("설정을 읽을 수 없습니다")?;
            config.base_url = env.base_url().to_string();
            config
        }
        None => ApiConfig::load().context("설정을 읽을 수 없습니다")?,
    };
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &cli.session_file {
        config.session_store_path = Some(path.clone());
    }

    match cli.command {
        Commands::Config { set_base_url, set_strategy, show } => {
            // 保存は設定ファイルの内容だけを対象にする（フラグ・環境変数は書き込まない）
            let config_path = ApiConfig::config_path()?;
            if let Some(url) = set_base_url {
                let stored = ApiConfig::update_stored(&config_path, |c| c.base_url = url)?;
                config.base_url = stored.base_url;
                println!("✔ baseUrl 을 저장했습니다");
            }

            if let Some(strategy) = set_strategy {
                ApiConfig::update_stored(&config_path, |c| c.upload_strategy = strategy)?;
                config.upload_strategy = strategy;
                println!("✔ 업로드 방식을 저장했습니다");
            }

            if show {
                println!("설정:");
                println!("  baseUrl: {}", config.base_url);
                println!("  업로드 방식: {}", config.upload_strategy);
                println!(
                    "  타임아웃: 기본 {}ms / 업로드 {}ms / 분석 {}ms",
                    config.request_timeout_ms, config.upload_timeout_ms, config.analysis_timeout_ms
                );
                match config.max_image_dimension {
                    Some(max) => println!("  이미지 축소: {}px (JPEG {}%)", max, config.jpeg_quality),
                    None => println!("  이미지 축소: 사용 안 함"),
                }
                println!("  세션 파일: {}", config.session_store_path()?.display());
            }
        }

        Commands::Session { user_type, reset } => {
            let inspector = build_inspector(config)?;
            if reset {
                inspector.sessions().reset_session()?;
                println!("✔ 저장된 세션을 삭제했습니다");
            }
            let session = inspector.sessions().ensure_session(user_type.map(Into::into)).await?;
            println!("세션 ID: {}", session.session_id);
            if let Some(user_type) = session.user_type {
                println!("  사용자 유형: {}", user_type.as_str());
            }
            if let Some(expires_at) = session.expires_at_utc() {
                println!("  만료: {}", format_utc(expires_at));
            }
        }

        Commands::Upload { image, strategy } => {
            if let Some(strategy) = strategy {
                config.upload_strategy = strategy;
            }
            let inspector = build_inspector(config)?;
            let session = inspector.sessions().ensure_session(None).await?;

            let spinner = spinner("이미지 업로드 중...");
            let result = inspector
                .client()
                .upload_image(&image.to_string_lossy(), &session.session_id)
                .await;
            spinner.finish_and_clear();

            let uploaded = result?;
            println!("✔ 업로드 완료");
            println!("  이미지 ID: {}", uploaded.image_id);
            println!("  URL: {}", uploaded.image_url);
            if !uploaded.message.is_empty() {
                println!("  {}", uploaded.message);
            }
        }

        Commands::Analyze { image_id } => {
            let client = ApiClient::new(config)?;

            let spinner = spinner("AI 분석 중...");
            let result = client.analyze_image(&image_id).await;
            spinner.finish_and_clear();

            print_report(&InspectionReport::from_analysis(&result?));
        }

        Commands::Inspect { image, user_type, strategy } => {
            if let Some(strategy) = strategy {
                config.upload_strategy = strategy;
            }
            let inspector = build_inspector(config)?;

            let spinner = spinner("업로드 및 분석 중...");
            let result = inspector
                .inspect(&image.to_string_lossy(), Some(user_type.into()))
                .await;
            spinner.finish_and_clear();

            let inspection = result?;
            println!("세션 ID: {}", inspection.session.session_id);
            print_report(&inspection.report());
        }

        Commands::Report { image_id } => {
            let inspector = build_inspector(config)?;
            let report = inspector.report_for(&image_id, None).await?;
            print_report(&report);
        }

        Commands::Images { session } => {
            let inspector = build_inspector(config)?;
            let session_id = match session {
                Some(id) => id,
                None => inspector.sessions().ensure_session(None).await?.session_id,
            };

            let images = inspector.client().get_session_images(&session_id).await?;
            println!("세션 {} 의 이미지: {}건", session_id, images.count);
            for image in &images.images {
                println!(
                    "  - {} [{}] 손상 {}건 ({})",
                    image.id,
                    image.damage_analysis.status,
                    image.damage_analysis.damages.len(),
                    format_millis(image.created_at)
                );
            }
        }

        Commands::Share { image_id, kakao } => {
            let client = ApiClient::new(config)?;

            if kakao {
                let data = client.get_kakao_share_data(&image_id).await?;
                println!("카카오톡 공유 데이터:");
                println!("  제목: {}", data.title);
                println!("  설명: {}", data.description);
                println!("  이미지: {}", data.image_url);
                println!("  링크: {}", data.share_url);
            } else {
                let link = client.share_image(&image_id).await?;
                println!("공유 링크가 생성되었습니다:");
                println!("  {}", link.share_url);
                if let Some(expires_at) = link.expires_at {
                    println!("  만료: {}", format_millis(expires_at));
                }
            }
        }

        Commands::Survey { image_id, experienced, explanation, convenience, satisfaction, comment } => {
            let inspector = build_inspector(config)?;
            let session = inspector.sessions().ensure_session(None).await?;

            let interactive = explanation.is_none() || convenience.is_none() || satisfaction.is_none();
            let ratings = SurveyRatings {
                has_real_estate_experience: if interactive {
                    Confirm::new()
                        .with_prompt("부동산 거래 경험이 있으신가요?")
                        .default(experienced)
                        .interact()?
                } else {
                    experienced
                },
                explanation: rating_or_prompt(explanation, "설명이 이해하기 쉬웠나요? (1-5)")?,
                process_convenience: rating_or_prompt(convenience, "과정이 편리했나요? (1-5)")?,
                overall_satisfaction: rating_or_prompt(satisfaction, "전반적으로 만족하셨나요? (1-5)")?,
                additional_comments: comment,
            };

            let survey = build_survey(&session.session_id, image_id, &ratings)?;
            let receipt = inspector.client().submit_survey(&survey).await?;
            println!("✔ 설문이 제출되었습니다{}", if receipt.message.is_empty() {
                String::new()
            } else {
                format!(": {}", receipt.message)
            });
        }

        Commands::Health => {
            let client = ApiClient::new(config)?;
            if client.check_connection().await {
                println!("✔ 서버 연결 정상: {}", client.config().base_url);
            } else {
                println!("✖ 서버에 연결할 수 없습니다: {}", client.config().base_url);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fairstay_client={0},fairstay={0}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_inspector(config: ApiConfig) -> anyhow::Result<Inspector> {
    let store = FileSessionStore::new(config.session_store_path()?);
    let client = ApiClient::new(config)?;
    Ok(Inspector::new(SessionManager::new(client, Arc::new(store))))
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} {elapsed}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn rating_or_prompt(value: Option<u8>, prompt: &str) -> anyhow::Result<u8> {
    if let Some(value) = value {
        return Ok(value);
    }

    let value = Input::<u8>::new()
        .with_prompt(prompt)
        .validate_with(|v: &u8| -> Result<(), &str> {
            if (1..=5).contains(v) {
                Ok(())
            } else {
                Err("1~5 사이로 입력해주세요")
            }
        })
        .interact_text()?;
    Ok(value)
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_millis(millis: i64) -> String {
    millis_to_utc(millis)
        .map(format_utc)
        .unwrap_or_else(|| millis.to_string())
}

fn print_report(report: &InspectionReport) {
    println!("이미지 ID: {}", report.image_id);
    if let Some(url) = &report.image_url {
        println!("  원본: {}", url);
    }
    if let Some(url) = &report.processed_image_url {
        println!("  분석 이미지: {}", url);
    }
    println!("  상태: {}", report.status);

    if report.status.is_in_progress() {
        println!("  분석이 아직 진행 중입니다. 잠시 후 `fairstay report {}` 로 다시 확인하세요.", report.image_id);
        return;
    }

    if report.is_empty() {
        println!("  발견된 손상이 없습니다.");
        return;
    }

    let summary = report.summary();
    println!("  손상 {}건", summary.total);
    for (severity, count) in &summary.by_severity {
        println!("    {}: {}건", severity, count);
    }

    for (i, damage) in report.damages.iter().enumerate() {
        println!(
            "  {}. {} / {} / {} (신뢰도 {})",
            i + 1,
            damage.damage_type,
            damage.severity,
            damage.location,
            format_confidence(damage.confidence)
        );
        if let Some(description) = &damage.description {
            println!("     {}", description);
        }
    }
}
