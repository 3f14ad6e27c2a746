use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use uranium_predictor::core::batch::run_batch_files;
use uranium_predictor::core::formatter::format_result;
use uranium_predictor::utils::logger;
use uranium_predictor::{
    AppConfig, CliConfig, Command, District, PredictionRequest, PredictionService, PredictorError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(config.logging.verbose);
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    match cli.command {
        Command::Serve { .. } => serve(config).await,
        Command::Predict {
            district,
            latitude,
            longitude,
        } => {
            let service = PredictionService::from_config(&config);
            let request = PredictionRequest::new(district, latitude, longitude);
            match service.submit(&request) {
                Ok(prediction) => {
                    println!(
                        "{}",
                        format_result(prediction.district.name(), prediction.prediction)
                    );
                    Ok(())
                }
                Err(e) => fail(e),
            }
        }
        Command::Batch { input, output } => {
            let service = PredictionService::from_config(&config);
            match run_batch_files(&service, &input, &output) {
                Ok(summary) => {
                    println!(
                        "✅ {} rows processed ({} succeeded, {} failed)",
                        summary.processed, summary.succeeded, summary.failed
                    );
                    println!("📁 Output saved to: {}", output.display());
                    Ok(())
                }
                Err(e) => fail(e),
            }
        }
        Command::Districts => {
            for district in District::ALL {
                println!("{}", district);
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let service = Arc::new(PredictionService::from_config(&config));

    // 啟動時預先載入；失敗不中止，之後的請求會重試
    match service.preload() {
        Ok(()) => tracing::info!(
            "✅ Model ready: {}",
            service.gateway().model_path().display()
        ),
        Err(e) => {
            tracing::error!("❌ {}", e.user_friendly_message());
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        }
    }

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    uranium_predictor::web::serve(listener, service)
        .await
        .context("server error")?;
    Ok(())
}

fn fail(e: PredictorError) -> anyhow::Result<()> {
    tracing::error!(
        "❌ Prediction failed: {} (Severity: {:?})",
        e,
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

