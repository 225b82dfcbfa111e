use clap::Parser;
use kipris_analyzer::config::secrets::Secrets;
use kipris_analyzer::config::toml_config::TomlConfig;
use kipris_analyzer::utils::error::AnalyzerError;
use kipris_analyzer::utils::{logger, validation::Validate};
use kipris_analyzer::{AnalysisEngine, CliConfig, GeminiClient, KiprisClient, LocalStorage, PatentPipeline};

fn fail(stage: &str, e: &AnalyzerError) -> ! {
    tracing::error!(
        "❌ {} failed: {} (Category: {:?}, Severity: {:?})",
        stage,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}

fn load_settings(cli: &CliConfig) -> Result<TomlConfig, AnalyzerError> {
    let mut settings = match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading settings from {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };

    if let Some(output_path) = &cli.output_path {
        settings.output.output_path = output_path.clone();
    }
    if let Some(report_name) = &cli.report_name {
        settings.output.report_name = report_name.clone();
    }

    settings.validate()?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting kipris-analyzer CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let secrets = Secrets::from_env().unwrap_or_else(|e| fail("Loading API keys", &e));
    let settings = load_settings(&cli).unwrap_or_else(|e| fail("Configuration", &e));

    let request = cli
        .to_request()
        .and_then(|request| request.validate().map(|_| request))
        .unwrap_or_else(|e| fail("Request validation", &e));

    let kipris = KiprisClient::from_settings(secrets.kipris_api_key.clone(), &settings.kipris)?;
    let gemini = GeminiClient::from_settings(secrets.gemini_api_key.clone(), &settings.gemini)?;
    tracing::debug!("Using Gemini model {}", gemini.model());

    let storage = LocalStorage::new(settings.output.output_path.clone());
    let pipeline = PatentPipeline::new(
        request,
        kipris,
        gemini,
        storage,
        settings.kipris.clone(),
        &settings.output,
    )
    .with_progress(|fraction, message| {
        tracing::info!("⏳ [{:>3.0}%] {}", fraction * 100.0, message);
    });

    let engine = AnalysisEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Patent analysis completed successfully!");
            println!("✅ Patent analysis completed successfully!");
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => fail("Patent analysis", &e),
    }

    Ok(())
}
