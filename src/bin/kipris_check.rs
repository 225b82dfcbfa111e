use anyhow::Context;
use kipris_analyzer::adapters::kipris::HealthStatus;
use kipris_analyzer::config::secrets::Secrets;
use kipris_analyzer::utils::logger::{self, preview_secret};
use kipris_analyzer::KiprisClient;

const HEALTH_KEYWORD: &str = "배터리";
const BODY_PREVIEW_CHARS: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_cli_logger(std::env::args().any(|arg| arg == "--verbose"));

    let api_key = Secrets::kipris_key_from_env().context("KIPRIS_API_KEY is required")?;
    println!("🔑 KIPRIS key: {}", preview_secret(&api_key));

    let client = KiprisClient::new(api_key)?;
    let report = client
        .check_health(HEALTH_KEYWORD)
        .await
        .context("KIPRIS request failed")?;

    println!("🌐 HTTP status: {}", report.http_status);
    println!(
        "📋 successYN={} resultCode={} resultMsg={}",
        report.header.success_yn.as_deref().unwrap_or("-"),
        report.header.result_code.as_deref().unwrap_or("-"),
        report.header.result_msg.as_deref().unwrap_or("-"),
    );

    let status = report.status();
    match status {
        HealthStatus::Healthy => println!("✅ KIPRIS API is reachable and the key is valid"),
        HealthStatus::InvalidKey => println!("❌ The KIPRIS API key was rejected (resultCode 10)"),
        HealthStatus::BadQuery => println!("❌ KIPRIS rejected the query parameters (resultCode 99)"),
        HealthStatus::HttpError(code) => println!("❌ KIPRIS answered with HTTP {}", code),
        HealthStatus::Unknown => {
            let preview: String = report.body.chars().take(BODY_PREVIEW_CHARS).collect();
            println!("❓ Unrecognized response:\n{}", preview);
        }
    }

    if status != HealthStatus::Healthy {
        std::process::exit(1);
    }
    Ok(())
}
