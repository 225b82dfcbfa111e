use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose {
        "kipris_analyzer=debug,info"
    } else {
        "kipris_analyzer=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 結構化 JSON 輸出，方便丟給日誌收集器
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}

/// 只顯示金鑰前五碼
pub fn preview_secret(val: &str) -> String {
    let n = val.chars().take(5).map(char::len_utf8).sum::<usize>();
    format!("{}...({} chars)", &val[..n], val.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_secret_hides_tail() {
        let preview = preview_secret("abcdefghijklmnop");
        assert_eq!(preview, "abcde...(16 chars)");
    }

    #[test]
    fn test_preview_secret_short_value() {
        assert_eq!(preview_secret("ab"), "ab...(2 chars)");
    }
}
