use colored::Colorize;
use serde::Serialize;

/// Log HTTP request details for debugging (console output)
pub fn log_request<T: Serialize>(url: &str, request: &T, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    let display_url = redact_key(url, api_key);
    if let Ok(parsed_url) = reqwest::Url::parse(&display_url) {
        println!("{}: {}", "URL".bright_yellow(), display_url);
        println!(
            "{}: {}",
            "Host".bright_yellow(),
            parsed_url.host_str().unwrap_or("unknown")
        );
        println!("{}: {}", "Scheme".bright_yellow(), parsed_url.scheme());
    } else {
        println!("{}: {}", "URL".bright_yellow(), display_url);
    }

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            // Truncate very long requests for readability; system attachment
            // payloads can run to megabytes of base64.
            if json.chars().count() > 5000 {
                let truncated: String = json.chars().take(5000).collect();
                println!("{}", truncated);
                println!(
                    "\n{}",
                    format!("... (truncated, total {} bytes)", json.len()).bright_black()
                );
            } else {
                println!("{}", json);
            }
        }
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// The credential travels as a query parameter, so it must never reach the
/// log verbatim.
fn redact_key(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return url.to_string();
    }
    url.replace(api_key, "***")
}
