//! Startup banner

use super::config::is_all_interfaces;
use super::constants::{APP_NAME, USER_ID_HEADER};

// Label column width ("API docs:" plus padding)
const W: usize = 11;

/// Print the startup banner with API and network URLs
pub fn print_banner(host: &str, port: u16, auth_enabled: bool, data_dir: &str) {
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    let api_url = format!("http://{}:{}/api/v1", display_host, port);
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "API:",
        link(&api_url)
    );
    let docs_url = format!("http://{}:{}/api/openapi.json", display_host, port);
    println!(
        "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "API docs:",
        link(&docs_url)
    );

    if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    } else if is_all_interfaces(host) {
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                println!(
                    "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
                    "Network:",
                    link(&format!("http://{}:{}", ip, port))
                );
            }
        }
    } else {
        println!(
            "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
            "Network:",
            link(&format!("http://{}:{}", host, port))
        );
    }

    let identity = if auth_enabled {
        format!("from {} header", USER_ID_HEADER)
    } else {
        "local user (auth disabled)".to_string()
    };
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Identity:", identity);
    println!("  \x1b[90m➜  {:<W$} {}\x1b[0m", "Data:", data_dir);
    println!();
}

/// Cyan URL, wrapped in an OSC 8 hyperlink when the terminal supports it
fn link(url: &str) -> String {
    let colored = format!("\x1b[36m{}\x1b[0m", url);
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{}\x07{}\x1b]8;;\x07", url, colored)
    } else {
        colored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_keeps_url_and_color() {
        let url = "http://localhost:5390/api/v1?x=1&y=2";
        let out = link(url);
        assert!(out.contains(url));
        assert!(out.contains("\x1b[36m"));
        if out.contains("\x1b]8;;") {
            assert!(out.starts_with(&format!("\x1b]8;;{}\x07", url)));
            assert!(out.ends_with("\x1b]8;;\x07"));
        } else {
            assert_eq!(out, format!("\x1b[36m{}\x1b[0m", url));
        }
    }
}
