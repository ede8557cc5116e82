use crate::models::Achievement;
use std::process::{Command, Stdio};

/// Opens a URL somewhere outside the session (a browser tab, usually).
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// Hands URLs to the desktop's default handler.
pub struct SystemOpener;

#[cfg(target_os = "macos")]
const LAUNCHERS: &[(&str, &[&str])] = &[("open", &[])];
#[cfg(target_os = "windows")]
const LAUNCHERS: &[(&str, &[&str])] = &[("explorer", &[])];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const LAUNCHERS: &[(&str, &[&str])] = &[
    ("xdg-open", &[]),
    ("gio", &["open"]),
    ("sensible-browser", &[]),
];

impl SystemOpener {
    fn launcher() -> Option<(&'static str, &'static [&'static str])> {
        LAUNCHERS
            .iter()
            .copied()
            .find(|(bin, _)| which::which(bin).is_ok())
    }
}

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), String> {
        let (bin, args) =
            Self::launcher().ok_or_else(|| "No URL handler found on this system".to_string())?;

        // Detach: the browser must not inherit the terminal.
        Command::new(bin)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|e| format!("Failed to launch {}: {}", bin, e))
    }
}

/// Natural-language query asking how to unlock `achievement` in `entry_name`.
pub fn guide_query(achievement: &Achievement, entry_name: &str) -> String {
    format!(
        "how to get \"{}\" achievement in \"{}\"",
        achievement.title(),
        entry_name
    )
}

/// `search_url?q=<percent-encoded query>`
pub fn guide_url(search_url: &str, achievement: &Achievement, entry_name: &str) -> String {
    let query = guide_query(achievement, entry_name);
    let sep = if search_url.contains('?') { '&' } else { '?' };
    format!("{}{}q={}", search_url, sep, urlencoding::encode(&query))
}

/// Build the guide URL and hand it to `opener`. Opener failures are logged and returned,
/// the session is never touched.
pub fn open_guide(
    opener: &dyn UrlOpener,
    search_url: &str,
    achievement: &Achievement,
    entry_name: &str,
) -> Result<String, String> {
    let url = guide_url(search_url, achievement, entry_name);
    log::info!("Opening guide for {:?}", achievement.internal_name);
    opener.open(&url).map_err(|e| {
        log::warn!("Could not open guide: {}", e);
        e
    })?;
    Ok(url)
}
