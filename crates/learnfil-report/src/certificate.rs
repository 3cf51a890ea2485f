//! Completion certificate generator.
//!
//! Produces a self-contained HTML certificate (CSS inlined, printable in
//! landscape) and a plain-text rendering for terminals.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::html_escape;

/// Name printed when the learner has no display name.
pub const DEFAULT_USER_NAME: &str = "Anonymous";
/// Wallet printed when the learner has no wallet address.
pub const DEFAULT_WALLET: &str = "0x000...";
/// The track every LearnFIL certificate is issued for by default.
pub const DEFAULT_TRACK: &str = "LearnFIL Core Developer Track";

/// A certificate of completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    pub user_name: String,
    pub wallet_address: String,
    pub track_name: String,
    pub issued_at: DateTime<Utc>,
}

impl Certificate {
    /// Build a certificate issued now. Blank fields fall back to defaults.
    pub fn new(user_name: Option<&str>, wallet_address: Option<&str>, track_name: &str) -> Self {
        let or_default = |value: Option<&str>, default: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        };
        Self {
            user_name: or_default(user_name, DEFAULT_USER_NAME),
            wallet_address: or_default(wallet_address, DEFAULT_WALLET),
            track_name: or_default(Some(track_name), DEFAULT_TRACK),
            issued_at: Utc::now(),
        }
    }

    /// File name without extension: `certificate-<track>-<user>`, slugged.
    pub fn file_stem(&self) -> String {
        format!(
            "certificate-{}-{}",
            slug(&self.track_name),
            slug(&self.user_name)
        )
    }

    /// Plain-text rendering.
    pub fn render_text(&self) -> String {
        let lines = [
            "Certificate of Completion".to_string(),
            String::new(),
            format!("This certifies that {}", self.user_name),
            format!("Wallet: {}", self.wallet_address),
            format!("has successfully completed the {} track.", self.track_name),
            String::new(),
            format!("Issued {}", self.issued_at.format("%Y-%m-%d")),
        ];
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let mut out = String::new();
        let border = format!("+{}+\n", "-".repeat(width + 4));
        out.push_str(&border);
        for line in &lines {
            let pad = width - line.chars().count();
            let left = pad / 2;
            out.push_str(&format!(
                "|  {}{}{}  |\n",
                " ".repeat(left),
                line,
                " ".repeat(pad - left)
            ));
        }
        out.push_str(&border);
        out
    }

    /// Self-contained HTML rendering.
    pub fn generate_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(&format!(
            "<title>Certificate: {}</title>\n",
            html_escape(&self.user_name)
        ));
        html.push_str("<style>\n");
        html.push_str(CSS);
        html.push_str("</style>\n");
        html.push_str("</head>\n<body>\n");

        html.push_str("<main class=\"certificate\">\n");
        html.push_str("<h1>Certificate of Completion</h1>\n");
        html.push_str(&format!(
            "<p class=\"lead\">This certifies that <strong>{}</strong></p>\n",
            html_escape(&self.user_name)
        ));
        html.push_str(&format!(
            "<p class=\"wallet\">Wallet: <code>{}</code></p>\n",
            html_escape(&self.wallet_address)
        ));
        html.push_str(&format!(
            "<p>has successfully completed the <strong>{}</strong> track.</p>\n",
            html_escape(&self.track_name)
        ));
        html.push_str(&format!(
            "<p class=\"meta\">Issued {}</p>\n",
            self.issued_at.format("%B %-d, %Y")
        ));
        html.push_str("</main>\n");

        html.push_str("</body>\n</html>");
        html
    }

    /// Write the HTML certificate into `dir`, returning the file path.
    pub fn write_html(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(format!("{}.html", self.file_stem()));
        std::fs::write(&path, self.generate_html())
            .with_context(|| format!("failed to write certificate to {}", path.display()))?;
        Ok(path)
    }
}

/// Lowercase, ASCII-alphanumeric words joined by `-`.
fn slug(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

const CSS: &str = r#"
@page { size: A4 landscape; margin: 0; }
body { margin: 0; background: #fdf8ec; font-family: Helvetica, Arial, sans-serif; color: #111827; }
.certificate { max-width: 860px; margin: 48px auto; padding: 56px 64px; background: #fff;
  border: 6px solid #111827; border-radius: 24px; text-align: center; }
h1 { font-size: 40px; margin: 0 0 40px; }
p { font-size: 22px; margin: 16px 0; }
.lead strong { font-size: 28px; }
.wallet code { font-size: 18px; background: #fdf8ec; padding: 4px 10px; border-radius: 8px; }
.meta { color: #4b5563; font-size: 16px; margin-top: 40px; }
"#;
