// src/linkedin/profile_scraper.rs
use crate::core::ScraperConfig;
use crate::utils::clean_text;
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::info;

const SKIPPED_TAGS: [&str; 5] = ["script", "style", "noscript", "svg", "template"];

/// Fetches a public profile page and returns its visible text.
pub struct ProfileScraper {
    client: Client,
}

impl ProfileScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    pub async fn get_profile_text(&self, url: &str) -> Result<String> {
        info!("Fetching LinkedIn profile: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch LinkedIn profile")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let text = visible_text(&html);
        if text.is_empty() {
            anyhow::bail!("LinkedIn profile page has no readable text");
        }

        info!("Extracted {} characters from profile", text.len());
        Ok(text)
    }
}

/// Readable text of `main` (or `body`), one block per line.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let root = ["main", "body"]
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| document.select(&selector).next());

    let Some(root) = root else {
        return String::new();
    };

    let mut chunks = Vec::new();
    collect_text(root, &mut chunks);

    chunks
        .iter()
        .map(|chunk| clean_text(chunk))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, chunks: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => chunks.push(text.trim().to_string()),
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, chunks);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_scripts() {
        let html = r#"
            <html><head><title>Perfil</title><style>.x{color:red}</style></head>
            <body>
              <nav>Entrar</nav>
              <main>
                <h1>Ana   Souza</h1>
                <script>window.tracking = true;</script>
                <section><h2>Sobre</h2><p>Desenvolvedora backend
                   com foco em Rust.</p></section>
              </main>
            </body></html>
        "#;

        assert_eq!(
            visible_text(html),
            "Ana Souza\nSobre\nDesenvolvedora backend com foco em Rust."
        );
    }

    #[test]
    fn test_visible_text_falls_back_to_body() {
        let html = "<html><body><p>Perfil público</p><noscript>js</noscript></body></html>";
        assert_eq!(visible_text(html), "Perfil público");
    }
}
