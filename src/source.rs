use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::blocking::Client;

static OFFER_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"href="(https?://[^"]*(?:/d/oferta/|/pl/oferta/)[^"]+)""#).unwrap()
});
static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<(script|style)[^>]*>.*?</(script|style)>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Raw markup to keep after each offer link, before tag stripping. Covers one
/// result card on both portals.
const CARD_WINDOW: usize = 2000;

/// One search-result card: the offer link plus the card's visible text.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub link: String,
    pub text: String,
}

/// Where listing text comes from. The pipeline only ever sees candidates and
/// detail blobs; navigation, retries and timeouts live behind this seam.
pub trait DocumentSource {
    /// Summary cards from the search results page.
    fn candidates(&mut self) -> Result<Vec<Candidate>>;

    /// Full-page text for one listing.
    fn detail_text(&mut self, link: &str) -> Result<String>;
}

/// Plain-HTTP source over a portal search URL.
pub struct HttpSource {
    client: Client,
    search_url: String,
}

impl HttpSource {
    pub fn new(search_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            search_url: search_url.to_string(),
        })
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("fetching {}", url))?
            .text()?;
        Ok(body)
    }
}

impl DocumentSource for HttpSource {
    fn candidates(&mut self) -> Result<Vec<Candidate>> {
        let html = self.fetch(&self.search_url)?;
        Ok(collect_cards(&html))
    }

    fn detail_text(&mut self, link: &str) -> Result<String> {
        Ok(strip_markup(&self.fetch(link)?))
    }
}

/// Find offer links and take a tag-stripped window of markup after each one
/// as the card text. The window opens after the enclosing anchor tag's `>`,
/// so attribute residue from the tag itself never reaches the extractor.
/// Repeated links (cards carry several anchors) collapse to the first
/// occurrence.
pub fn collect_cards(html: &str) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    let mut cards = Vec::new();

    for caps in OFFER_LINK_RE.captures_iter(html) {
        let link = caps[1].to_string();
        if !seen.insert(link.clone()) {
            continue;
        }
        let attr_end = caps.get(0).map(|m| m.end()).unwrap_or(0);
        let start = html[attr_end..]
            .find('>')
            .map(|i| attr_end + i + 1)
            .unwrap_or(attr_end);
        let mut end = (start + CARD_WINDOW).min(html.len());
        while !html.is_char_boundary(end) {
            end -= 1;
        }
        cards.push(Candidate {
            link,
            text: strip_markup(&html[start..end]),
        });
    }

    cards
}

/// Reduce markup to visible text: drop script/style bodies, turn tags into
/// line breaks, decode the entities the portals actually emit.
pub fn strip_markup(html: &str) -> String {
    let no_scripts = SCRIPT_RE.replace_all(html, "");
    let text = TAG_RE.replace_all(&no_scripts, "\n");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&oacute;", "ó")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'");
    let mut lines = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim();
        lines.push_str(line);
        lines.push('\n');
    }
    BLANKS_RE.replace_all(&lines, "\n\n").trim().to_string()
}

// ── Tests ──
