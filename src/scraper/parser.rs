//! Page-shape parsers. All coupling to the source site's markup lives here:
//! each page the crawler touches has exactly one parser type, so a site
//! redesign is a change to this file, not to the pipeline.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.divCardUltimosEps").expect("Invalid card selector"));
static CARD_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("Invalid card link selector"));
static CARD_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("Invalid card image selector"));
static CARD_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.animeTitle").expect("Invalid card title selector"));

static INFO_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.divDivAnimeInfo div.sub_animepage_img img")
        .expect("Invalid info image selector")
});
static EPISODE_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.div_video_list a.lEp").expect("Invalid episode selector"));

static THUMBNAIL_META: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[itemprop="thumbnailUrl"]"#).expect("Invalid thumbnail selector")
});
static STREAM_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""file"\s*:\s*"([^"]+\.mp4)""#).expect("Invalid stream file regex")
});

/// A raw listing card before deduplication and id assignment.
#[derive(Debug, Clone)]
pub struct ListingCard {
    pub title: String,
    pub url: String,
    pub image: String,
}

/// Listing pages: grids of release cards.
pub struct ListingParser;

impl ListingParser {
    /// Extract every parseable card. A card missing its title or link is
    /// skipped; one bad card never spoils the page.
    pub fn cards(html: &str) -> Vec<ListingCard> {
        let doc = Html::parse_document(html);
        let mut cards = Vec::new();

        for card in doc.select(&CARD) {
            let title = card
                .select(&CARD_TITLE)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string());
            let url = card
                .select(&CARD_LINK)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string);
            let image = card
                .select(&CARD_IMAGE)
                .next()
                .and_then(lazy_image)
                .unwrap_or_default();

            match (title, url) {
                (Some(title), Some(url)) if !title.is_empty() => {
                    cards.push(ListingCard { title, url, image });
                }
                _ => debug!("Skipping listing card with missing title or link"),
            }
        }

        cards
    }
}

/// Anime detail pages: the info panel and the episode list.
pub struct DetailParser;

impl DetailParser {
    pub fn cover(html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        doc.select(&INFO_IMAGE).next().and_then(lazy_image)
    }

    /// Every (title, href) pair in the episode list. Hrefs may be relative.
    pub fn episode_links(html: &str) -> Vec<(String, String)> {
        let doc = Html::parse_document(html);
        doc.select(&EPISODE_LINKS)
            .filter_map(|a| {
                let href = a.value().attr("href")?;
                let title = a.text().collect::<String>().trim().to_string();
                Some((title, href.to_string()))
            })
            .collect()
    }
}

/// Individual episode pages: thumbnail meta tag and the player script.
pub struct EpisodeParser;

impl EpisodeParser {
    pub fn thumbnail(html: &str) -> Option<String> {
        let doc = Html::parse_document(html);
        doc.select(&THUMBNAIL_META)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(str::to_string)
    }

    /// The `"file":"...mp4"` fragment embedded in the player script, with
    /// JSON slash escapes undone.
    pub fn stream_url(html: &str) -> Option<String> {
        STREAM_FILE
            .captures(html)
            .map(|caps| caps[1].replace("\\/", "/"))
    }
}

/// Listing and detail images are lazy-loaded; prefer the deferred attribute.
fn lazy_image(img: ElementRef<'_>) -> Option<String> {
    img.value()
        .attr("data-src")
        .or_else(|| img.value().attr("src"))
        .map(str::to_string)
}
