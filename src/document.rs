//! Parsed-page representation shared by the three analyzers.
//!
//! `scraper::Html` is not `Send`, so it cannot cross task boundaries. To let
//! the analyzers fan out as independent tasks over one parse, everything they
//! query is extracted here in a single pass into an owned structure, and the
//! `Html` value is dropped before any async work starts.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Failed to parse static selector - this is a bug")
}

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("meta"));
static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static H2_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("h2"));
static H3_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("h3"));
static H4_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("h4"));
static P_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static JSON_LD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static ITEMTYPE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("[itemtype]"));
static CONTAINER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("div, section"));
static OL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("ol"));
static UL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("ul"));
static TABLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static IFRAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| selector("iframe[src]"));

/// A `<meta>` tag's attributes of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaTag {
    /// The `name` attribute, if any.
    pub name: Option<String>,
    /// The `property` attribute (Open Graph tags use this), if any.
    pub property: Option<String>,
    /// The `charset` attribute, if any.
    pub charset: Option<String>,
    /// The `content` attribute, if any.
    pub content: Option<String>,
}

/// Owned, immutable extraction of one HTML page.
///
/// Built once per audit and shared read-only across the three analyzer
/// tasks. All text fields are trimmed; `text` is the full visible text with
/// runs of whitespace collapsed to single spaces.
#[derive(Debug, Clone, Default)]
pub struct MarkupDocument {
    /// First `<title>` element's text; `Some("")` when the element exists
    /// but is empty, `None` when there is no title element at all.
    pub title: Option<String>,
    /// All `<meta>` tags in document order.
    pub meta_tags: Vec<MetaTag>,
    /// `<h1>` texts in document order.
    pub h1: Vec<String>,
    /// `<h2>` texts in document order.
    pub h2: Vec<String>,
    /// `<h3>` texts in document order.
    pub h3: Vec<String>,
    /// `<h4>` texts in document order.
    pub h4: Vec<String>,
    /// Number of `<p>` elements.
    pub paragraph_count: usize,
    /// One entry per `<img>`: its `alt` attribute, `None` when absent.
    pub image_alts: Vec<Option<String>>,
    /// `href` values of every `<a href=...>`, untrimmed, in document order.
    pub anchor_hrefs: Vec<String>,
    /// Raw bodies of `<script type="application/ld+json">` blocks.
    pub json_ld_blocks: Vec<String>,
    /// `itemtype` attribute values of microdata-annotated elements.
    pub itemtypes: Vec<String>,
    /// `class` attribute of each `<div>`/`<section>` that has one.
    pub container_classes: Vec<String>,
    /// Number of `<ol>` elements.
    pub ordered_lists: usize,
    /// Number of `<ul>` elements.
    pub unordered_lists: usize,
    /// Number of `<table>` elements.
    pub tables: usize,
    /// `src` values of `<iframe src=...>` elements.
    pub iframe_srcs: Vec<String>,
    /// Whitespace-normalized visible text of the whole document.
    pub text: String,
}

impl MarkupDocument {
    /// Parses raw HTML and extracts everything the analyzers query.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|e| element_text(e).trim().to_string());

        let meta_tags = document
            .select(&META_SELECTOR)
            .map(|e| MetaTag {
                name: e.value().attr("name").map(str::to_string),
                property: e.value().attr("property").map(str::to_string),
                charset: e.value().attr("charset").map(str::to_string),
                content: e.value().attr("content").map(str::to_string),
            })
            .collect();

        let heading_texts = |sel: &Selector| -> Vec<String> {
            document
                .select(sel)
                .map(|e| element_text(e).trim().to_string())
                .collect()
        };

        let image_alts = document
            .select(&IMG_SELECTOR)
            .map(|e| e.value().attr("alt").map(str::to_string))
            .collect();

        let anchor_hrefs = document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|e| e.value().attr("href").map(str::to_string))
            .collect();

        let json_ld_blocks = document
            .select(&JSON_LD_SELECTOR)
            .map(element_text)
            .collect();

        let itemtypes = document
            .select(&ITEMTYPE_SELECTOR)
            .filter_map(|e| e.value().attr("itemtype").map(str::to_string))
            .collect();

        let container_classes = document
            .select(&CONTAINER_SELECTOR)
            .filter_map(|e| e.value().attr("class").map(str::to_string))
            .collect();

        let iframe_srcs = document
            .select(&IFRAME_SELECTOR)
            .filter_map(|e| e.value().attr("src").map(str::to_string))
            .collect();

        // Visible text: every text node, trimmed, joined by single spaces.
        // Script/style contents are included, matching how the score
        // thresholds were calibrated.
        let text = document
            .root_element()
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");

        MarkupDocument {
            title,
            meta_tags,
            h1: heading_texts(&H1_SELECTOR),
            h2: heading_texts(&H2_SELECTOR),
            h3: heading_texts(&H3_SELECTOR),
            h4: heading_texts(&H4_SELECTOR),
            paragraph_count: document.select(&P_SELECTOR).count(),
            image_alts,
            anchor_hrefs,
            json_ld_blocks,
            itemtypes,
            container_classes,
            ordered_lists: document.select(&OL_SELECTOR).count(),
            unordered_lists: document.select(&UL_SELECTOR).count(),
            tables: document.select(&TABLE_SELECTOR).count(),
            iframe_srcs,
            text,
        }
    }

    /// First `<meta name="...">` tag with the given name, if present.
    ///
    /// Presence of the tag and presence of its `content` attribute are
    /// distinct signals (the viewport check only cares about the former).
    pub fn meta_tag(&self, name: &str) -> Option<&MetaTag> {
        self.meta_tags
            .iter()
            .find(|tag| tag.name.as_deref() == Some(name))
    }

    /// Content of the first `<meta name="...">` tag with the given name.
    pub fn meta_content(&self, name: &str) -> Option<&str> {
        self.meta_tag(name).and_then(|tag| tag.content.as_deref())
    }

    /// Whether any `<meta charset=...>` declaration is present.
    pub fn has_charset(&self) -> bool {
        self.meta_tags.iter().any(|tag| tag.charset.is_some())
    }

    /// Number of `<meta property="og:...">` tags.
    pub fn og_tag_count(&self) -> usize {
        self.meta_tags
            .iter()
            .filter(|tag| {
                tag.property
                    .as_deref()
                    .is_some_and(|p| p.starts_with("og:"))
            })
            .count()
    }

    /// Whitespace-tokenized word count of the visible text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}
