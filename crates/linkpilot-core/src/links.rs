//! Anchor extraction and internal-link classification.
//!
//! Scans raw markup for `<a href="...">` values and keeps the ones that
//! point inside the site described by a [`SiteContext`].
//!
//! # Classification
//!
//! | Link | Kind |
//! |------|------|
//! | empty, `#frag`, `mailto:`, `tel:`, `javascript:` | [`LinkKind::Special`] |
//! | no host, path under an excluded prefix (`/wp-content/…`) | [`LinkKind::Reserved`] |
//! | no host, any other path | [`LinkKind::Internal`] |
//! | host equal to the site host | [`LinkKind::Internal`] |
//! | any other host | [`LinkKind::External`] |
//!
//! Unparseable values yield [`EngineError::MalformedUrl`]; extraction logs
//! and skips them so one bad link never aborts a corpus scan.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{bail, Context, Result};
use regex::Regex;
use url::Url;

use crate::error::EngineError;

/// Path segments reserved for system files, assets, and feeds.
pub const DEFAULT_EXCLUDED_PREFIXES: [&str; 4] = ["wp-content", "wp-admin", "wp-includes", "feed"];

const SPECIAL_PREFIXES: [&str; 4] = ["#", "mailto:", "tel:", "javascript:"];

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]+href=["']([^"']+)["'][^>]*>"#)
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// The site whose internal links are being analyzed.
#[derive(Debug, Clone)]
pub struct SiteContext {
    base_url: Url,
    host: String,
    excluded_prefixes: Vec<String>,
    resolve_relative: bool,
}

impl SiteContext {
    /// Build a context from the site's base URL, which must have a host.
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed =
            Url::parse(base_url).with_context(|| format!("invalid site base url: {}", base_url))?;
        let host = match parsed.host_str() {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => bail!("site base url has no host: {}", base_url),
        };
        Ok(Self {
            base_url: parsed,
            host,
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            resolve_relative: false,
        })
    }

    /// Replace the excluded path prefixes (first path segment, no slashes).
    pub fn with_excluded_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.excluded_prefixes = prefixes
            .into_iter()
            .map(|p| p.trim_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// Resolve relative links against the base URL before graph lookups.
    pub fn with_relative_resolution(mut self, enabled: bool) -> Self {
        self.resolve_relative = enabled;
        self
    }

    pub fn excluded_prefixes(&self) -> &[String] {
        &self.excluded_prefixes
    }

    fn is_reserved_path(&self, path: &str) -> bool {
        let Some(rest) = path.strip_prefix('/') else {
            return false;
        };
        match rest.split_once('/') {
            Some((first, _)) => self.excluded_prefixes.iter().any(|p| p == first),
            None => false,
        }
    }

    /// Turn a link into the form used for canonical-URL lookups.
    ///
    /// Links are returned as written unless relative resolution is enabled,
    /// in which case host-less links are joined onto the base URL.
    pub fn resolve<'a>(&self, link: &'a str) -> Cow<'a, str> {
        if !self.resolve_relative {
            return Cow::Borrowed(link);
        }
        match Url::parse(link) {
            Err(url::ParseError::RelativeUrlWithoutBase) => match self.base_url.join(link) {
                Ok(joined) => Cow::Owned(joined.to_string()),
                Err(_) => Cow::Borrowed(link),
            },
            _ => Cow::Borrowed(link),
        }
    }
}

/// How a single `href` value relates to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    Special,
    Reserved,
}

/// Classify one `href` value.
pub fn classify_link(url: &str, site: &SiteContext) -> Result<LinkKind, EngineError> {
    if url.is_empty() || SPECIAL_PREFIXES.iter().any(|p| url.starts_with(p)) {
        return Ok(LinkKind::Special);
    }

    let parsed = if url.starts_with("//") {
        Url::parse(&format!("http:{}", url))
    } else {
        Url::parse(url)
    };

    match parsed {
        Ok(u) => match u.host_str() {
            Some(host) if !host.is_empty() => {
                if host == site.host {
                    Ok(LinkKind::Internal)
                } else {
                    Ok(LinkKind::External)
                }
            }
            _ => Ok(relative_kind(u.path(), site)),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = url.split(['?', '#']).next().unwrap_or_default();
            Ok(relative_kind(path, site))
        }
        Err(e) => Err(EngineError::MalformedUrl(format!("{}: {}", url, e))),
    }
}

fn relative_kind(path: &str, site: &SiteContext) -> LinkKind {
    if site.is_reserved_path(path) {
        LinkKind::Reserved
    } else {
        LinkKind::Internal
    }
}

/// Returns true if `url` points inside the site.
pub fn is_internal_link(url: &str, site: &SiteContext) -> bool {
    matches!(classify_link(url, site), Ok(LinkKind::Internal))
}

/// Iterate over every anchor `href` value in `content`, in document order.
pub fn extract_hrefs(content: &str) -> impl Iterator<Item = &str> {
    HREF_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Distinct internal links in `content`, in first-seen order.
pub fn extract_internal_links(content: &str, site: &SiteContext) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut links = Vec::new();

    for href in extract_hrefs(content) {
        match classify_link(href, site) {
            Ok(LinkKind::Internal) => {
                if seen.insert(href) {
                    links.push(href.to_string());
                }
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "skipping link"),
        }
    }

    links
}
