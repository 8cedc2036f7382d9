//! Permalink → file name and permalink → absolute URL derivation.
//!
//! Every consumer that needs to know where a page's QR image lives goes
//! through [`filename_from_permalink`]: the manifest builder when writing
//! images, and [`widget_href`] when an embedded widget recomputes the image
//! path from the browser location. Keeping one rule avoids the two drifting
//! apart.
//!
//! ## File Names
//!
//! - `/docs/intro` → `docs_intro.png`
//! - `/docs/guides/setup/` → `docs_guides_setup.png`
//! - `/docs/a?b=1&c#d` → `docs_a_b=1_c_d.png`
//! - `/` → `home.png`

use url::Url;

/// Characters replaced by `_` in derived file names.
const UNSAFE_CHARS: &[char] = &['/', '?', '&', '#', ':', '%'];

/// File stem used when a permalink normalizes to nothing (the site root).
pub const ROOT_STEM: &str = "home";

/// Fallback origin when the site has no configured URL.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Derive the image file name for a permalink.
///
/// Strips exactly one leading and one trailing slash, replaces each of
/// `/ ? & # : %` with `_`, collapses runs of underscores and appends `.png`.
pub fn filename_from_permalink(permalink: &str) -> String {
    let trimmed = permalink.strip_prefix('/').unwrap_or(permalink);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let mut stem = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        let c = if UNSAFE_CHARS.contains(&c) { '_' } else { c };
        if c == '_' && stem.ends_with('_') {
            continue;
        }
        stem.push(c);
    }

    if stem.is_empty() {
        stem.push_str(ROOT_STEM);
    }
    format!("{stem}.png")
}

/// The absolute base every permalink resolves against: origin plus the
/// site's base path, without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteBase {
    base: String,
    resolver: Url,
}

impl SiteBase {
    /// Build from the site URL (`https://example.com`) and base path (`/`).
    ///
    /// An empty site URL falls back to [`DEFAULT_ORIGIN`].
    pub fn new(site_url: &str, base_url: &str) -> Result<Self, url::ParseError> {
        let origin = site_url.strip_suffix('/').unwrap_or(site_url);
        let origin = if origin.is_empty() {
            DEFAULT_ORIGIN
        } else {
            origin
        };
        let joined = format!("{origin}{base_url}");
        let base = joined.strip_suffix('/').unwrap_or(&joined).to_string();
        let resolver = Url::parse(&format!("{base}/"))?;
        Ok(Self { base, resolver })
    }

    /// The base without trailing slash, e.g. `https://example.com/handbook`.
    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Resolve a permalink to the absolute page URL.
    pub fn page_url(&self, permalink: &str) -> Result<Url, url::ParseError> {
        let relative = permalink.strip_prefix('/').unwrap_or(permalink);
        self.resolver.join(relative)
    }
}

/// Public site-relative path of an image, e.g. `/qr/docs_intro.png`.
pub fn public_file(public_path: &str, filename: &str) -> String {
    format!("{}/{}", public_path.trim_end_matches('/'), filename)
}

/// Remove the site's base path from a browser pathname, keeping the
/// leading slash.
///
/// - `("/handbook/docs/intro", "/handbook/")` → `"/docs/intro"`
/// - `("/docs/intro", "/")` → `"/docs/intro"`
pub fn strip_base_url<'a>(pathname: &'a str, base_url: &str) -> &'a str {
    if base_url.is_empty() || base_url == "/" {
        return pathname;
    }
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    match pathname.strip_prefix(base) {
        Some(rest) if rest.starts_with('/') => rest,
        Some("") => "/",
        _ => pathname,
    }
}

/// Image href an embedded widget should link to for the page it is on.
///
/// The pathname is the browser location (including the site base path);
/// the result is prefixed with the base path again so it is servable.
///
/// - `("/docs/intro/", "/", "/qr")` → `"/qr/docs_intro.png"`
/// - `("/handbook/docs/intro", "/handbook/", "/qr")` → `"/handbook/qr/docs_intro.png"`
pub fn widget_href(pathname: &str, base_url: &str, public_path: &str) -> String {
    let permalink = strip_base_url(pathname, base_url);
    let file = public_file(public_path, &filename_from_permalink(permalink));
    let base = base_url.trim_end_matches('/');
    format!("{base}{file}")
}
