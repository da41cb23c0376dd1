//! Product-page collaborator for wishlist enrichment, plus validation of the
//! submitted URLs. Scraping itself lives behind [`ProductFetcher`]; the
//! server only cares that it best-effort returns title/image/price.

use async_trait::async_trait;
use url::Url;

use crate::error::ApiError;

/// Retail domain variants a wishlist URL may point at.
const ALLOWED_HOSTS: [&str; 3] = ["amazon.com", "www.amazon.com", "smile.amazon.com"];

#[derive(Debug, Clone, Default)]
pub struct ProductInfo {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<String>,
}

#[async_trait]
pub trait ProductFetcher: Send + Sync {
    /// Best-effort scrape of title/image/price for a product page.
    async fn fetch(&self, url: &Url) -> anyhow::Result<ProductInfo>;
}

/// Fetcher that never enriches; items are stored with null fields.
#[derive(Debug, Clone, Copy)]
pub struct NullFetcher;

#[async_trait]
impl ProductFetcher for NullFetcher {
    async fn fetch(&self, _url: &Url) -> anyhow::Result<ProductInfo> {
        Ok(ProductInfo::default())
    }
}

/// Pull the ten-character ASIN out of a product URL, if present. Fetcher
/// implementations use it to hit the canonical product page.
pub fn extract_asin(url: &Url) -> Option<String> {
    lazy_static::lazy_static! {
        static ref ASIN_RE: regex::Regex =
            regex::Regex::new(r"(?i)/(?:dp|gp/product)/([A-Z0-9]{10})").unwrap();
    }
    ASIN_RE
        .captures(url.path())
        .map(|c| c[1].to_ascii_uppercase())
}

/// Validate a submitted wishlist URL: parseable, allow-listed host, https.
pub fn validate_wishlist_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim())
        .map_err(|_| ApiError::Validation("Invalid URL format".into()))?;
    let host = url.host_str().unwrap_or_default().to_lowercase();
    if !ALLOWED_HOSTS.contains(&host.as_str()) {
        return Err(ApiError::Validation("Must be an Amazon.com URL".into()));
    }
    if url.scheme() != "https" {
        return Err(ApiError::Validation("URL must use HTTPS".into()));
    }
    Ok(url)
}
