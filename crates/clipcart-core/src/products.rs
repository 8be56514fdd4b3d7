use serde::{Deserialize, Serialize};

use crate::status::{ProductStatus, Track};

/// A product captured from a listing page, normalized for storage.
///
/// `origin_url` is the identity: collecting the same URL twice must not
/// create a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedProduct {
    pub title: String,
    /// Canonical listing URL, e.g. `"https://m.example-mall.com/item/8714"`.
    pub origin_url: String,
    pub category: Option<String>,
    /// Host site the listing was collected from (e.g. `"aliexpress"`).
    pub origin_site: Option<String>,
    pub affiliate_url: Option<String>,
    pub status: String,
    pub track: String,
    /// Collection date as `YYYYMMDD`.
    pub collected_date: String,
    /// Free-form price string exactly as scraped, e.g. `"US $12.99"`.
    pub price_info: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CollectedProduct {
    /// A minimal pending record for a URL collected before any page scrape
    /// has run. Title defaults to `"PENDING"` until enrichment.
    #[must_use]
    pub fn pending(origin_url: &str, title: Option<&str>, track: Track) -> Self {
        Self {
            title: title.unwrap_or("PENDING").to_string(),
            origin_url: origin_url.to_string(),
            category: None,
            origin_site: None,
            affiliate_url: Some("PENDING".to_string()),
            status: ProductStatus::ReadyToDownload.as_str().to_string(),
            track: track.as_str().to_string(),
            collected_date: "19700101".to_string(),
            price_info: None,
            tags: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_defaults_title_and_status() {
        let product = CollectedProduct::pending("https://site/x", None, Track::Auto);
        assert_eq!(product.title, "PENDING");
        assert_eq!(product.status, "READY_TO_DOWNLOAD");
        assert_eq!(product.track, "AUTO");
        assert_eq!(product.affiliate_url.as_deref(), Some("PENDING"));
    }

    #[test]
    fn pending_uses_given_title() {
        let product =
            CollectedProduct::pending("https://site/x", Some("Gadget"), Track::Manual);
        assert_eq!(product.title, "Gadget");
        assert_eq!(product.track, "MANUAL");
    }

    #[test]
    fn serde_roundtrip() {
        let product = CollectedProduct::pending("https://site/x", Some("Gadget"), Track::Auto);
        let json = serde_json::to_string(&product).expect("serialization failed");
        let decoded: CollectedProduct =
            serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(decoded.origin_url, product.origin_url);
        assert_eq!(decoded.title, product.title);
    }
}
