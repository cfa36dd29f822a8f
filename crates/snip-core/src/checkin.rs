//! # Check-in Links
//!
//! Each salon has a public check-in URL that is printed as a QR code at the
//! front desk. Customers scan it, give their phone number, and the salon sees
//! their loyalty status.
//!
//! ```text
//! https://sniprewards.com/scan/{salon_id}
//!        │
//!        └──► https://api.qrserver.com/v1/create-qr-code/?size=200x200&data=<check-in url>
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CoreError, CoreResult};
use crate::loyalty::LoyaltyStore;
use crate::tier::Tier;

/// Base of every check-in link.
pub const CHECKIN_BASE_URL: &str = "https://sniprewards.com/scan/";

/// QR image service.
pub const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Edge length of the generated QR image, in pixels.
pub const QR_SIZE: u32 = 200;

const SCAN_SEGMENT: &str = "scan";

/// The check-in URL for a salon.
///
/// The id is pushed as a single path segment, so `/`, `?` and `#` are
/// percent-encoded and the link always stays under `/scan/`.
pub fn checkin_url(salon_id: &str) -> CoreResult<Url> {
    let mut url = Url::parse(CHECKIN_BASE_URL).map_err(|e| CoreError::InvalidLink(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| CoreError::InvalidLink(CHECKIN_BASE_URL.to_string()))?
        .pop_if_empty()
        .push(salon_id);
    Ok(url)
}

/// The QR image URL that encodes a salon's check-in link.
pub fn qr_code_url(salon_id: &str) -> CoreResult<Url> {
    let data = checkin_url(salon_id)?;
    let size = format!("{}x{}", QR_SIZE, QR_SIZE);
    Url::parse_with_params(QR_SERVICE_URL, &[("size", size.as_str()), ("data", data.as_str())])
        .map_err(|e| CoreError::InvalidLink(e.to_string()))
}

/// Extracts the salon id from a check-in link.
///
/// ```rust
/// use snip_core::checkin::parse_salon_id;
///
/// assert_eq!(parse_salon_id("https://sniprewards.com/scan/1").unwrap(), "1");
/// assert!(parse_salon_id("https://sniprewards.com/menu/1").is_err());
/// ```
pub fn parse_salon_id(link: &str) -> CoreResult<String> {
    let url = Url::parse(link.trim()).map_err(|e| CoreError::InvalidLink(e.to_string()))?;

    let mut segments = url
        .path_segments()
        .ok_or_else(|| CoreError::InvalidLink(link.to_string()))?
        .filter(|s| !s.is_empty());

    match (segments.next(), segments.next(), segments.next()) {
        (Some(SCAN_SEGMENT), Some(id), None) => Ok(id.to_string()),
        _ => Err(CoreError::InvalidLink(format!("not a check-in link: {}", link))),
    }
}

// =============================================================================
// Check-in lookup
// =============================================================================

/// What the front desk sees after a customer checks in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub customer_id: String,
    pub name: String,
    pub tier: Tier,
    pub points: i64,
    pub visits: u32,
    pub next_reward_at: u32,
    pub reward_available: bool,
}

/// Looks a customer up by phone. Does not record a visit.
pub fn check_in(store: &LoyaltyStore, phone: &str) -> Option<CheckIn> {
    store.customer_by_phone(phone).map(|c| CheckIn {
        customer_id: c.id.clone(),
        name: c.name.clone(),
        tier: c.tier,
        points: c.points,
        visits: c.visits,
        next_reward_at: c.next_reward_at,
        reward_available: c.reward_available(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkin_url() {
        assert_eq!(
            checkin_url("1").unwrap().as_str(),
            "https://sniprewards.com/scan/1"
        );
    }

    #[test]
    fn test_checkin_url_keeps_id_in_one_segment() {
        let url = checkin_url("a/b?c#d").unwrap();
        assert_eq!(url.path(), "/scan/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        let url = checkin_url("https://evil.example/x").unwrap();
        assert_eq!(url.host_str(), Some("sniprewards.com"));
        assert!(url.path().starts_with("/scan/"));
    }

    #[test]
    fn test_qr_url_encodes_link() {
        let url = qr_code_url("42").unwrap();
        assert_eq!(url.host_str(), Some("api.qrserver.com"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("size".to_string(), "200x200".to_string()));
        assert_eq!(
            pairs[1],
            ("data".to_string(), "https://sniprewards.com/scan/42".to_string())
        );
    }

    #[test]
    fn test_parse_salon_id() {
        assert_eq!(parse_salon_id("https://sniprewards.com/scan/abc-123/").unwrap(), "abc-123");
        assert!(parse_salon_id("not a url").is_err());
        assert!(parse_salon_id("https://sniprewards.com/scan/").is_err());
        assert!(parse_salon_id("https://sniprewards.com/scan/1/extra").is_err());
    }

    #[test]
    fn test_round_trip_through_qr() {
        let qr = qr_code_url("salon-7").unwrap();
        let (_, data) = qr.query_pairs().find(|(k, _)| k == "data").unwrap();
        assert_eq!(parse_salon_id(&data).unwrap(), "salon-7");
    }
}
