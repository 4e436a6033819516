//! User-agent classification
//!
//! Both classifiers are ordered rule lists where the first match wins.
//! Unrecognized or missing user agents fall back to `Desktop` / `Other`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum DeviceType {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
pub enum Browser {
    Firefox,
    Chrome,
    Safari,
    Edge,
    Opera,
    Other,
}

// tablet 必须先于 mobile 检查，否则 iPad / Android 平板会被归为 Mobile
const TABLET_TOKENS: &[&str] = &["tablet", "ipad", "playbook", "silk"];

const MOBILE_TOKENS: &[&str] = &[
    "mobile",
    "iphone",
    "ipod",
    "android",
    "blackberry",
    "opera mini",
    "windows ce",
    "palm",
    "smartphone",
    "iemobile",
];

/// Case-insensitive token match; tablet tokens are checked before mobile ones.
pub fn classify_device(user_agent: Option<&str>) -> DeviceType {
    let Some(ua) = user_agent else {
        return DeviceType::Desktop;
    };
    let ua = ua.to_ascii_lowercase();

    if TABLET_TOKENS.iter().any(|t| ua.contains(t)) {
        DeviceType::Tablet
    } else if MOBILE_TOKENS.iter().any(|t| ua.contains(t)) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

/// Case-sensitive substring rules. Chrome, Safari and Edge signatures contain
/// each other's tokens, so the order here is significant.
pub fn classify_browser(user_agent: Option<&str>) -> Browser {
    let Some(ua) = user_agent else {
        return Browser::Other;
    };

    if ua.contains("Firefox") {
        Browser::Firefox
    } else if ua.contains("Chrome") && !ua.contains("Edg") {
        Browser::Chrome
    } else if ua.contains("Safari") && !ua.contains("Chrome") {
        Browser::Safari
    } else if ua.contains("Edg") {
        Browser::Edge
    } else if ua.contains("Opera") || ua.contains("OPR") {
        Browser::Opera
    } else {
        Browser::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const EDGE_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const FIREFOX_LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    const OPERA_PRESTO: &str = "Opera/9.80 (Windows NT 6.1; U; en) Presto/2.10.289 Version/12.00";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Tablet";

    #[test]
    fn test_ipad_is_tablet_not_mobile() {
        assert_eq!(classify_device(Some(SAFARI_IPAD)), DeviceType::Tablet);
        assert_eq!(
            classify_device(Some("something iPad Mobile iphone")),
            DeviceType::Tablet
        );
    }

    #[test]
    fn test_device_classification() {
        assert_eq!(classify_device(Some(SAFARI_IPHONE)), DeviceType::Mobile);
        assert_eq!(classify_device(Some(ANDROID_TABLET)), DeviceType::Tablet);
        assert_eq!(classify_device(Some(CHROME_WINDOWS)), DeviceType::Desktop);
        assert_eq!(
            classify_device(Some("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)")),
            DeviceType::Mobile
        );
        assert_eq!(
            classify_device(Some("Mozilla/4.0 (compatible; MSIE 6.0; Windows CE)")),
            DeviceType::Mobile
        );
        assert_eq!(
            classify_device(Some("Mozilla/5.0 (Linux; U; en-us; KFTHWI Build) Silk/3.68")),
            DeviceType::Tablet
        );
    }

    #[test]
    fn test_device_fallback() {
        assert_eq!(classify_device(None), DeviceType::Desktop);
        assert_eq!(classify_device(Some("")), DeviceType::Desktop);
        assert_eq!(classify_device(Some("curl/8.4.0")), DeviceType::Desktop);
    }

    #[test]
    fn test_chrome_signature_with_safari_token_is_chrome() {
        assert_eq!(classify_browser(Some(CHROME_WINDOWS)), Browser::Chrome);
    }

    #[test]
    fn test_edge_wins_over_chrome() {
        assert_eq!(classify_browser(Some(EDGE_WINDOWS)), Browser::Edge);
        assert_eq!(classify_browser(Some("Chrome Edg")), Browser::Edge);
    }

    #[test]
    fn test_browser_classification() {
        assert_eq!(classify_browser(Some(SAFARI_IPHONE)), Browser::Safari);
        assert_eq!(classify_browser(Some(FIREFOX_LINUX)), Browser::Firefox);
        assert_eq!(classify_browser(Some(OPERA_PRESTO)), Browser::Opera);
        // Chromium-based Opera carries a Chrome token and reports as Chrome
        assert_eq!(
            classify_browser(Some("Mozilla/5.0 Chrome/120.0.0.0 Safari/537.36 OPR/106.0.0.0")),
            Browser::Chrome
        );
        assert_eq!(classify_browser(Some("OPR/106.0.0.0")), Browser::Opera);
    }

    #[test]
    fn test_browser_fallback() {
        assert_eq!(classify_browser(None), Browser::Other);
        assert_eq!(classify_browser(Some("curl/8.4.0")), Browser::Other);
        // 区分大小写
        assert_eq!(classify_browser(Some("firefox")), Browser::Other);
    }

    #[test]
    fn test_labels_round_trip_through_strings() {
        assert_eq!(DeviceType::Tablet.as_ref(), "Tablet");
        assert_eq!(Browser::Edge.to_string(), "Edge");
        assert_eq!(Browser::from_str("Safari").unwrap(), Browser::Safari);
        assert!(DeviceType::from_str("Phone").is_err());
    }
}
