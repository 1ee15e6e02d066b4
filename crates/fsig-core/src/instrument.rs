//! Approved-instrument whitelist.
//!
//! Feed rows spell instruments loosely (`eurusd_otc`, ` BTC-OTC `). Every
//! code is normalized to upper-case with hyphen separators before it is
//! compared against the whitelist.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Instruments approved in this deployment.
pub const DEFAULT_APPROVED_INSTRUMENTS: &[&str] = &[
    "USDPKR-OTC",
    "USDNGN-OTC",
    "BA-OTC",
    "USDEGP-OTC",
    "FB-OTC",
    "USDCOP-OTC",
    "MCD-OTC",
    "INTEL-OTC",
    "PFE-OTC",
    "USDINR-OTC",
    "USDBRL-OTC",
    "NZDUSD-OTC",
    "CADCHF-OTC",
    "NZDCHF-OTC",
    "XAUUSD-OTC",
    "MSFT-OTC",
    "USDPHP-OTC",
    "USCRUDE-OTC",
    "XAGUSD-OTC",
    "USDZAR-OTC",
    "BTC-OTC",
    "NZDJPY-OTC",
    "NZDCAD-OTC",
    "USDBDT-OTC",
    "JNJ-OTC",
    "USDMXN-OTC",
    "USDIDR-OTC",
    "AXP-OTC",
    "USDDZD-OTC",
    "UKBRENT-OTC",
    "EURNZD-OTC",
    "USDARS-OTC",
    "USDTRY-OTC",
];

static DEFAULT_SET: Lazy<HashSet<String>> = Lazy::new(|| {
    DEFAULT_APPROVED_INSTRUMENTS
        .iter()
        .map(|code| normalize_pair(code))
        .collect()
});

/// Normalize an instrument code: trim, `_` to `-`, upper-case.
///
/// Idempotent: normalizing `"EURUSD-OTC"` yields `"EURUSD-OTC"`.
pub fn normalize_pair(raw: &str) -> String {
    raw.trim().replace('_', "-").to_uppercase()
}

/// Fixed set of approved instrument codes.
///
/// There is no mutation API; build a new filter to change the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentFilter {
    approved: HashSet<String>,
}

impl InstrumentFilter {
    /// Build a filter from arbitrary codes (each is normalized on insertion).
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let approved = codes
            .into_iter()
            .map(|code| normalize_pair(code.as_ref()))
            .filter(|code| !code.is_empty())
            .collect();
        Self { approved }
    }

    /// Check whether an already-normalized symbol is approved.
    ///
    /// Empty or unknown input yields `false`.
    pub fn is_approved(&self, symbol: &str) -> bool {
        !symbol.is_empty() && self.approved.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.approved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }

    /// Approved codes in sorted order.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.approved.iter().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl Default for InstrumentFilter {
    fn default() -> Self {
        Self {
            approved: DEFAULT_SET.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pair() {
        assert_eq!(normalize_pair("eurusd_otc"), "EURUSD-OTC");
        assert_eq!(normalize_pair("  Btc_Otc \n"), "BTC-OTC");
        assert_eq!(normalize_pair(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["EURUSD-OTC", "usd_try_otc", " xau_usd-otc "] {
            let once = normalize_pair(raw);
            assert_eq!(normalize_pair(&once), once);
        }
    }

    #[test]
    fn test_default_set() {
        let filter = InstrumentFilter::default();
        assert_eq!(filter.len(), DEFAULT_APPROVED_INSTRUMENTS.len());
        assert!(filter.is_approved("USDTRY-OTC"));
        assert!(filter.is_approved("BTC-OTC"));
        assert!(filter.codes().iter().all(|code| code.ends_with("-OTC")));
    }

    #[test]
    fn test_unknown_and_malformed_are_rejected() {
        let filter = InstrumentFilter::default();
        assert!(!filter.is_approved("EURUSD-OTC"));
        assert!(!filter.is_approved(""));
        assert!(!filter.is_approved("btc-otc"));
        assert!(!filter.is_approved("BTC_OTC"));
    }

    #[test]
    fn test_custom_codes_are_normalized() {
        let filter = InstrumentFilter::new(["eurusd_otc", "  ", "gbpusd-otc"]);
        assert_eq!(filter.len(), 2);
        assert!(filter.is_approved("EURUSD-OTC"));
        assert!(filter.is_approved("GBPUSD-OTC"));
        assert_eq!(filter.codes(), vec!["EURUSD-OTC", "GBPUSD-OTC"]);
    }
}
