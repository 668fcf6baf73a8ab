//! Billing currency resolution.
//!
//! The Cost Management API is inconsistent about where it reports the
//! billing currency, so resolution walks a fixed chain of signals, from
//! cheapest to weakest:
//!
//! 1. a per-row currency column
//! 2. response-level currency metadata
//! 3. a currency token embedded in the pagination link
//! 4. the currency resolved earlier in this session
//! 5. the signed-in user's email domain TLD
//! 6. `"USD"`
//!
//! The TLD table is a last-resort approximation kept for compatibility: a
//! billing account's currency does not have to follow the user's email
//! domain, so it only runs when every real signal is absent.

use url::Url;

/// Terminal default when no signal resolves.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Email-domain TLD to currency table.
const TLD_CURRENCIES: &[(&str, &str)] = &[
    (".uk", "GBP"),
    (".de", "EUR"),
    (".fr", "EUR"),
    (".it", "EUR"),
    (".es", "EUR"),
    (".nl", "EUR"),
    (".at", "EUR"),
    (".jp", "JPY"),
    (".ca", "CAD"),
    (".au", "AUD"),
    (".in", "INR"),
];

// ============================================================================
// Resolution
// ============================================================================

/// Session context for the weaker signals.
#[derive(Debug, Clone, Default)]
pub struct CurrencyContext {
    /// Currency already resolved this session, if any.
    pub session: Option<String>,
    /// Domain part of the signed-in user's email.
    pub email_domain: Option<String>,
}

/// Walks the resolution chain described in the module docs.
pub fn resolve(
    row_currency: Option<&str>,
    metadata_currency: Option<&str>,
    pagination_link: Option<&str>,
    ctx: &CurrencyContext,
) -> String {
    if let Some(c) = normalize_code(row_currency) {
        return c;
    }
    if let Some(c) = normalize_code(metadata_currency) {
        return c;
    }
    if let Some(c) = pagination_link.and_then(currency_from_link) {
        return c;
    }
    if let Some(c) = normalize_code(ctx.session.as_deref()) {
        return c;
    }
    if let Some(c) = ctx
        .email_domain
        .as_deref()
        .and_then(currency_for_domain)
    {
        return c.to_string();
    }
    DEFAULT_CURRENCY.to_string()
}

/// Looks up the TLD table for an email domain.
pub fn currency_for_domain(domain: &str) -> Option<&'static str> {
    let lowered = domain.to_lowercase();
    TLD_CURRENCIES
        .iter()
        .find(|(tld, _)| lowered.ends_with(tld))
        .map(|(_, currency)| *currency)
}

/// Scans a pagination link's query for a currency token.
pub fn currency_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, value)| key.to_lowercase().contains("currency") && !value.is_empty())
        .and_then(|(_, value)| normalize_code(Some(&value)))
}

/// Accepts three-letter alphabetic codes, uppercased.
fn normalize_code(code: Option<&str>) -> Option<String> {
    let code = code?.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_currency_wins() {
        let ctx = CurrencyContext {
            session: Some("GBP".to_string()),
            email_domain: Some("contoso.de".to_string()),
        };
        assert_eq!(resolve(Some("JPY"), Some("EUR"), None, &ctx), "JPY");
    }

    #[test]
    fn test_metadata_beats_link_and_session() {
        let ctx = CurrencyContext {
            session: Some("GBP".to_string()),
            email_domain: None,
        };
        let link = "https://management.azure.com/page?currency=CAD";
        assert_eq!(resolve(None, Some("eur"), Some(link), &ctx), "EUR");
    }

    #[test]
    fn test_link_token() {
        assert_eq!(
            currency_from_link("https://management.azure.com/q?skiptoken=abc&billingCurrency=NOK"),
            Some("NOK".to_string())
        );
        assert_eq!(
            currency_from_link("https://management.azure.com/q?skiptoken=abc"),
            None
        );
        assert_eq!(currency_from_link("not a url"), None);
    }

    #[test]
    fn test_session_cache_beats_heuristic() {
        let ctx = CurrencyContext {
            session: Some("CHF".to_string()),
            email_domain: Some("contoso.de".to_string()),
        };
        assert_eq!(resolve(None, None, None, &ctx), "CHF");
    }

    #[test]
    fn test_tld_table() {
        assert_eq!(currency_for_domain("contoso.co.uk"), Some("GBP"));
        assert_eq!(currency_for_domain("firma.de"), Some("EUR"));
        assert_eq!(currency_for_domain("societe.fr"), Some("EUR"));
        assert_eq!(currency_for_domain("kaisha.jp"), Some("JPY"));
        assert_eq!(currency_for_domain("maple.ca"), Some("CAD"));
        assert_eq!(currency_for_domain("mate.com.au"), Some("AUD"));
        assert_eq!(currency_for_domain("tech.in"), Some("INR"));
        assert_eq!(currency_for_domain("contoso.com"), None);
    }

    #[test]
    fn test_default_when_nothing_resolves() {
        assert_eq!(resolve(None, None, None, &CurrencyContext::default()), "USD");

        let ctx = CurrencyContext {
            session: None,
            email_domain: Some("contoso.com".to_string()),
        };
        assert_eq!(resolve(None, None, None, &ctx), "USD");
    }

    #[test]
    fn test_invalid_codes_rejected() {
        // Non-alphabetic and wrong-length tokens fall through the chain.
        assert_eq!(resolve(Some("US"), Some("DOLLARS"), None, &CurrencyContext::default()), "USD");
        assert_eq!(resolve(Some("12$"), None, None, &CurrencyContext::default()), "USD");
    }
}
