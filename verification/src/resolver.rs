//! Identifier Resolver: raw verification input to canonical ledger id.
//!
//! Accepted forms, tried in order:
//! - a bare identifier matching the ledger grammar
//! - a URL carrying the identifier in a known query parameter
//!   (`https://host/verify?productId=<id>`)
//! - a deep-link path ending in `/result/<id>`, as a full URL or bare path
//!
//! Whatever is extracted must itself match the grammar. No form performs
//! any I/O.

use tracing::debug;
use url::Url;

use certum_crypto::IdentifierGrammar;
use certum_types::LedgerId;

use crate::ResolveError;

/// Query parameters that carry the identifier in QR payloads and links.
pub const DEFAULT_QUERY_PARAMS: [&str; 2] = ["productId", "mintAddress"];

const RESULT_SEGMENT: &str = "result";

#[derive(Clone, Debug)]
pub struct IdentifierResolver {
    grammar: IdentifierGrammar,
    params: Vec<String>,
}

impl IdentifierResolver {
    pub fn new(grammar: IdentifierGrammar, params: Vec<String>) -> Self {
        Self { grammar, params }
    }

    /// A resolver over `grammar` with the default query parameters.
    pub fn with_grammar(grammar: IdentifierGrammar) -> Self {
        Self::new(
            grammar,
            DEFAULT_QUERY_PARAMS.iter().map(|p| p.to_string()).collect(),
        )
    }

    pub fn grammar(&self) -> &IdentifierGrammar {
        &self.grammar
    }

    pub fn resolve(&self, raw: &str) -> Result<LedgerId, ResolveError> {
        let input = raw.trim();
        if let Some(id) = self.grammar.parse(input) {
            return Ok(id);
        }

        let extracted = parse_link(input).and_then(|url| self.extract(&url));
        match extracted.as_deref().and_then(|c| self.grammar.parse(c)) {
            Some(id) => {
                debug!(ledger_id = %id, "identifier extracted from link");
                Ok(id)
            }
            None => Err(ResolveError::InvalidIdentifierFormat {
                input: raw.to_string(),
            }),
        }
    }

    fn extract(&self, url: &Url) -> Option<String> {
        for param in &self.params {
            if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == param.as_str()) {
                return Some(value.into_owned());
            }
        }
        result_segment(url)
    }
}

impl Default for IdentifierResolver {
    fn default() -> Self {
        Self::with_grammar(IdentifierGrammar::default())
    }
}

/// Absolute URLs parse as-is; bare paths are read against a placeholder
/// origin.
fn parse_link(input: &str) -> Option<Url> {
    match Url::parse(input) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) if input.starts_with('/') => {
            Url::parse("http://localhost").ok()?.join(input).ok()
        }
        Err(_) => None,
    }
}

fn result_segment(url: &Url) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [.., marker, id] if *marker == RESULT_SEGMENT => Some(id.to_string()),
        _ => None,
    }
}

/// The deep link a verifier opens for `id`: `<base>/verify?productId=<id>`.
///
/// This is the QR payload printed on products; [`IdentifierResolver`]
/// accepts it.
pub fn verification_link(base_url: &str, id: &LedgerId) -> String {
    format!(
        "{}/verify?{}={}",
        base_url.trim_end_matches('/'),
        DEFAULT_QUERY_PARAMS[0],
        id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINT: &str = "4Nd1mBQtrMJVYVfKf2PJy9NZUZdTAsp7D4xWLs4gDB4T";

    fn test_resolver() -> IdentifierResolver {
        IdentifierResolver::with_grammar(IdentifierGrammar::alphanumeric(4, 64))
    }

    #[test]
    fn bare_identifier_is_returned_unchanged() {
        let id = test_resolver().resolve("6yHknown").unwrap();
        assert_eq!(id.as_str(), "6yHknown");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let id = test_resolver().resolve("  6yHknown\n").unwrap();
        assert_eq!(id.as_str(), "6yHknown");
    }

    #[test]
    fn extracts_from_query_parameter() {
        let resolver = test_resolver();
        let id = resolver
            .resolve("https://host/verify?productId=6yHknown")
            .unwrap();
        assert_eq!(id.as_str(), "6yHknown");
        let id = resolver
            .resolve("https://host/verify?ref=qr&mintAddress=6yHknown")
            .unwrap();
        assert_eq!(id.as_str(), "6yHknown");
    }

    #[test]
    fn extracts_from_result_path() {
        let resolver = test_resolver();
        assert_eq!(
            resolver.resolve("https://host/result/6yHknown").unwrap().as_str(),
            "6yHknown"
        );
        assert_eq!(
            resolver.resolve("/result/6yHknown").unwrap().as_str(),
            "6yHknown"
        );
        assert_eq!(
            resolver.resolve("/verify?productId=6yHknown").unwrap().as_str(),
            "6yHknown"
        );
    }

    #[test]
    fn rejects_malformed_input() {
        let resolver = test_resolver();
        for input in [
            "not a real id!!",
            "",
            "https://host/verify",
            "https://host/verify?productId=bad%20id",
            "https://host/result/",
            "/elsewhere/6yHknown",
        ] {
            assert!(
                matches!(
                    resolver.resolve(input),
                    Err(ResolveError::InvalidIdentifierFormat { .. })
                ),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn solana_grammar_resolves_mint_addresses() {
        let resolver = IdentifierResolver::default();
        let link = format!("https://certum.example/verify?productId={MINT}");
        assert_eq!(resolver.resolve(&link).unwrap().as_str(), MINT);
        assert!(resolver.resolve("6yHknown").is_err());
    }

    #[test]
    fn generated_links_resolve_back() {
        let id = LedgerId::new(MINT);
        let link = verification_link("http://localhost:5173/", &id);
        assert_eq!(link, format!("http://localhost:5173/verify?productId={MINT}"));
        assert_eq!(IdentifierResolver::default().resolve(&link).unwrap(), id);
    }

    #[test]
    fn diagnostic_mentions_format() {
        let err = test_resolver().resolve("not a real id!!").unwrap_err();
        assert!(err.to_string().contains("format"));
    }
}
