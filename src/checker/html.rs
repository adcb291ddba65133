// src/checker/html.rs
// =============================================================================
// This module holds the page rules that run against a fetched HTML page.
//
// Every rule is independent: it looks at the page (and the URL it came from)
// and reports at most one Violation. All rules always run, so one page can
// fail several of them at once.
//
// Rules:
// - include error: a PHP-style "failed to open stream" message in the body
// - language: <html lang="..."> must match the configured language
// - canonical: <link rel="canonical"> must point back at the request URL
// - title: the page needs a non-empty <title>
//
// We use the `scraper` crate which parses HTML into a DOM and supports CSS
// selectors for finding elements (built on html5ever, Mozilla's parser).
// =============================================================================

use scraper::{Html, Selector};

use super::violation::Violation;

// Marker left in the page when a server-side template include fails
const INCLUDE_ERROR_MARKER: &str = "failed to open stream";

/// Runs every page rule against `body` and collects their violations.
///
/// Violations come back in a fixed order: include error, language,
/// canonical link, title.
pub fn check_page(body: &str, url: &str, language: &str) -> Vec<Violation> {
    // Parse the HTML into a document once and share it between the rules
    let document = Html::parse_document(body);

    [
        check_include_error(body, url),
        check_language(&document, url, language),
        check_canonical_link(&document, url),
        check_title(&document, url),
    ]
    .into_iter()
    .flatten()
    .collect()
}

// Looks for the include-failure marker anywhere in the raw body
fn check_include_error(body: &str, url: &str) -> Option<Violation> {
    if body.contains(INCLUDE_ERROR_MARKER) {
        Some(Violation::IncludeError { url: url.to_string() })
    } else {
        None
    }
}

// The root <html> element must declare exactly the expected language.
// A document without a root element is reported like a missing attribute.
fn check_language(document: &Html, url: &str, language: &str) -> Option<Violation> {
    let found = document
        .select(&selector("html"))
        .next()
        .and_then(|root| root.value().attr("lang"));

    if found == Some(language) {
        return None;
    }

    Some(Violation::LanguageMismatch {
        url: url.to_string(),
        expected: language.to_string(),
        found: found.map(str::to_string),
    })
}

// The head must carry a canonical link pointing at the request URL without
// its query string. "https://example.com/" is accepted for
// "https://example.com".
fn check_canonical_link(document: &Html, url: &str) -> Option<Violation> {
    let link = match document.select(&selector(r#"head link[rel~="canonical"]"#)).next() {
        Some(link) => link,
        None => {
            return Some(Violation::MissingCanonical { url: url.to_string() });
        }
    };

    let expected = strip_query(url);
    let href = link.value().attr("href").unwrap_or("");

    if canonical_matches(href, expected) {
        None
    } else {
        Some(Violation::CanonicalMismatch {
            url: url.to_string(),
            href: href.to_string(),
            expected: expected.to_string(),
        })
    }
}

// The first <title> must have some text once whitespace is trimmed
fn check_title(document: &Html, url: &str) -> Option<Violation> {
    let has_title = document
        .select(&selector("title"))
        .next()
        .map(|title| !title.text().collect::<String>().trim().is_empty())
        .unwrap_or(false);

    if has_title {
        None
    } else {
        Some(Violation::MissingTitle { url: url.to_string() })
    }
}

// Everything before the first '?'
fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(index) => &url[..index],
        None => url,
    }
}

// Exact match, or the href only adds a trailing slash the URL lacks
fn canonical_matches(href: &str, expected: &str) -> bool {
    if href == expected {
        return true;
    }

    !expected.ends_with('/') && href.strip_suffix('/') == Some(expected)
}

// Compiles one of the constant selectors above.
// Selector::parse only fails on invalid CSS, and ours are fixed strings, so a
// failure here is a programmer error.
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("page rule selectors are valid CSS")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why parse once in check_page?
//    - Html::parse_document builds the whole DOM tree
//    - Three of the four rules need it, the include rule only needs raw text
//
// 2. What does [rel~="canonical"] mean?
//    - rel is a space-separated list of tokens, ~= matches one of them
//    - So rel="canonical" and rel="canonical alternate" both match
//
// 3. Why .flatten() over an array of Options?
//    - Option implements IntoIterator (zero or one item)
//    - Flattening drops the Nones and keeps the violations in rule order
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "http://localhost/about";

    fn page(lang: &str, head: &str) -> String {
        format!(
            r#"<!DOCTYPE html><html{}><head>{}</head><body><p>Hi</p></body></html>"#,
            lang, head
        )
    }

    #[test]
    fn test_well_formed_page_has_no_violations() {
        let html = page(
            r#" lang="de""#,
            r#"<title>About Us</title><link rel="canonical" href="http://localhost/about">"#,
        );
        assert!(check_page(&html, URL, "de").is_empty());
    }

    #[test]
    fn test_missing_title_and_lang_are_both_reported() {
        let html = page("", r#"<link rel="canonical" href="http://localhost/about">"#);
        let violations = check_page(&html, URL, "de");

        assert_eq!(
            violations,
            vec![
                Violation::LanguageMismatch {
                    url: URL.to_string(),
                    expected: "de".to_string(),
                    found: None,
                },
                Violation::MissingTitle { url: URL.to_string() },
            ]
        );
    }

    #[test]
    fn test_wrong_language() {
        let html = page(
            r#" lang="en""#,
            r#"<title>About</title><link rel="canonical" href="http://localhost/about">"#,
        );
        let violations = check_page(&html, URL, "de");
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            &violations[0],
            Violation::LanguageMismatch { found: Some(found), .. } if found == "en"
        ));
    }

    #[test]
    fn test_configured_language_is_used() {
        let html = page(
            r#" lang="en""#,
            r#"<title>About</title><link rel="canonical" href="http://localhost/about">"#,
        );
        assert!(check_page(&html, URL, "en").is_empty());
    }

    #[test]
    fn test_whitespace_title_is_missing() {
        let html = page(
            r#" lang="de""#,
            r#"<title>   </title><link rel="canonical" href="http://localhost/about">"#,
        );
        assert_eq!(
            check_page(&html, URL, "de"),
            vec![Violation::MissingTitle { url: URL.to_string() }]
        );
    }

    #[test]
    fn test_include_error_marker() {
        let html = page(
            r#" lang="de""#,
            r#"<title>About</title><link rel="canonical" href="http://localhost/about">"#,
        )
        .replace(
            "<p>Hi</p>",
            "Warning: include(header.php): failed to open stream: No such file",
        );
        assert_eq!(
            check_page(&html, URL, "de"),
            vec![Violation::IncludeError { url: URL.to_string() }]
        );
    }

    #[test]
    fn test_missing_canonical() {
        let html = page(r#" lang="de""#, "<title>About</title>");
        assert_eq!(
            check_page(&html, URL, "de"),
            vec![Violation::MissingCanonical { url: URL.to_string() }]
        );
    }

    #[test]
    fn test_canonical_strips_query_string() {
        let html = page(
            r#" lang="de""#,
            r#"<title>About</title><link rel="canonical" href="http://localhost/about">"#,
        );
        assert!(check_page(&html, "http://localhost/about?ref=nav&x=1", "de").is_empty());
    }

    #[test]
    fn test_canonical_trailing_slash_is_tolerated() {
        let html = page(
            r#" lang="de""#,
            r#"<title>About</title><link rel="canonical" href="http://localhost/about/">"#,
        );
        assert!(check_page(&html, URL, "de").is_empty());
    }

    #[test]
    fn test_canonical_with_query_is_one_mismatch_naming_both() {
        let html = page(
            r#" lang="de""#,
            r#"<title>About</title><link rel="canonical" href="http://localhost/about?page=2">"#,
        );
        let violations = check_page(&html, "http://localhost/about?page=2", "de");

        assert_eq!(violations.len(), 1);
        let message = violations[0].to_string();
        assert!(message.contains("http://localhost/about?page=2"));
        assert!(message.contains("expected http://localhost/about"));
    }

    #[test]
    fn test_canonical_matches_rules() {
        assert!(canonical_matches("http://a/x", "http://a/x"));
        assert!(canonical_matches("http://a/x/", "http://a/x"));
        assert!(!canonical_matches("http://a/x", "http://a/x/"));
        assert!(!canonical_matches("http://a/y/", "http://a/x"));
        assert!(!canonical_matches("", "http://a/x"));
    }

    #[test]
    fn test_strip_query_uses_first_question_mark() {
        assert_eq!(strip_query("http://a/x?b=1?c=2"), "http://a/x");
        assert_eq!(strip_query("http://a/x"), "http://a/x");
    }

    #[test]
    fn test_canonical_outside_head_is_missing() {
        let html = r#"<html lang="de"><head><title>T</title></head>
            <body><link rel="canonical" href="http://localhost/about"></body></html>"#;
        // html5ever keeps a <link> inside <body> where it was written
        assert_eq!(
            check_page(html, URL, "de"),
            vec![Violation::MissingCanonical { url: URL.to_string() }]
        );
    }
}
