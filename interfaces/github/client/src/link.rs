//! `Link` header parsing (RFC 8288), as used by GitHub list endpoints:
//!
//! ```text
//! <https://api.github.com/repositories/1/stargazers?page=2>; rel="next",
//! <https://api.github.com/repositories/1/stargazers?page=34>; rel="last"
//! ```

use reqwest::Url;

/// Target URL of the link whose `rel` includes `relation`.
pub fn find_relation<'a>(header: &'a str, relation: &str) -> Option<&'a str> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;

        let matches = parts.any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case(relation))
        });

        matches.then_some(target)
    })
}

/// `page` query parameter of the `rel="last"` link.
pub fn last_page(header: &str) -> Option<u32> {
    let target = find_relation(header, "last")?;
    let url = Url::parse(target).ok()?;

    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
