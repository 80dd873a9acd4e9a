/// Legal suffixes, tried in order; only the first match is removed.
const SUFFIXES: &[&str] = &[", Inc.", ", Inc", " Inc.", " Inc", " LLC", " Ltd", " Ltd."];

/// Normalizes the free-form `company` field of a profile.
///
/// Drops one leading `@` (people often write their org handle) and one
/// trailing legal suffix.
pub fn clean_company_name(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let mut company = raw.trim();
    if let Some(rest) = company.strip_prefix('@') {
        company = rest;
    }

    if let Some(stripped) = SUFFIXES
        .iter()
        .find_map(|suffix| company.strip_suffix(*suffix))
    {
        company = stripped;
    }

    company.trim().to_string()
}
