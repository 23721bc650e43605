//! URL-safe organization slugs.

/// Used when a name has no ASCII letters or digits.
const FALLBACK_SLUG: &str = "org";

/// Hex characters of the name digest appended to the slug.
const DIGEST_LEN: usize = 6;

/// Lower-case `name` and collapse every run of characters outside
/// `[a-z0-9]` into one hyphen, trimming hyphens at both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Slug used as the upsert key: `{slugify(name)}-{md5(name)[..6]}`.
///
/// Deterministic for a given name, so re-importing an unchanged sheet
/// updates the same rows.
pub fn org_slug(name: &str) -> String {
    let digest = format!("{:x}", md5::compute(name.as_bytes()));
    format!("{}-{}", slugify(name), &digest[..DIGEST_LEN])
}
