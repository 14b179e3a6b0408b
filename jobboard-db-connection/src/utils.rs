use std::borrow::Cow;

/// Redact the credentials portion of a connection URL so it can be logged.
///
/// URLs without a `scheme://` prefix (for example `sqlite::memory:`) carry
/// no credentials and are returned unchanged.
pub fn sanitize_database_url(raw: &str) -> Cow<'_, str> {
    let Some(scheme_end) = raw.find("://") else {
        return Cow::Borrowed(raw);
    };
    let rest = &raw[scheme_end + 3..];
    let authority_end = rest.find('/').unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at_pos) => Cow::Owned(format!(
            "{}****:****@{}",
            &raw[..scheme_end + 3],
            &rest[at_pos + 1..]
        )),
        None => Cow::Borrowed(raw),
    }
}
