//! Credential masking for URLs that end up in logs.

use std::borrow::Cow;

const MASK: &str = "***";

/// Replaces the userinfo of `url` (`user:password@`) with `***@`.
///
/// Works on raw input as well as normalized URLs; anything without an `@`
/// in its authority is returned unchanged.
pub fn redact_credentials(url: &str) -> Cow<'_, str> {
    let start = match url.find("//") {
        Some(i) if !url[..i].contains(['/', '?', '#']) => i + 2,
        _ => 0,
    };
    let rest = &url[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    match rest[..end].rfind('@') {
        Some(at) => Cow::Owned(format!("{}{}{}", &url[..start], MASK, &rest[at..])),
        None => Cow::Borrowed(url),
    }
}
