//! Lenient URL splitting into scheme, userinfo, host, port, path, query and fragment.
//!
//! Nothing is decoded or re-encoded: the pieces are slices of the input so the
//! rebuilt URL differs from the original only where the validator changes it
//! (lower-cased scheme and host).

use crate::error::InvalidUrlReason;

/// Components of a URL as written by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParsedUrl {
    pub scheme: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl ParsedUrl {
    pub fn has_credentials(&self) -> bool {
        self.user.is_some() || self.password.is_some()
    }
}

/// Splits `input` into its components.
///
/// Returns `Unparseable` when an authority (`//...`) is present but cannot be
/// split into a non-empty host and a valid port. Inputs without an authority
/// (relative paths, `file:///...`, `mailto:...`) parse with `host == None`.
pub(crate) fn parse_url(input: &str) -> Result<ParsedUrl, InvalidUrlReason> {
    let input = input.trim();
    let mut parsed = ParsedUrl::default();

    let after_scheme = match split_scheme(input) {
        Some((scheme, rest)) => {
            parsed.scheme = Some(scheme.to_string());
            rest
        }
        None if looks_like_host_port(input) => {
            // "example.com:8080/path": authority without scheme or slashes.
            let tail = parse_authority(input, &mut parsed)?;
            parse_tail(tail, &mut parsed);
            return Ok(parsed);
        }
        None => input,
    };

    match after_scheme.strip_prefix("//") {
        Some(rest)
            if rest.starts_with('/')
                && parsed
                    .scheme
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case("file")) =>
        {
            parse_tail(rest, &mut parsed);
        }
        Some(rest) => {
            let tail = parse_authority(rest, &mut parsed)?;
            parse_tail(tail, &mut parsed);
        }
        None => parse_tail(after_scheme, &mut parsed),
    }

    Ok(parsed)
}

/// Returns `(scheme, rest)` when `input` starts with `scheme:`.
fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let colon = input.find(':')?;
    let scheme = &input[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    if looks_like_host_port(input) {
        return None;
    }
    Some((scheme, &input[colon + 1..]))
}

/// `host:1234` optionally followed by a path, query or fragment.
fn looks_like_host_port(input: &str) -> bool {
    let Some(colon) = input.find(':') else {
        return false;
    };
    if input[..colon].is_empty() || input[..colon].contains(['/', '?', '#', '@']) {
        return false;
    }
    let after = &input[colon + 1..];
    let digits = after.find(['/', '?', '#']).map_or(after, |end| &after[..end]);
    (1..=5).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses `[userinfo@]host[:port]` from the start of `rest`; returns what follows it.
fn parse_authority<'a>(rest: &'a str, parsed: &mut ParsedUrl) -> Result<&'a str, InvalidUrlReason> {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(end);
    if authority.is_empty() {
        return Err(InvalidUrlReason::Unparseable);
    }

    let host_port = match authority.rfind('@') {
        Some(at) => {
            let userinfo = &authority[..at];
            match userinfo.split_once(':') {
                Some((user, password)) => {
                    parsed.user = Some(user.to_string());
                    parsed.password = Some(password.to_string());
                }
                None => parsed.user = Some(userinfo.to_string()),
            }
            &authority[at + 1..]
        }
        None => authority,
    };

    let (host, port) = if host_port.starts_with('[') {
        let close = host_port.find(']').ok_or(InvalidUrlReason::Unparseable)?;
        let after = &host_port[close + 1..];
        let port = match after {
            "" => "",
            _ => after.strip_prefix(':').ok_or(InvalidUrlReason::Unparseable)?,
        };
        (&host_port[..=close], port)
    } else {
        host_port.rsplit_once(':').unwrap_or((host_port, ""))
    };

    if host.is_empty() {
        return Err(InvalidUrlReason::Unparseable);
    }
    parsed.host = Some(host.to_string());
    parsed.port = parse_port(port)?;

    Ok(tail)
}

fn parse_port(port: &str) -> Result<Option<u16>, InvalidUrlReason> {
    if port.is_empty() {
        return Ok(None);
    }
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidUrlReason::Unparseable);
    }
    port.parse::<u16>()
        .map(Some)
        .map_err(|_| InvalidUrlReason::Unparseable)
}

/// Splits `path?query#fragment`; empty pieces stay `None`.
fn parse_tail(tail: &str, parsed: &mut ParsedUrl) {
    let (rest, fragment) = match tail.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (tail, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    parsed.path = non_empty(path);
    parsed.query = query.and_then(non_empty);
    parsed.fragment = fragment.and_then(non_empty);
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
