use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// RFC 3986 unreserved characters are the only ones left as-is.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const UNRESERVED_AND_SLASH: &AsciiSet = &UNRESERVED.remove(b'/');

/// Percent-encodes everything except the unreserved characters `A-Z a-z 0-9 - . _ ~`. This is
/// the encoding OAuth 1.0a signatures are computed over.
pub(crate) fn percent_encode(s: &str) -> Cow<str> {
    utf8_percent_encode(s, UNRESERVED).into()
}

/// Like [`percent_encode`], but leaves `/` untouched. Spaces become `%20` rather than `+`, which
/// is what LinkedIn's authorization endpoint expects.
pub(crate) fn quote(s: &str) -> Cow<str> {
    utf8_percent_encode(s, UNRESERVED_AND_SLASH).into()
}
