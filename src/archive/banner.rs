// src/archive/banner.rs

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use std::ops::Range;
use tracing::trace;

/// A table banner: `-- Name --` alone on its line.
static BANNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^-- (.*) --\r?$").expect("banner pattern compiles"));

/// Locate the next banner line in `b`.
///
/// The returned span covers the banner text itself (`-- Name --`) without the
/// line terminator. When there is no further banner the span is
/// `b.len()..b.len()`, which callers use as the end-of-input sentinel.
pub(crate) fn locate(b: &[u8]) -> Range<usize> {
    match BANNER.find(b) {
        Some(m) => {
            let end = if b[..m.end()].ends_with(b"\r") {
                m.end() - 1
            } else {
                m.end()
            };
            trace!(start = m.start(), end, "located banner");
            m.start()..end
        }
        None => b.len()..b.len(),
    }
}

/// Extract the table name from a span produced by [`locate`].
///
/// A span that is not shaped like a banner yields an empty name.
pub(crate) fn table_name(banner: &[u8]) -> String {
    banner
        .strip_prefix(b"-- ")
        .and_then(|rest| rest.strip_suffix(b" --"))
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .unwrap_or_default()
}
