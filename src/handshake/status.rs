//! Status catalog.
//!
//! Maps the status codes the fixture knows how to advertise to their reason
//! phrases. The table is static and read-only; lookups never fail.

/// Phrase returned for codes absent from the catalog.
pub const UNKNOWN_PHRASE: &str = "Unknown";

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    pub code: u32,
    pub phrase: &'static str,
}

/// Every status code the fixture has a canonical phrase for.
pub const CATALOG: &[StatusEntry] = &[
    StatusEntry { code: 101, phrase: "Switching Protocols" },
    StatusEntry { code: 200, phrase: "OK" },
    StatusEntry { code: 301, phrase: "Moved Permanently" },
    StatusEntry { code: 302, phrase: "Found" },
    StatusEntry { code: 303, phrase: "See Other" },
    StatusEntry { code: 304, phrase: "Not Modified" },
    StatusEntry { code: 307, phrase: "Temporary Redirect" },
    StatusEntry { code: 308, phrase: "Permanent Redirect" },
    StatusEntry { code: 401, phrase: "Unauthorized" },
    StatusEntry { code: 402, phrase: "Payment Required" },
    StatusEntry { code: 404, phrase: "Not Found" },
];

/// Reason phrase for `code`, or [`UNKNOWN_PHRASE`].
pub fn phrase_for(code: u32) -> &'static str {
    CATALOG
        .iter()
        .find(|entry| entry.code == code)
        .map(|entry| entry.phrase)
        .unwrap_or(UNKNOWN_PHRASE)
}
