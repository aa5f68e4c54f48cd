//! Header / body / footer splitting

use crate::patterns::{DELIMITER, RUN_METADATA_MARKER};

/// Raw, untrimmed sections of a changelog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<'a> {
    /// Text before the first delimiter line
    pub header: Option<&'a str>,
    /// Everything between the header and the footer
    pub body: &'a str,
    /// Text after the last delimiter line
    pub footer: Option<&'a str>,
}

/// Split text on delimiter lines.
///
/// With a single delimiter the right side is sniffed for `Last ran:` to tell a
/// footer from a body. A header that itself mentions `Last ran:` is therefore
/// misread as a footer; the convention accepts that ambiguity.
pub fn split_sections(text: &str) -> Sections<'_> {
    let delimiters: Vec<_> = DELIMITER.find_iter(text).collect();

    match delimiters.as_slice() {
        [] => Sections {
            header: None,
            body: text,
            footer: None,
        },
        [only] => {
            let left = &text[..only.start()];
            let right = &text[only.end()..];
            if right.contains(RUN_METADATA_MARKER) {
                Sections {
                    header: None,
                    body: left,
                    footer: Some(right),
                }
            } else {
                Sections {
                    header: Some(left),
                    body: right,
                    footer: None,
                }
            }
        }
        [first, .., last] => Sections {
            header: Some(&text[..first.start()]),
            body: &text[first.end()..last.start()],
            footer: Some(&text[last.end()..]),
        },
    }
}
