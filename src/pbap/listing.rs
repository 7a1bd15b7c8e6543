//! vCard Listing Generation
//!
//! Builds the `x-bt/vcard-listing` XML object: one `card` element per entry inside a
//! fixed `vCard-listing` envelope, without whitespace between elements.

use core::fmt::{self, Write};
use core::ops::Range;

/// XML prolog and opening root element of every listing
pub const LISTING_HEADER: &str = concat!(
    "<?xml version=\"1.0\"?>",
    "<!DOCTYPE vcard-listing SYSTEM \"vcard-listing.dtd\">",
    "<vCard-listing version=\"1.0\">"
);

/// Closing root element of every listing
pub const LISTING_FOOTER: &str = "</vCard-listing>";

/// Attribute carried by each `card` element besides its handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CardAttribute {
    /// `name="…"`
    Name,
    /// `number="…"`
    Number,
}

impl CardAttribute {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Number => "number",
        }
    }
}

/// Page of a source list selected by offset and maximum count
///
/// The page holds `min(len, max_count)` entries starting at `offset`, cut at the end
/// of the list. An offset past the end gives an empty page.
#[must_use]
pub fn page(len: usize, offset: u16, max_count: u16) -> Range<usize> {
    let request = len.min(usize::from(max_count));
    let start = usize::from(offset);
    let end = (start + request).min(len);
    start.min(end)..end
}

/// Listing writer over a page of source entries
#[derive(Debug, Clone)]
pub struct Listing<'a, S: AsRef<str>> {
    /// Source entries, in handle order
    pub entries: &'a [S],
    /// Page of `entries` to list
    pub page: Range<usize>,
    /// Attribute the entry text is emitted as
    pub attribute: CardAttribute,
    /// Handle of the first source entry (0 for the phonebook, 1 for call histories)
    pub index_base: usize,
    /// Only entries starting with this prefix are listed
    pub prefix: Option<&'a str>,
}

impl<S: AsRef<str>> Listing<'_, S> {
    /// Write the complete listing document
    ///
    /// Returns the number of cards written.
    ///
    /// # Errors
    /// Returns an error if the writer fails
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<usize, fmt::Error> {
        out.write_str(LISTING_HEADER)?;

        let mut items = 0;
        let entries = self.entries.get(self.page.clone()).unwrap_or(&[]);
        for (position, entry) in entries.iter().enumerate() {
            let entry = entry.as_ref();
            if self.prefix.is_some_and(|prefix| !entry.starts_with(prefix)) {
                continue;
            }
            let handle = self.page.start + position + self.index_base;
            write!(out, "<card handle=\"{handle}.vcf\" {}=\"", self.attribute.as_str())?;
            write_escaped(out, entry)?;
            out.write_str("\"/>")?;
            items += 1;
        }

        out.write_str(LISTING_FOOTER)?;
        Ok(items)
    }
}

/// Write `value` as XML attribute text
///
/// `&`, `<`, `>`, `"` and `'` go out as entities. Other phonebook servers send the
/// names unescaped, so a client comparing raw bytes sees a difference for these
/// characters only.
fn write_escaped<W: Write>(out: &mut W, value: &str) -> fmt::Result {
    let mut rest = value;
    while let Some(position) = rest.find(|c: char| matches!(c, '&' | '<' | '>' | '"' | '\'')) {
        out.write_str(&rest[..position])?;
        let entity = match rest.as_bytes()[position] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            _ => "&apos;",
        };
        out.write_str(entity)?;
        rest = &rest[position + 1..];
    }
    out.write_str(rest)
}
