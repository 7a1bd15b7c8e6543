//! vCard Composition
//!
//! Minimal vCard 2.1 / 3.0 writer used by [`InMemoryContentSource`](super::InMemoryContentSource).
//! Content sources backed by a real contact database usually compose their own cards.

use alloc::string::String;
use core::fmt::{self, Write};

/// vCard format requested by the client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VcardVersion {
    /// vCard 2.1, the PBAP default
    #[default]
    V21,
    /// vCard 3.0
    V30,
}

impl VcardVersion {
    /// Value of the `VERSION` property
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::V21 => "2.1",
            Self::V30 => "3.0",
        }
    }
}

/// Contact or call record exposed through PBAP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Display name, may be empty for unknown callers
    pub name: String,
    /// Telephone number
    pub number: String,
}

impl Contact {
    /// Create a new contact
    #[must_use]
    pub fn new(name: &str, number: &str) -> Self {
        Self {
            name: String::from(name),
            number: String::from(number),
        }
    }

    /// Name shown in listings: the display name, or the number when the name is empty
    #[must_use]
    pub fn listing_name(&self) -> &str {
        if self.name.is_empty() {
            &self.number
        } else {
            &self.name
        }
    }

    /// Write the contact as a vCard
    ///
    /// # Errors
    /// Returns an error if the writer fails
    pub fn write_vcard<W: Write>(&self, out: &mut W, version: VcardVersion) -> fmt::Result {
        write!(out, "BEGIN:VCARD\r\nVERSION:{}\r\n", version.as_str())?;
        write!(out, "N:{}\r\n", self.name)?;
        if version == VcardVersion::V30 {
            write!(out, "FN:{}\r\n", self.name)?;
        }
        if !self.number.is_empty() {
            write!(out, "TEL:{}\r\n", self.number)?;
        }
        write!(out, "END:VCARD\r\n")
    }

    /// Compose the contact as a vCard string
    #[must_use]
    pub fn to_vcard(&self, version: VcardVersion) -> String {
        let mut card = String::new();
        // Writing into a String cannot fail
        let _ = self.write_vcard(&mut card, version);
        card
    }
}
