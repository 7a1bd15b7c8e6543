//! PBAP Application Parameters
//!
//! Requests carry their paging and search options in the OBEX APPLICATION PARAMETERS
//! header as a sequence of `[tag][length][value]` triplets with no overall length
//! prefix. Responses use the same encoding for the phonebook size and new missed
//! calls values.

use super::VcardVersion;
use crate::constants::{MAX_RESPONSE_PARAMETERS_LENGTH, tag, tag_length};
use alloc::string::String;
use core::fmt::Write;
use heapless::Vec;

/// Attribute a listing search value is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SearchAttribute {
    /// Search by name (0)
    Name,
    /// Search by number (1)
    Number,
    /// Search by sound (2)
    Sound,
    /// Any other value sent by the client
    Other(u8),
}

impl From<u8> for SearchAttribute {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Name,
            1 => Self::Number,
            2 => Self::Sound,
            other => Self::Other(other),
        }
    }
}

/// Decoded request parameters of a single GET
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParameters {
    /// Maximum number of entries to return (0 when not supplied)
    pub max_list_count: u16,
    /// Index of the first entry to return
    pub list_start_offset: u16,
    /// Search value, one decimal number per received byte
    pub search_value: String,
    /// Search attribute, if supplied
    pub search_attribute: Option<SearchAttribute>,
    /// Requested vCard format
    pub vcard_version: VcardVersion,
    /// MAXLISTCOUNT was zero: the client only wants the phonebook size
    pub size_only: bool,
}

impl RequestParameters {
    /// Decode an APPLICATION PARAMETERS block
    ///
    /// Returns the decoded parameters and whether every triplet was understood.
    /// Decoding does not stop at an unknown tag: the triplet is skipped by its
    /// declared length and the following triplets are still applied. An empty block
    /// is valid and yields the defaults.
    #[must_use]
    pub fn decode(raw: &[u8]) -> (Self, bool) {
        let mut params = Self::default();
        let mut well_formed = true;
        let mut offset = 0;

        while offset < raw.len() {
            let tag_id = raw[offset];
            let Some(&length) = raw.get(offset + 1) else {
                debug!("[PBAP PARAMS] Truncated triplet header, tag {}", tag_id);
                well_formed = false;
                break;
            };
            let start = offset + 2;
            let end = start + usize::from(length);
            let Some(value) = raw.get(start..end) else {
                debug!(
                    "[PBAP PARAMS] Triplet {} declares {} bytes, {} available",
                    tag_id,
                    length,
                    raw.len() - start.min(raw.len())
                );
                well_formed = false;
                break;
            };
            offset = end;

            if !params.apply(tag_id, value) {
                well_formed = false;
            }
        }

        trace!(
            "[PBAP PARAMS] max_list_count={} list_start_offset={} search_attribute={:?} size_only={}",
            params.max_list_count,
            params.list_start_offset,
            params.search_attribute,
            params.size_only
        );
        (params, well_formed)
    }

    /// Apply one triplet, returns false if the tag or its length is not understood
    fn apply(&mut self, tag_id: u8, value: &[u8]) -> bool {
        match tag_id {
            tag::ORDER | tag::FILTER => true,
            tag::SEARCH_VALUE => {
                for &byte in value {
                    // Signed decimal per byte, clients depend on this exact rendering
                    #[allow(clippy::cast_possible_wrap)]
                    let _ = write!(self.search_value, "{}", byte as i8);
                }
                true
            }
            tag::SEARCH_ATTRIBUTE => match value {
                [attribute] if value.len() == tag_length::SEARCH_ATTRIBUTE => {
                    self.search_attribute = Some(SearchAttribute::from(*attribute));
                    true
                }
                _ => false,
            },
            tag::MAX_LIST_COUNT => match read_u16(value, tag_length::MAX_LIST_COUNT) {
                Some(0) => {
                    self.size_only = true;
                    true
                }
                Some(count) => {
                    self.max_list_count = count;
                    true
                }
                None => false,
            },
            tag::LIST_START_OFFSET => match read_u16(value, tag_length::LIST_START_OFFSET) {
                Some(start) => {
                    self.list_start_offset = start;
                    true
                }
                None => false,
            },
            tag::FORMAT => match value {
                [format] if value.len() == tag_length::FORMAT => {
                    self.vcard_version = if *format == 0 {
                        VcardVersion::V21
                    } else {
                        VcardVersion::V30
                    };
                    true
                }
                _ => false,
            },
            _ => {
                warn!("[PBAP PARAMS] Unknown application parameter tag {}", tag_id);
                false
            }
        }
    }

    /// Search value with surrounding whitespace removed, `None` when blank
    #[must_use]
    pub fn search_filter(&self) -> Option<&str> {
        let value = self.search_value.trim();
        if value.is_empty() { None } else { Some(value) }
    }
}

fn read_u16(value: &[u8], expected_length: usize) -> Option<u16> {
    match value {
        [high, low] if value.len() == expected_length => Some(u16::from_be_bytes([*high, *low])),
        _ => None,
    }
}

/// APPLICATION PARAMETERS block of a response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseParameters {
    buffer: Vec<u8, MAX_RESPONSE_PARAMETERS_LENGTH>,
}

impl ResponseParameters {
    /// Create an empty parameter block
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append the phonebook size triplet, saturating at `u16::MAX`
    pub fn add_phonebook_size(&mut self, size: usize) {
        let size = u16::try_from(size).unwrap_or(u16::MAX);
        self.push_triplet(tag::PHONEBOOK_SIZE, &size.to_be_bytes());
    }

    /// Append the new missed calls triplet, saturating at `u8::MAX`
    pub fn add_new_missed_calls(&mut self, count: usize) {
        let count = u8::try_from(count).unwrap_or(u8::MAX);
        self.push_triplet(tag::NEW_MISSED_CALLS, &[count]);
    }

    fn push_triplet(&mut self, tag_id: u8, value: &[u8]) {
        debug_assert!(value.len() <= usize::from(u8::MAX));
        #[allow(clippy::cast_possible_truncation)]
        let header = [tag_id, value.len() as u8];
        if self.buffer.extend_from_slice(&header).is_err()
            || self.buffer.extend_from_slice(value).is_err()
        {
            error!("[PBAP PARAMS] Response parameter block overflow, tag {}", tag_id);
        }
    }

    /// Encoded triplets
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Check if no triplet was added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_empty_block() {
        let (params, ok) = RequestParameters::decode(&[]);

        assert!(ok);
        assert_eq!(params, RequestParameters::default());
        assert_eq!(params.vcard_version, VcardVersion::V21);
        assert!(params.search_filter().is_none());
    }

    #[test]
    fn test_decode_max_list_count() {
        let (params, ok) = RequestParameters::decode(&[0x04, 0x02, 0x00, 0x05]);
        assert!(ok);
        assert_eq!(params.max_list_count, 5);
        assert!(!params.size_only);

        let (params, ok) = RequestParameters::decode(&[0x04, 0x02, 0x01, 0x00]);
        assert!(ok);
        assert_eq!(params.max_list_count, 256);

        let (params, ok) = RequestParameters::decode(&[0x04, 0x02, 0x00, 0x00]);
        assert!(ok);
        assert!(params.size_only);
        assert_eq!(params.max_list_count, 0);
    }

    #[test]
    fn test_decode_paging_and_format() {
        let raw = [
            0x05, 0x02, 0x00, 0x03, // list start offset 3
            0x04, 0x02, 0x00, 0x0A, // max list count 10
            0x07, 0x01, 0x01, // vCard 3.0
            0x06, 0x08, 0, 0, 0, 0, 0, 0, 0, 0x87, // filter, ignored
            0x01, 0x01, 0x00, // order, ignored
        ];
        let (params, ok) = RequestParameters::decode(&raw);

        assert!(ok);
        assert_eq!(params.list_start_offset, 3);
        assert_eq!(params.max_list_count, 10);
        assert_eq!(params.vcard_version, VcardVersion::V30);
    }

    #[test]
    fn test_decode_search_value_digits() {
        // "Al" arrives as bytes 0x41 0x6C and is rendered digit-per-byte
        let (params, ok) = RequestParameters::decode(&[0x02, 0x02, 0x41, 0x6C]);
        assert!(ok);
        assert_eq!(params.search_value, "65108");

        // Bytes are rendered as signed values
        let (params, ok) = RequestParameters::decode(&[0x02, 0x02, 0x05, 0x80]);
        assert!(ok);
        assert_eq!(params.search_value, "5-128");

        // Repeated triplets append
        let (params, _) = RequestParameters::decode(&[0x02, 0x01, 0x01, 0x02, 0x01, 0x02]);
        assert_eq!(params.search_value, "12");
    }

    #[test]
    fn test_decode_search_attribute() {
        let (params, ok) = RequestParameters::decode(&[0x03, 0x01, 0x00]);
        assert!(ok);
        assert_eq!(params.search_attribute, Some(SearchAttribute::Name));

        let (params, _) = RequestParameters::decode(&[0x03, 0x01, 0x01]);
        assert_eq!(params.search_attribute, Some(SearchAttribute::Number));

        let (params, _) = RequestParameters::decode(&[0x03, 0x01, 0x02]);
        assert_eq!(params.search_attribute, Some(SearchAttribute::Sound));

        let (params, _) = RequestParameters::decode(&[0x03, 0x01, 0x07]);
        assert_eq!(params.search_attribute, Some(SearchAttribute::Other(7)));
    }

    #[test]
    fn test_decode_unknown_tag_continues() {
        let raw = [
            0x42, 0x02, 0xAA, 0xBB, // unknown
            0x04, 0x02, 0x00, 0x07, // still applied
        ];
        let (params, ok) = RequestParameters::decode(&raw);

        assert!(!ok);
        assert_eq!(params.max_list_count, 7);
    }

    #[test]
    fn test_decode_truncated_triplet() {
        let (params, ok) = RequestParameters::decode(&[0x04, 0x02, 0x00]);
        assert!(!ok);
        assert_eq!(params.max_list_count, 0);
        assert!(!params.size_only);

        let (_, ok) = RequestParameters::decode(&[0x05, 0x02, 0x00, 0x01, 0x04]);
        assert!(!ok);
    }

    #[test]
    fn test_decode_wrong_fixed_length() {
        let raw = [
            0x04, 0x01, 0x05, // max list count with one byte
            0x05, 0x02, 0x00, 0x02,
        ];
        let (params, ok) = RequestParameters::decode(&raw);

        assert!(!ok);
        assert_eq!(params.max_list_count, 0);
        assert_eq!(params.list_start_offset, 2);
    }

    #[test]
    fn test_search_filter_trims() {
        let params = RequestParameters {
            search_value: String::from("  12 "),
            ..RequestParameters::default()
        };
        assert_eq!(params.search_filter(), Some("12"));

        let params = RequestParameters {
            search_value: String::from("   "),
            ..RequestParameters::default()
        };
        assert_eq!(params.search_filter(), None);
    }

    #[test]
    fn test_response_parameters_encoding() {
        let mut response = ResponseParameters::new();
        assert!(response.is_empty());

        response.add_phonebook_size(0x0123);
        response.add_new_missed_calls(4);
        assert_eq!(response.as_bytes(), &[0x08, 0x02, 0x01, 0x23, 0x09, 0x01, 0x04]);
    }

    #[test]
    fn test_response_parameters_saturate() {
        let mut response = ResponseParameters::new();
        response.add_phonebook_size(70_000);
        response.add_new_missed_calls(300);

        assert_eq!(response.as_bytes(), &[0x08, 0x02, 0xFF, 0xFF, 0x09, 0x01, 0xFF]);
    }
}
