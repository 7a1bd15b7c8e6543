//! `BondyBird` PBAP Constants
//!
//! This module contains the constants used throughout the PBAP server: the OBEX
//! target identifier, the object types a client may request, application parameter
//! tags and their fixed lengths, and limits of the bounded session state.

/// Length of an OBEX target UUID in bytes
pub const UUID_LENGTH: usize = 16;

/// 128-bit OBEX target UUID identifying the Phone Book Access service
pub const PBAP_TARGET: [u8; UUID_LENGTH] = [
    0x79, 0x61, 0x35, 0xf0, 0xf0, 0xc5, 0x11, 0xd8, 0x09, 0x66, 0x08, 0x00, 0x20, 0x0c, 0x9a, 0x66,
];

/// Object type for a vCard listing request
pub const TYPE_LISTING: &str = "x-bt/vcard-listing";

/// Object type for a single vCard entry request
pub const TYPE_VCARD: &str = "x-bt/vcard";

/// Object type for a full phonebook download request
pub const TYPE_PHONEBOOK: &str = "x-bt/phonebook";

/// Minimum length of a vCard object name (`N.vcf`)
pub const VCARD_NAME_MIN_LENGTH: usize = 5;

/// Length of the suffix stripped from a vCard object name before parsing the index
pub const VCARD_NAME_SUFFIX_LENGTH: usize = 4;

/// Extension expected after the first `.` of a phonebook object name
pub const VCF_EXTENSION: &str = "vcf";

/// Maximum length of the virtual current path (`/SIM1/telecom/cch` is the longest legal one)
pub const MAX_PATH_LENGTH: usize = 32;

/// Maximum size of the application parameter block sent in a response
/// (phonebook size triplet + new missed calls triplet)
pub const MAX_RESPONSE_PARAMETERS_LENGTH: usize = 7;

/// Application parameter tag identifiers
pub mod tag {
    /// Sorting order (ignored by this server)
    pub const ORDER: u8 = 0x01;
    /// Search value
    pub const SEARCH_VALUE: u8 = 0x02;
    /// Search attribute (name, number or sound)
    pub const SEARCH_ATTRIBUTE: u8 = 0x03;
    /// Maximum number of entries to return
    pub const MAX_LIST_COUNT: u8 = 0x04;
    /// Offset of the first entry to return
    pub const LIST_START_OFFSET: u8 = 0x05;
    /// vCard property filter (ignored by this server)
    pub const FILTER: u8 = 0x06;
    /// vCard format (0 = 2.1, 1 = 3.0)
    pub const FORMAT: u8 = 0x07;
    /// Number of entries in the phonebook (response only)
    pub const PHONEBOOK_SIZE: u8 = 0x08;
    /// Number of missed calls since the last check (response only)
    pub const NEW_MISSED_CALLS: u8 = 0x09;
}

/// Fixed value lengths of application parameter triplets
pub mod tag_length {
    /// Search attribute value length
    pub const SEARCH_ATTRIBUTE: usize = 1;
    /// Maximum list count value length
    pub const MAX_LIST_COUNT: usize = 2;
    /// List start offset value length
    pub const LIST_START_OFFSET: usize = 2;
    /// Format value length
    pub const FORMAT: usize = 1;
    /// Phonebook size value length
    pub const PHONEBOOK_SIZE: usize = 2;
    /// New missed calls value length
    pub const NEW_MISSED_CALLS: usize = 1;
}
