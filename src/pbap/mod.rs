//! Phone Book Access Profile (PBAP) Server Implementation
//!
//! This module implements the Phone Book Server Equipment (PSE) side of PBAP on top of
//! an OBEX session. It decodes application parameters, resolves which phonebook object a
//! request refers to, and assembles listings, single vCards and full phonebook
//! downloads from a [`ContentSource`].
//!
//! ## Architecture
//!
//! - **Parameters**: application parameter triplet decoding and response encoding
//! - **Path**: virtual folder navigation and content category resolution
//! - **Listing / Response**: body generation for the three object types
//! - **Session**: per-connection state (current folder, missed call bookkeeping)
//! - **Server**: dispatcher for CONNECT, DISCONNECT, SETPATH, GET and PUT
//!
//! ## Usage
//!
//! ```rust
//! use bondybird_pbap::obex::{GetRequest, ResponseCode};
//! use bondybird_pbap::pbap::{InMemoryContentSource, PbapServer, PbapServerOptions};
//! use bondybird_pbap::pbap::vcard::Contact;
//!
//! let source = InMemoryContentSource::new(Contact::new("Me", "+15550100"));
//! let mut server = PbapServer::new(source, PbapServerOptions::default());
//!
//! assert_eq!(server.on_set_path(false, false, Some("telecom")), ResponseCode::Ok);
//! assert_eq!(server.on_set_path(false, false, Some("pb")), ResponseCode::Ok);
//! assert_eq!(server.current_path(), "/telecom/pb");
//! ```

pub mod content;
pub mod listing;
pub mod params;
pub mod path;
pub mod response;
pub mod server;
pub mod session;
pub mod vcard;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use content::{ContentSource, InMemoryContentSource};
pub use params::{RequestParameters, ResponseParameters, SearchAttribute};
pub use server::{PbapServer, PbapServerOptions};
pub use session::{PendingReplies, SessionEvent, SessionListener, SessionState};
pub use vcard::VcardVersion;

use crate::constants::{TYPE_LISTING, TYPE_PHONEBOOK, TYPE_VCARD};
use crate::obex::ResponseCode;

/// Phonebook object a request refers to
///
/// The declaration order is the priority order used when a category is inferred from
/// an object name: a name containing several tokens resolves to the first one here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContentCategory {
    /// Main phonebook (`pb`)
    Phonebook,
    /// Incoming call history (`ich`)
    IncomingCalls,
    /// Outgoing call history (`och`)
    OutgoingCalls,
    /// Missed call history (`mch`)
    MissedCalls,
    /// Combined call history (`cch`)
    CombinedCalls,
}

impl ContentCategory {
    /// All categories in name-matching priority order
    pub const ALL: [Self; 5] = [
        Self::Phonebook,
        Self::IncomingCalls,
        Self::OutgoingCalls,
        Self::MissedCalls,
        Self::CombinedCalls,
    ];

    /// Object name token identifying the category
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Phonebook => "pb",
            Self::IncomingCalls => "ich",
            Self::OutgoingCalls => "och",
            Self::MissedCalls => "mch",
            Self::CombinedCalls => "cch",
        }
    }

    /// Virtual folder holding the category
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Phonebook => "/telecom/pb",
            Self::IncomingCalls => "/telecom/ich",
            Self::OutgoingCalls => "/telecom/och",
            Self::MissedCalls => "/telecom/mch",
            Self::CombinedCalls => "/telecom/cch",
        }
    }

    /// Index of the first addressable entry
    ///
    /// Phonebook entries start at `0.vcf` (the owner's own card), call history
    /// entries start at `1.vcf`.
    #[must_use]
    pub const fn index_base(self) -> usize {
        match self {
            Self::Phonebook => 0,
            _ => 1,
        }
    }

    /// Check if the category is one of the call histories
    #[must_use]
    pub const fn is_call_history(self) -> bool {
        !matches!(self, Self::Phonebook)
    }

    /// Find the category whose folder is exactly `path`
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.path() == path)
    }

    /// Find the first category whose token occurs anywhere in `name`
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| name.contains(category.token()))
    }
}

/// Object type requested by a GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ObjectType {
    /// `x-bt/vcard-listing`
    Listing,
    /// `x-bt/vcard`
    Vcard,
    /// `x-bt/phonebook`
    Phonebook,
}

impl ObjectType {
    /// Parse the TYPE header value; matching is exact
    #[must_use]
    pub fn from_mime(value: &str) -> Option<Self> {
        match value {
            TYPE_LISTING => Some(Self::Listing),
            TYPE_VCARD => Some(Self::Vcard),
            TYPE_PHONEBOOK => Some(Self::Phonebook),
            _ => None,
        }
    }

    /// TYPE header value for this object type
    #[must_use]
    pub const fn as_mime(self) -> &'static str {
        match self {
            Self::Listing => TYPE_LISTING,
            Self::Vcard => TYPE_VCARD,
            Self::Phonebook => TYPE_PHONEBOOK,
        }
    }
}

/// PBAP server errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PbapError {
    /// Application parameters contained an unknown or truncated triplet
    MalformedParameters,
    /// SETPATH target is not a legal folder
    InvalidPath,
    /// SETPATH target is not a legal folder and the client asked to create it
    PathForbidden,
    /// Current folder, name and type do not identify any phonebook object
    UnresolvableCategory,
    /// TYPE header is missing or not a PBAP object type
    UnsupportedType,
    /// vCard object name is too short or its index is not a number
    InvalidName,
    /// Phonebook object name does not carry the `.vcf` extension
    NotVcfName,
    /// Requested entry index is outside the addressable range
    OutOfRange,
    /// Search by sound was requested
    UnsupportedSearch,
    /// Search attribute is neither name, number nor sound
    InvalidSearchAttribute,
    /// CONNECT target header does not identify the PBAP service
    WrongTarget,
    /// Output stream or operation failed on the transport
    Io,
}

impl PbapError {
    /// OBEX response code reported to the client for this error
    #[must_use]
    pub const fn response_code(self) -> ResponseCode {
        match self {
            Self::MalformedParameters
            | Self::InvalidPath
            | Self::UnresolvableCategory
            | Self::UnsupportedType
            | Self::InvalidName => ResponseCode::BadRequest,
            Self::PathForbidden => ResponseCode::Forbidden,
            Self::NotVcfName | Self::OutOfRange | Self::WrongTarget => ResponseCode::NotAcceptable,
            Self::UnsupportedSearch => ResponseCode::NotImplemented,
            Self::InvalidSearchAttribute => ResponseCode::PreconditionFailed,
            Self::Io => ResponseCode::InternalError,
        }
    }
}

impl core::fmt::Display for PbapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MalformedParameters => write!(f, "Malformed application parameters"),
            Self::InvalidPath => write!(f, "Path is not legal"),
            Self::PathForbidden => write!(f, "Path creation is forbidden"),
            Self::UnresolvableCategory => write!(f, "Request does not identify a phonebook object"),
            Self::UnsupportedType => write!(f, "Unknown object type"),
            Self::InvalidName => write!(f, "Invalid vCard object name"),
            Self::NotVcfName => write!(f, "Object name is not .vcf"),
            Self::OutOfRange => write!(f, "Requested vCard is out of range"),
            Self::UnsupportedSearch => write!(f, "Search by sound is not supported"),
            Self::InvalidSearchAttribute => write!(f, "Search attribute not supported"),
            Self::WrongTarget => write!(f, "Wrong OBEX target"),
            Self::Io => write!(f, "Transport I/O failure"),
        }
    }
}

impl From<PbapError> for ResponseCode {
    fn from(error: PbapError) -> Self {
        error.response_code()
    }
}
