#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod constants;
pub mod obex;
pub mod pbap;

pub use obex::{GetRequest, ObexOperation, ResponseCode};
pub use pbap::{
    ContentCategory, ContentSource, InMemoryContentSource, ObjectType, PbapError, PbapServer,
    PbapServerOptions, SessionEvent, SessionListener,
};
