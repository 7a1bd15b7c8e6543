//! PBAP Response Assembly
//!
//! Produces the three GET responses (vCard listing, single vCard, phonebook download)
//! on an [`ObexOperation`], together with the phonebook size and new missed calls
//! application parameters derived from the session state.
//!
//! Every body push opens the output stream, writes, then closes the stream and the
//! operation on every exit path. A failing close turns the result into
//! [`PbapError::Io`] even when the body went out.

use super::listing::{CardAttribute, Listing, page};
use super::params::{RequestParameters, ResponseParameters, SearchAttribute};
use super::session::SessionState;
use super::{ContentCategory, ContentSource, PbapError};
use crate::constants::{VCARD_NAME_MIN_LENGTH, VCARD_NAME_SUFFIX_LENGTH, VCF_EXTENSION};
use crate::obex::ObexOperation;
use core::fmt::{self, Write};

/// Outcome of sending the application parameter headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderOutcome {
    /// The response is complete, no body follows
    Complete,
    /// The caller continues with the body on the same operation
    SendBody,
}

/// Send the application parameters owed for the current GET
///
/// Consumes the session's pending replies:
///
/// * size only: the phonebook size (and the new missed calls count when pending) is sent
///   as headers with an empty body, and the response is complete
/// * new missed calls only: the count is sent as headers and the body follows
/// * nothing pending: nothing is sent
///
/// # Errors
/// Returns [`PbapError::Io`] if the operation fails
pub fn send_pending_parameters<C, O>(
    session: &mut SessionState,
    source: &C,
    op: &mut O,
    category: ContentCategory,
) -> Result<HeaderOutcome, PbapError>
where
    C: ContentSource + ?Sized,
    O: ObexOperation,
{
    let pending = session.take_pending();
    let mut parameters = ResponseParameters::new();

    if pending.size_only {
        let size = source.phonebook_size(category);
        parameters.add_phonebook_size(size);
        if pending.missed_call_delta {
            let new_missed = session.take_missed_call_delta(size);
            parameters.add_new_missed_calls(new_missed);
        }
        debug!(
            "[PBAP] Sending phonebook size {} for {:?} without body",
            size, category
        );
        push_header(op, &parameters)?;
        return Ok(HeaderOutcome::Complete);
    }

    if pending.missed_call_delta {
        let size = source.phonebook_size(ContentCategory::MissedCalls);
        let new_missed = session.take_missed_call_delta(size);
        parameters.add_new_missed_calls(new_missed);
        debug!("[PBAP] Sending {} new missed calls ahead of body", new_missed);
        if op.send_headers(parameters.as_bytes()).is_err() {
            error!("[PBAP] Sending response headers failed");
            // The close outcome does not change the result
            let _ = close_stream(op, false);
            return Err(PbapError::Io);
        }
    }

    Ok(HeaderOutcome::SendBody)
}

/// Send a vCard listing
///
/// # Errors
/// Returns [`PbapError::UnsupportedSearch`] for search by sound,
/// [`PbapError::InvalidSearchAttribute`] for an unknown search attribute and
/// [`PbapError::Io`] if the operation fails.
pub fn pull_vcard_listing<C, O>(
    session: &mut SessionState,
    source: &C,
    op: &mut O,
    params: &RequestParameters,
    category: ContentCategory,
) -> Result<(), PbapError>
where
    C: ContentSource + ?Sized,
    O: ObexOperation,
{
    let attribute = match params.search_attribute {
        None => {
            debug!("[PBAP] Search attribute not set, searching by name");
            CardAttribute::Name
        }
        Some(SearchAttribute::Name) => CardAttribute::Name,
        Some(SearchAttribute::Number) => CardAttribute::Number,
        Some(SearchAttribute::Sound) => {
            warn!("[PBAP] Search by sound is not supported");
            return Err(PbapError::UnsupportedSearch);
        }
        Some(SearchAttribute::Other(value)) => {
            warn!("[PBAP] Search attribute {} not supported", value);
            return Err(PbapError::InvalidSearchAttribute);
        }
    };

    if send_pending_parameters(session, source, op, category)? == HeaderOutcome::Complete {
        return Ok(());
    }

    let (entries, attribute, prefix) = match category {
        ContentCategory::Phonebook => {
            let entries = match attribute {
                CardAttribute::Name => source.phonebook_name_list(),
                CardAttribute::Number => source.phonebook_number_list(),
            };
            (entries, attribute, params.search_filter())
        }
        _ => (source.call_log_list(category), CardAttribute::Name, None),
    };

    let listing = Listing {
        entries: &entries,
        page: page(entries.len(), params.list_start_offset, params.max_list_count),
        attribute,
        index_base: category.index_base(),
        prefix,
    };
    debug!(
        "[PBAP] Listing {:?}, {} entries, page {}..{}",
        category,
        entries.len(),
        listing.page.start,
        listing.page.end
    );

    push_body(op, |out| {
        let items = listing.write_to(out)?;
        debug!("[PBAP] Listed {} items", items);
        Ok(())
    })
}

/// Send a single vCard
///
/// `name` is the vCard object name (`N.vcf`): the last four characters are stripped
/// and the rest is the handle. A blank handle addresses entry 0. Single vCards never
/// carry application parameters.
///
/// # Errors
/// Returns [`PbapError::InvalidName`] if the name is too short or the handle is not a
/// number, [`PbapError::OutOfRange`] if the handle is not addressable in the category
/// and [`PbapError::Io`] if the operation fails.
pub fn pull_vcard_entry<C, O>(
    source: &C,
    op: &mut O,
    params: &RequestParameters,
    category: ContentCategory,
    name: Option<&str>,
) -> Result<(), PbapError>
where
    C: ContentSource + ?Sized,
    O: ObexOperation,
{
    let handle = parse_vcard_handle(name)?;
    let size = source.phonebook_size(category);

    let index = usize::try_from(handle)
        .ok()
        .and_then(|handle| handle.checked_sub(category.index_base()))
        .filter(|&index| index < size)
        .ok_or_else(|| {
            warn!(
                "[PBAP] vCard handle {} not acceptable for {:?} ({} entries)",
                handle, category, size
            );
            PbapError::OutOfRange
        })?;

    let entry = source.phonebook_entry(category, index, params.vcard_version);
    push_body(op, |out| out.write_str(&entry))
}

/// Send a phonebook download: the vCards of one page, concatenated
///
/// # Errors
/// Returns [`PbapError::NotVcfName`] if the name has an extension other than `.vcf`
/// and [`PbapError::Io`] if the operation fails.
pub fn pull_phonebook<C, O>(
    session: &mut SessionState,
    source: &C,
    op: &mut O,
    params: &RequestParameters,
    category: ContentCategory,
    name: Option<&str>,
) -> Result<(), PbapError>
where
    C: ContentSource + ?Sized,
    O: ObexOperation,
{
    if let Some(name) = name {
        check_vcf_extension(name)?;
    }

    if send_pending_parameters(session, source, op, category)? == HeaderOutcome::Complete {
        return Ok(());
    }

    let size = source.phonebook_size(category);
    let range = page(size, params.list_start_offset, params.max_list_count);
    debug!(
        "[PBAP] Phonebook download {:?}, {} entries, page {}..{}",
        category, size, range.start, range.end
    );

    push_body(op, |out| {
        for index in range {
            let entry = source.phonebook_entry(category, index, params.vcard_version);
            out.write_str(&entry)?;
        }
        Ok(())
    })
}

/// Parse the handle of a vCard object name
fn parse_vcard_handle(name: Option<&str>) -> Result<i32, PbapError> {
    // Lengths count characters, not bytes
    let name = name
        .filter(|name| name.chars().count() >= VCARD_NAME_MIN_LENGTH)
        .ok_or_else(|| {
            warn!("[PBAP] vCard name missing or shorter than {}", VCARD_NAME_MIN_LENGTH);
            PbapError::InvalidName
        })?;

    let suffix_start = name
        .char_indices()
        .rev()
        .nth(VCARD_NAME_SUFFIX_LENGTH - 1)
        .map(|(position, _)| position)
        .ok_or(PbapError::InvalidName)?;
    let handle = &name[..suffix_start];
    if handle.trim().is_empty() {
        return Ok(0);
    }

    handle.parse().map_err(|_| {
        warn!("[PBAP] vCard handle {} is not a number", handle);
        PbapError::InvalidName
    })
}

/// Check the extension after the first `.` of a phonebook object name
fn check_vcf_extension(name: &str) -> Result<(), PbapError> {
    let Some(dot) = name.find('.') else {
        return Ok(());
    };
    let extension = name.as_bytes().get(dot + 1..dot + 1 + VCF_EXTENSION.len());
    if extension.is_some_and(|extension| extension.eq_ignore_ascii_case(VCF_EXTENSION.as_bytes()))
    {
        Ok(())
    } else {
        warn!("[PBAP] Name {} is not .vcf", name);
        Err(PbapError::NotVcfName)
    }
}

/// Send headers with an empty body
fn push_header<O: ObexOperation>(op: &mut O, parameters: &ResponseParameters) -> Result<(), PbapError> {
    let sent = op
        .send_headers(parameters.as_bytes())
        .and_then(|()| op.open_output_stream());
    let flushed = match sent {
        Ok(()) => op.flush().map_err(|_| PbapError::Io),
        Err(_) => {
            error!("[PBAP] Sending header-only response failed");
            Err(PbapError::Io)
        }
    };
    let closed = close_stream(op, sent.is_ok());
    flushed.and(closed)
}

/// Open the output stream, write the body, close stream and operation
fn push_body<O, F>(op: &mut O, body: F) -> Result<(), PbapError>
where
    O: ObexOperation,
    F: FnOnce(&mut BodyWriter<'_, O>) -> fmt::Result,
{
    let opened = op.open_output_stream();
    let written = match opened {
        Ok(()) => {
            let mut writer = BodyWriter {
                op: &mut *op,
                failed: false,
            };
            let result = body(&mut writer);
            if result.is_err() || writer.failed {
                error!("[PBAP] Writing response body failed");
                Err(PbapError::Io)
            } else {
                Ok(())
            }
        }
        Err(_) => {
            error!("[PBAP] Opening output stream failed");
            Err(PbapError::Io)
        }
    };
    let closed = close_stream(op, opened.is_ok());
    written.and(closed)
}

/// Close the output stream (if it was opened) and the operation
fn close_stream<O: ObexOperation>(op: &mut O, stream_open: bool) -> Result<(), PbapError> {
    let mut result = Ok(());
    if stream_open && op.close_output_stream().is_err() {
        error!("[PBAP] Output stream close failed");
        result = Err(PbapError::Io);
    }
    if op.close().is_err() {
        error!("[PBAP] Operation close failed");
        result = Err(PbapError::Io);
    }
    result
}

/// [`fmt::Write`] adapter over an operation's output stream
struct BodyWriter<'a, O: ObexOperation> {
    op: &'a mut O,
    failed: bool,
}

impl<O: ObexOperation> fmt::Write for BodyWriter<'_, O> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        self.op.write(s.as_bytes()).map_err(|_| {
            self.failed = true;
            fmt::Error
        })
    }
}
