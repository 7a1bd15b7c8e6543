//! Test doubles shared by the PBAP unit tests

use super::ContentCategory;
use super::content::{ContentSource, InMemoryContentSource};
use super::vcard::{Contact, VcardVersion};
use crate::obex::ObexOperation;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

/// Operation recording everything the server sends, with injectable failures
#[derive(Debug, Default)]
pub struct RecordingOperation {
    pub headers: Vec<Vec<u8>>,
    pub body: Vec<u8>,
    pub stream_opened: bool,
    pub stream_closed: bool,
    pub closed: bool,
    pub fail_headers: bool,
    pub fail_open: bool,
    pub fail_write: bool,
    pub fail_close: bool,
}

impl RecordingOperation {
    pub fn body_str(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

impl ObexOperation for RecordingOperation {
    type Error = ();

    fn send_headers(&mut self, application_parameters: &[u8]) -> Result<(), Self::Error> {
        if self.fail_headers {
            return Err(());
        }
        self.headers.push(application_parameters.to_vec());
        Ok(())
    }

    fn open_output_stream(&mut self) -> Result<(), Self::Error> {
        if self.fail_open {
            return Err(());
        }
        self.stream_opened = true;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_write {
            return Err(());
        }
        self.body.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn close_output_stream(&mut self) -> Result<(), Self::Error> {
        self.stream_closed = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if self.fail_close {
            return Err(());
        }
        self.closed = true;
        Ok(())
    }
}

/// Six phonebook entries (owner first) and three calls in each history
pub fn sample_source() -> InMemoryContentSource {
    InMemoryContentSource::new(Contact::new("Owner", "100"))
        .with_contact(Contact::new("Al Smith", "5550101"))
        .with_contact(Contact::new("Bob", "5550102"))
        .with_contact(Contact::new("Alice", "5550103"))
        .with_contact(Contact::new("Carol", "2020"))
        .with_contact(Contact::new("Alan", "5550105"))
        .with_call(ContentCategory::IncomingCalls, Contact::new("Alice", "5550103"))
        .with_call(ContentCategory::IncomingCalls, Contact::new("Bob", "5550102"))
        .with_call(ContentCategory::IncomingCalls, Contact::new("", "999"))
        .with_call(ContentCategory::OutgoingCalls, Contact::new("Carol", "2020"))
        .with_call(ContentCategory::OutgoingCalls, Contact::new("Alan", "5550105"))
        .with_call(ContentCategory::OutgoingCalls, Contact::new("Bob", "5550102"))
        .with_call(ContentCategory::MissedCalls, Contact::new("Missed One", "301"))
        .with_call(ContentCategory::MissedCalls, Contact::new("Missed Two", "302"))
        .with_call(ContentCategory::MissedCalls, Contact::new("Missed Three", "303"))
}

/// Content source counting every query other than the size query
#[derive(Debug)]
pub struct CountingSource {
    inner: InMemoryContentSource,
    pub body_queries: Cell<usize>,
}

impl CountingSource {
    pub fn new(inner: InMemoryContentSource) -> Self {
        Self {
            inner,
            body_queries: Cell::new(0),
        }
    }

    fn count(&self) {
        self.body_queries.set(self.body_queries.get() + 1);
    }
}

impl ContentSource for CountingSource {
    fn phonebook_size(&self, category: ContentCategory) -> usize {
        self.inner.phonebook_size(category)
    }

    fn phonebook_entry(
        &self,
        category: ContentCategory,
        index: usize,
        version: VcardVersion,
    ) -> String {
        self.count();
        self.inner.phonebook_entry(category, index, version)
    }

    fn phonebook_name_list(&self) -> Vec<String> {
        self.count();
        self.inner.phonebook_name_list()
    }

    fn phonebook_number_list(&self) -> Vec<String> {
        self.count();
        self.inner.phonebook_number_list()
    }

    fn call_log_list(&self, category: ContentCategory) -> Vec<String> {
        self.count();
        self.inner.call_log_list(category)
    }
}
