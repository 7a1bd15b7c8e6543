//! Phonebook Content Sources
//!
//! The server never stores contacts or call history itself; it pulls everything
//! through [`ContentSource`]. Sessions sharing one source wrap it in an
//! [`embassy_sync::blocking_mutex::Mutex`], which serializes their reads.

use super::ContentCategory;
use super::vcard::{Contact, VcardVersion};
use alloc::string::String;
use alloc::vec::Vec;
use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

/// Read access to phonebook and call history data
///
/// Indices are 0-based for every category. For [`ContentCategory::Phonebook`], index 0
/// is the owner's own card.
pub trait ContentSource {
    /// Number of entries in the category
    fn phonebook_size(&self, category: ContentCategory) -> usize;

    /// Formatted vCard of the entry at `index`
    fn phonebook_entry(&self, category: ContentCategory, index: usize, version: VcardVersion)
    -> String;

    /// Phonebook names, in handle order
    fn phonebook_name_list(&self) -> Vec<String>;

    /// Phonebook numbers, in handle order
    fn phonebook_number_list(&self) -> Vec<String>;

    /// Names shown for a call history category, in handle order
    fn call_log_list(&self, category: ContentCategory) -> Vec<String>;
}

impl<T: ContentSource + ?Sized> ContentSource for &T {
    fn phonebook_size(&self, category: ContentCategory) -> usize {
        (**self).phonebook_size(category)
    }

    fn phonebook_entry(
        &self,
        category: ContentCategory,
        index: usize,
        version: VcardVersion,
    ) -> String {
        (**self).phonebook_entry(category, index, version)
    }

    fn phonebook_name_list(&self) -> Vec<String> {
        (**self).phonebook_name_list()
    }

    fn phonebook_number_list(&self) -> Vec<String> {
        (**self).phonebook_number_list()
    }

    fn call_log_list(&self, category: ContentCategory) -> Vec<String> {
        (**self).call_log_list(category)
    }
}

impl<M: RawMutex, C: ContentSource> ContentSource for Mutex<M, C> {
    fn phonebook_size(&self, category: ContentCategory) -> usize {
        self.lock(|source| source.phonebook_size(category))
    }

    fn phonebook_entry(
        &self,
        category: ContentCategory,
        index: usize,
        version: VcardVersion,
    ) -> String {
        self.lock(|source| source.phonebook_entry(category, index, version))
    }

    fn phonebook_name_list(&self) -> Vec<String> {
        self.lock(|source| source.phonebook_name_list())
    }

    fn phonebook_number_list(&self) -> Vec<String> {
        self.lock(|source| source.phonebook_number_list())
    }

    fn call_log_list(&self, category: ContentCategory) -> Vec<String> {
        self.lock(|source| source.call_log_list(category))
    }
}

/// Content source keeping contacts and call history in memory
///
/// The combined call history is maintained automatically: every recorded incoming,
/// outgoing or missed call is also appended to it.
#[derive(Debug, Clone)]
pub struct InMemoryContentSource {
    owner: Contact,
    contacts: Vec<Contact>,
    incoming: Vec<Contact>,
    outgoing: Vec<Contact>,
    missed: Vec<Contact>,
    combined: Vec<Contact>,
}

impl InMemoryContentSource {
    /// Create a source holding only the owner's card
    #[must_use]
    pub fn new(owner: Contact) -> Self {
        Self {
            owner,
            contacts: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
            missed: Vec::new(),
            combined: Vec::new(),
        }
    }

    /// Builder variant of [`Self::add_contact`]
    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.add_contact(contact);
        self
    }

    /// Builder variant of [`Self::record_call`]
    #[must_use]
    pub fn with_call(mut self, category: ContentCategory, caller: Contact) -> Self {
        self.record_call(category, caller);
        self
    }

    /// Append a contact to the phonebook
    pub fn add_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Record a call in a call history
    ///
    /// Recording into [`ContentCategory::CombinedCalls`] only touches the combined
    /// history; recording into [`ContentCategory::Phonebook`] is ignored.
    pub fn record_call(&mut self, category: ContentCategory, caller: Contact) {
        let history = match category {
            ContentCategory::Phonebook => {
                warn!("[PBAP CONTENT] Ignoring call recorded into the phonebook");
                return;
            }
            ContentCategory::IncomingCalls => &mut self.incoming,
            ContentCategory::OutgoingCalls => &mut self.outgoing,
            ContentCategory::MissedCalls => &mut self.missed,
            ContentCategory::CombinedCalls => {
                self.combined.push(caller);
                return;
            }
        };
        history.push(caller.clone());
        self.combined.push(caller);
    }

    /// Remove every entry of a call history
    pub fn clear_calls(&mut self, category: ContentCategory) {
        match category {
            ContentCategory::Phonebook => {}
            ContentCategory::IncomingCalls => self.incoming.clear(),
            ContentCategory::OutgoingCalls => self.outgoing.clear(),
            ContentCategory::MissedCalls => self.missed.clear(),
            ContentCategory::CombinedCalls => self.combined.clear(),
        }
    }

    fn calls(&self, category: ContentCategory) -> &[Contact] {
        match category {
            ContentCategory::Phonebook => &[],
            ContentCategory::IncomingCalls => &self.incoming,
            ContentCategory::OutgoingCalls => &self.outgoing,
            ContentCategory::MissedCalls => &self.missed,
            ContentCategory::CombinedCalls => &self.combined,
        }
    }

    fn phonebook(&self) -> impl Iterator<Item = &Contact> {
        core::iter::once(&self.owner).chain(self.contacts.iter())
    }
}

impl ContentSource for InMemoryContentSource {
    fn phonebook_size(&self, category: ContentCategory) -> usize {
        match category {
            ContentCategory::Phonebook => self.contacts.len() + 1,
            _ => self.calls(category).len(),
        }
    }

    fn phonebook_entry(
        &self,
        category: ContentCategory,
        index: usize,
        version: VcardVersion,
    ) -> String {
        let entry = match category {
            ContentCategory::Phonebook => self.phonebook().nth(index),
            _ => self.calls(category).get(index),
        };
        entry.map_or_else(String::new, |contact| contact.to_vcard(version))
    }

    fn phonebook_name_list(&self) -> Vec<String> {
        self.phonebook()
            .map(|contact| String::from(contact.name.as_str()))
            .collect()
    }

    fn phonebook_number_list(&self) -> Vec<String> {
        self.phonebook()
            .map(|contact| String::from(contact.number.as_str()))
            .collect()
    }

    fn call_log_list(&self, category: ContentCategory) -> Vec<String> {
        self.calls(category)
            .iter()
            .map(|contact| String::from(contact.listing_name()))
            .collect()
    }
}
