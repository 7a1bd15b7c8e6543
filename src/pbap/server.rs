//! PBAP Server Implementation
//!
//! This module provides the request dispatcher of the Phone Book Server Equipment.
//! The OBEX transport calls one `on_*` handler per incoming request and sends the
//! returned [`ResponseCode`] as the final response status.

use super::path::{LegalPaths, navigate, resolve_category};
use super::response::{pull_phonebook, pull_vcard_entry, pull_vcard_listing};
use super::session::{SessionEvent, SessionListener, SessionState};
use super::{ContentCategory, ContentSource, ObjectType, PbapError, RequestParameters};
use crate::constants::{PBAP_TARGET, UUID_LENGTH};
use crate::obex::{GetRequest, ObexOperation, ResponseCode};

/// PBAP server configuration
///
/// # Examples
///
/// ```rust
/// use bondybird_pbap::pbap::PbapServerOptions;
///
/// // Phone without a SIM phonebook mirror
/// let options = PbapServerOptions {
///     sim_paths: false,
///     ..PbapServerOptions::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PbapServerOptions {
    /// OBEX target UUID a CONNECT must carry
    pub target: [u8; UUID_LENGTH],
    /// Whether the `/SIM1` folder tree can be navigated
    pub sim_paths: bool,
}

impl PbapServerOptions {
    /// Folder set the options allow
    #[must_use]
    pub const fn legal_paths(&self) -> LegalPaths {
        LegalPaths::new(self.sim_paths)
    }
}

impl Default for PbapServerOptions {
    fn default() -> Self {
        Self {
            target: PBAP_TARGET,
            sim_paths: true,
        }
    }
}

/// PBAP Server
///
/// Owns the state of one OBEX session and answers its requests from a
/// [`ContentSource`]. Session lifecycle changes are reported to the listener.
#[derive(Debug)]
pub struct PbapServer<C, L = ()> {
    source: C,
    listener: L,
    session: SessionState,
    options: PbapServerOptions,
    connection_id: Option<u32>,
}

impl<C: ContentSource> PbapServer<C> {
    /// Create a server without a session listener
    ///
    /// The missed call baseline starts at the current size of the missed call history.
    #[must_use]
    pub fn new(source: C, options: PbapServerOptions) -> Self {
        Self::with_listener(source, options, ())
    }
}

impl<C: ContentSource, L: SessionListener> PbapServer<C, L> {
    /// Create a server reporting session events to `listener`
    #[must_use]
    pub fn with_listener(source: C, options: PbapServerOptions, listener: L) -> Self {
        let missed_calls = source.phonebook_size(ContentCategory::MissedCalls);
        Self {
            source,
            listener,
            session: SessionState::new(missed_calls),
            options,
            connection_id: None,
        }
    }

    /// Handle CONNECT
    ///
    /// The target header must be exactly the configured 16-byte UUID.
    pub fn on_connect(&mut self, target: Option<&[u8]>) -> ResponseCode {
        let Some(target) = target else {
            warn!("[PBAP] CONNECT without target header");
            return PbapError::WrongTarget.into();
        };
        if target != self.options.target.as_slice() {
            warn!("[PBAP] CONNECT to unknown target ({} bytes)", target.len());
            return PbapError::WrongTarget.into();
        }

        info!("[PBAP] Session established");
        self.listener
            .on_session_event(SessionEvent::SessionEstablished);
        ResponseCode::Ok
    }

    /// Handle DISCONNECT
    pub fn on_disconnect(&mut self) -> ResponseCode {
        info!("[PBAP] Session disconnected");
        self.listener
            .on_session_event(SessionEvent::SessionDisconnected);
        ResponseCode::Ok
    }

    /// Handle PUT; the phonebook is read-only
    pub fn on_put(&mut self) -> ResponseCode {
        warn!("[PBAP] PUT is not supported");
        ResponseCode::BadRequest
    }

    /// Handle SETPATH
    ///
    /// The current folder only changes when the target folder is legal.
    pub fn on_set_path(&mut self, backup: bool, create: bool, name: Option<&str>) -> ResponseCode {
        let current = self.session.current_path();
        match navigate(current, backup, create, name, self.options.legal_paths()) {
            Ok(path) => {
                debug!("[PBAP SETPATH] {} -> {}", current, path.as_str());
                self.session.set_current_path(path);
                ResponseCode::Ok
            }
            Err(error) => {
                warn!(
                    "[PBAP SETPATH] Rejected from {} (backup: {}, name: {:?}): {}",
                    current, backup, name, error
                );
                error.into()
            }
        }
    }

    /// Handle GET
    ///
    /// Resolves the requested category, decodes the application parameters and sends
    /// the listing, vCard or phonebook on `op`. The one-shot reply flags of the session
    /// are cleared before returning, whatever the outcome.
    pub fn on_get<O: ObexOperation>(&mut self, op: &mut O, request: &GetRequest<'_>) -> ResponseCode {
        let result = self.handle_get(op, request);
        self.session.take_pending();

        match result {
            Ok(()) => ResponseCode::Ok,
            Err(error) => {
                warn!("[PBAP GET] Request failed: {}", error);
                error.into()
            }
        }
    }

    fn handle_get<O: ObexOperation>(
        &mut self,
        op: &mut O,
        request: &GetRequest<'_>,
    ) -> Result<(), PbapError> {
        let object_type = request.object_type.and_then(ObjectType::from_mime);
        let category = resolve_category(self.session.current_path(), request.name, object_type)?;
        if category == ContentCategory::MissedCalls {
            self.session.request_missed_call_delta();
        }

        let (params, well_formed) =
            RequestParameters::decode(request.application_parameters.unwrap_or_default());
        if params.size_only {
            self.session.request_size_only();
        }
        if !well_formed {
            return Err(PbapError::MalformedParameters);
        }

        let Some(object_type) = object_type else {
            warn!("[PBAP GET] Unsupported type {:?}", request.object_type);
            return Err(PbapError::UnsupportedType);
        };
        debug!(
            "[PBAP GET] {:?} of {:?}, name {:?}",
            object_type, category, request.name
        );

        match object_type {
            ObjectType::Listing => pull_vcard_listing(
                &mut self.session,
                &self.source,
                op,
                &params,
                category,
            ),
            ObjectType::Vcard => pull_vcard_entry(&self.source, op, &params, category, request.name),
            ObjectType::Phonebook => pull_phonebook(
                &mut self.session,
                &self.source,
                op,
                &params,
                category,
                request.name,
            ),
        }
    }

    /// Handle the close of the OBEX server session
    pub fn on_close(&mut self) {
        info!("[PBAP] Server session closed");
        self.listener
            .on_session_event(SessionEvent::ServerSessionClosed);
    }
}

impl<C, L> PbapServer<C, L> {
    /// Current virtual folder, empty at the root
    #[must_use]
    pub fn current_path(&self) -> &str {
        self.session.current_path()
    }

    /// Session state
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Content source
    #[must_use]
    pub fn source(&self) -> &C {
        &self.source
    }

    /// Mutable content source, e.g. to record calls while the session is up
    pub fn source_mut(&mut self) -> &mut C {
        &mut self.source
    }

    /// Session listener
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Server options
    #[must_use]
    pub fn options(&self) -> &PbapServerOptions {
        &self.options
    }

    /// Remember the OBEX connection id assigned by the transport
    pub fn set_connection_id(&mut self, connection_id: u32) {
        self.connection_id = Some(connection_id);
    }

    /// OBEX connection id, if one was assigned
    #[must_use]
    pub fn connection_id(&self) -> Option<u32> {
        self.connection_id
    }
}
