//! OBEX Session Surface
//!
//! The PBAP server does not frame OBEX packets itself. The OBEX engine owning the
//! RFCOMM/L2CAP channel hands each request to the server through the types in this
//! module and streams whatever the server writes back to the client.

/// OBEX response codes returned by the PBAP server
///
/// Values include the final bit (0x80), as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ResponseCode {
    /// Success
    Ok = 0xA0,
    /// Bad Request - server couldn't understand the request
    BadRequest = 0xC0,
    /// Forbidden - operation is understood but refused
    Forbidden = 0xC3,
    /// Not Acceptable
    NotAcceptable = 0xC6,
    /// Precondition Failed
    PreconditionFailed = 0xCC,
    /// Internal Server Error
    InternalError = 0xD0,
    /// Not Implemented
    NotImplemented = 0xD1,
}

impl ResponseCode {
    /// Check if the response code signals success
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> Self {
        code as u8
    }
}

/// Headers of an incoming OBEX GET request
///
/// Every header is optional on the wire; the server decides which omissions it
/// tolerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetRequest<'a> {
    /// TYPE header (e.g. `x-bt/vcard-listing`)
    pub object_type: Option<&'a str>,
    /// NAME header
    pub name: Option<&'a str>,
    /// APPLICATION PARAMETERS header, raw triplets
    pub application_parameters: Option<&'a [u8]>,
}

impl<'a> GetRequest<'a> {
    /// Create a GET request with only a TYPE header
    #[must_use]
    pub const fn new(object_type: &'a str) -> Self {
        Self {
            object_type: Some(object_type),
            name: None,
            application_parameters: None,
        }
    }

    /// Set the NAME header
    #[must_use]
    pub const fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the APPLICATION PARAMETERS header
    #[must_use]
    pub const fn with_application_parameters(mut self, parameters: &'a [u8]) -> Self {
        self.application_parameters = Some(parameters);
        self
    }
}

/// A GET operation in progress on the OBEX engine
///
/// The server sends response headers first (optionally), then writes the body through
/// the output stream. Once the server is done it closes the output stream and then the
/// operation itself, also when something went wrong on the way.
pub trait ObexOperation {
    /// Transport error type
    type Error: core::fmt::Debug;

    /// Queue response headers carrying the given APPLICATION PARAMETERS block
    ///
    /// # Errors
    /// Returns the transport error if the headers cannot be sent
    fn send_headers(&mut self, application_parameters: &[u8]) -> Result<(), Self::Error>;

    /// Open the body output stream
    ///
    /// # Errors
    /// Returns the transport error if the stream cannot be opened
    fn open_output_stream(&mut self) -> Result<(), Self::Error>;

    /// Write body bytes to the output stream
    ///
    /// # Errors
    /// Returns the transport error if the bytes cannot be written
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush buffered body bytes
    ///
    /// # Errors
    /// Returns the transport error if flushing fails
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Close the body output stream
    ///
    /// # Errors
    /// Returns the transport error if the stream cannot be closed
    fn close_output_stream(&mut self) -> Result<(), Self::Error>;

    /// Close the operation, completing the response
    ///
    /// # Errors
    /// Returns the transport error if the operation cannot be closed
    fn close(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_values() {
        assert_eq!(u8::from(ResponseCode::Ok), 0xA0);
        assert_eq!(u8::from(ResponseCode::BadRequest), 0xC0);
        assert_eq!(u8::from(ResponseCode::Forbidden), 0xC3);
        assert_eq!(u8::from(ResponseCode::NotAcceptable), 0xC6);
        assert_eq!(u8::from(ResponseCode::PreconditionFailed), 0xCC);
        assert_eq!(u8::from(ResponseCode::InternalError), 0xD0);
        assert_eq!(u8::from(ResponseCode::NotImplemented), 0xD1);

        assert!(ResponseCode::Ok.is_success());
        assert!(!ResponseCode::InternalError.is_success());
    }

    #[test]
    fn test_get_request_builder() {
        let params = [0x04, 0x02, 0x00, 0x0A];
        let request = GetRequest::new("x-bt/vcard-listing")
            .with_name("pb")
            .with_application_parameters(&params);

        assert_eq!(request.object_type, Some("x-bt/vcard-listing"));
        assert_eq!(request.name, Some("pb"));
        assert_eq!(request.application_parameters, Some(&params[..]));

        let empty = GetRequest::default();
        assert!(empty.object_type.is_none());
        assert!(empty.name.is_none());
        assert!(empty.application_parameters.is_none());
    }
}
