use std::fmt::Display;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

// Status codes a resource is expected to produce.

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, EnumIter)]
#[repr(u16)]
pub enum ReasonPhrase {
    // Success
    OK = 200,
    Created = 201,
    NoContent = 204,
    // Redirection
    MovedPermanently = 301,
    Found = 302,
    SeeOther = 303,
    NotModified = 304,
    TemporaryRedirect = 307,
    // Client Error
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    NotAcceptable = 406,
    Gone = 410,
    LengthRequired = 411,
    PreconditionFailed = 412,
    UnsupportedMediaType = 415,
    // Server Error
    InternalServerError = 500,
}

impl ReasonPhrase {
    pub fn status_code(self) -> u16 {
        self as u16
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OK => "OK",
            Self::Created => "Created",
            Self::NoContent => "No Content",
            Self::MovedPermanently => "Moved Permanently",
            Self::Found => "Found",
            Self::SeeOther => "See Other",
            Self::NotModified => "Not Modified",
            Self::TemporaryRedirect => "Temporary Redirect",
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::NotAcceptable => "Not Acceptable",
            Self::Gone => "Gone",
            Self::LengthRequired => "Length Required",
            Self::PreconditionFailed => "Precondition Failed",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl Display for ReasonPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("status code {0} is outside the vocabulary")]
pub struct UnknownStatusCode(pub u16);

impl TryFrom<u16> for ReasonPhrase {
    type Error = UnknownStatusCode;

    fn try_from(status_code: u16) -> Result<Self, Self::Error> {
        Self::iter()
            .find(|reason_phrase| reason_phrase.status_code() == status_code)
            .ok_or(UnknownStatusCode(status_code))
    }
}
