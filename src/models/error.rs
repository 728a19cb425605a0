use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

/// Terminal failure of the login pipeline.
///
/// Each variant maps to the exact status code and plain-text body that the
/// portal frontend matches on, so the message strings are part of the public
/// contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    /// Request body was not valid JSON, or the role value is outside the
    /// closed `student`/`mentor` set.
    MalformedBody,
    /// Decoded fine but `code` or `type` was empty.
    EmptyBodyParameters,
    /// The OAuth provider rejected or failed the code exchange.
    AccessTokenExchange,
    /// The OAuth provider rejected or failed the profile fetch.
    UserInfoFetch,
    /// The registration lookup could not reach the database.
    DatabaseUnavailable,
    /// Signing the session token failed.
    JwtSigning,
    /// Serializing the success response failed.
    ResponseEncoding,
}

impl LoginError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MalformedBody => "Error parsing body parameters.",
            Self::EmptyBodyParameters => "Empty body parameters.",
            Self::AccessTokenExchange => "Error getting OAuth access token.",
            Self::UserInfoFetch => "Error getting OAuth user info.",
            Self::DatabaseUnavailable => "Error connecting to the database.",
            Self::JwtSigning => "Error generating a JWT string.",
            Self::ResponseEncoding => "Error generating response JSON.",
        }
    }

    /// Client-input failures; everything else is a server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedBody | Self::EmptyBodyParameters)
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl ResponseError for LoginError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(
            LoginError::MalformedBody.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LoginError::EmptyBodyParameters.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn server_errors_map_to_500() {
        for failure in [
            LoginError::AccessTokenExchange,
            LoginError::UserInfoFetch,
            LoginError::DatabaseUnavailable,
            LoginError::JwtSigning,
            LoginError::ResponseEncoding,
        ] {
            assert_eq!(failure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(
            LoginError::EmptyBodyParameters.message(),
            "Empty body parameters."
        );
        assert_eq!(
            LoginError::DatabaseUnavailable.message(),
            "Error connecting to the database."
        );
    }
}
