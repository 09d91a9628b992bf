//! CLI error handling

use std::fmt;

use envreq_errors::UserFacingError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error from configuration or an operation with no session notice
    Ops(envreq_errors::Error),
    /// Operation failed after updating the session notice
    Operation {
        notice: String,
        /// Kept when the request was created but the Jupyter step failed
        request_id: Option<String>,
        source: envreq_errors::Error,
    },
    /// The service returned a URL that has already expired
    ExpiredUrl {
        request_id: String,
        expired_at: String,
    },
    /// Interactive prompt failed
    Prompt(String),
    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => {
                write!(f, "{}", e.user_message())?;
                write_details(f, e)
            }
            CliError::Operation {
                notice,
                request_id,
                source,
            } => {
                write!(f, "{notice}")?;
                if let Some(id) = request_id {
                    write!(f, "\n  Request ID: {id} (the request itself was created)")?;
                }
                write_details(f, source)
            }
            CliError::ExpiredUrl {
                request_id,
                expired_at,
            } => write!(
                f,
                "Jupyter URL expired at {expired_at}; run `envreq jupyter-url {request_id}` for a new one"
            ),
            CliError::Prompt(msg) => write!(f, "Prompt failed: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

fn write_details(f: &mut fmt::Formatter<'_>, e: &envreq_errors::Error) -> fmt::Result {
    if let Some(code) = e.user_code() {
        write!(f, "\n  Code: {code}")?;
    }
    if let Some(hint) = e.user_hint() {
        write!(f, "\n  Hint: {hint}")?;
    }
    if e.is_retryable() {
        write!(f, "\n  Retry: safe to retry this operation.")?;
    }
    Ok(())
}

impl CliError {
    /// Underlying library error, when there is one
    pub fn source_error(&self) -> Option<&envreq_errors::Error> {
        match self {
            CliError::Ops(e) | CliError::Operation { source: e, .. } => Some(e),
            _ => None,
        }
    }

    /// Machine-readable form printed on stdout in `--json` mode
    pub fn to_json(&self) -> serde_json::Value {
        let message = match self {
            CliError::Ops(e) => e.user_message().into_owned(),
            CliError::Operation { notice, .. } => notice.clone(),
            other => other.to_string(),
        };
        let request_id = match self {
            CliError::Operation { request_id, .. } => request_id.clone(),
            CliError::ExpiredUrl { request_id, .. } => Some(request_id.clone()),
            _ => None,
        };
        let source = self.source_error();

        serde_json::json!({
            "type": "Error",
            "data": {
                "message": message,
                "kind": source.map(envreq_errors::Error::kind),
                "code": source.and_then(UserFacingError::user_code),
                "hint": source.and_then(UserFacingError::user_hint),
                "retryable": source.is_some_and(UserFacingError::is_retryable),
                "request_id": request_id,
                "error": source,
            }
        })
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Ops(e) | CliError::Operation { source: e, .. } => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<envreq_errors::Error> for CliError {
    fn from(e: envreq_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::Prompt(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envreq_errors::{Error, NetworkError, ValidationError};

    #[test]
    fn test_operation_error_json_keeps_request_id() {
        let err = CliError::Operation {
            notice: "Timeout – please try again".into(),
            request_id: Some("abc123".into()),
            source: Error::Network(NetworkError::Timeout {
                url: "http://localhost:5000/generate-jupyter-url/abc123".into(),
                timeout_secs: 15,
            }),
        };

        let json = err.to_json();
        assert_eq!(json["type"], "Error");
        assert_eq!(json["data"]["message"], "Timeout – please try again");
        assert_eq!(json["data"]["kind"], "timeout");
        assert_eq!(json["data"]["code"], "network.timeout");
        assert_eq!(json["data"]["retryable"], true);
        assert_eq!(json["data"]["request_id"], "abc123");
        assert_eq!(json["data"]["error"]["Network"]["Timeout"]["timeout_secs"], 15);
    }

    #[test]
    fn test_validation_error_json() {
        let err = CliError::Ops(Error::Validation(ValidationError::MissingRequiredFields {
            fields: vec!["env_purpose".into()],
        }));

        let json = err.to_json();
        assert_eq!(json["data"]["message"], "Env Name and Env Purpose are required");
        assert_eq!(json["data"]["kind"], "validation");
        assert_eq!(json["data"]["retryable"], false);
        assert!(json["data"]["request_id"].is_null());
    }

    #[test]
    fn test_prompt_error_json_has_no_source() {
        let json = CliError::Prompt("not a terminal".into()).to_json();
        assert_eq!(json["data"]["message"], "Prompt failed: not a terminal");
        assert!(json["data"]["kind"].is_null());
        assert!(json["data"]["error"].is_null());
    }
}
