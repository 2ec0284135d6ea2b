use std::collections::BTreeMap;

/// The outcome of checking a link target, as it is stored in a
/// [`crate::LinkTargetCache`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct UrlResponse {
    /// Did the link target point to a valid resource?
    pub valid: bool,
    /// Details about why the check failed. Empty for valid targets.
    pub error_params: ErrorParams,
}

impl UrlResponse {
    /// Create a new [`UrlResponse`].
    pub fn new(valid: bool, error_params: ErrorParams) -> Self {
        UrlResponse {
            valid,
            error_params,
        }
    }

    /// A [`UrlResponse`] for a target which was found to be valid.
    pub fn valid() -> Self { UrlResponse::new(true, ErrorParams::default()) }

    /// A [`UrlResponse`] for a broken target.
    pub fn invalid(error_params: ErrorParams) -> Self {
        UrlResponse::new(false, error_params)
    }
}

/// Structured information about a failed link check.
///
/// The cache treats this as opaque data, it is only interpreted by whatever
/// renders the broken link report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-1", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorParams {
    error_type: String,
    errno: Option<i64>,
    exception_msg: Option<String>,
    custom: BTreeMap<String, String>,
}

impl ErrorParams {
    /// Create an [`ErrorParams`] for a particular kind of error (e.g.
    /// `"httpStatusCode"` or `"exception"`).
    pub fn new<S: Into<String>>(error_type: S) -> Self {
        ErrorParams {
            error_type: error_type.into(),
            ..Default::default()
        }
    }

    /// Set the numeric error code (an HTTP status, an OS error number, ...).
    pub fn with_errno(self, errno: i64) -> Self {
        ErrorParams {
            errno: Some(errno),
            ..self
        }
    }

    /// Attach the message of the exception which caused the check to fail.
    pub fn with_exception_msg<S: Into<String>>(self, msg: S) -> Self {
        ErrorParams {
            exception_msg: Some(msg.into()),
            ..self
        }
    }

    /// Attach an arbitrary key/value parameter.
    pub fn with_custom<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.custom.insert(key.into(), value.into());
        self
    }

    /// The kind of error, empty when no error was recorded.
    pub fn error_type(&self) -> &str { &self.error_type }

    /// The numeric error code, if there is one.
    pub fn errno(&self) -> Option<i64> { self.errno }

    /// The exception message, if there is one.
    pub fn exception_msg(&self) -> Option<&str> {
        self.exception_msg.as_deref()
    }

    /// Look up a custom parameter.
    pub fn custom(&self, key: &str) -> Option<&str> {
        self.custom.get(key).map(|s| s.as_str())
    }

    /// Were any details recorded at all?
    pub fn is_empty(&self) -> bool {
        self.error_type.is_empty()
            && self.errno.is_none()
            && self.exception_msg.is_none()
            && self.custom.is_empty()
    }
}
