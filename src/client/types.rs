use serde_json::{json, Value};

/// Key used to wrap a response body that is not valid JSON.
pub const RAW_RESPONSE_KEY: &str = "raw_response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// File part of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart {
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    },
}

/// A single call against the backend API. `path` is relative to the API prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: RequestBody,
    pub token: Option<String>,
}

impl ApiRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            body: RequestBody::Empty,
            token: None,
        }
    }

    pub fn post_json(path: &str, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            body: RequestBody::Json(body),
            token: None,
        }
    }

    pub fn post_multipart(path: &str, fields: Vec<(String, String)>, file: FilePart) -> Self {
        Self {
            method: Method::Post,
            path: path.to_string(),
            body: RequestBody::Multipart {
                fields,
                file: Some(file),
            },
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Normalized outcome of one dispatched request.
///
/// `Response` is any HTTP answer regardless of its status code. `Failed` means
/// no answer was obtained at all (DNS, refused connection, timeout, unreadable
/// attachment).
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Response { status: u16, body: Value },
    Failed { message: String },
}

impl Dispatch {
    pub fn failed(message: impl Into<String>) -> Self {
        Dispatch::Failed {
            message: message.into(),
        }
    }

    /// Decode a response body: empty is `{}`, non-JSON text is wrapped
    /// under [`RAW_RESPONSE_KEY`].
    pub fn parse_body(bytes: &[u8]) -> Value {
        if bytes.is_empty() {
            return json!({});
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => value,
            Err(_) => {
                let mut wrapped = serde_json::Map::new();
                wrapped.insert(
                    RAW_RESPONSE_KEY.to_string(),
                    Value::String(String::from_utf8_lossy(bytes).into_owned()),
                );
                Value::Object(wrapped)
            }
        }
    }

    pub fn transport_ok(&self) -> bool {
        matches!(self, Dispatch::Response { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Dispatch::Response { status, .. } => Some(*status),
            Dispatch::Failed { .. } => None,
        }
    }

    pub fn is_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Dispatch::Response { body, .. } => Some(body),
            Dispatch::Failed { .. } => None,
        }
    }

    /// Status code as text, or the failure message.
    pub fn status_or_error(&self) -> String {
        match self {
            Dispatch::Response { status, .. } => status.to_string(),
            Dispatch::Failed { message } => message.clone(),
        }
    }

    /// `Status: <code>` for responses, the bare failure message otherwise.
    pub fn status_label(&self) -> String {
        match self {
            Dispatch::Response { status, .. } => format!("Status: {}", status),
            Dispatch::Failed { message } => message.clone(),
        }
    }

    /// The `detail` string of an error body, if any.
    pub fn detail(&self) -> Option<&str> {
        self.body()?.get("detail")?.as_str()
    }

    /// Case-insensitive search for `phrase` in the `detail` field.
    pub fn detail_contains(&self, phrase: &str) -> bool {
        self.detail()
            .map(|detail| detail.to_lowercase().contains(&phrase.to_lowercase()))
            .unwrap_or(false)
    }

    /// Case-insensitive search for `phrase` anywhere in the serialized body.
    pub fn body_contains(&self, phrase: &str) -> bool {
        match self.body() {
            Some(body) => body
                .to_string()
                .to_lowercase()
                .contains(&phrase.to_lowercase()),
            None => false,
        }
    }

    pub fn into_body(self) -> Option<Value> {
        match self {
            Dispatch::Response { body, .. } => Some(body),
            Dispatch::Failed { .. } => None,
        }
    }
}
