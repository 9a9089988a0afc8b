//! Request builders for the backend endpoints under test.

use serde_json::{json, Value};

use crate::client::{ApiRequest, Dispatch, FilePart};
use crate::identity::AccountIdentity;

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const ANALYZE_DOCUMENT_PATH: &str = "/ai/analyze-document";
pub const PROJECT_UPLOAD_PATH: &str = "/projects/upload";

const DOCUMENT_MIME: &str = "text/plain";

pub fn register_request(identity: &AccountIdentity) -> ApiRequest {
    ApiRequest::post_json(
        REGISTER_PATH,
        json!({
            "email": identity.email,
            "password": identity.password,
            "full_name": identity.full_name,
            "device_id": identity.device_id,
        }),
    )
}

pub fn login_request(email: &str, password: &str, device_id: &str) -> ApiRequest {
    ApiRequest::post_json(
        LOGIN_PATH,
        json!({
            "email": email,
            "password": password,
            "device_id": device_id,
        }),
    )
}

pub fn analyze_document_request(document: Vec<u8>, token: &str) -> ApiRequest {
    let file = FilePart {
        field: "file".to_string(),
        file_name: "test_document.txt".to_string(),
        mime: DOCUMENT_MIME.to_string(),
        bytes: document,
    };
    ApiRequest::post_multipart(
        ANALYZE_DOCUMENT_PATH,
        vec![("action".to_string(), "analyze".to_string())],
        file,
    )
    .with_token(token)
}

/// `index` is zero-based, matching the project names the backend has seen
/// from earlier runs.
pub fn project_upload_request(index: u32, document: Vec<u8>, token: &str) -> ApiRequest {
    let file = FilePart {
        field: "file".to_string(),
        file_name: format!("test_project_{}.txt", index),
        mime: DOCUMENT_MIME.to_string(),
        bytes: document,
    };
    ApiRequest::post_multipart(
        PROJECT_UPLOAD_PATH,
        vec![
            ("name".to_string(), format!("Test Project {}", index)),
            ("description".to_string(), format!("Test project number {}", index)),
        ],
        file,
    )
    .with_token(token)
}

/// Authenticated account returned by register or login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub email: String,
    pub password: String,
    pub device_id: String,
    pub access_token: String,
    pub user: Value,
}

impl Session {
    /// Build a session from an auth response. Requires HTTP 200 and an
    /// `access_token` string in the body.
    pub fn from_auth(
        email: &str,
        password: &str,
        device_id: &str,
        dispatch: &Dispatch,
    ) -> Option<Self> {
        if !dispatch.is_status(200) {
            return None;
        }
        let body = dispatch.body()?;
        let access_token = body.get("access_token")?.as_str()?.to_string();
        let user = body.get("user").cloned().unwrap_or(Value::Null);

        Some(Self {
            email: email.to_string(),
            password: password.to_string(),
            device_id: device_id.to_string(),
            access_token,
            user,
        })
    }

    pub fn plan(&self) -> Option<&str> {
        self.user.get("plan")?.as_str()
    }

    pub fn plan_or_unknown(&self) -> &str {
        self.plan().unwrap_or("unknown")
    }

    pub fn has_plan(&self, plan: &str) -> bool {
        self.plan() == Some(plan)
    }
}
