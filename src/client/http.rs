use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::types::{ApiRequest, Dispatch, Method, RequestBody};
use super::ApiTransport;
use crate::error::Result;
use crate::utils::config::HarnessConfig;

/// reqwest-backed dispatcher. One request at a time, no retries.
pub struct HttpDispatcher {
    client: reqwest::Client,
    api_root: String,
}

impl HttpDispatcher {
    pub fn new(config: &HarnessConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            api_root: config.endpoint_url(""),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    fn build_form(
        fields: Vec<(String, String)>,
        file: Option<super::types::FilePart>,
    ) -> std::result::Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        if let Some(file) = file {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime)?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ApiTransport for HttpDispatcher {
    async fn send(&self, request: ApiRequest) -> Dispatch {
        let url = self.url(&request.path);
        log::debug!("{} {}", request.method.as_str(), url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart { fields, file } => match Self::build_form(fields, file) {
                Ok(form) => builder.multipart(form),
                Err(e) => return Dispatch::failed(format!("Request failed: {}", e)),
            },
        };

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {} failed: {}", request.method.as_str(), url, e);
                return Dispatch::failed(format!("Request failed: {}", e));
            }
        };

        let status = response.status().as_u16();
        match response.bytes().await {
            Ok(bytes) => {
                log::debug!("{} {} -> {} ({} bytes)", request.method.as_str(), url, status, bytes.len());
                Dispatch::Response {
                    status,
                    body: Dispatch::parse_body(&bytes),
                }
            }
            Err(e) => {
                log::warn!("{} {} body read failed: {}", request.method.as_str(), url, e);
                Dispatch::failed(format!("Request failed: {}", e))
            }
        }
    }
}
