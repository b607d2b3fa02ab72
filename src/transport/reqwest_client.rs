use super::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// reqwest によるトランスポート
///
/// クライアント全体のタイムアウトは設定せず、リクエストごとの値を使う。
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };

        let builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart { fields, file } => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.content_type)
                    .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value))
                    .part(file.field, part);
                builder.multipart(form)
            }
            RequestBody::Binary { content_type, bytes } => {
                builder.header(CONTENT_TYPE, content_type).body(bytes)
            }
        };

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        debug!("{} {} -> {} ({} bytes)", request.method, request.url, status, body.len());

        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_builder() {
        TransportError::InvalidRequest(error.to_string())
    } else {
        TransportError::NoResponse(error.to_string())
    }
}
