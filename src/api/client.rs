use std::time::Duration;

use reqwest::header::{HeaderName, HeaderValue};
use tokio::runtime::{Builder, Runtime};

use crate::{
    api::wire::{self, CodeEndpointRequest},
    domain::{
        contact::Contact,
        identity::IdentityToken,
        remote::{BackendError, BookingRequest, CodeDelivery, Consultation},
    },
    infra::{config::EndpointsConfig, error::AppError, secrets},
    usecases::remote::ConsultationBackend,
};

/// Blocking HTTP access to both endpoints. Owns a current-thread runtime so
/// callers stay synchronous.
pub struct HttpBackend {
    rt: Runtime,
    client: reqwest::Client,
    auth_url: String,
    booking_url: String,
    identity_header: HeaderName,
}

impl HttpBackend {
    pub fn new(config: &EndpointsConfig) -> Result<Self, AppError> {
        Self::with_client_builder(config, reqwest::Client::builder())
    }

    fn with_client_builder(
        config: &EndpointsConfig,
        builder: reqwest::ClientBuilder,
    ) -> Result<Self, AppError> {
        let identity_header =
            HeaderName::from_bytes(config.identity_header.as_bytes()).map_err(|error| {
                AppError::BackendInit {
                    details: format!("invalid identity header name: {error}"),
                }
            })?;

        let rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| AppError::BackendInit {
                details: format!("failed to initialize async runtime: {error}"),
            })?;

        let client = builder
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|error| AppError::BackendInit {
                details: format!("failed to build HTTP client: {error}"),
            })?;

        Ok(Self {
            rt,
            client,
            auth_url: config.auth_url.clone(),
            booking_url: config.booking_url.clone(),
            identity_header,
        })
    }

    fn post_code_endpoint(&self, payload: &CodeEndpointRequest) -> Result<String, BackendError> {
        let request = self.client.post(&self.auth_url).json(payload);
        self.send(request, "code")
    }

    fn identity_value(&self, token: &IdentityToken) -> Result<HeaderValue, BackendError> {
        HeaderValue::from_str(token.as_str())
            .map_err(|_| BackendError::Transport("identity token is not a valid header value".into()))
    }

    fn send(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &'static str,
    ) -> Result<String, BackendError> {
        let outcome = self.rt.block_on(async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        match outcome {
            Ok((status, body)) => {
                tracing::debug!(
                    code = "REMOTE_RESPONSE",
                    endpoint,
                    status = status.as_u16(),
                    "endpoint answered"
                );
                Ok(body)
            }
            Err(error) => {
                let details = secrets::redact_text(&error.to_string());
                tracing::warn!(
                    code = "REMOTE_UNREACHABLE",
                    endpoint,
                    timeout = error.is_timeout(),
                    details = %details,
                    "endpoint request failed"
                );
                Err(BackendError::Transport(details))
            }
        }
    }
}

impl ConsultationBackend for HttpBackend {
    fn send_code(&self, contact: &Contact) -> Result<CodeDelivery, BackendError> {
        tracing::info!(
            code = "AUTH_CODE_REQUESTED",
            method = contact.method.as_label(),
            contact = %secrets::mask_contact(&contact.value),
            "requesting one-time code"
        );
        let body = self.post_code_endpoint(&CodeEndpointRequest::send_code(contact))?;
        wire::decode_send_code(&body)
    }

    fn verify_code(&self, contact: &Contact, code: &str) -> Result<IdentityToken, BackendError> {
        tracing::info!(
            code = "AUTH_CODE_SUBMITTED",
            method = contact.method.as_label(),
            contact = %secrets::mask_contact(&contact.value),
            "verifying one-time code"
        );
        let body = self.post_code_endpoint(&CodeEndpointRequest::verify_code(contact, code))?;
        wire::decode_verify_code(&body)
    }

    fn create_booking(
        &self,
        token: &IdentityToken,
        request: &BookingRequest,
    ) -> Result<Option<Consultation>, BackendError> {
        let http = self
            .client
            .post(&self.booking_url)
            .header(self.identity_header.clone(), self.identity_value(token)?)
            .json(request);
        let body = self.send(http, "booking")?;
        wire::decode_create_booking(&body)
    }

    fn list_consultations(
        &self,
        token: &IdentityToken,
    ) -> Result<Vec<Consultation>, BackendError> {
        let http = self
            .client
            .get(&self.booking_url)
            .header(self.identity_header.clone(), self.identity_value(token)?);
        let body = self.send(http, "booking")?;
        wire::decode_list_consultations(&body)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Read, Write},
        net::TcpListener,
        sync::mpsc,
        thread,
    };

    use super::*;

    /// Serves exactly one canned response and hands back the raw request.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept connection");
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0usize;

            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read request line");
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }

            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).expect("read request body");
            request.push_str(&String::from_utf8_lossy(&payload));

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            stream
                .write_all(response.as_bytes())
                .expect("write response");
            tx.send(request).expect("send captured request");
        });

        (url, rx)
    }

    fn backend_for(auth_url: &str, booking_url: &str) -> HttpBackend {
        let config = EndpointsConfig {
            auth_url: auth_url.to_owned(),
            booking_url: booking_url.to_owned(),
            request_timeout_ms: 2_000,
            ..EndpointsConfig::default()
        };
        HttpBackend::with_client_builder(&config, reqwest::Client::builder().no_proxy())
            .expect("backend should build")
    }

    #[test]
    fn rejects_invalid_identity_header_name() {
        let result = HttpBackend::new(&EndpointsConfig {
            identity_header: "bad header".to_owned(),
            ..EndpointsConfig::default()
        });

        assert!(matches!(result, Err(AppError::BackendInit { .. })));
    }

    #[test]
    fn error_body_is_read_even_with_failure_status() {
        let (url, captured) = serve_once("400 Bad Request", r#"{"error":"Invalid code"}"#);
        let backend = backend_for(&url, &url);

        let result = backend.verify_code(&Contact::email("user@test.com"), "000000");
        let request = captured.recv().expect("request captured");

        assert_eq!(result, Err(BackendError::Rejected("Invalid code".into())));
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(request.contains(r#""action":"verify_code""#));
        assert!(request.contains(r#""code":"000000""#));
    }

    #[test]
    fn booking_request_carries_identity_header() {
        let (url, captured) = serve_once(
            "200 OK",
            r#"{"success":true,"consultation":{"id":3,"consultation_date":"2024-06-01","consultation_time":"14:00:00"}}"#,
        );
        let backend = backend_for(&url, &url);

        let result = backend.create_booking(
            &IdentityToken::new("u1"),
            &BookingRequest {
                date: "2024-06-01".into(),
                time: "14:00".into(),
                description: String::new(),
            },
        );
        let request = captured.recv().expect("request captured").to_ascii_lowercase();

        let consultation = result.expect("booking ok").expect("consultation returned");
        assert_eq!(consultation.id, "3");
        assert!(request.contains("x-user-id: u1"));
        assert!(request.contains(r#""date":"2024-06-01""#));
    }

    #[test]
    fn unreachable_endpoint_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let url = format!("http://{}", listener.local_addr().expect("addr"));
        drop(listener);
        let backend = backend_for(&url, &url);

        let result = backend.send_code(&Contact::email("user@test.com"));

        assert!(matches!(result, Err(BackendError::Transport(_))));
    }
}
