//! JSON shapes of the code and booking endpoints.
//!
//! Both endpoints report business failures as `{"error": "..."}`, often with
//! a 4xx/5xx status, so bodies are decoded regardless of status.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    contact::{Contact, ContactMethod},
    identity::IdentityToken,
    remote::{BackendError, CodeDelivery, Consultation},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CodeEndpointRequest {
    SendCode {
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
    },
    VerifyCode {
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        code: String,
    },
}

impl CodeEndpointRequest {
    pub fn send_code(contact: &Contact) -> Self {
        let (email, phone) = split_contact(contact);
        Self::SendCode { email, phone }
    }

    pub fn verify_code(contact: &Contact, code: &str) -> Self {
        let (email, phone) = split_contact(contact);
        Self::VerifyCode {
            email,
            phone,
            code: code.to_owned(),
        }
    }
}

fn split_contact(contact: &Contact) -> (Option<String>, Option<String>) {
    match contact.method {
        ContactMethod::Email => (Some(contact.value.clone()), None),
        ContactMethod::Phone => (None, Some(contact.value.clone())),
    }
}

#[derive(Debug, Default, Deserialize)]
struct SendCodeResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VerifyCodeResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    user_id: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CreateBookingResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    consultation: Option<ConsultationRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct ListConsultationsResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    consultations: Option<Vec<ConsultationRecord>>,
}

#[derive(Debug, Default, Deserialize)]
struct ConsultationRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    consultation_date: String,
    #[serde(default)]
    consultation_time: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl From<ConsultationRecord> for Consultation {
    fn from(record: ConsultationRecord) -> Self {
        Self {
            id: record.id.as_ref().and_then(scalar_to_string).unwrap_or_default(),
            date: record.consultation_date,
            time: record.consultation_time,
            description: record.description.unwrap_or_default(),
            status: record.status.unwrap_or_default(),
            created_at: record.created_at.unwrap_or_default(),
        }
    }
}

pub fn decode_send_code(body: &str) -> Result<CodeDelivery, BackendError> {
    let response: SendCodeResponse = parse(body)?;
    rejected(response.error)?;

    Ok(CodeDelivery {
        echoed_code: response.code.filter(|code| !code.is_empty()),
    })
}

pub fn decode_verify_code(body: &str) -> Result<IdentityToken, BackendError> {
    let response: VerifyCodeResponse = parse(body)?;
    rejected(response.error)?;

    if response.success != Some(true) {
        return Err(BackendError::Transport(
            "verify response carries no success flag".into(),
        ));
    }

    response
        .user_id
        .as_ref()
        .and_then(scalar_to_string)
        .map(IdentityToken::new)
        .ok_or_else(|| BackendError::Transport("verify response carries no user_id".into()))
}

pub fn decode_create_booking(body: &str) -> Result<Option<Consultation>, BackendError> {
    let response: CreateBookingResponse = parse(body)?;
    rejected(response.error)?;

    if response.success != Some(true) {
        return Err(BackendError::Transport(
            "booking response carries no success flag".into(),
        ));
    }

    Ok(response.consultation.map(Consultation::from))
}

pub fn decode_list_consultations(body: &str) -> Result<Vec<Consultation>, BackendError> {
    let response: ListConsultationsResponse = parse(body)?;
    rejected(response.error)?;

    let records = response.consultations.ok_or_else(|| {
        BackendError::Transport("list response carries no consultations".into())
    })?;

    Ok(records.into_iter().map(Consultation::from).collect())
}

fn parse<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body)
        .map_err(|error| BackendError::Transport(format!("unreadable response body: {error}")))
}

fn rejected(error: Option<String>) -> Result<(), BackendError> {
    match error {
        Some(message) if !message.trim().is_empty() => Err(BackendError::Rejected(message)),
        _ => Ok(()),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_code_request_carries_only_active_contact() {
        let email = serde_json::to_value(CodeEndpointRequest::send_code(&Contact::email(
            "user@test.com",
        )))
        .expect("serializable");
        let phone = serde_json::to_value(CodeEndpointRequest::verify_code(
            &Contact::phone("+7 999 123 45 67"),
            "482913",
        ))
        .expect("serializable");

        assert_eq!(
            email,
            serde_json::json!({"action": "send_code", "email": "user@test.com"})
        );
        assert_eq!(
            phone,
            serde_json::json!({
                "action": "verify_code",
                "phone": "+7 999 123 45 67",
                "code": "482913"
            })
        );
    }

    #[test]
    fn send_code_keeps_echoed_code_when_present() {
        let delivery =
            decode_send_code(r#"{"success":true,"message":"sent","code":"482913"}"#).expect("ok");
        let silent = decode_send_code(r#"{"success":true}"#).expect("ok");

        assert_eq!(delivery.echoed_code.as_deref(), Some("482913"));
        assert_eq!(silent.echoed_code, None);
    }

    #[test]
    fn error_field_is_passed_through_verbatim() {
        let error = decode_verify_code(r#"{"error":"Invalid code"}"#).unwrap_err();

        assert_eq!(error, BackendError::Rejected("Invalid code".into()));
    }

    #[test]
    fn numeric_user_id_is_normalised_to_string() {
        let text = decode_verify_code(r#"{"success":true,"user_id":"u1"}"#).expect("ok");
        let number = decode_verify_code(r#"{"success":true,"user_id":42}"#).expect("ok");

        assert_eq!(text.as_str(), "u1");
        assert_eq!(number.as_str(), "42");
    }

    #[test]
    fn verify_without_user_id_is_transport_failure() {
        let error = decode_verify_code(r#"{"success":true}"#).unwrap_err();

        assert!(matches!(error, BackendError::Transport(_)));
    }

    #[test]
    fn unreadable_body_is_transport_failure() {
        let error = decode_send_code("<html>502 Bad Gateway</html>").unwrap_err();

        assert!(matches!(error, BackendError::Transport(_)));
    }

    #[test]
    fn create_booking_maps_returned_consultation() {
        let body = r#"{
            "success": true,
            "consultation": {
                "id": 7,
                "consultation_date": "2024-06-01",
                "consultation_time": "14:00:00",
                "description": "",
                "status": "pending",
                "created_at": "2024-05-20 10:00:00"
            }
        }"#;

        let consultation = decode_create_booking(body)
            .expect("ok")
            .expect("consultation present");

        assert_eq!(consultation.id, "7");
        assert_eq!(consultation.date, "2024-06-01");
        assert_eq!(consultation.status, "pending");
    }

    #[test]
    fn create_booking_without_success_flag_is_transport_failure() {
        let error = decode_create_booking("{}").unwrap_err();

        assert!(matches!(error, BackendError::Transport(_)));
    }

    #[test]
    fn list_consultations_decodes_records_and_errors() {
        let listed = decode_list_consultations(
            r#"{"consultations":[{"id":1,"consultation_date":"2024-06-01","consultation_time":"14:00:00","description":null}]}"#,
        )
        .expect("ok");
        let rejected = decode_list_consultations(r#"{"error":"User ID required"}"#).unwrap_err();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "");
        assert_eq!(rejected, BackendError::Rejected("User ID required".into()));
    }
}
