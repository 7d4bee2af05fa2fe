//! Form Bodies
//!
//! POST bodies arrive either urlencoded from the HTML forms or as JSON from
//! scripted clients. [`FormBody`] accepts both and picks the decoder from the
//! `Content-Type`; anything else is handed to the form decoder, which
//! rejects it.
//!
//! Handlers take `Result<FormBody<T>, BodyRejection>` so that an unreadable
//! body becomes a flash message on a redirect like every other failure.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::extract::{Form, FromRequest, Json, Request};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use thiserror::Error;

/// Flash text for a body that could not be decoded
pub const UNREADABLE_FORM: &str = "Could not read the submitted form. Please try again.";

/// Request body decoded from urlencoded or JSON input
#[derive(Debug, Clone, Copy, Default)]
pub struct FormBody<T>(pub T);

/// Why a body could not be decoded
#[derive(Debug, Error)]
pub enum BodyRejection {
    #[error(transparent)]
    Form(#[from] FormRejection),
    #[error(transparent)]
    Json(#[from] JsonRejection),
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        match self {
            BodyRejection::Form(rejection) => rejection.into_response(),
            BodyRejection::Json(rejection) => rejection.into_response(),
        }
    }
}

impl<T, S> FromRequest<S> for FormBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_json(req.headers()) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            Ok(FormBody(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await?;
            Ok(FormBody(value))
        }
    }
}

/// Field deserializer for inputs a form sends as text and JSON may send as
/// a number, such as an age or a phone number
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Field::deserialize(deserializer)? {
        Field::Text(text) => text,
        Field::Integer(n) => n.to_string(),
        Field::Float(n) => n.to_string(),
    })
}

/// `application/json` or any `+json` media type
fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        headers
    }

    #[derive(Deserialize)]
    struct Person {
        #[serde(deserialize_with = "string_or_number")]
        age: String,
    }

    #[test]
    fn test_string_or_number() {
        let person: Person = serde_json::from_str(r#"{"age": 31}"#).unwrap();
        assert_eq!(person.age, "31");
        let person: Person = serde_json::from_str(r#"{"age": "31"}"#).unwrap();
        assert_eq!(person.age, "31");
        assert!(serde_json::from_str::<Person>(r#"{"age": [31]}"#).is_err());
    }

    #[test]
    fn test_json_detection() {
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("Application/JSON; charset=utf-8")));
        assert!(is_json(&headers("application/merge-patch+json")));

        assert!(!is_json(&headers("application/x-www-form-urlencoded")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
