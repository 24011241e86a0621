// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors that reject with the JSON error shape.

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    Json,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, FieldError},
    models::Validate,
    state::AppState,
};

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Header carrying the client-side reCAPTCHA token.
pub const RECAPTCHA_HEADER: &str = "recaptcha-token";

/// JSON body that has been deserialized and then validated.
///
/// Malformed JSON keeps axum's rejection status (400/415/422); a body that
/// parses but fails validation is a 422 listing every offending field.
pub struct ValidJson<T: Validate>(pub T::Valid);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T>::from_request(req, state).await?;
        raw.validate().map(ValidJson).map_err(ApiError::validation)
    }
}

/// Value of the `recaptcha-token` header.
pub struct RecaptchaToken(pub String);

impl<S> FromRequestParts<S> for RecaptchaToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(RECAPTCHA_HEADER)
            .ok_or_else(|| header_error("field required"))?;
        let token = value
            .to_str()
            .map_err(|_| header_error("must be visible ASCII"))?
            .trim();
        if token.is_empty() {
            return Err(header_error("must not be empty"));
        }
        Ok(RecaptchaToken(token.to_string()))
    }
}

fn header_error(message: &str) -> ApiError {
    ApiError::validation(vec![FieldError::new(RECAPTCHA_HEADER, message)])
}

/// Address of the client that originated the request.
///
/// The TCP peer, unless the peer is a trusted proxy; then the rightmost
/// `X-Forwarded-For` entry that is not itself a trusted proxy.
pub struct ClientIp(pub IpAddr);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ConnectInfo(peer) = ConnectInfo::<SocketAddr>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "peer address unavailable");
                ApiError::internal("Internal Server Error")
            })?;

        Ok(ClientIp(resolve_client_ip(
            peer.ip(),
            &parts.headers,
            &state.trusted_proxies,
        )))
    }
}

fn resolve_client_ip(peer: IpAddr, headers: &HeaderMap, trusted: &[IpAddr]) -> IpAddr {
    if !trusted.contains(&peer) {
        return peer;
    }

    let hops: Vec<&str> = headers
        .get_all(FORWARDED_FOR_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .collect();

    for hop in hops.iter().rev() {
        match hop.parse::<IpAddr>() {
            Ok(ip) if trusted.contains(&ip) => continue,
            Ok(ip) => return ip,
            Err(_) => break,
        }
    }
    peer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactRequest;
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode},
    };

    fn ip(raw: &str) -> IpAddr {
        raw.parse().unwrap()
    }

    fn forwarded(values: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for value in values {
            headers.append(FORWARDED_FOR_HEADER, HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn untrusted_peer_ignores_forwarded_header() {
        let headers = forwarded(&["198.51.100.9"]);
        let client = resolve_client_ip(ip("203.0.113.7"), &headers, &[ip("127.0.0.1")]);
        assert_eq!(client, ip("203.0.113.7"));
    }

    #[test]
    fn trusted_peer_uses_rightmost_untrusted_hop() {
        let trusted = [ip("127.0.0.1"), ip("10.0.0.2")];
        let headers = forwarded(&["1.1.1.1, 198.51.100.9", "10.0.0.2"]);
        let client = resolve_client_ip(ip("127.0.0.1"), &headers, &trusted);
        assert_eq!(client, ip("198.51.100.9"));
    }

    #[test]
    fn trusted_peer_without_usable_header_falls_back_to_peer() {
        let trusted = [ip("127.0.0.1")];
        let peer = ip("127.0.0.1");

        assert_eq!(resolve_client_ip(peer, &HeaderMap::new(), &trusted), peer);
        assert_eq!(
            resolve_client_ip(peer, &forwarded(&["not-an-ip"]), &trusted),
            peer
        );
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/contact")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_json_returns_validated_form() {
        let req = json_request(r#"{"name":"Jane","email":"jane@example.com","message":"Hi"}"#);
        let ValidJson(form) = ValidJson::<ContactRequest>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(form.name, "Jane");
    }

    #[tokio::test]
    async fn invalid_fields_are_unprocessable() {
        let req = json_request(r#"{"name":"","email":"nope"}"#);
        let err = ValidJson::<ContactRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<_> = err.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email", "message"]);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let req = json_request("{not json");
        let err = ValidJson::<ContactRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_content_type_is_unsupported() {
        let req = Request::builder()
            .method("POST")
            .uri("/contact")
            .body(Body::from("{}"))
            .unwrap();
        let err = ValidJson::<ContactRequest>::from_request(req, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn recaptcha_header_is_required() {
        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let err = RecaptchaToken::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.details[0].field, RECAPTCHA_HEADER);

        let (mut parts, _) = Request::builder()
            .header(RECAPTCHA_HEADER, "  ")
            .body(())
            .unwrap()
            .into_parts();
        assert!(RecaptchaToken::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn recaptcha_header_is_extracted() {
        let (mut parts, _) = Request::builder()
            .header(RECAPTCHA_HEADER, "client-token")
            .body(())
            .unwrap()
            .into_parts();
        let RecaptchaToken(token) = RecaptchaToken::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(token, "client-token");
    }
}
