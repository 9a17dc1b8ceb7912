use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use base64::{engine::general_purpose, Engine as _};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// Claims extraídas do Bearer token. A emissão e a verificação de assinatura
/// são delegadas ao identity provider externo — aqui só decodificamos o
/// payload para obter o host id (sub).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
}

/// Decodifica o segmento de payload de um JWT (sem verificar assinatura)
pub fn parse_claims(token: &str) -> Option<Claims> {
    let payload = token.split('.').nth(1)?;
    let decoded = general_purpose::URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&decoded).ok()
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Get Authorization header
        let auth_header = req.headers().get("Authorization");

        match auth_header {
            Some(header_value) => {
                if let Ok(header_str) = header_value.to_str() {
                    if let Some(token) = header_str.strip_prefix("Bearer ") {
                        if let Some(claims) = parse_claims(token) {
                            if claims.sub.is_empty() {
                                return Box::pin(async move {
                                    Err(actix_web::error::ErrorUnauthorized(
                                        "Token has no subject",
                                    ))
                                });
                            }

                            req.extensions_mut().insert(claims);

                            let fut = self.service.call(req);
                            return Box::pin(async move {
                                let res = fut.await?;
                                Ok(res)
                            });
                        }
                    }
                }

                Box::pin(async move {
                    Err(actix_web::error::ErrorUnauthorized("Invalid token format"))
                })
            }
            None => Box::pin(async move {
                Err(actix_web::error::ErrorUnauthorized(
                    "Missing authorization token",
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_token(payload: &serde_json::Value) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_parse_claims_extracts_subject() {
        let token = make_token(&serde_json::json!({
            "sub": "host-abc",
            "exp": 1_900_000_000usize,
            "email": "host@example.com"
        }));

        let claims = parse_claims(&token).unwrap();
        assert_eq!(claims.sub, "host-abc");
        assert_eq!(claims.email.as_deref(), Some("host@example.com"));
    }

    #[test]
    fn test_parse_claims_rejects_garbage() {
        assert!(parse_claims("not-a-jwt").is_none());
        assert!(parse_claims("a.b.c").is_none());
        assert!(parse_claims("").is_none());
    }
}
