use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::token::TokenKeys;
use crate::error::AppError;
use crate::models::User;

/// Per-request authentication gate for everything under `/api` except the
/// auth endpoints themselves.
///
/// Extracts the bearer token, validates it, then resolves the user row it
/// names; a token for a since-deleted account is as invalid as a forged
/// one. The resolved `User` is inserted into request extensions for the
/// `CurrentUser` extractor. No session state survives the request.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Signup and signin are the routes that hand out tokens; the health
        // probe has no user context. Everything else must authenticate.
        let path = req.path();
        if path == "/health" || path.starts_with("/api/auth/") {
            return Box::pin(self.service.call(req));
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let token = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(str::to_owned)
                .ok_or(AppError::MissingToken)?;

            let keys = req
                .app_data::<web::Data<TokenKeys>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("TokenKeys not configured".into()))?;
            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("Database pool not configured".into()))?;

            let claims = keys.validate(&token)?;

            let user = sqlx::query_as::<_, User>(
                "SELECT id, email, full_name, password_hash, created_at \
                 FROM users WHERE id = $1",
            )
            .bind(claims.sub)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::InvalidToken)?;

            req.extensions_mut().insert(user);
            service.call(req).await
        })
    }
}
