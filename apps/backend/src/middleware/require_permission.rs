//! Permission guard for protected resources.
//!
//! Wrap a resource with `RequirePermission::new(Permission::PostDrinks)`: the
//! bearer token is verified and checked for the permission before the inner
//! service is called. On success the [`VerifiedClaims`] are placed in request
//! extensions for the `VerifiedClaims` extractor; on failure the request is
//! answered with the rendered [`AuthError`] and the handler never runs.
//!
//! [`VerifiedClaims`]: crate::auth::VerifiedClaims
//! [`AuthError`]: crate::auth::AuthError

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::warn;

use crate::auth::claims::Permission;
use crate::auth::guard::authorize;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct RequirePermission {
    permission: Permission,
}

impl RequirePermission {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            permission: self.permission,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    permission: Permission,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let permission = self.permission;

        // Clone what the async block needs before the request is moved.
        let auth_header = req.headers().get(header::AUTHORIZATION).cloned();
        let app_state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let Some(app_state) = app_state else {
                let err = AppError::internal("AppState not available");
                return Ok(req.into_response(err.error_response()).map_into_right_body());
            };

            match authorize(app_state.verifier(), auth_header.as_ref(), permission.as_str()).await
            {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    warn!(
                        code = %err.code(),
                        status = err.status().as_u16(),
                        permission = permission.as_str(),
                        path = %req.path(),
                        "auth.rejected"
                    );
                    let response = AppError::from(err).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
