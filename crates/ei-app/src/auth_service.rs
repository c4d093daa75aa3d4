//! Sign-in, registration and session lifecycle.

use ei_client::{ApiClient, SessionStore};
use ei_core::validate::{validate_login, validate_register};
use ei_core::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn session(&self) -> &SessionStore {
        self.api.session()
    }

    /// Validate, then `POST /api/auth/login`. Invalid input never reaches the network.
    pub fn login(&self, request: &LoginRequest) -> AppResult<AuthResponse> {
        let errors = validate_login(request);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(self.api.login(request)?)
    }

    pub fn register(&self, request: &RegisterRequest) -> AppResult<AuthResponse> {
        let errors = validate_register(request);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        Ok(self.api.register(request)?)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.session().clear()?;
        tracing::info!("signed out");
        Ok(())
    }

    pub fn current_user(&self) -> Option<AuthResponse> {
        self.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// The signed-in user, or [`AppError::NotAuthenticated`].
    pub fn require_user(&self) -> AppResult<AuthResponse> {
        self.current_user().ok_or(AppError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ei_client::ClientConfig;
    use ei_core::validate::Field;

    fn service() -> AuthService {
        // Port 9 (discard) is never contacted: validation fails first.
        let config = ClientConfig {
            api_url: "http://127.0.0.1:9".into(),
            ..ClientConfig::default()
        };
        AuthService::new(ApiClient::new(&config, SessionStore::in_memory()).unwrap())
    }

    #[test]
    fn short_password_blocks_login() {
        let err = service()
            .login(&LoginRequest {
                email: "ada@example.com".into(),
                password: "short".into(),
            })
            .unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.get(Field::Password).is_some());
                assert!(errors.get(Field::Email).is_none());
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn weak_password_blocks_register() {
        let err = service()
            .register(&RegisterRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                password: "alllowercase".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn logged_out_service_has_no_user() {
        let service = service();
        assert!(!service.is_authenticated());
        assert!(matches!(
            service.require_user(),
            Err(AppError::NotAuthenticated)
        ));
        service.logout().unwrap();
    }
}
