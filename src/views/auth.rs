//! Login, signup and password reset flows

use std::sync::Arc;
use validator::Validate;

use crate::client::AuthApi;
use crate::core::error::{ApiError, ClientError, ClientResult};
use crate::core::session::Session;
use crate::models::{Credentials, PasswordResetRequest, Registration};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password.";
pub const RESET_SENT: &str = "If the address is registered, a reset code has been sent.";

pub struct AuthFlow {
    api: Arc<dyn AuthApi>,
    session: Arc<Session>,
}

impl AuthFlow {
    pub fn new(api: Arc<dyn AuthApi>, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Sign in and store the token
    ///
    /// With `remember` the token survives restarts, otherwise it only lives
    /// for this process.
    pub async fn login(&self, credentials: &Credentials, remember: bool) -> ClientResult<()> {
        credentials.validate()?;

        let token = match self.api.login(credentials).await {
            Ok(token) => token,
            Err(ClientError::Api(ApiError::Unauthorized { operation })) => {
                return Err(ApiError::Rejected {
                    operation,
                    status: 401,
                    message: INVALID_CREDENTIALS.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        self.session.login(token.token, remember)?;
        Ok(())
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.session.logout()?;
        Ok(())
    }

    pub async fn register(&self, registration: &Registration) -> ClientResult<()> {
        registration.validate()?;
        self.api.register(registration).await
    }

    /// Ask the API to send a reset code; returns the confirmation text
    pub async fn forgot_password(&self, email: &str) -> ClientResult<&'static str> {
        let request = PasswordResetRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;
        self.api.request_password_reset(&request).await?;
        Ok(RESET_SENT)
    }
}
