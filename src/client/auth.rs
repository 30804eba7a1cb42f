//! Auth gateway: posts credentials, persists the bearer token under the
//! `token` key and installs it on the [`ApiClient`]. Logout discards the
//! local token only — the server keeps no revocation list, so the token
//! stays valid until its natural expiry.

use super::api::ApiClient;
use super::error::ClientError;
use super::storage::LocalStore;
use super::types::UserSummary;

const TOKEN_KEY: &str = "token";

pub struct AuthGateway {
    store: LocalStore,
    user: Option<UserSummary>,
}

impl AuthGateway {
    /// Rehydrates a persisted token, if any, onto `api`.
    pub fn restore(store: LocalStore, api: &mut ApiClient) -> Self {
        if let Some(token) = store.get_json::<String>(TOKEN_KEY) {
            api.set_token(token);
        }
        Self { store, user: None }
    }

    pub async fn register(
        &mut self,
        api: &mut ApiClient,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        let auth = api.register(name, email, password).await?;
        self.install(api, auth.token);
        self.user = Some(auth.user.clone());
        Ok(auth.user)
    }

    pub async fn login(
        &mut self,
        api: &mut ApiClient,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, ClientError> {
        let auth = api.login(email, password).await?;
        self.install(api, auth.token);
        self.user = Some(auth.user.clone());
        Ok(auth.user)
    }

    pub fn logout(&mut self, api: &mut ApiClient) {
        self.store.remove(TOKEN_KEY);
        api.clear_token();
        self.user = None;
    }

    pub fn current_user(&self) -> Option<&UserSummary> {
        self.user.as_ref()
    }

    fn install(&self, api: &mut ApiClient, token: String) {
        self.store.set_json(TOKEN_KEY, &token);
        api.set_token(token);
    }
}
