//! Document editor login workload

use crate::errors::{LoadgenError, LoadgenResult};
use goose::prelude::*;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use std::time::Duration;

pub const SCENARIO_NAME: &str = "OverleafUser";
pub const LOGIN_PATH: &str = "/login";

const WAIT: Duration = Duration::from_secs(1);

static CSRF_TOKEN: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| {
    RegexBuilder::new(r#"window\.csrfToken = "([^"]+)""#)
        .case_insensitive(true)
        .build()
});

/// Account the login transaction signs in with, kept as per-user session data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "admin@example.com".to_string(),
            password: "kapil123".to_string(),
        }
    }
}

/// Token embedded in the login page as `window.csrfToken = "..."`
pub fn find_csrf_token(page: &str) -> LoadgenResult<Option<String>> {
    let pattern = CSRF_TOKEN.as_ref().map_err(|e| LoadgenError::Pattern(e.clone()))?;
    Ok(pattern
        .captures(page)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_string()))
}

/// Every user stores `credentials` when it starts, then logs in repeatedly
pub fn scenario(credentials: Credentials) -> Result<Scenario, GooseError> {
    let store = Transaction::new(Arc::new(move |user| {
        Box::pin(store_credentials(user, credentials.clone()))
    }))
    .set_name("credentials")
    .set_on_start();

    Ok(scenario!(SCENARIO_NAME)
        .set_wait_time(WAIT, WAIT)?
        .register_transaction(store)
        .register_transaction(transaction!(login).set_name("login")))
}

async fn store_credentials(user: &mut GooseUser, credentials: Credentials) -> TransactionResult {
    user.set_session_data(credentials);
    Ok(())
}

async fn login(user: &mut GooseUser) -> TransactionResult {
    let mut goose = user.get(LOGIN_PATH).await?;

    // a failed GET has already been recorded
    let page = match goose.response {
        Ok(response) => match response.text().await {
            Ok(page) => page,
            Err(e) => {
                return user.set_failure(&e.to_string(), &mut goose.request, None, None);
            }
        },
        Err(_) => return Ok(()),
    };

    let token = match find_csrf_token(&page) {
        Ok(Some(token)) => token,
        Ok(None) => {
            return user.set_failure(
                "No csrf token found in response",
                &mut goose.request,
                None,
                Some(&page),
            );
        }
        Err(e) => return user.set_failure(&e.to_string(), &mut goose.request, None, None),
    };

    let account = user
        .get_session_data::<Credentials>()
        .cloned()
        .unwrap_or_default();
    let form = [
        ("_csrf", token.as_str()),
        ("email", account.email.as_str()),
        ("password", account.password.as_str()),
    ];
    user.post_form(LOGIN_PATH, &form).await?;
    Ok(())
}
