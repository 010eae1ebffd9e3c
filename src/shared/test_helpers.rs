use crate::features::auth::model::AuthenticatedUser;
use crate::modules::sms::{SmsError, SmsMessage, SmsSender};
use crate::shared::constants::{ROLE_APP_ADMIN, ROLE_MEMBER};
use crate::shared::types::ListCursor;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const TEST_APP_ID: &str = "test-app";

pub const TEST_USER_ID: &str = "ab12cd34ef56gh78ij90kl12mn";

pub fn create_app_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: "adminadminadminadminadmin1".to_string(),
        app_id: Some(TEST_APP_ID.to_string()),
        roles: vec![ROLE_APP_ADMIN.to_string()],
    }
}

pub fn create_member_user() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: TEST_USER_ID.to_string(),
        app_id: Some(TEST_APP_ID.to_string()),
        roles: vec![ROLE_MEMBER.to_string()],
    }
}

/// Wraps the router so every request carries `user`, as `auth_middleware` would.
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

pub fn with_app_admin_auth(router: Router) -> Router {
    with_user(router, create_app_admin_user())
}

pub fn with_member_auth(router: Router) -> Router {
    with_user(router, create_member_user())
}

/// In-memory counterpart of `core::database::push_cursor` for test stores.
///
/// `stamps` yields `(id, created_at, updated_at)` of a row.
pub fn apply_cursor<T>(
    mut rows: Vec<T>,
    cursor: ListCursor,
    offset: i64,
    limit: i64,
    stamps: impl Fn(&T) -> (Uuid, DateTime<Utc>, DateTime<Utc>),
) -> Vec<T> {
    let anchor_created = |anchor: Uuid, rows: &[T]| {
        rows.iter()
            .map(&stamps)
            .find(|(id, _, _)| *id == anchor)
            .map(|(_, created, _)| created)
    };

    match cursor {
        ListCursor::Since(at) => {
            rows.retain(|r| stamps(r).2 > at);
            rows.sort_by_key(|r| stamps(r).2);
        }
        ListCursor::After(anchor) | ListCursor::Before(anchor) => {
            let after = matches!(cursor, ListCursor::After(_));
            match anchor_created(anchor, &rows) {
                Some(pivot) => rows.retain(|r| {
                    let created = stamps(r).1;
                    if after {
                        created > pivot
                    } else {
                        created < pivot
                    }
                }),
                None => rows.clear(),
            }
            rows.sort_by_key(|r| std::cmp::Reverse(stamps(r).1));
        }
        ListCursor::Page => rows.sort_by_key(|r| std::cmp::Reverse(stamps(r).1)),
    }

    rows.into_iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// `SmsSender` that records messages instead of sending them
#[derive(Default)]
pub struct RecordingSmsSender {
    sent: tokio::sync::Mutex<Vec<SmsMessage>>,
    fail: bool,
}

impl RecordingSmsSender {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub async fn sent(&self) -> Vec<SmsMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl SmsSender for RecordingSmsSender {
    async fn send(&self, message: &SmsMessage) -> Result<(), SmsError> {
        if self.fail {
            return Err(SmsError::Rejected("test failure".to_string()));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
