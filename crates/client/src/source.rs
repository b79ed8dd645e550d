//! Record source trait and the in-memory implementation.

use async_trait::async_trait;

use planboard_model::{Plan, QuarterlyReport, User};

use crate::cancel::CancelToken;
use crate::error::ClientError;

/// Asynchronous supplier of dashboard records.
///
/// Every method honors the token: a cancelled call returns
/// [`ClientError::Cancelled`] and must not hand back data.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn list_plans(&self, cancel: &CancelToken) -> Result<Vec<Plan>, ClientError>;
    async fn list_reports(&self, cancel: &CancelToken)
        -> Result<Vec<QuarterlyReport>, ClientError>;
    async fn list_users(&self, cancel: &CancelToken) -> Result<Vec<User>, ClientError>;

    async fn get_plan(&self, id: i64, cancel: &CancelToken) -> Result<Plan, ClientError>;
    async fn get_report(
        &self,
        id: i64,
        cancel: &CancelToken,
    ) -> Result<QuarterlyReport, ClientError>;
    async fn get_user(&self, id: i64, cancel: &CancelToken) -> Result<User, ClientError>;
}

/// A source over fixed collections. Backs tests and file-driven CLI
/// runs; lookups behave like the backend (missing id -> `NotFound`).
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    plans: Vec<Plan>,
    reports: Vec<QuarterlyReport>,
    users: Vec<User>,
}

impl StaticSource {
    pub fn new(plans: Vec<Plan>, reports: Vec<QuarterlyReport>, users: Vec<User>) -> Self {
        StaticSource {
            plans,
            reports,
            users,
        }
    }

    fn check(cancel: &CancelToken) -> Result<(), ClientError> {
        if cancel.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn list_plans(&self, cancel: &CancelToken) -> Result<Vec<Plan>, ClientError> {
        Self::check(cancel)?;
        Ok(self.plans.clone())
    }

    async fn list_reports(
        &self,
        cancel: &CancelToken,
    ) -> Result<Vec<QuarterlyReport>, ClientError> {
        Self::check(cancel)?;
        Ok(self.reports.clone())
    }

    async fn list_users(&self, cancel: &CancelToken) -> Result<Vec<User>, ClientError> {
        Self::check(cancel)?;
        Ok(self.users.clone())
    }

    async fn get_plan(&self, id: i64, cancel: &CancelToken) -> Result<Plan, ClientError> {
        Self::check(cancel)?;
        self.plans
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn get_report(
        &self,
        id: i64,
        cancel: &CancelToken,
    ) -> Result<QuarterlyReport, ClientError> {
        Self::check(cancel)?;
        self.reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }

    async fn get_user(&self, id: i64, cancel: &CancelToken) -> Result<User, ClientError> {
        Self::check(cancel)?;
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ClientError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planboard_model::Role;

    fn source() -> StaticSource {
        let users = vec![User {
            id: 3,
            email: "eve@corp.io".into(),
            full_name: Some("Eve Executor".into()),
            user_role: Role::Executor,
        }];
        StaticSource::new(Vec::new(), Vec::new(), users)
    }

    #[tokio::test]
    async fn lookups_find_or_report_not_found() {
        let src = source();
        let cancel = CancelToken::new();
        let user = src.get_user(3, &cancel).await.expect("known user");
        assert_eq!(user.email, "eve@corp.io");
        assert!(matches!(
            src.get_user(99, &cancel).await,
            Err(ClientError::NotFound)
        ));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let src = source();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            src.list_users(&cancel).await,
            Err(ClientError::Cancelled)
        ));
        assert!(matches!(
            src.get_user(3, &cancel).await,
            Err(ClientError::Cancelled)
        ));
    }
}
