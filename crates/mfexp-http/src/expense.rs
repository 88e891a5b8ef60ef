//! Expense API operations.

use std::sync::Arc;

use serde_json::Value;
use tracing::instrument;

use mfexp_core::traits::TokenStore;
use mfexp_core::{ApiRequest, ClientConfig, ListQuery, Result};

use crate::endpoints;
use crate::executor::RequestExecutor;
use crate::oauth::Authenticator;

/// Typed entry points for the expense API endpoints.
///
/// Every call goes through [`RequestExecutor::execute`]. Office-scoped calls
/// take an optional office id and fall back to the configured default.
#[derive(Debug, Clone)]
pub struct ExpenseClient {
    executor: RequestExecutor,
}

impl ExpenseClient {
    /// Build the authenticator and executor for `config`.
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let auth = Arc::new(Authenticator::new(config, store)?);
        Ok(Self::from_executor(RequestExecutor::new(auth)))
    }

    pub fn from_executor(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        self.executor.authenticator()
    }

    fn office<'a>(&'a self, office_id: Option<&'a str>) -> Result<&'a str> {
        self.authenticator().config().resolve_office(office_id)
    }

    /// List the offices the user belongs to.
    pub async fn offices(&self) -> Result<Value> {
        self.executor.execute(&ApiRequest::get(endpoints::OFFICES)).await
    }

    /// List the user's expense transactions.
    #[instrument(skip(self))]
    pub async fn list_ex_transactions(
        &self,
        office_id: Option<&str>,
        query: &ListQuery,
    ) -> Result<Value> {
        let office = self.office(office_id)?;
        let request =
            ApiRequest::get(endpoints::ex_transactions(office)).with_query(query.to_params());
        self.executor.execute(&request).await
    }

    /// Fetch one expense transaction.
    pub async fn get_ex_transaction(&self, id: &str, office_id: Option<&str>) -> Result<Value> {
        let office = self.office(office_id)?;
        self.executor
            .execute(&ApiRequest::get(endpoints::ex_transaction(office, id)))
            .await
    }

    /// Create an expense transaction for the current user.
    #[instrument(skip(self, body))]
    pub async fn create_ex_transaction(
        &self,
        body: &Value,
        office_id: Option<&str>,
    ) -> Result<Value> {
        let office = self.office(office_id)?;
        let request = ApiRequest::post(endpoints::ex_transactions(office)).with_json(body.clone());
        self.executor.execute(&request).await
    }

    /// Create an expense transaction on behalf of an office member.
    #[instrument(skip(self, body))]
    pub async fn create_ex_transaction_for_member(
        &self,
        member_id: &str,
        body: &Value,
        office_id: Option<&str>,
    ) -> Result<Value> {
        let office = self.office(office_id)?;
        let request = ApiRequest::post(endpoints::member_ex_transactions(office, member_id))
            .with_json(body.clone());
        self.executor.execute(&request).await
    }

    /// Replace an expense transaction.
    #[instrument(skip(self, body))]
    pub async fn update_ex_transaction(
        &self,
        id: &str,
        body: &Value,
        office_id: Option<&str>,
    ) -> Result<Value> {
        let office = self.office(office_id)?;
        let request = ApiRequest::put(endpoints::ex_transaction(office, id)).with_json(body.clone());
        self.executor.execute(&request).await
    }

    /// Delete an expense transaction.
    pub async fn delete_ex_transaction(&self, id: &str, office_id: Option<&str>) -> Result<Value> {
        let office = self.office(office_id)?;
        self.executor
            .execute(&ApiRequest::delete(endpoints::ex_transaction(office, id)))
            .await
    }

    /// List the user's expense reports.
    #[instrument(skip(self))]
    pub async fn list_ex_reports(&self, office_id: Option<&str>, query: &ListQuery) -> Result<Value> {
        let office = self.office(office_id)?;
        let request = ApiRequest::get(endpoints::ex_reports(office)).with_query(query.to_params());
        self.executor.execute(&request).await
    }

    /// Fetch one expense report.
    pub async fn get_ex_report(&self, id: &str, office_id: Option<&str>) -> Result<Value> {
        let office = self.office(office_id)?;
        self.executor
            .execute(&ApiRequest::get(endpoints::ex_report(office, id)))
            .await
    }

    /// Create an expense report.
    #[instrument(skip(self, body))]
    pub async fn create_ex_report(&self, body: &Value, office_id: Option<&str>) -> Result<Value> {
        let office = self.office(office_id)?;
        let request = ApiRequest::post(endpoints::ex_reports(office)).with_json(body.clone());
        self.executor.execute(&request).await
    }

    /// Replace an expense report.
    #[instrument(skip(self, body))]
    pub async fn update_ex_report(
        &self,
        id: &str,
        body: &Value,
        office_id: Option<&str>,
    ) -> Result<Value> {
        let office = self.office(office_id)?;
        let request = ApiRequest::put(endpoints::ex_report(office, id)).with_json(body.clone());
        self.executor.execute(&request).await
    }

    /// Delete an expense report.
    pub async fn delete_ex_report(&self, id: &str, office_id: Option<&str>) -> Result<Value> {
        let office = self.office(office_id)?;
        self.executor
            .execute(&ApiRequest::delete(endpoints::ex_report(office, id)))
            .await
    }

    /// List the report types configured for an office.
    pub async fn list_ex_report_types(&self, office_id: Option<&str>) -> Result<Value> {
        let office = self.office(office_id)?;
        self.executor
            .execute(&ApiRequest::get(endpoints::ex_report_types(office)))
            .await
    }
}
