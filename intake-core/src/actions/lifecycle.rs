//! Creation, lookup, search, reset, registration and deletion of account requests

use super::params::{missing_param, parse_json_body, parse_uuid, require_field};
use super::transition::{plan_registration, plan_reset};
use super::{AccountRequestActions, ActionError};
use crate::access::{Caller, ResourceClass};
use crate::models::{
    AccountRequest, AccountRequestCreateRequest, AccountRequestData, AccountRequestsData,
    MessageOutput,
};
use crate::services::logging::log_action;
use crate::store::StoreError;
use crate::validation::validate_account_request_fields;
use chrono::Utc;

impl AccountRequestActions {
    /// Submit a new pending account request
    pub async fn create(
        &self,
        caller: &Caller,
        request: AccountRequestCreateRequest,
    ) -> Result<AccountRequestData, ActionError> {
        self.create_with(caller, move || Ok(request)).await
    }

    pub async fn create_json(
        &self,
        caller: &Caller,
        body: &[u8],
    ) -> Result<AccountRequestData, ActionError> {
        self.create_with(caller, || parse_json_body(body)).await
    }

    async fn create_with(
        &self,
        caller: &Caller,
        body: impl FnOnce() -> Result<AccountRequestCreateRequest, ActionError>,
    ) -> Result<AccountRequestData, ActionError> {
        self.authorize(caller, ResourceClass::AccountRequest, "create_account_request")?;
        let request = body()?;
        let name = require_field(request.name, "name")?;
        let email = require_field(request.email, "email")?;
        let institute = require_field(request.institute, "institute")?;
        validate_account_request_fields(&name, &email, &institute)?;

        if let Some(existing) = self
            .store
            .find_by_email_and_institute(&email, &institute)
            .await?
        {
            tracing::debug!(existing_id = %existing.id, "Duplicate account request");
            return Err(StoreError::DuplicateRequest { email, institute }.into());
        }

        let created = self
            .store
            .insert(AccountRequest::new(name, email, institute, request.comments))
            .await?;

        log_action(
            "create_account_request",
            &created.id.to_string(),
            "status=PENDING",
        );
        Ok(AccountRequestData::from(created))
    }

    pub async fn get(&self, caller: &Caller, raw_id: &str) -> Result<AccountRequestData, ActionError> {
        self.authorize(caller, ResourceClass::AccountRequest, "get_account_request")?;
        let id = parse_uuid(raw_id)?;
        let record = self.load(id).await?;
        Ok(AccountRequestData::from(record))
    }

    /// Case-insensitive search over name, email and institute
    pub async fn search(
        &self,
        caller: &Caller,
        search_key: Option<&str>,
    ) -> Result<AccountRequestsData, ActionError> {
        self.authorize(caller, ResourceClass::AccountRequest, "search_account_requests")?;
        let key = search_key
            .ok_or_else(|| missing_param(super::params::SEARCH_KEY))?
            .trim();
        if key.is_empty() {
            return Err(ActionError::InvalidParameter(
                "Search key cannot be empty".to_string(),
            ));
        }

        let account_requests = self
            .store
            .list()
            .await?
            .iter()
            .filter(|record| record.matches_search_key(key))
            .map(AccountRequestData::from)
            .collect();

        Ok(AccountRequestsData { account_requests })
    }

    /// Clear a registration and send the requester a fresh join link
    pub async fn reset(
        &self,
        caller: &Caller,
        raw_id: &str,
    ) -> Result<AccountRequestData, ActionError> {
        self.authorize(caller, ResourceClass::AccountRequest, "reset_account_request")?;
        let id = parse_uuid(raw_id)?;

        let plan = self
            .with_lock(id, move || async move {
                let plan = plan_reset(&self.load(id).await?)?;
                self.store.save(plan.record.clone()).await?;
                Ok::<_, ActionError>(plan)
            })
            .await?;

        log_action("reset_account_request", &id.to_string(), "status=APPROVED");
        self.dispatcher.dispatch(&plan.effects).await;

        Ok(AccountRequestData::from(&plan.record))
    }

    /// Register the approved request holding `registration_key`
    pub async fn register(
        &self,
        caller: &Caller,
        registration_key: Option<&str>,
    ) -> Result<AccountRequestData, ActionError> {
        self.authorize(caller, ResourceClass::Registration, "register_account_request")?;
        let key = registration_key
            .ok_or_else(|| missing_param(super::params::REGISTRATION_KEY))?;

        let id = self
            .store
            .find_by_registration_key(key)
            .await?
            .map(|record| record.id)
            .ok_or_else(|| {
                ActionError::NotFound(
                    "No account request matches the given registration key".to_string(),
                )
            })?;

        // Re-read under the lock; the record may have changed since the key lookup
        let plan = self
            .with_lock(id, move || async move {
                let plan = plan_registration(&self.load(id).await?, Utc::now())?;
                self.store.save(plan.record.clone()).await?;
                Ok::<_, ActionError>(plan)
            })
            .await?;

        log_action("register_account_request", &id.to_string(), "status=REGISTERED");
        Ok(AccountRequestData::from(&plan.record))
    }

    /// Delete an account request; deleting an unknown id succeeds
    pub async fn delete(&self, caller: &Caller, raw_id: &str) -> Result<MessageOutput, ActionError> {
        self.authorize(caller, ResourceClass::AccountRequest, "delete_account_request")?;
        let id = parse_uuid(raw_id)?;

        let removed = self
            .with_lock(id, move || async move {
                self.store.delete(id).await.map_err(ActionError::from)
            })
            .await?;

        if removed.is_some() {
            log_action("delete_account_request", &id.to_string(), "deleted");
        }
        Ok(MessageOutput::new("Account request successfully deleted."))
    }
}
