//! Validated update of an account request

use super::params::{parse_json_body, parse_uuid};
use super::transition::{plan_update, UpdateFields};
use super::{AccountRequestActions, ActionError};
use crate::access::{Caller, ResourceClass};
use crate::models::{AccountRequestData, AccountRequestUpdateRequest};
use crate::services::logging::log_action;

const ACTION: &str = "update_account_request";

impl AccountRequestActions {
    /// Overwrite the editable fields of an account request.
    ///
    /// Approving a request that is neither approved nor registered sends one
    /// approval notification to the updated email. A registered request keeps
    /// its status whatever status the payload asks for.
    pub async fn update(
        &self,
        caller: &Caller,
        raw_id: &str,
        request: AccountRequestUpdateRequest,
    ) -> Result<AccountRequestData, ActionError> {
        self.update_with(caller, raw_id, move || Ok(request)).await
    }

    /// Same as [`update`](Self::update) but takes the raw JSON body, which is
    /// only parsed once the caller and id have been checked
    pub async fn update_json(
        &self,
        caller: &Caller,
        raw_id: &str,
        body: &[u8],
    ) -> Result<AccountRequestData, ActionError> {
        self.update_with(caller, raw_id, || parse_json_body(body))
            .await
    }

    async fn update_with(
        &self,
        caller: &Caller,
        raw_id: &str,
        body: impl FnOnce() -> Result<AccountRequestUpdateRequest, ActionError>,
    ) -> Result<AccountRequestData, ActionError> {
        self.authorize(caller, ResourceClass::AccountRequest, ACTION)?;
        let id = parse_uuid(raw_id)?;
        let fields = UpdateFields::from_request(body()?)?;

        let plan = self
            .with_lock(id, move || async move {
                let previous = self.load(id).await?;
                fields.validate()?;

                let plan = plan_update(&previous, fields);
                self.store.save(plan.record.clone()).await?;

                tracing::debug!(
                    account_request_id = %id,
                    from = %previous.status,
                    to = %plan.record.status,
                    "Account request updated"
                );
                Ok::<_, ActionError>(plan)
            })
            .await?;

        log_action(
            ACTION,
            &plan.record.id.to_string(),
            &format!(
                "status={} notifications={}",
                plan.record.status,
                plan.effects.len()
            ),
        );
        self.dispatcher.dispatch(&plan.effects).await;

        Ok(AccountRequestData::from(&plan.record))
    }
}
