//! Accounts and their credentials.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use super::touched;
use crate::model::{Account, AccountCredential, NewAccount, NewAccountCredential, UpdateAccount};
use crate::types::VerificationStatus;
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Account and credential operations.
///
/// Email addresses are trimmed and lowercased before they are written or
/// compared.
pub trait AccountRepository {
    /// Inserts the account and its credential row in one transaction.
    fn create_account(
        &mut self,
        new_account: NewAccount,
        password_hash: String,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Loads the account together with its password hash, for login.
    fn find_credential_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<(Account, AccountCredential)>>> + Send;

    fn update_account(
        &mut self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    fn set_verification_status(
        &mut self,
        account_id: Uuid,
        status: VerificationStatus,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    /// Replaces the stored password hash.
    fn update_password(
        &mut self,
        account_id: Uuid,
        password_hash: String,
    ) -> impl Future<Output = PgResult<()>> + Send;
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl AccountRepository for PgConnection {
    async fn create_account(
        &mut self,
        mut new_account: NewAccount,
        password_hash: String,
    ) -> PgResult<Account> {
        use schema::{account_credentials, accounts};

        new_account.email_address = normalize_email(&new_account.email_address);
        new_account.display_name = new_account.display_name.trim().to_owned();

        let account = self
            .transaction(|conn| {
                Box::pin(async move {
                    let account: Account = diesel::insert_into(accounts::table)
                        .values(&new_account)
                        .returning(Account::as_returning())
                        .get_result(conn)
                        .await?;

                    let credential = NewAccountCredential {
                        account_id: account.id,
                        email_address: account.email_address.clone(),
                        password_hash,
                    };
                    diesel::insert_into(account_credentials::table)
                        .values(&credential)
                        .execute(conn)
                        .await?;

                    Ok::<_, PgError>(account)
                })
            })
            .await?;

        tracing::info!(
            target: TRACING_TARGET_QUERY,
            account_id = %account.id,
            role = %account.role,
            "account created"
        );

        Ok(account)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::email_address.eq(normalize_email(email)))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_credential_by_email(
        &mut self,
        email: &str,
    ) -> PgResult<Option<(Account, AccountCredential)>> {
        use schema::{account_credentials, accounts};

        account_credentials::table
            .inner_join(accounts::table)
            .filter(account_credentials::email_address.eq(normalize_email(email)))
            .select((Account::as_select(), AccountCredential::as_select()))
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        mut updates: UpdateAccount,
    ) -> PgResult<Account> {
        use schema::accounts::{self, dsl};

        if let Some(name) = updates.display_name.as_mut() {
            *name = name.trim().to_owned();
        }
        updates.company_name = updates
            .company_name
            .map(|company| company.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty()));
        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((&updates, touched(dsl::updated_at)))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn set_verification_status(
        &mut self,
        account_id: Uuid,
        status: VerificationStatus,
    ) -> PgResult<Account> {
        let updates = UpdateAccount {
            verification_status: Some(status),
            ..Default::default()
        };

        self.update_account(account_id, updates).await
    }

    async fn update_password(&mut self, account_id: Uuid, password_hash: String) -> PgResult<()> {
        use schema::account_credentials::{self, dsl};

        let updated = diesel::update(account_credentials::table.filter(dsl::account_id.eq(account_id)))
            .set((
                dsl::password_hash.eq(password_hash),
                touched(dsl::updated_at),
            ))
            .execute(self)
            .await?;

        if updated == 0 {
            return Err(PgError::Query(diesel::result::Error::NotFound));
        }

        Ok(())
    }
}
