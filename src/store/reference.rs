//! Brands, models, customers, users and payment methods.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::auth::{CredentialProvider, Session};
use crate::error::{PosError, Result};
use crate::models::{default_payment_methods, Brand, Customer, Model, PaymentMethod, Role, User};
use crate::rows::reference::{
    BRAND_MIN_CELLS, CUSTOMER_MIN_CELLS, MODEL_MIN_CELLS, PAYMENT_METHOD_MIN_CELLS, USER_MIN_CELLS,
};
use crate::rows::{self, ranges, Row};

use super::PosStore;

fn records<T>(decoded: Vec<(usize, T)>) -> Vec<T> {
    decoded.into_iter().map(|(_, record)| record).collect()
}

fn required(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PosError::InvalidInput(format!("{what} is empty")));
    }
    Ok(trimmed.to_string())
}

impl PosStore {
    /// Signs in: opens a session and binds it to the user registered under `email`.
    ///
    /// Unknown emails are refused with [`PosError::AuthorizationDenied`] and
    /// the session is closed again.
    pub async fn login(
        &self,
        provider: Arc<dyn CredentialProvider>,
        email: &str,
    ) -> Result<Session> {
        info!("Signing in {email}");
        let session = Session::acquire(provider);
        match self.find_user_by_email(&session, email).await {
            Ok(Some(user)) => {
                info!("Signed in {} as {}", user.email, user.role.as_str());
                Ok(session.with_user(user))
            }
            Ok(None) => {
                warn!("No user registered for {email}");
                session.invalidate();
                Err(PosError::AuthorizationDenied(format!(
                    "{email} is not registered for this shop"
                )))
            }
            Err(e) => {
                session.invalidate();
                Err(e)
            }
        }
    }

    pub async fn list_users(&self, session: &Session) -> Result<Vec<User>> {
        let values: Vec<Row> = self.api.get_values(session, ranges::USERS).await?;
        Ok(records(rows::decode_all(&values, USER_MIN_CELLS, rows::decode_user)))
    }

    /// Case-insensitive email lookup.
    pub async fn find_user_by_email(&self, session: &Session, email: &str) -> Result<Option<User>> {
        let wanted = email.trim().to_lowercase();
        let users = self.list_users(session).await?;
        Ok(users.into_iter().find(|u| u.email.to_lowercase() == wanted))
    }

    pub async fn create_user(
        &self,
        session: &Session,
        email: &str,
        full_name: &str,
        role: Role,
    ) -> Result<User> {
        let user = User {
            id: self.next_id(0),
            email: required(email, "email")?,
            full_name: full_name.trim().to_string(),
            role,
        };
        self.api
            .append_rows(session, ranges::USERS_APPEND, vec![rows::encode_user(&user)])
            .await?;
        info!("Created user {} (ID: {})", user.email, user.id);
        Ok(user)
    }

    pub async fn list_brands(&self, session: &Session) -> Result<Vec<Brand>> {
        let values = self.api.get_values(session, ranges::BRANDS).await?;
        Ok(records(rows::decode_all(&values, BRAND_MIN_CELLS, rows::decode_brand)))
    }

    pub async fn create_brand(&self, session: &Session, name: &str) -> Result<Brand> {
        let brand = Brand {
            id: self.next_id(0),
            name: required(name, "brand name")?,
        };
        self.api
            .append_rows(session, ranges::BRANDS_APPEND, vec![rows::encode_brand(&brand)])
            .await?;
        info!("Created brand {} (ID: {})", brand.name, brand.id);
        Ok(brand)
    }

    pub async fn list_models(&self, session: &Session) -> Result<Vec<Model>> {
        let values = self.api.get_values(session, ranges::MODELS).await?;
        Ok(records(rows::decode_all(&values, MODEL_MIN_CELLS, rows::decode_model)))
    }

    /// Adds a model under an existing brand.
    pub async fn create_model(&self, session: &Session, brand_id: i64, name: &str) -> Result<Model> {
        let name = required(name, "model name")?;
        let brands = self.list_brands(session).await?;
        if !brands.iter().any(|b| b.id == brand_id) {
            return Err(PosError::InvalidInput(format!("brand {brand_id} not found")));
        }

        let model = Model {
            id: self.next_id(0),
            brand_id,
            name,
        };
        self.api
            .append_rows(session, ranges::MODELS_APPEND, vec![rows::encode_model(&model)])
            .await?;
        info!(
            "Created model {} for brand {} (ID: {})",
            model.name, brand_id, model.id
        );
        Ok(model)
    }

    pub async fn list_customers(&self, session: &Session) -> Result<Vec<Customer>> {
        let values = self.api.get_values(session, ranges::CUSTOMERS).await?;
        Ok(records(rows::decode_all(
            &values,
            CUSTOMER_MIN_CELLS,
            rows::decode_customer,
        )))
    }

    pub async fn create_customer(
        &self,
        session: &Session,
        full_name: &str,
        address: &str,
        dni: &str,
        phone: &str,
    ) -> Result<Customer> {
        let customer = Customer {
            id: self.next_id(0),
            full_name: required(full_name, "customer name")?,
            address: address.trim().to_string(),
            dni: dni.trim().to_string(),
            phone: phone.trim().to_string(),
        };
        self.api
            .append_rows(
                session,
                ranges::CUSTOMERS_APPEND,
                vec![rows::encode_customer(&customer)],
            )
            .await?;
        info!("Created customer {} (ID: {})", customer.full_name, customer.id);
        Ok(customer)
    }

    /// Payment methods, or the built-in defaults when the sheet cannot be read.
    ///
    /// Authorization failures are still returned as errors.
    pub async fn list_payment_methods(&self, session: &Session) -> Result<Vec<PaymentMethod>> {
        match self.api.get_values(session, ranges::PAYMENT_METHODS).await {
            Ok(values) => Ok(records(rows::decode_all(
                &values,
                PAYMENT_METHOD_MIN_CELLS,
                rows::decode_payment_method,
            ))),
            Err(e) if e.is_authorization() => Err(e),
            Err(e) => {
                warn!("Failed to read payment methods, using defaults: {e}");
                let defaults = default_payment_methods();
                debug!("Default payment methods: {defaults:?}");
                Ok(defaults)
            }
        }
    }

    pub async fn create_payment_method(&self, session: &Session, name: &str) -> Result<PaymentMethod> {
        let method = PaymentMethod {
            id: self.next_id(0),
            name: required(name, "payment method name")?,
        };
        self.api
            .append_rows(
                session,
                ranges::PAYMENT_METHODS_APPEND,
                vec![rows::encode_payment_method(&method)],
            )
            .await?;
        info!("Created payment method {} (ID: {})", method.name, method.id);
        Ok(method)
    }
}
