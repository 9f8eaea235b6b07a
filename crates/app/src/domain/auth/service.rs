//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pestitele::{
    forms::{Credentials, Registration},
    geo::Coordinates,
    growers::{Grower, GrowerId},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    domain::auth::{
        errors::AuthServiceError,
        pin::{hash_pin, pin_matches},
        sms::SmsCode,
    },
    session::{GrowerSession, SessionStore},
    store::{DataStore, Query, StoreError, Table, decode_first, decode_rows, encode},
};

#[derive(Debug, Serialize)]
struct NewGrowerRow<'a> {
    jmeno: &'a str,
    mesto: &'a str,
    telefon: &'a str,
    email: Option<&'a str>,
    popis: Option<&'a str>,
    pin_hash: String,
}

#[derive(Debug, Deserialize)]
struct GrowerWithPin {
    #[serde(flatten)]
    grower: Grower,

    #[serde(default)]
    pin_hash: Option<String>,
}

pub struct StoreAuthService {
    store: Arc<dyn DataStore>,
    session: SessionStore,
}

impl StoreAuthService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>, session: SessionStore) -> Self {
        Self { store, session }
    }

    fn by_phone(phone: &str) -> Query {
        Query::all().eq("telefon", phone).limit(1)
    }

    async fn remember(&self, grower: &Grower) -> Result<(), AuthServiceError> {
        self.session
            .sign_in(&GrowerSession::grower(grower.id, grower.name.clone()))
            .await?;

        Ok(())
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    #[tracing::instrument(skip_all)]
    async fn register(&self, registration: Registration) -> Result<Grower, AuthServiceError> {
        let existing = self
            .store
            .select(Table::Growers, Self::by_phone(&registration.phone).columns(&["id"]))
            .await?;

        if !existing.is_empty() {
            return Err(AuthServiceError::PhoneTaken);
        }

        let row = encode(&NewGrowerRow {
            jmeno: &registration.name,
            mesto: &registration.city,
            telefon: &registration.phone,
            email: registration.email.as_deref(),
            popis: registration.description.as_deref(),
            pin_hash: hash_pin(&registration.phone, &registration.pin),
        })?;

        let grower: Grower = decode_first(self.store.insert(Table::Growers, vec![row]).await?)?;

        self.remember(&grower).await?;

        info!(grower_id = %grower.id, "registered grower");

        Ok(grower)
    }

    #[tracing::instrument(skip_all)]
    async fn login(&self, credentials: Credentials) -> Result<Grower, AuthServiceError> {
        let rows = self
            .store
            .select(Table::Growers, Self::by_phone(&credentials.phone))
            .await?;

        let found: GrowerWithPin = match decode_first(rows) {
            Ok(found) => found,
            Err(StoreError::NotFound) => return Err(AuthServiceError::InvalidCredentials),
            Err(error) => return Err(error.into()),
        };

        if !pin_matches(&credentials.phone, &credentials.pin, found.pin_hash.as_deref()) {
            warn!(grower_id = %found.grower.id, "rejected login");

            return Err(AuthServiceError::InvalidCredentials);
        }

        self.remember(&found.grower).await?;

        info!(grower_id = %found.grower.id, "grower logged in");

        Ok(found.grower)
    }

    async fn logout(&self) -> Result<(), AuthServiceError> {
        Ok(self.session.sign_out().await?)
    }

    async fn current_grower(&self) -> Result<Option<GrowerSession>, AuthServiceError> {
        Ok(self.session.grower().await?)
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner))]
    async fn update_location(
        &self,
        owner: GrowerId,
        at: Coordinates,
    ) -> Result<Grower, AuthServiceError> {
        let rows = self
            .store
            .update(
                Table::Growers,
                Query::all().columns(Grower::COLUMNS).eq("id", owner),
                json!({ "gps_lat": at.lat, "gps_lng": at.lng }),
            )
            .await?;

        Ok(decode_first(rows)?)
    }

    #[tracing::instrument(skip_all)]
    async fn issue_sms_code(&self, phone: String) -> Result<SmsCode, AuthServiceError> {
        let code = SmsCode::issue(&phone, Timestamp::now());

        self.store
            .insert(Table::SmsCodes, vec![encode(&code)?])
            .await?;

        info!("issued sms code");

        Ok(code)
    }

    #[tracing::instrument(skip_all)]
    async fn verify_sms_code(&self, phone: String, code: String) -> Result<bool, AuthServiceError> {
        let rows = self
            .store
            .select(
                Table::SmsCodes,
                Query::all().eq("telefon", &phone).eq("kod", code.trim()),
            )
            .await?;

        let now = Timestamp::now();
        let valid = decode_rows::<SmsCode>(rows)?
            .iter()
            .any(|stored| stored.is_valid_at(now));

        if valid {
            self.store
                .delete(Table::SmsCodes, Query::all().eq("telefon", &phone))
                .await?;
        }

        Ok(valid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a grower account and signs it in.
    async fn register(&self, registration: Registration) -> Result<Grower, AuthServiceError>;

    /// Checks phone and PIN and signs the grower in.
    async fn login(&self, credentials: Credentials) -> Result<Grower, AuthServiceError>;

    /// Signs the grower out on this device.
    async fn logout(&self) -> Result<(), AuthServiceError>;

    /// The grower signed in on this device.
    async fn current_grower(&self) -> Result<Option<GrowerSession>, AuthServiceError>;

    /// Stores the grower's farm location.
    async fn update_location(
        &self,
        owner: GrowerId,
        at: Coordinates,
    ) -> Result<Grower, AuthServiceError>;

    /// Stores a fresh verification code for the phone.
    async fn issue_sms_code(&self, phone: String) -> Result<SmsCode, AuthServiceError>;

    /// Checks a code; a match consumes every code of the phone.
    async fn verify_sms_code(&self, phone: String, code: String) -> Result<bool, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use pestitele::forms::{LoginDraft, RegistrationDraft};
    use serde_json::Value;
    use testresult::TestResult;

    use crate::{device::MemoryKeyValueStore, store::MockDataStore};

    use super::*;

    const PHONE: &str = "777123456";

    fn service(store: MockDataStore) -> (SessionStore, StoreAuthService) {
        let session = SessionStore::new(Arc::new(MemoryKeyValueStore::new()));

        (session.clone(), StoreAuthService::new(Arc::new(store), session))
    }

    fn registration() -> TestResult<Registration> {
        Ok(RegistrationDraft {
            name: "Jana".to_string(),
            city: "Beroun".to_string(),
            phone: "+420 777 123 456".to_string(),
            email: String::new(),
            pin: "1234".to_string(),
            pin_confirmation: "1234".to_string(),
            description: String::new(),
        }
        .validate()
        .map_err(|errors| format!("{errors:?}"))?)
    }

    fn credentials(pin: &str) -> TestResult<Credentials> {
        Ok(LoginDraft {
            phone: PHONE.to_string(),
            pin: pin.to_string(),
        }
        .validate()
        .map_err(|errors| format!("{errors:?}"))?)
    }

    fn grower_row(id: GrowerId, pin_hash: &str) -> Value {
        json!({
            "id": id.to_string(),
            "jmeno": "Jana",
            "mesto": "Beroun",
            "telefon": PHONE,
            "pin_hash": pin_hash,
        })
    }

    #[tokio::test]
    async fn registration_stores_hash_and_signs_in() -> TestResult {
        let id = GrowerId::new();
        let mut store = MockDataStore::new();

        store.expect_select().once().returning(|_, _| Ok(vec![]));
        store
            .expect_insert()
            .once()
            .withf(|table, rows| {
                *table == Table::Growers
                    && rows.first().is_some_and(|row| {
                        row["telefon"] == PHONE
                            && row["pin_hash"].as_str().is_some_and(|hash| hash.len() == 64)
                            && row.get("pin").is_none()
                    })
            })
            .returning(move |_, _| Ok(vec![grower_row(id, "")]));

        let (session, service) = service(store);

        let grower = service.register(registration()?).await?;

        assert_eq!(grower.id, id);
        assert_eq!(session.grower().await?.map(|s| s.grower_id), Some(id));

        Ok(())
    }

    #[tokio::test]
    async fn taken_phone_is_rejected_before_insert() -> TestResult {
        let mut store = MockDataStore::new();
        store
            .expect_select()
            .once()
            .returning(|_, _| Ok(vec![grower_row(GrowerId::new(), "")]));
        store.expect_insert().never();

        let (_, service) = service(store);

        let result = service.register(registration()?).await;

        assert!(matches!(result, Err(AuthServiceError::PhoneTaken)));

        Ok(())
    }

    #[tokio::test]
    async fn racing_registration_maps_unique_violation() -> TestResult {
        let mut store = MockDataStore::new();
        store.expect_select().returning(|_, _| Ok(vec![]));
        store
            .expect_insert()
            .returning(|_, _| Err(StoreError::UniqueViolation));

        let (_, service) = service(store);

        let result = service.register(registration()?).await;

        assert!(matches!(result, Err(AuthServiceError::PhoneTaken)));

        Ok(())
    }

    #[tokio::test]
    async fn login_checks_pin_hash() -> TestResult {
        let id = GrowerId::new();
        let good = credentials("1234")?;
        let hash = hash_pin(PHONE, &good.pin);
        let mut store = MockDataStore::new();

        store
            .expect_select()
            .withf(|_, query| query.filter("telefon") == Some(PHONE))
            .returning(move |_, _| Ok(vec![grower_row(id, &hash)]));

        let (session, service) = service(store);

        assert!(matches!(
            service.login(credentials("9999")?).await,
            Err(AuthServiceError::InvalidCredentials)
        ));
        assert_eq!(session.grower().await?, None);

        let grower = service.login(good).await?;

        assert_eq!(grower.id, id);
        assert!(service.current_grower().await?.is_some());

        service.logout().await?;

        assert_eq!(service.current_grower().await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_phone_is_invalid_credentials() -> TestResult {
        let mut store = MockDataStore::new();
        store.expect_select().returning(|_, _| Ok(vec![]));

        let (_, service) = service(store);

        assert!(matches!(
            service.login(credentials("1234")?).await,
            Err(AuthServiceError::InvalidCredentials)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn matching_code_is_consumed() -> TestResult {
        let mut store = MockDataStore::new();
        store.expect_select().once().returning(|_, _| {
            Ok(vec![encode(&SmsCode::issue(PHONE, Timestamp::now()))?])
        });
        store
            .expect_delete()
            .once()
            .withf(|table, _| *table == Table::SmsCodes)
            .returning(|_, _| Ok(1));

        let (_, service) = service(store);

        assert!(service.verify_sms_code(PHONE.to_string(), "123456".to_string()).await?);

        Ok(())
    }

    #[tokio::test]
    async fn expired_code_is_rejected() -> TestResult {
        let mut store = MockDataStore::new();
        store.expect_select().once().returning(|_, _| {
            Ok(vec![encode(&SmsCode::issue(PHONE, Timestamp::UNIX_EPOCH))?])
        });
        store.expect_delete().never();

        let (_, service) = service(store);

        assert!(!service.verify_sms_code(PHONE.to_string(), "123456".to_string()).await?);

        Ok(())
    }
}
