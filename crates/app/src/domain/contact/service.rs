//! Contact service.

use std::sync::Arc;

use mockall::automock;
use pestitele::{
    contact::ContactAction,
    growers::{Grower, GrowerId},
    shopping_list::ShoppingList,
    stalls::Stall,
};
use tracing::info;

use crate::{device::Launcher, domain::contact::errors::ContactServiceError};

pub struct LauncherContactService {
    launcher: Arc<dyn Launcher>,
}

impl LauncherContactService {
    #[must_use]
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        Self { launcher }
    }

    fn launch(&self, action: &ContactAction) -> Result<(), ContactServiceError> {
        self.launcher.launch(action)?;

        Ok(())
    }
}

impl ContactService for LauncherContactService {
    fn call_grower(&self, grower: &Grower) -> Result<(), ContactServiceError> {
        self.launch(&ContactAction::call(&grower.phone)?)
    }

    fn text_grower(&self, list: &ShoppingList, grower: GrowerId) -> Result<(), ContactServiceError> {
        let groups = list.groups();
        let group = groups
            .iter()
            .find(|group| group.grower.id == grower)
            .ok_or(ContactServiceError::NotOnList)?;

        let [_, sms] = group.contact_actions()?;

        info!(grower_id = %grower, lines = group.lines.len(), "texting grower");

        self.launch(&sms)
    }

    fn navigate_to_grower(&self, grower: &Grower) -> Result<(), ContactServiceError> {
        let action = match grower.location() {
            Some(location) => ContactAction::navigate_to(location)?,
            None => ContactAction::navigate_to_address(&grower.city)?,
        };

        self.launch(&action)
    }

    fn navigate_to_stall(&self, stall: &Stall) -> Result<(), ContactServiceError> {
        self.launch(&ContactAction::navigate_to_address(&stall.address())?)
    }
}

#[automock]
pub trait ContactService: Send + Sync {
    /// Opens the dialer with the grower's number.
    fn call_grower(&self, grower: &Grower) -> Result<(), ContactServiceError>;

    /// Opens the messaging app with the grower's share of the shopping list prefilled.
    fn text_grower(&self, list: &ShoppingList, grower: GrowerId) -> Result<(), ContactServiceError>;

    /// Navigates to the grower's farm, or their city when it has no GPS position.
    fn navigate_to_grower(&self, grower: &Grower) -> Result<(), ContactServiceError>;

    fn navigate_to_stall(&self, stall: &Stall) -> Result<(), ContactServiceError>;
}

#[cfg(test)]
mod tests {
    use pestitele::{
        cart::CartItem,
        contact::ContactError,
        products::{ProductId, Unit},
        shopping_list::ShoppingList,
        stalls::StallId,
    };
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::device::{LaunchError, MockLauncher};

    use super::*;

    fn grower(phone: &str, gps: Option<(f64, f64)>) -> Grower {
        Grower {
            id: GrowerId::new(),
            name: "Statek Novák".to_string(),
            city: "Beroun".to_string(),
            description: None,
            phone: phone.to_string(),
            email: None,
            gps_lat: gps.map(|(lat, _)| lat),
            gps_lng: gps.map(|(_, lng)| lng),
        }
    }

    fn expecting(uri: &'static str) -> MockLauncher {
        let mut launcher = MockLauncher::new();
        launcher
            .expect_launch()
            .once()
            .withf(move |action| action.to_string().starts_with(uri))
            .returning(|_| Ok(()));

        launcher
    }

    #[test]
    fn calls_grower_phone() -> TestResult {
        let service = LauncherContactService::new(Arc::new(expecting("tel:777000111")));

        service.call_grower(&grower("777 000 111", None))?;

        Ok(())
    }

    #[test]
    fn blank_phone_never_reaches_launcher() {
        let mut launcher = MockLauncher::new();
        launcher.expect_launch().never();

        let service = LauncherContactService::new(Arc::new(launcher));

        let result = service.call_grower(&grower(" ", None));

        assert!(matches!(
            result,
            Err(ContactServiceError::Contact(ContactError::MissingPhone))
        ));
    }

    #[test]
    fn navigates_by_coordinates_then_city() -> TestResult {
        let service = LauncherContactService::new(Arc::new(expecting(
            "https://www.google.com/maps/dir/?api=1&destination=50.08%2C14.44",
        )));
        service.navigate_to_grower(&grower("777000111", Some((50.08, 14.44))))?;

        let service = LauncherContactService::new(Arc::new(expecting(
            "https://www.google.com/maps/dir/?api=1&destination=Beroun",
        )));
        service.navigate_to_grower(&grower("777000111", None))?;

        Ok(())
    }

    #[test]
    fn navigates_to_stall_address() -> TestResult {
        let stall = Stall {
            id: StallId::new(),
            grower_id: GrowerId::new(),
            name: "Stánek".to_string(),
            description: None,
            city: "Beroun".to_string(),
            street: "Náměstí".to_string(),
            photo: None,
            datum_od: "2025-06-01".to_string(),
            datum_do: "2025-06-02".to_string(),
            cas_od: None,
            cas_do: None,
        };
        let service = LauncherContactService::new(Arc::new(expecting(
            "https://www.google.com/maps/dir/?api=1&destination=N%C3%A1m%C4%9Bst%C3%AD%2C+Beroun",
        )));

        service.navigate_to_stall(&stall)?;

        Ok(())
    }

    #[test]
    fn texts_group_with_order_body() -> TestResult {
        let farm = grower("777000111", None).to_ref();
        let farm_id = farm.id;
        let mut list = ShoppingList::new();
        list.add(CartItem {
            product_id: ProductId::new(),
            name: "Med".to_string(),
            unit_price: Decimal::from(150),
            unit: Unit::Piece,
            grower: farm,
        });

        let service = LauncherContactService::new(Arc::new(expecting("sms:777000111?body=")));

        service.text_grower(&list, farm_id)?;

        Ok(())
    }

    #[test]
    fn texting_unknown_grower_fails() {
        let mut launcher = MockLauncher::new();
        launcher.expect_launch().never();

        let service = LauncherContactService::new(Arc::new(launcher));

        assert!(matches!(
            service.text_grower(&ShoppingList::new(), GrowerId::new()),
            Err(ContactServiceError::NotOnList)
        ));
    }

    #[test]
    fn launcher_failure_is_reported() {
        let mut launcher = MockLauncher::new();
        launcher
            .expect_launch()
            .returning(|action| Err(LaunchError::Unsupported(action.to_string())));

        let service = LauncherContactService::new(Arc::new(launcher));

        assert!(matches!(
            service.call_grower(&grower("777000111", None)),
            Err(ContactServiceError::Launch(_))
        ));
    }
}
