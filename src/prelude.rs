//! Pěstitelé prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartItem, CartLine, CartState, CartTotals, GrowerConflict},
    contact::{ContactAction, ContactError},
    discovery::{
        DiscoveredGrower, DiscoveryFilter, DistanceLimit, EnrichedGrower, discover,
        join_products_to_growers,
    },
    favorites::{CustomerId, Favorite, NewFavorite},
    forms::{
        CheckoutDetails, CheckoutDraft, Credentials, LoginDraft, Pin, ProductDraft, ProductInput,
        Registration, RegistrationDraft, StallDraft, StallInput, ValidationError,
        ValidationErrors,
    },
    geo::{Coordinates, haversine_km},
    growers::{Grower, GrowerId, GrowerRef},
    ids::TypedId,
    orders::{
        NewOrder, NewOrderLine, Order, OrderError, OrderId, OrderLine, OrderSnapshot,
        OrderStatus, OrderWithLines,
    },
    products::{Category, PredefinedProduct, PredefinedProductId, Product, ProductId, Unit},
    shopping_list::{GrowerGroup, ShoppingList},
    stalls::{Stall, StallError, StallId, StallView, db_to_display, display_to_db},
};
