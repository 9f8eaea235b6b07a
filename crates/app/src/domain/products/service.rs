//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use pestitele::{
    forms::ProductInput,
    growers::GrowerId,
    products::{PredefinedProduct, Product, ProductId},
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::{
    domain::products::{errors::ProductsServiceError, photos::Photo},
    store::{DataStore, Direction, Query, Table, decode_first, decode_rows, encode},
};

const PHOTO_FOLDER: &str = "produkty";

#[derive(Debug, Serialize)]
struct NewProductRow<'a> {
    pestitel_id: GrowerId,

    #[serde(flatten)]
    input: &'a ProductInput,
}

pub struct StoreProductsService {
    store: Arc<dyn DataStore>,
}

impl StoreProductsService {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    fn owned(owner: GrowerId, product: ProductId) -> Query {
        Query::all().eq("id", product).eq("pestitel_id", owner)
    }
}

#[async_trait]
impl ProductsService for StoreProductsService {
    async fn list_products(&self, grower: GrowerId) -> Result<Vec<Product>, ProductsServiceError> {
        let rows = self
            .store
            .select(
                Table::Products,
                Query::all()
                    .eq("pestitel_id", grower)
                    .order_by("nazev", Direction::Ascending),
            )
            .await?;

        Ok(decode_rows(rows)?)
    }

    async fn list_available(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let rows = self
            .store
            .select(Table::Products, Query::all().eq("dostupnost", true))
            .await?;

        Ok(decode_rows(rows)?)
    }

    async fn catalog(&self) -> Result<Vec<PredefinedProduct>, ProductsServiceError> {
        let rows = self
            .store
            .select(
                Table::PredefinedProducts,
                Query::all().order_by("nazev", Direction::Ascending),
            )
            .await?;

        Ok(decode_rows(rows)?)
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner))]
    async fn create_product(
        &self,
        owner: GrowerId,
        input: ProductInput,
    ) -> Result<Product, ProductsServiceError> {
        let row = encode(&NewProductRow {
            pestitel_id: owner,
            input: &input,
        })?;

        let product: Product = decode_first(self.store.insert(Table::Products, vec![row]).await?)?;

        info!(product_id = %product.id, "created product");

        Ok(product)
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner, product_id = %product))]
    async fn update_product(
        &self,
        owner: GrowerId,
        product: ProductId,
        input: ProductInput,
    ) -> Result<Product, ProductsServiceError> {
        let rows = self
            .store
            .update(Table::Products, Self::owned(owner, product), encode(&input)?)
            .await?;

        let updated = decode_first(rows)?;

        info!("updated product");

        Ok(updated)
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner, product_id = %product))]
    async fn set_availability(
        &self,
        owner: GrowerId,
        product: ProductId,
        available: bool,
    ) -> Result<Product, ProductsServiceError> {
        let rows = self
            .store
            .update(
                Table::Products,
                Self::owned(owner, product),
                json!({ "dostupnost": available }),
            )
            .await?;

        Ok(decode_first(rows)?)
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner, product_id = %product))]
    async fn delete_product(
        &self,
        owner: GrowerId,
        product: ProductId,
    ) -> Result<(), ProductsServiceError> {
        let removed = self
            .store
            .delete(Table::Products, Self::owned(owner, product))
            .await?;

        if removed == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        info!("deleted product");

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(grower_id = %owner, product_id = %product))]
    async fn upload_photo(
        &self,
        owner: GrowerId,
        product: ProductId,
        photo: Photo,
    ) -> Result<Product, ProductsServiceError> {
        let path = photo
            .object_path(PHOTO_FOLDER, owner)
            .ok_or_else(|| ProductsServiceError::UnsupportedPhoto(photo.content_type.clone()))?;

        let url = self
            .store
            .upload(path, photo.content_type, photo.bytes)
            .await?;

        let rows = self
            .store
            .update(
                Table::Products,
                Self::owned(owner, product),
                json!({ "foto": url }),
            )
            .await?;

        info!("uploaded product photo");

        Ok(decode_first(rows)?)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// A grower's products, available or not.
    async fn list_products(&self, grower: GrowerId) -> Result<Vec<Product>, ProductsServiceError>;

    /// Every product currently on offer.
    async fn list_available(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// The predefined product catalog.
    async fn catalog(&self) -> Result<Vec<PredefinedProduct>, ProductsServiceError>;

    /// Adds a product to the grower's listing.
    async fn create_product(
        &self,
        owner: GrowerId,
        input: ProductInput,
    ) -> Result<Product, ProductsServiceError>;

    /// Replaces a product's fields. Only the owning grower can.
    async fn update_product(
        &self,
        owner: GrowerId,
        product: ProductId,
        input: ProductInput,
    ) -> Result<Product, ProductsServiceError>;

    /// Puts a product on or off offer.
    async fn set_availability(
        &self,
        owner: GrowerId,
        product: ProductId,
        available: bool,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product. Only the owning grower can.
    async fn delete_product(
        &self,
        owner: GrowerId,
        product: ProductId,
    ) -> Result<(), ProductsServiceError>;

    /// Uploads a photo and links it to the product.
    async fn upload_photo(
        &self,
        owner: GrowerId,
        product: ProductId,
        photo: Photo,
    ) -> Result<Product, ProductsServiceError>;
}
