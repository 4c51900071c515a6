//! # Menu Service
//!
//! Menu administration: products, extras, and categories.
//!
//! ## Repricing Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_product(p)                                                      │
//! │       │                                                                 │
//! │       ├── rewrite the live product row                                  │
//! │       │                                                                 │
//! │       └── reprice STILL-OPEN orders that contain the product:           │
//! │             refresh each matching item's snapshot, recompute the        │
//! │             total (delivery fee stays frozen).                          │
//! │                                                                         │
//! │  Completed and cancelled orders are history and are NEVER touched.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info};

use brasa_core::{pricing, Category, CoreError, Product};
use brasa_db::Database;

use crate::error::ServiceResult;

/// Menu administration service.
#[derive(Debug, Clone)]
pub struct MenuService {
    db: Database,
}

impl MenuService {
    /// Creates a new MenuService.
    pub fn new(db: Database) -> Self {
        MenuService { db }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists products. The storefront passes `include_inactive = false`.
    pub async fn list_products(&self, include_inactive: bool) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list(include_inactive).await?)
    }

    /// Creates a product.
    pub async fn create_product(&self, product: &Product) -> ServiceResult<()> {
        self.db.products().insert(product).await?;
        info!(name = %product.name, "Product created");
        Ok(())
    }

    /// Updates a product and reprices still-open orders containing it.
    pub async fn update_product(&self, product: &Product) -> ServiceResult<usize> {
        self.db.products().update(product).await?;

        let repriced = self.reprice_open_orders(product).await?;
        if repriced > 0 {
            info!(
                product = %product.name,
                orders = repriced,
                "Open orders repriced after menu edit"
            );
        }
        Ok(repriced)
    }

    /// Hides a product from the storefront (soft delete).
    pub async fn deactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db.products().set_active(id, false).await?;
        Ok(())
    }

    /// Restores a hidden product.
    pub async fn reactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db.products().set_active(id, true).await?;
        Ok(())
    }

    /// Refreshes snapshots of `product` in every open order and rewrites
    /// their totals. Returns how many orders were touched.
    async fn reprice_open_orders(&self, product: &Product) -> ServiceResult<usize> {
        let orders = self.db.orders().list_open().await?;
        let mut repriced = 0;

        for mut order in orders {
            let mut touched = false;

            for item in &mut order.items {
                if item.product.id != product.id {
                    continue;
                }

                // Re-map chosen extras onto the edited product. An extra
                // that was removed from the menu keeps its frozen snapshot:
                // the customer already agreed to that price.
                item.selected_extras = item
                    .selected_extras
                    .iter()
                    .map(|chosen| {
                        product
                            .extras
                            .iter()
                            .find(|e| e.id == chosen.id)
                            .cloned()
                            .unwrap_or_else(|| chosen.clone())
                    })
                    .collect();
                item.product = product.clone();
                touched = true;
            }

            if touched {
                let total =
                    pricing::order_subtotal(&order.items) + order.delivery_fee();
                self.db
                    .orders()
                    .update_items_and_total(&order.id, &order.items, total.cents())
                    .await?;
                repriced += 1;
                debug!(number = order.number, "Order repriced");
            }
        }

        Ok(repriced)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Lists categories in sort order.
    pub async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.db.products().list_categories().await?)
    }

    /// Creates a category.
    pub async fn create_category(&self, category: &Category) -> ServiceResult<()> {
        self.db.products().insert_category(category).await?;
        Ok(())
    }

    /// Renames or reorders a category.
    pub async fn update_category(&self, category: &Category) -> ServiceResult<()> {
        self.db.products().update_category(category).await?;
        Ok(())
    }

    /// Deletes a category.
    ///
    /// Rejected while any product (active or hidden) still references it;
    /// the admin must move or delete the products first.
    pub async fn delete_category(&self, id: &str) -> ServiceResult<()> {
        let product_count = self.db.products().count_products_in_category(id).await?;
        if product_count > 0 {
            return Err(CoreError::CategoryInUse {
                category_id: id.to_string(),
                product_count: product_count as usize,
            }
            .into());
        }

        self.db.products().delete_category(id).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::orders::OrderService;
    use brasa_core::{
        LineItem, OrderDraft, OrderOrigin, PickupType, ProductExtra, StoreSettings,
    };
    use brasa_db::DbConfig;

    async fn seeded_db() -> (Database, Product) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.products()
            .insert_category(&Category {
                id: "c1".to_string(),
                name: "Lanches".to_string(),
                sort_order: 0,
            })
            .await
            .unwrap();

        let product = Product {
            id: "p1".to_string(),
            name: "X-Burger".to_string(),
            description: String::new(),
            price_cents: 1890,
            cost_price_cents: None,
            is_active: true,
            category_id: "c1".to_string(),
            image_url: None,
            extras: vec![ProductExtra {
                id: "e1".to_string(),
                name: "Bacon".to_string(),
                price_cents: 400,
                is_active: true,
            }],
        };
        db.products().insert(&product).await.unwrap();
        db.settings().save(&StoreSettings::default()).await.unwrap();

        (db, product)
    }

    fn draft(product: &Product) -> OrderDraft {
        OrderDraft {
            origin: OrderOrigin::Counter,
            pickup_type: PickupType::Immediate,
            scheduled_time: None,
            customer_name: "Ana".to_string(),
            customer_phone: None,
            table_number: None,
            delivery_address: None,
            items: vec![LineItem {
                id: "i1".to_string(),
                product: product.clone(),
                quantity: 2,
                selected_extras: vec![product.extras[0].clone()],
                observation: String::new(),
            }],
            general_observation: String::new(),
            internal_observation: None,
            payment_method: None,
        }
    }

    #[tokio::test]
    async fn test_delete_category_in_use_rejected() {
        let (db, _) = seeded_db().await;
        let menu = MenuService::new(db);

        let err = menu.delete_category("c1").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::CategoryInUse {
                product_count: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_delete_empty_category_ok() {
        let (db, _) = seeded_db().await;
        let menu = MenuService::new(db);

        menu.create_category(&Category {
            id: "c2".to_string(),
            name: "Bebidas".to_string(),
            sort_order: 1,
        })
        .await
        .unwrap();

        menu.delete_category("c2").await.unwrap();
        assert_eq!(menu.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_product_reprices_open_orders_only() {
        let (db, mut product) = seeded_db().await;
        let orders = OrderService::new(db.clone());
        let menu = MenuService::new(db.clone());

        // one open order, one completed order, both with the product
        let open = orders.place_order(draft(&product)).await.unwrap();
        let done = orders.place_order(draft(&product)).await.unwrap();
        orders.advance(&done.id).await.unwrap();
        orders.advance(&done.id).await.unwrap();
        orders.advance(&done.id).await.unwrap();

        assert_eq!(open.total_cents, 4580);

        product.price_cents = 2090;
        let repriced = menu.update_product(&product).await.unwrap();
        assert_eq!(repriced, 1);

        // open order: (2090 + 400) × 2
        let open_after = orders.get(&open.id).await.unwrap();
        assert_eq!(open_after.total_cents, 4980);

        // completed order untouched
        let done_after = orders.get(&done.id).await.unwrap();
        assert_eq!(done_after.total_cents, 4580);
        assert_eq!(done_after.items[0].product.price_cents, 1890);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_storefront_listing() {
        let (db, product) = seeded_db().await;
        let menu = MenuService::new(db);

        menu.deactivate_product(&product.id).await.unwrap();
        assert!(menu.list_products(false).await.unwrap().is_empty());
        assert_eq!(menu.list_products(true).await.unwrap().len(), 1);

        menu.reactivate_product(&product.id).await.unwrap();
        assert_eq!(menu.list_products(false).await.unwrap().len(), 1);
    }
}
