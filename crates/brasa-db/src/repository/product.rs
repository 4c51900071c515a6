//! # Product Repository
//!
//! Database operations for the menu: products, their extras, and categories.
//!
//! ## Snapshot vs Live Data
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products / product_extras / categories  ← LIVE menu (this module)     │
//! │                                                                         │
//! │  orders.items (JSON)                     ← FROZEN snapshots            │
//! │                                                                         │
//! │  Editing the menu only touches the live tables. Order history is       │
//! │  immutable; only still-open orders are ever repriced, and that runs    │
//! │  through the service layer, not here.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::debug;

use brasa_core::{Category, Product, ProductExtra};

use crate::error::{DbError, DbResult};

/// Repository for product and category operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: String,
    price_cents: i64,
    cost_price_cents: Option<i64>,
    is_active: bool,
    category_id: String,
    image_url: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ExtraRow {
    id: String,
    product_id: String,
    name: String,
    price_cents: i64,
    is_active: bool,
}

impl ProductRow {
    fn into_product(self, extras: Vec<ProductExtra>) -> Product {
        Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
            cost_price_cents: self.cost_price_cents,
            is_active: self.is_active,
            category_id: self.category_id,
            image_url: self.image_url,
            extras,
        }
    }
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists products with their extras hydrated, in name order.
    ///
    /// ## Arguments
    /// * `include_inactive` - Staff panels pass true; the storefront false.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = if include_inactive {
            sqlx::query_as(
                "SELECT id, name, description, price_cents, cost_price_cents, \
                 is_active, category_id, image_url FROM products ORDER BY name",
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT id, name, description, price_cents, cost_price_cents, \
                 is_active, category_id, image_url FROM products \
                 WHERE is_active = 1 ORDER BY name",
            )
            .fetch_all(&self.pool)
            .await?
        };

        let mut extras = self.extras_by_product().await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let product_extras = extras.remove(&row.id).unwrap_or_default();
                row.into_product(product_extras)
            })
            .collect())
    }

    /// Gets a product by ID with its extras.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, description, price_cents, cost_price_cents, \
             is_active, category_id, image_url FROM products WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let extras = self.extras_for(id).await?;
                Ok(Some(row.into_product(extras)))
            }
            None => Ok(None),
        }
    }

    /// Inserts a product together with its extras.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, price_cents, cost_price_cents,
                is_active, category_id, image_url
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.is_active)
        .bind(&product.category_id)
        .bind(&product.image_url)
        .execute(&mut *tx)
        .await?;

        for (i, extra) in product.extras.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_extras (
                    id, product_id, name, price_cents, is_active, sort_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&extra.id)
            .bind(&product.id)
            .bind(&extra.name)
            .bind(extra.price_cents)
            .bind(extra.is_active)
            .bind(i as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Updates a product and replaces its extras.
    ///
    /// Extras are replaced wholesale: the admin form submits the full list,
    /// so a diff would buy nothing.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2, description = ?3, price_cents = ?4,
                cost_price_cents = ?5, is_active = ?6,
                category_id = ?7, image_url = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.is_active)
        .bind(&product.category_id)
        .bind(&product.image_url)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        sqlx::query("DELETE FROM product_extras WHERE product_id = ?1")
            .bind(&product.id)
            .execute(&mut *tx)
            .await?;

        for (i, extra) in product.extras.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_extras (
                    id, product_id, name, price_cents, is_active, sort_order
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&extra.id)
            .bind(&product.id)
            .bind(&extra.name)
            .bind(extra.price_cents)
            .bind(extra.is_active)
            .bind(i as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Soft-deletes a product (hides it from the storefront).
    ///
    /// Products are never physically deleted: order item snapshots reference
    /// them and history must stay intact.
    pub async fn set_active(&self, id: &str, active: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET is_active = ?2 WHERE id = ?1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }
        Ok(())
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Lists categories in sort order.
    pub async fn list_categories(&self) -> DbResult<Vec<Category>> {
        let categories: Vec<Category> = sqlx::query_as(
            "SELECT id, name, sort_order FROM categories ORDER BY sort_order, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Inserts a category.
    pub async fn insert_category(&self, category: &Category) -> DbResult<()> {
        sqlx::query("INSERT INTO categories (id, name, sort_order) VALUES (?1, ?2, ?3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.sort_order)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Updates a category.
    pub async fn update_category(&self, category: &Category) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE categories SET name = ?2, sort_order = ?3 WHERE id = ?1")
                .bind(&category.id)
                .bind(&category.name)
                .bind(category.sort_order)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }
        Ok(())
    }

    /// Deletes a category.
    ///
    /// The integrity rule (no deletion while products reference it) is
    /// enforced in the service layer via [`Self::count_products_in_category`];
    /// the FK constraint is the backstop.
    pub async fn delete_category(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }
        Ok(())
    }

    /// Counts products (active or not) referencing a category.
    pub async fn count_products_in_category(&self, category_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn extras_for(&self, product_id: &str) -> DbResult<Vec<ProductExtra>> {
        let rows: Vec<ExtraRow> = sqlx::query_as(
            "SELECT id, product_id, name, price_cents, is_active \
             FROM product_extras WHERE product_id = ?1 ORDER BY sort_order",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_extra).collect())
    }

    async fn extras_by_product(&self) -> DbResult<HashMap<String, Vec<ProductExtra>>> {
        let rows: Vec<ExtraRow> = sqlx::query_as(
            "SELECT id, product_id, name, price_cents, is_active \
             FROM product_extras ORDER BY sort_order",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<String, Vec<ProductExtra>> = HashMap::new();
        for row in rows {
            let product_id = row.product_id.clone();
            map.entry(product_id).or_default().push(row_to_extra(row));
        }
        Ok(map)
    }
}

fn row_to_extra(row: ExtraRow) -> ProductExtra {
    ProductExtra {
        id: row.id,
        name: row.name,
        price_cents: row.price_cents,
        is_active: row.is_active,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use uuid::Uuid;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            sort_order: 0,
        }
    }

    fn burger(category_id: &str) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: "X-Burger".to_string(),
            description: "Pão, carne, queijo".to_string(),
            price_cents: 1890,
            cost_price_cents: Some(700),
            is_active: true,
            category_id: category_id.to_string(),
            image_url: None,
            extras: vec![ProductExtra {
                id: Uuid::new_v4().to_string(),
                name: "Bacon".to_string(),
                price_cents: 400,
                is_active: true,
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_with_extras() {
        let db = db().await;
        let repo = db.products();

        let cat = category("Lanches");
        repo.insert_category(&cat).await.unwrap();

        let product = burger(&cat.id);
        repo.insert(&product).await.unwrap();

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_cents, 1890);
        assert_eq!(loaded.extras.len(), 1);
        assert_eq!(loaded.extras[0].name, "Bacon");
    }

    #[tokio::test]
    async fn test_product_requires_existing_category() {
        let db = db().await;
        let repo = db.products();

        let err = repo.insert(&burger("no-such-category")).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_hides_inactive_for_storefront() {
        let db = db().await;
        let repo = db.products();

        let cat = category("Lanches");
        repo.insert_category(&cat).await.unwrap();

        let product = burger(&cat.id);
        repo.insert(&product).await.unwrap();
        repo.set_active(&product.id, false).await.unwrap();

        assert!(repo.list(false).await.unwrap().is_empty());
        assert_eq!(repo.list(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_extras() {
        let db = db().await;
        let repo = db.products();

        let cat = category("Lanches");
        repo.insert_category(&cat).await.unwrap();

        let mut product = burger(&cat.id);
        repo.insert(&product).await.unwrap();

        product.extras = vec![
            ProductExtra {
                id: Uuid::new_v4().to_string(),
                name: "Ovo".to_string(),
                price_cents: 200,
                is_active: true,
            },
            ProductExtra {
                id: Uuid::new_v4().to_string(),
                name: "Cheddar".to_string(),
                price_cents: 300,
                is_active: true,
            },
        ];
        product.price_cents = 2090;
        repo.update(&product).await.unwrap();

        let loaded = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded.price_cents, 2090);
        assert_eq!(loaded.extras.len(), 2);
        assert_eq!(loaded.extras[0].name, "Ovo");
    }

    #[tokio::test]
    async fn test_list_categories_in_sort_order() {
        let db = db().await;
        let repo = db.products();

        let mut drinks = category("Bebidas");
        drinks.sort_order = 2;
        let mut snacks = category("Lanches");
        snacks.sort_order = 1;
        repo.insert_category(&drinks).await.unwrap();
        repo.insert_category(&snacks).await.unwrap();

        let categories = repo.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Lanches");
        assert_eq!(categories[1].name, "Bebidas");
    }

    #[tokio::test]
    async fn test_category_product_count() {
        let db = db().await;
        let repo = db.products();

        let cat = category("Lanches");
        repo.insert_category(&cat).await.unwrap();
        assert_eq!(repo.count_products_in_category(&cat.id).await.unwrap(), 0);

        repo.insert(&burger(&cat.id)).await.unwrap();
        assert_eq!(repo.count_products_in_category(&cat.id).await.unwrap(), 1);
    }
}
