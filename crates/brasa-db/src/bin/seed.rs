//! # Seed Data Generator
//!
//! Populates the database with a demo menu for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p brasa-db --bin seed
//!
//! # Specify database path
//! cargo run -p brasa-db --bin seed -- --db ./data/brasa.db
//! ```
//!
//! ## Generated Data
//! - 4 categories (Lanches, Porções, Bebidas, Sobremesas)
//! - A handful of products per category, with extras on the burgers
//! - 2 delivery neighborhoods, one with a street allow-list
//! - Default store settings

use std::env;
use uuid::Uuid;

use brasa_core::{Category, Neighborhood, Product, ProductExtra, StoreSettings};
use brasa_db::{Database, DbConfig};

const MENU: &[(&str, &[(&str, &str, i64)])] = &[
    (
        "Lanches",
        &[
            ("X-Burger", "Pão, carne 120g, queijo", 1890),
            ("X-Salada", "Pão, carne 120g, queijo, alface, tomate", 2090),
            ("X-Bacon", "Pão, carne 120g, queijo, bacon", 2290),
            ("X-Tudo", "Pão, 2x carne, queijo, bacon, ovo, salada", 2790),
        ],
    ),
    (
        "Porções",
        &[
            ("Batata Frita P", "300g", 1500),
            ("Batata Frita G", "600g com cheddar e bacon", 2800),
        ],
    ),
    (
        "Bebidas",
        &[
            ("Refrigerante Lata", "350ml", 600),
            ("Suco Natural", "Laranja ou limão, 500ml", 900),
            ("Água Mineral", "500ml", 400),
        ],
    ),
    (
        "Sobremesas",
        &[("Pudim", "Fatia", 800), ("Açaí 300ml", "Com granola", 1400)],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let db_path = args
        .iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .unwrap_or("./data/brasa.db");

    println!("Seeding {db_path}");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let products = db.products();

    for (sort_order, (category_name, items)) in MENU.iter().enumerate() {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: category_name.to_string(),
            sort_order: sort_order as i64,
        };
        products.insert_category(&category).await?;

        for (name, description, price_cents) in items.iter() {
            let extras = if *category_name == "Lanches" {
                vec![
                    extra("Bacon", 400),
                    extra("Ovo", 200),
                    extra("Cheddar extra", 300),
                ]
            } else {
                Vec::new()
            };

            products
                .insert(&Product {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    price_cents: *price_cents,
                    cost_price_cents: Some(price_cents * 4 / 10),
                    is_active: true,
                    category_id: category.id.clone(),
                    image_url: None,
                    extras,
                })
                .await?;
        }
        println!("  {category_name}: {} products", items.len());
    }

    let neighborhoods = db.neighborhoods();
    neighborhoods
        .upsert(&Neighborhood {
            id: Uuid::new_v4().to_string(),
            name: "Centro".to_string(),
            delivery_fee_cents: 500,
            estimated_distance_km: 2.2,
            allowed_streets: vec![
                "Rua General Osório".to_string(),
                "Av. Brasil".to_string(),
                "Rua XV de Novembro".to_string(),
            ],
        })
        .await?;
    neighborhoods
        .upsert(&Neighborhood {
            id: Uuid::new_v4().to_string(),
            name: "Jardim América".to_string(),
            delivery_fee_cents: 800,
            estimated_distance_km: 4.5,
            allowed_streets: Vec::new(),
        })
        .await?;
    println!("  2 neighborhoods");

    db.settings().save(&StoreSettings::default()).await?;
    println!("Done.");

    Ok(())
}

fn extra(name: &str, price_cents: i64) -> ProductExtra {
    ProductExtra {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        price_cents,
        is_active: true,
    }
}
