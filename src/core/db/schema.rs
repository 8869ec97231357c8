//! Database schema initialization

use tracing::info;

use super::{Database, StoreError};

impl Database {
    /// Initialize database schema
    pub(super) fn init_schema(&mut self) -> Result<(), StoreError> {
        info!("initializing inventory schema");

        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Material categories with waste allowance
            CREATE TABLE IF NOT EXISTS material_types (
                name TEXT PRIMARY KEY,
                defect_percent REAL NOT NULL DEFAULT 0
            );

            -- Raw materials
            CREATE TABLE IF NOT EXISTS materials (
                name TEXT PRIMARY KEY,
                material_type TEXT NOT NULL
                    REFERENCES material_types(name) ON UPDATE CASCADE ON DELETE RESTRICT,
                unit_price REAL NOT NULL DEFAULT 0,
                stock_qty REAL NOT NULL DEFAULT 0,
                min_qty REAL NOT NULL DEFAULT 0,
                pack_qty REAL NOT NULL DEFAULT 0,
                unit TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_materials_type ON materials(material_type);

            -- Product categories with requirement coefficient
            CREATE TABLE IF NOT EXISTS product_types (
                name TEXT PRIMARY KEY,
                coefficient REAL NOT NULL DEFAULT 1
            );

            -- Finished products
            CREATE TABLE IF NOT EXISTS products (
                name TEXT PRIMARY KEY,
                product_type TEXT NOT NULL
                    REFERENCES product_types(name) ON UPDATE CASCADE ON DELETE RESTRICT,
                sku TEXT NOT NULL,
                min_price REAL NOT NULL DEFAULT 0,
                roll_width REAL NOT NULL DEFAULT 0,
                min_partner_price REAL
            );
            CREATE INDEX IF NOT EXISTS idx_products_type ON products(product_type);

            -- Material consumed per unit of product
            CREATE TABLE IF NOT EXISTS product_materials (
                product TEXT NOT NULL
                    REFERENCES products(name) ON UPDATE CASCADE ON DELETE CASCADE,
                material TEXT NOT NULL
                    REFERENCES materials(name) ON UPDATE CASCADE ON DELETE CASCADE,
                qty_needed REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (product, material)
            );
            CREATE INDEX IF NOT EXISTS idx_product_materials_material ON product_materials(material);

            -- Partner companies
            CREATE TABLE IF NOT EXISTS partners (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                company_name TEXT NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT ''
            );
            "#,
        )?;

        self.write_schema_version()
    }
}
