//! CRUD accessors for every inventory table
//!
//! One statement per call. Lists come back in database order; callers
//! sort when they need a stable order.

use rusqlite::{params, Connection, OptionalExtension, Params, Row};
use tracing::debug;

use super::{Database, StoreError};
use crate::core::entity::Entity;
use crate::entities::{
    Material, MaterialType, Partner, Product, ProductMaterial, ProductType, Usage,
};

const MATERIAL_COLUMNS: &str =
    "name, material_type, unit_price, stock_qty, min_qty, pack_qty, unit";

const PRODUCT_COLUMNS: &str =
    "name, product_type, sku, min_price, roll_width, min_partner_price";

fn material_from_row(row: &Row<'_>) -> rusqlite::Result<Material> {
    Ok(Material {
        name: row.get(0)?,
        material_type: row.get(1)?,
        unit_price: row.get(2)?,
        stock_qty: row.get(3)?,
        min_qty: row.get(4)?,
        pack_qty: row.get(5)?,
        unit: row.get(6)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        name: row.get(0)?,
        product_type: row.get(1)?,
        sku: row.get(2)?,
        min_price: row.get(3)?,
        roll_width: row.get(4)?,
        min_partner_price: row.get(5)?,
    })
}

fn partner_from_row(row: &Row<'_>) -> rusqlite::Result<Partner> {
    Ok(Partner {
        id: row.get(0)?,
        company_name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
    })
}

fn usage_from_row(row: &Row<'_>) -> rusqlite::Result<Usage> {
    Ok(Usage {
        name: row.get(0)?,
        qty_needed: row.get(1)?,
    })
}

fn collect_rows<T, P, F>(conn: &Connection, sql: &str, params: P, map: F) -> rusqlite::Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    rows.collect()
}

impl Database {
    // =========================================================================
    // Shared plumbing
    // =========================================================================

    fn list_rows<T, P, F>(&self, what: &'static str, sql: &str, params: P, map: F) -> Result<Vec<T>, StoreError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(query = what, "listing rows");
        collect_rows(&self.conn, sql, params, map).map_err(|e| StoreError::from_read(e, what))
    }

    fn get_row<T, P, F>(&self, what: &'static str, sql: &str, params: P, map: F) -> Result<Option<T>, StoreError>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(query = what, "fetching row");
        self.conn
            .query_row(sql, params, map)
            .optional()
            .map_err(|e| StoreError::from_read(e, what))
    }

    /// Execute a write and return the number of affected rows
    fn write<P: Params>(&self, kind: &'static str, key: &str, sql: &str, params: P) -> Result<usize, StoreError> {
        debug!(kind, key, "writing row");
        self.conn
            .execute(sql, params)
            .map_err(|e| StoreError::from_write(e, kind, key))
    }

    /// Execute an update/delete that must hit exactly one existing row
    fn write_existing<P: Params>(&self, kind: &'static str, key: &str, sql: &str, params: P) -> Result<(), StoreError> {
        match self.write(kind, key, sql, params)? {
            0 => Err(StoreError::NotFound {
                kind,
                key: key.to_string(),
            }),
            _ => Ok(()),
        }
    }

    // =========================================================================
    // Materials
    // =========================================================================

    /// List all materials
    pub fn list_materials(&self) -> Result<Vec<Material>, StoreError> {
        self.list_rows(
            "materials",
            &format!("SELECT {} FROM materials", MATERIAL_COLUMNS),
            [],
            material_from_row,
        )
    }

    /// Get a material by name
    pub fn get_material(&self, name: &str) -> Result<Option<Material>, StoreError> {
        self.get_row(
            "material",
            &format!("SELECT {} FROM materials WHERE name = ?1", MATERIAL_COLUMNS),
            params![name],
            material_from_row,
        )
    }

    /// Insert a new material
    pub fn insert_material(&self, material: &Material) -> Result<(), StoreError> {
        material.validate()?;
        self.write(
            Material::KIND,
            &material.name,
            "INSERT INTO materials (name, material_type, unit_price, stock_qty, min_qty, pack_qty, unit) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                material.name,
                material.material_type,
                material.unit_price,
                material.stock_qty,
                material.min_qty,
                material.pack_qty,
                material.unit
            ],
        )?;
        Ok(())
    }

    /// Update the material stored under `name`; `material.name` may rename it
    pub fn update_material(&self, name: &str, material: &Material) -> Result<(), StoreError> {
        material.validate()?;
        self.write_existing(
            Material::KIND,
            name,
            "UPDATE materials SET name = ?1, material_type = ?2, unit_price = ?3, stock_qty = ?4, min_qty = ?5, pack_qty = ?6, unit = ?7 WHERE name = ?8",
            params![
                material.name,
                material.material_type,
                material.unit_price,
                material.stock_qty,
                material.min_qty,
                material.pack_qty,
                material.unit,
                name
            ],
        )
    }

    /// Delete a material; its junction rows go with it
    pub fn delete_material(&self, name: &str) -> Result<(), StoreError> {
        self.write_existing(
            Material::KIND,
            name,
            "DELETE FROM materials WHERE name = ?1",
            params![name],
        )
    }

    // =========================================================================
    // Material types
    // =========================================================================

    /// List all material types
    pub fn list_material_types(&self) -> Result<Vec<MaterialType>, StoreError> {
        self.list_rows(
            "material types",
            "SELECT name, defect_percent FROM material_types",
            [],
            |row| {
                Ok(MaterialType {
                    name: row.get(0)?,
                    defect_percent: row.get(1)?,
                })
            },
        )
    }

    pub fn insert_material_type(&self, material_type: &MaterialType) -> Result<(), StoreError> {
        material_type.validate()?;
        self.write(
            MaterialType::KIND,
            &material_type.name,
            "INSERT INTO material_types (name, defect_percent) VALUES (?1, ?2)",
            params![material_type.name, material_type.defect_percent],
        )?;
        Ok(())
    }

    pub fn update_material_type(&self, name: &str, material_type: &MaterialType) -> Result<(), StoreError> {
        material_type.validate()?;
        self.write_existing(
            MaterialType::KIND,
            name,
            "UPDATE material_types SET name = ?1, defect_percent = ?2 WHERE name = ?3",
            params![material_type.name, material_type.defect_percent, name],
        )
    }

    /// Delete a material type; refused while materials still reference it
    pub fn delete_material_type(&self, name: &str) -> Result<(), StoreError> {
        self.write_existing(
            MaterialType::KIND,
            name,
            "DELETE FROM material_types WHERE name = ?1",
            params![name],
        )
    }

    /// Defect percent of a material type, None if the type is unknown
    pub fn material_defect_percent(&self, name: &str) -> Result<Option<f64>, StoreError> {
        self.get_row(
            "material defect percent",
            "SELECT defect_percent FROM material_types WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List all products
    pub fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.list_rows(
            "products",
            &format!("SELECT {} FROM products", PRODUCT_COLUMNS),
            [],
            product_from_row,
        )
    }

    /// Get a product by name
    pub fn get_product(&self, name: &str) -> Result<Option<Product>, StoreError> {
        self.get_row(
            "product",
            &format!("SELECT {} FROM products WHERE name = ?1", PRODUCT_COLUMNS),
            params![name],
            product_from_row,
        )
    }

    pub fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        product.validate()?;
        self.write(
            Product::KIND,
            &product.name,
            "INSERT INTO products (name, product_type, sku, min_price, roll_width, min_partner_price) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                product.name,
                product.product_type,
                product.sku,
                product.min_price,
                product.roll_width,
                product.min_partner_price
            ],
        )?;
        Ok(())
    }

    /// Update the product stored under `name`; renames carry over to the junction
    pub fn update_product(&self, name: &str, product: &Product) -> Result<(), StoreError> {
        product.validate()?;
        self.write_existing(
            Product::KIND,
            name,
            "UPDATE products SET name = ?1, product_type = ?2, sku = ?3, min_price = ?4, roll_width = ?5, min_partner_price = ?6 WHERE name = ?7",
            params![
                product.name,
                product.product_type,
                product.sku,
                product.min_price,
                product.roll_width,
                product.min_partner_price,
                name
            ],
        )
    }

    pub fn delete_product(&self, name: &str) -> Result<(), StoreError> {
        self.write_existing(
            Product::KIND,
            name,
            "DELETE FROM products WHERE name = ?1",
            params![name],
        )
    }

    // =========================================================================
    // Product types
    // =========================================================================

    pub fn list_product_types(&self) -> Result<Vec<ProductType>, StoreError> {
        self.list_rows(
            "product types",
            "SELECT name, coefficient FROM product_types",
            [],
            |row| {
                Ok(ProductType {
                    name: row.get(0)?,
                    coefficient: row.get(1)?,
                })
            },
        )
    }

    pub fn insert_product_type(&self, product_type: &ProductType) -> Result<(), StoreError> {
        product_type.validate()?;
        self.write(
            ProductType::KIND,
            &product_type.name,
            "INSERT INTO product_types (name, coefficient) VALUES (?1, ?2)",
            params![product_type.name, product_type.coefficient],
        )?;
        Ok(())
    }

    pub fn update_product_type(&self, name: &str, product_type: &ProductType) -> Result<(), StoreError> {
        product_type.validate()?;
        self.write_existing(
            ProductType::KIND,
            name,
            "UPDATE product_types SET name = ?1, coefficient = ?2 WHERE name = ?3",
            params![product_type.name, product_type.coefficient, name],
        )
    }

    pub fn delete_product_type(&self, name: &str) -> Result<(), StoreError> {
        self.write_existing(
            ProductType::KIND,
            name,
            "DELETE FROM product_types WHERE name = ?1",
            params![name],
        )
    }

    /// Coefficient of a product type, None if the type is unknown
    pub fn product_type_coefficient(&self, name: &str) -> Result<Option<f64>, StoreError> {
        self.get_row(
            "product type coefficient",
            "SELECT coefficient FROM product_types WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )
    }

    // =========================================================================
    // Partners
    // =========================================================================

    pub fn list_partners(&self) -> Result<Vec<Partner>, StoreError> {
        self.list_rows(
            "partners",
            "SELECT id, company_name, phone, email FROM partners",
            [],
            partner_from_row,
        )
    }

    pub fn get_partner(&self, id: i64) -> Result<Option<Partner>, StoreError> {
        self.get_row(
            "partner",
            "SELECT id, company_name, phone, email FROM partners WHERE id = ?1",
            params![id],
            partner_from_row,
        )
    }

    /// Insert a partner and return its assigned id (`partner.id` is ignored)
    pub fn insert_partner(&self, partner: &Partner) -> Result<i64, StoreError> {
        partner.validate()?;
        self.write(
            Partner::KIND,
            &partner.company_name,
            "INSERT INTO partners (company_name, phone, email) VALUES (?1, ?2, ?3)",
            params![partner.company_name, partner.phone, partner.email],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update_partner(&self, id: i64, partner: &Partner) -> Result<(), StoreError> {
        partner.validate()?;
        self.write_existing(
            Partner::KIND,
            &id.to_string(),
            "UPDATE partners SET company_name = ?1, phone = ?2, email = ?3 WHERE id = ?4",
            params![partner.company_name, partner.phone, partner.email, id],
        )
    }

    pub fn delete_partner(&self, id: i64) -> Result<(), StoreError> {
        self.write_existing(
            Partner::KIND,
            &id.to_string(),
            "DELETE FROM partners WHERE id = ?1",
            params![id],
        )
    }

    // =========================================================================
    // Product/material junction
    // =========================================================================

    pub fn list_links(&self) -> Result<Vec<ProductMaterial>, StoreError> {
        self.list_rows(
            "product materials",
            "SELECT product, material, qty_needed FROM product_materials",
            [],
            |row| {
                Ok(ProductMaterial {
                    product: row.get(0)?,
                    material: row.get(1)?,
                    qty_needed: row.get(2)?,
                })
            },
        )
    }

    pub fn insert_link(&self, link: &ProductMaterial) -> Result<(), StoreError> {
        link.validate()?;
        self.write(
            ProductMaterial::KIND,
            &link.key(),
            "INSERT INTO product_materials (product, material, qty_needed) VALUES (?1, ?2, ?3)",
            params![link.product, link.material, link.qty_needed],
        )?;
        Ok(())
    }

    /// Change the per-unit quantity of an existing link
    pub fn update_link(&self, link: &ProductMaterial) -> Result<(), StoreError> {
        link.validate()?;
        self.write_existing(
            ProductMaterial::KIND,
            &link.key(),
            "UPDATE product_materials SET qty_needed = ?1 WHERE product = ?2 AND material = ?3",
            params![link.qty_needed, link.product, link.material],
        )
    }

    pub fn delete_link(&self, product: &str, material: &str) -> Result<(), StoreError> {
        self.write_existing(
            ProductMaterial::KIND,
            &format!("{}/{}", product, material),
            "DELETE FROM product_materials WHERE product = ?1 AND material = ?2",
            params![product, material],
        )
    }

    /// Materials a product consumes, with the quantity per product unit
    pub fn materials_for_product(&self, product: &str) -> Result<Vec<Usage>, StoreError> {
        self.list_rows(
            "materials for product",
            r#"SELECT m.name, pm.qty_needed
               FROM product_materials pm
               JOIN materials m ON pm.material = m.name
               WHERE pm.product = ?1"#,
            params![product],
            usage_from_row,
        )
    }

    /// Products consuming a material, with the quantity per product unit
    pub fn products_for_material(&self, material: &str) -> Result<Vec<Usage>, StoreError> {
        self.list_rows(
            "products for material",
            r#"SELECT p.name, pm.qty_needed
               FROM product_materials pm
               JOIN products p ON pm.product = p.name
               WHERE pm.material = ?1"#,
            params![material],
            usage_from_row,
        )
    }
}
