use super::*;
use crate::entities::{
    Material, MaterialType, Partner, Product, ProductMaterial, ProductType,
};
use tempfile::tempdir;

fn seeded_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.insert_material_type(&MaterialType::new("Wood", 5.0)).unwrap();
    db.insert_material_type(&MaterialType::new("Fabric", 12.5)).unwrap();
    db.insert_product_type(&ProductType::new("Sofa", 2.5)).unwrap();
    db
}

fn oak() -> Material {
    Material {
        name: "Oak board".to_string(),
        material_type: "Wood".to_string(),
        unit_price: 850.0,
        stock_qty: 120.0,
        min_qty: 40.0,
        pack_qty: 10.0,
        unit: "m".to_string(),
    }
}

fn sofa() -> Product {
    Product {
        name: "Sofa Classic".to_string(),
        product_type: "Sofa".to_string(),
        sku: "SF-001".to_string(),
        min_price: 25000.0,
        roll_width: 1.4,
        min_partner_price: None,
    }
}

#[test]
fn test_fresh_database_has_all_tables() {
    let db = Database::open_in_memory().unwrap();
    let tables = db.table_names().unwrap();

    for table in INVENTORY_TABLES {
        assert!(tables.iter().any(|t| t == table), "missing table {}", table);
    }
    assert!(tables.iter().any(|t| t == "schema_version"));
}

#[test]
fn test_reopen_file_database_keeps_rows() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("nested/inventory.db");

    let db = Database::open(&path).unwrap();
    db.insert_material_type(&MaterialType::new("Wood", 5.0)).unwrap();
    db.close().unwrap();

    let db = Database::open(&path).unwrap();
    let types = db.list_material_types().unwrap();
    assert_eq!(types, vec![MaterialType::new("Wood", 5.0)]);
    assert_eq!(db.path(), Some(path.as_path()));
}

#[test]
fn test_schema_version_mismatch_is_refused() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("inventory.db");

    Database::open(&path).unwrap().close().unwrap();
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE schema_version SET version = 99", [])
            .unwrap();
    }

    let err = Database::open(&path).err().unwrap();
    assert!(matches!(
        err,
        StoreError::SchemaMismatch {
            found: 99,
            expected: SCHEMA_VERSION
        }
    ));
}

#[test]
fn test_insert_then_list_material() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();

    let materials = db.list_materials().unwrap();
    let matching: Vec<_> = materials.iter().filter(|m| **m == oak()).collect();
    assert_eq!(matching.len(), 1);
}

#[test]
fn test_delete_then_list_material() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();
    db.delete_material("Oak board").unwrap();

    assert!(db.list_materials().unwrap().is_empty());
    assert!(db.get_material("Oak board").unwrap().is_none());
}

#[test]
fn test_invalid_material_is_never_written() {
    let db = seeded_db();
    let mut bad = oak();
    bad.unit_price = -1.0;

    let err = db.insert_material(&bad).unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
    assert!(db.list_materials().unwrap().is_empty());
}

#[test]
fn test_duplicate_material_is_constraint_error() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();

    let err = db.insert_material(&oak()).unwrap_err();
    assert!(matches!(err, StoreError::Constraint { kind: "material", .. }));
}

#[test]
fn test_material_with_unknown_type_is_refused() {
    let db = seeded_db();
    let mut mat = oak();
    mat.material_type = "Metal".to_string();

    let err = db.insert_material(&mat).unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }));
}

#[test]
fn test_update_material_by_key() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();

    let mut changed = oak();
    changed.stock_qty = 5.0;
    changed.material_type = "Fabric".to_string();
    db.update_material("Oak board", &changed).unwrap();

    let stored = db.get_material("Oak board").unwrap().unwrap();
    assert_eq!(stored.stock_qty, 5.0);
    assert_eq!(stored.material_type, "Fabric");
}

#[test]
fn test_update_missing_material_is_not_found() {
    let db = seeded_db();
    let err = db.update_material("Nope", &oak()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { kind: "material", .. }));

    let err = db.delete_material("Nope").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn test_product_rename_keeps_links() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();
    db.insert_product(&sofa()).unwrap();
    db.insert_link(&ProductMaterial::new("Sofa Classic", "Oak board", 2.5))
        .unwrap();

    let mut renamed = sofa();
    renamed.name = "Sofa Classic II".to_string();
    db.update_product("Sofa Classic", &renamed).unwrap();

    let used = db.materials_for_product("Sofa Classic II").unwrap();
    assert_eq!(used.len(), 1);
    assert_eq!(used[0].name, "Oak board");
    assert_eq!(used[0].qty_needed, 2.5);
    assert!(db.materials_for_product("Sofa Classic").unwrap().is_empty());
}

#[test]
fn test_deleting_material_removes_links() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();
    db.insert_product(&sofa()).unwrap();
    db.insert_link(&ProductMaterial::new("Sofa Classic", "Oak board", 2.5))
        .unwrap();

    db.delete_material("Oak board").unwrap();

    assert!(db.list_links().unwrap().is_empty());
    assert!(db.get_product("Sofa Classic").unwrap().is_some());
}

#[test]
fn test_deleting_type_in_use_is_refused() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();

    let err = db.delete_material_type("Wood").unwrap_err();
    assert!(matches!(err, StoreError::Constraint { .. }));

    db.delete_material_type("Fabric").unwrap();
}

#[test]
fn test_products_for_material_lookup() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();
    db.insert_product(&sofa()).unwrap();
    let mut chair = sofa();
    chair.name = "Armchair".to_string();
    chair.sku = "AC-002".to_string();
    db.insert_product(&chair).unwrap();

    db.insert_link(&ProductMaterial::new("Sofa Classic", "Oak board", 2.5))
        .unwrap();
    db.insert_link(&ProductMaterial::new("Armchair", "Oak board", 1.0))
        .unwrap();

    let mut users = db.products_for_material("Oak board").unwrap();
    users.sort_by(|a, b| a.name.cmp(&b.name));
    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Armchair", "Sofa Classic"]);
}

#[test]
fn test_update_and_delete_link() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();
    db.insert_product(&sofa()).unwrap();
    db.insert_link(&ProductMaterial::new("Sofa Classic", "Oak board", 2.5))
        .unwrap();

    db.update_link(&ProductMaterial::new("Sofa Classic", "Oak board", 4.0))
        .unwrap();
    assert_eq!(db.list_links().unwrap()[0].qty_needed, 4.0);

    db.delete_link("Sofa Classic", "Oak board").unwrap();
    assert!(db.list_links().unwrap().is_empty());
    assert!(matches!(
        db.delete_link("Sofa Classic", "Oak board").unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[test]
fn test_partner_crud_assigns_ids() {
    let db = seeded_db();
    let mut partner = Partner::new("Mebel Plus");
    partner.phone = "+7 900 000 00 00".to_string();

    let id = db.insert_partner(&partner).unwrap();
    let second = db.insert_partner(&Partner::new("Dom & Co")).unwrap();
    assert_ne!(id, second);

    partner.email = "sales@mebelplus.example".to_string();
    db.update_partner(id, &partner).unwrap();
    let stored = db.get_partner(id).unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.email, "sales@mebelplus.example");

    db.delete_partner(id).unwrap();
    assert_eq!(db.list_partners().unwrap().len(), 1);
}

#[test]
fn test_rate_lookups() {
    let db = seeded_db();
    assert_eq!(db.product_type_coefficient("Sofa").unwrap(), Some(2.5));
    assert_eq!(db.product_type_coefficient("Table").unwrap(), None);
    assert_eq!(db.material_defect_percent("Fabric").unwrap(), Some(12.5));
    assert_eq!(db.material_defect_percent("Glass").unwrap(), None);
}

#[test]
fn test_statistics_counts_rows() {
    let db = seeded_db();
    db.insert_material(&oak()).unwrap();

    let stats = db.statistics().unwrap();
    assert_eq!(stats.tables.len(), INVENTORY_TABLES.len());
    assert_eq!(stats.rows_in("material_types"), Some(2));
    assert_eq!(stats.rows_in("materials"), Some(1));
    assert_eq!(stats.rows_in("partners"), Some(0));
    assert_eq!(stats.total_rows(), 4);
    assert!(stats.db_size_bytes.is_none());
}
