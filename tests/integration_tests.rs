//! Integration tests for the minv CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Helper to get a minv command isolated from the user's environment
fn minv(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("minv").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".xdg"))
        .env_remove("MINV_DATABASE")
        .env_remove("MINV_FORMAT")
        .env_remove("MINV_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    minv(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to run a command that must succeed
fn run_ok(tmp: &TempDir, args: &[&str]) {
    minv(tmp.path()).args(args).assert().success();
}

/// Helper to capture stdout of a successful command
fn stdout_of(tmp: &TempDir, args: &[&str]) -> String {
    let output = minv(tmp.path()).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Project with a Sofa/Fabric setup: one material, one product, one link
fn setup_catalog() -> TempDir {
    let tmp = setup_test_project();
    run_ok(&tmp, &["mat-type", "new", "Fabric", "--defect", "10"]);
    run_ok(&tmp, &["prod-type", "new", "Sofa", "--coef", "2"]);
    run_ok(
        &tmp,
        &[
            "mat", "new", "--name", "Velvet", "--type", "Fabric", "--unit", "m", "--stock", "10",
            "--min", "20", "--pack", "5",
        ],
    );
    run_ok(
        &tmp,
        &["prod", "new", "--name", "Chesterfield", "--type", "Sofa", "--sku", "CH-1"],
    );
    run_ok(&tmp, &["link", "add", "Chesterfield", "Velvet", "2.5"]);
    tmp
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    minv(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SQLite"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    minv(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("minv"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    minv(tmp.path())
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_completions_generate() {
    let tmp = TempDir::new().unwrap();
    minv(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("minv"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    minv(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".minv/config.yaml").exists());
    assert!(tmp.path().join(".minv/inventory.db").exists());
}

#[test]
fn test_init_twice_reports_existing_project() {
    let tmp = setup_test_project();

    minv(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();

    minv(tmp.path())
        .args(["mat", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no inventory project found"));
}

#[test]
fn test_database_flag_works_without_project() {
    let tmp = TempDir::new().unwrap();
    let db = tmp.path().join("data/stock.db");

    minv(tmp.path())
        .args(["mat-type", "list", "--database"])
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("No material types found."));

    assert!(db.exists());
}

#[test]
fn test_subdirectory_finds_project() {
    let tmp = setup_test_project();
    let nested = tmp.path().join("orders/2024");
    std::fs::create_dir_all(&nested).unwrap();

    minv(&nested)
        .args(["mat-type", "new", "Wood", "--defect", "3"])
        .assert()
        .success();

    assert!(stdout_of(&tmp, &["mat-type", "list", "-f", "id"]).contains("Wood"));
}

// ============================================================================
// Entity CRUD Tests
// ============================================================================

#[test]
fn test_material_type_create_and_list() {
    let tmp = setup_test_project();
    run_ok(&tmp, &["mat-type", "new", "Fabric", "--defect", "10"]);
    run_ok(&tmp, &["mat-type", "new", "Glue", "--defect", "0.5"]);

    let csv = stdout_of(&tmp, &["mat-type", "list", "-f", "csv"]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "name,defect_%");
    assert!(lines.contains(&"Fabric,10"));
    assert!(lines.contains(&"Glue,0.5"));

    assert_eq!(stdout_of(&tmp, &["mat-type", "list", "--count"]).trim(), "2");
}

#[test]
fn test_material_create_list_and_show() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args(["mat", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Velvet"))
        .stdout(predicate::str::contains("1 material(s) found."));

    minv(tmp.path())
        .args(["mat", "show", "Velvet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("below minimum"))
        .stdout(predicate::str::contains("Used by 1 product(s)"));

    let json = stdout_of(&tmp, &["mat", "list", "-f", "json"]);
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(rows[0]["name"], "Velvet");
    assert_eq!(rows[0]["material_type"], "Fabric");
    assert_eq!(rows[0]["stock_qty"], 10.0);
}

#[test]
fn test_low_stock_filter() {
    let tmp = setup_catalog();
    run_ok(
        &tmp,
        &["mat", "new", "--name", "Thread", "--type", "Fabric", "--unit", "pcs", "--stock", "50"],
    );

    let ids = stdout_of(&tmp, &["mat", "list", "--low-stock", "-f", "id"]);
    assert_eq!(ids, "Velvet\n");
}

#[test]
fn test_material_with_unknown_type_is_refused() {
    let tmp = setup_test_project();

    minv(tmp.path())
        .args(["mat", "new", "--name", "Oak", "--type", "Wood", "--unit", "m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot write material"));
}

#[test]
fn test_negative_values_are_rejected() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args(["mat", "new", "--name", "Linen", "--type", "Fabric", "--unit", "m", "--price=-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));

    assert!(!stdout_of(&tmp, &["mat", "list", "-f", "id"]).contains("Linen"));
}

#[test]
fn test_missing_required_field_is_reported() {
    let tmp = setup_test_project();

    minv(tmp.path())
        .args(["mat", "new", "--name", "Oak"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("material type is required"));
}

#[test]
fn test_material_edit_updates_fields() {
    let tmp = setup_catalog();
    run_ok(&tmp, &["mat", "edit", "Velvet", "--stock", "40", "--price", "12.5"]);

    let json = stdout_of(&tmp, &["mat", "show", "Velvet", "-f", "json"]);
    let material: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(material["stock_qty"], 40.0);
    assert_eq!(material["unit_price"], 12.5);
}

#[test]
fn test_edit_missing_material_fails() {
    let tmp = setup_test_project();

    minv(tmp.path())
        .args(["mat", "edit", "Nothing", "--stock", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_delete_requires_confirmation_without_terminal() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args(["mat", "delete", "Velvet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    assert!(stdout_of(&tmp, &["mat", "list", "-f", "id"]).contains("Velvet"));
}

#[test]
fn test_material_delete_removes_links() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args(["mat", "delete", "Velvet", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted material"));

    assert_eq!(stdout_of(&tmp, &["mat", "list", "--count"]).trim(), "0");
    assert_eq!(stdout_of(&tmp, &["link", "list", "--count"]).trim(), "0");
}

#[test]
fn test_type_in_use_cannot_be_deleted() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args(["mat-type", "delete", "Fabric", "--yes"])
        .assert()
        .failure();

    assert!(stdout_of(&tmp, &["mat-type", "list", "-f", "id"]).contains("Fabric"));
}

#[test]
fn test_product_rename_keeps_links() {
    let tmp = setup_catalog();
    run_ok(&tmp, &["prod", "edit", "Chesterfield", "--rename", "Chester"]);

    let csv = stdout_of(&tmp, &["link", "list", "-f", "csv"]);
    assert!(csv.contains("Chester,Velvet,2.5"));
    assert!(!csv.contains("Chesterfield"));
}

#[test]
fn test_partner_crud() {
    let tmp = setup_test_project();

    let id = stdout_of(
        &tmp,
        &["partner", "new", "--company", "Acme Furniture", "--phone", "555-0100", "-q"],
    );
    let id = id.trim().to_string();
    assert_eq!(id, "1");

    run_ok(&tmp, &["partner", "edit", &id, "--email", "sales@acme.test"]);

    let csv = stdout_of(&tmp, &["partner", "list", "-f", "csv"]);
    assert!(csv.contains("1,Acme Furniture,555-0100,sales@acme.test"));

    run_ok(&tmp, &["partner", "delete", &id, "--yes"]);
    assert_eq!(stdout_of(&tmp, &["partner", "list", "--count"]).trim(), "0");
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_product_bill_of_materials() {
    let tmp = setup_catalog();

    let csv = stdout_of(&tmp, &["prod", "materials", "Chesterfield", "-f", "csv"]);
    assert_eq!(csv, "material,qty_per_unit\nVelvet,2.5\n");
}

#[test]
fn test_products_using_material() {
    let tmp = setup_catalog();

    let csv = stdout_of(&tmp, &["mat", "products", "Velvet", "-f", "csv"]);
    assert_eq!(csv, "product,qty_per_unit\nChesterfield,2.5\n");
}

#[test]
fn test_link_set_changes_quantity() {
    let tmp = setup_catalog();
    run_ok(&tmp, &["link", "set", "Chesterfield", "Velvet", "4"]);

    let csv = stdout_of(&tmp, &["prod", "materials", "Chesterfield", "-f", "csv"]);
    assert!(csv.contains("Velvet,4"));
}

#[test]
fn test_duplicate_link_is_refused() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args(["link", "add", "Chesterfield", "Velvet", "1"])
        .assert()
        .failure();
}

// ============================================================================
// Calculator Tests
// ============================================================================

#[test]
fn test_calc_worked_example() {
    let tmp = setup_catalog();

    let out = stdout_of(
        &tmp,
        &[
            "calc", "--product-type", "Sofa", "--material-type", "Fabric", "--quantity", "5",
            "--param1", "3", "--param2", "4", "--stock", "10", "-f", "id",
        ],
    );
    assert_eq!(out.trim(), "122");
}

#[test]
fn test_calc_from_material_uses_its_stock() {
    let tmp = setup_catalog();

    let json = stdout_of(
        &tmp,
        &[
            "calc", "--product", "Chesterfield", "--material", "Velvet", "--quantity", "5",
            "--param1", "3", "--param2", "4", "-f", "json",
        ],
    );
    let calc: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(calc["required"], 122);
    assert_eq!(calc["product_type"], "Sofa");
    assert_eq!(calc["material_type"], "Fabric");
    assert_eq!(calc["packages"], 25);
}

#[test]
fn test_calc_stock_covers_demand() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args([
            "calc", "--product-type", "Sofa", "--material-type", "Fabric", "--quantity", "1",
            "--param1", "1", "--param2", "1", "--stock", "100",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to procure"));
}

#[test]
fn test_calc_unknown_type_fails() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args([
            "calc", "--product-type", "Table", "--material-type", "Fabric", "--quantity", "5",
            "--param1", "3", "--param2", "4",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no coefficient"));
}

#[test]
fn test_calc_sentinel_reports_failure_as_minus_one() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .args([
            "calc", "--product-type", "Sofa", "--material-type", "Glass", "--quantity", "5",
            "--param1", "3", "--param2", "4", "--sentinel",
        ])
        .assert()
        .success()
        .stdout("-1\n");

    minv(tmp.path())
        .args([
            "calc", "--product-type", "Sofa", "--material-type", "Fabric", "--quantity", "5",
            "--param1", "3", "--param2", "4", "--stock", "10", "--sentinel",
        ])
        .assert()
        .success()
        .stdout("122\n");
}

#[test]
fn test_calc_sentinel_without_project() {
    let tmp = TempDir::new().unwrap();

    minv(tmp.path())
        .args([
            "calc", "--product-type", "Sofa", "--material-type", "Fabric", "--quantity", "5",
            "--param1", "3", "--param2", "4", "--sentinel",
        ])
        .assert()
        .success()
        .stdout("-1\n");
}

// ============================================================================
// Status and Config Tests
// ============================================================================

#[test]
fn test_status_lists_tables() {
    let tmp = setup_catalog();

    let out = stdout_of(&tmp, &["status"]);
    for table in [
        "material_types",
        "materials",
        "product_types",
        "products",
        "product_materials",
        "partners",
    ] {
        assert!(out.contains(table), "missing {} in status output", table);
    }
    assert!(out.contains("Connected to"));

    let json = stdout_of(&tmp, &["status", "-f", "json"]);
    let status: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(status["schema_version"], 1);
    assert_eq!(status["total_rows"], 5);
    assert_eq!(status["low_stock_materials"], 1);
}

#[test]
fn test_status_tables_only() {
    let tmp = setup_test_project();

    let out = stdout_of(&tmp, &["status", "--tables"]);
    assert!(out.lines().any(|l| l == "product_materials"));
    assert!(out.lines().any(|l| l == "schema_version"));
}

#[test]
fn test_default_format_from_environment() {
    let tmp = setup_catalog();

    minv(tmp.path())
        .env("MINV_FORMAT", "csv")
        .args(["prod-type", "list"])
        .assert()
        .success()
        .stdout("name,coefficient\nSofa,2\n");
}

#[test]
fn test_default_format_from_project_config() {
    let tmp = setup_catalog();
    std::fs::write(tmp.path().join(".minv/config.yaml"), "default_format: id\n").unwrap();

    minv(tmp.path())
        .args(["prod", "list"])
        .assert()
        .success()
        .stdout("Chesterfield\n");

    minv(tmp.path())
        .args(["config", "show", "default_format"])
        .assert()
        .success()
        .stdout("id\n");
}

#[test]
fn test_config_keys() {
    let tmp = TempDir::new().unwrap();

    minv(tmp.path())
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("database"))
        .stdout(predicate::str::contains("log_level"));
}
