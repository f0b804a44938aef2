//! Inventory tests
//!
//! Exercises the caller-facing operations against a real data directory.

use partsbin_core::{Area, DataLayout, DetailInput, Inventory, InventoryError, ValidationError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn open_inventory(temp_dir: &TempDir) -> Inventory {
    Inventory::open(DataLayout::new(temp_dir.path().join("data")))
        .expect("Failed to open inventory")
}

fn write_photo(dir: &Path, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write photo");
    path
}

fn input(name: &str, area: &str, image_path: &str) -> DetailInput {
    DetailInput::new(
        name,
        Some("steel"),
        area.parse::<Area>().expect("valid area"),
        image_path,
    )
    .expect("valid input")
}

#[test]
fn test_bracket_scenario() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let photo = write_photo(temp_dir.path(), "b1.png", b"bracket photo");

    let image_path = inventory.import_image(&photo).expect("Failed to import");
    assert_eq!(image_path, "images/b1.png");

    let id = inventory
        .create(&input("Bracket", "12.50", &image_path))
        .expect("Failed to create detail");
    assert_eq!(id, 1);

    let found = inventory.list("brac").expect("Failed to list");
    assert!(found.iter().any(|d| d.id == 1));

    inventory.delete(1).expect("Failed to delete");
    assert!(matches!(inventory.get(1), Err(InventoryError::NotFound(1))));
    assert!(!inventory.layout().images_dir().join("b1.png").exists());
}

#[test]
fn test_create_requires_existing_image() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);

    let result = inventory.create(&input("Bracket", "1", "images/missing.png"));
    assert!(matches!(result, Err(InventoryError::FileMissing(_))));
    assert_eq!(inventory.count().expect("Failed to count"), 0);
}

#[test]
fn test_create_rejects_image_outside_data_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    write_photo(temp_dir.path(), "outside.png", b"x");

    let result = inventory.create(&input("Bracket", "1", "../outside.png"));
    assert!(matches!(
        result,
        Err(InventoryError::Validation(ValidationError::UnsafeImagePath(_)))
    ));
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let photo = write_photo(temp_dir.path(), "p.png", b"p");
    let image_path = inventory.import_image(&photo).expect("Failed to import");

    assert!(matches!(
        inventory.update(7, &input("Plate", "2", &image_path)),
        Err(InventoryError::NotFound(7))
    ));
    assert!(matches!(inventory.delete(7), Err(InventoryError::NotFound(7))));
}

#[test]
fn test_replace_removes_orphaned_image() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let old_photo = write_photo(temp_dir.path(), "old.png", b"old");
    let new_photo = write_photo(temp_dir.path(), "new.jpg", b"new");

    let old_path = inventory.import_image(&old_photo).expect("Failed to import");
    let id = inventory
        .create(&input("Plate", "2", &old_path))
        .expect("Failed to create detail");

    let new_path = inventory.import_image(&new_photo).expect("Failed to import");
    let updated = inventory
        .replace(id, &input("Plate", "2.5", &new_path))
        .expect("Failed to replace detail");

    assert_eq!(updated.image_path, "images/new.jpg");
    assert_eq!(inventory.get(id).expect("Failed to get"), updated);
    assert!(!inventory.layout().images_dir().join("old.png").exists());
    assert!(inventory.layout().images_dir().join("new.jpg").exists());
}

#[test]
fn test_delete_keeps_shared_image() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let photo = write_photo(temp_dir.path(), "shared.png", b"shared");
    let image_path = inventory.import_image(&photo).expect("Failed to import");

    let first = inventory
        .create(&input("Left bracket", "1", &image_path))
        .expect("Failed to create detail");
    let second = inventory
        .create(&input("Right bracket", "1", &image_path))
        .expect("Failed to create detail");

    inventory.delete(first).expect("Failed to delete");
    assert!(inventory.layout().images_dir().join("shared.png").exists());

    inventory.delete(second).expect("Failed to delete");
    assert!(!inventory.layout().images_dir().join("shared.png").exists());
}

#[test]
fn test_delete_with_image_already_gone() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let photo = write_photo(temp_dir.path(), "gone.png", b"g");
    let image_path = inventory.import_image(&photo).expect("Failed to import");
    let id = inventory
        .create(&input("Spacer", "0.5", &image_path))
        .expect("Failed to create detail");

    fs::remove_file(inventory.layout().images_dir().join("gone.png")).expect("Failed to remove");

    inventory.delete(id).expect("Failed to delete");
    assert_eq!(inventory.count().expect("Failed to count"), 0);
}

#[test]
fn test_import_rejects_non_image() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let notes = write_photo(temp_dir.path(), "notes.txt", b"n");

    assert!(matches!(
        inventory.import_image(&notes),
        Err(InventoryError::Validation(ValidationError::UnsupportedImage(_)))
    ));
}

#[test]
fn test_reopen_keeps_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let photo = write_photo(temp_dir.path(), "k.png", b"k");

    {
        let inventory = open_inventory(&temp_dir);
        let image_path = inventory.import_image(&photo).expect("Failed to import");
        inventory
            .create(&input("Kept", "4", &image_path))
            .expect("Failed to create detail");
    }

    let inventory = open_inventory(&temp_dir);
    assert_eq!(inventory.list("").expect("Failed to list").len(), 1);
}

#[test]
fn test_discard_image_only_when_unused() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    let used = write_photo(temp_dir.path(), "used.png", b"u");
    let spare = write_photo(temp_dir.path(), "spare.png", b"s");

    let used_path = inventory.import_image(&used).expect("Failed to import");
    let spare_path = inventory.import_image(&spare).expect("Failed to import");
    inventory
        .create(&input("Clamp", "3", &used_path))
        .expect("Failed to create detail");

    assert!(!inventory.discard_image(&used_path).expect("Failed to discard"));
    assert!(inventory.discard_image(&spare_path).expect("Failed to discard"));
    assert!(inventory.layout().images_dir().join("used.png").exists());
    assert!(!inventory.layout().images_dir().join("spare.png").exists());
}

#[test]
fn test_out_of_range_row_can_be_listed_and_deleted() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    fs::write(inventory.layout().images_dir().join("big.png"), b"big")
        .expect("Failed to write photo");

    rusqlite::Connection::open(inventory.layout().database_path())
        .expect("Failed to open database file")
        .execute(
            "INSERT INTO details (name, area, image_path) VALUES ('Big', 10000.0, 'images/big.png')",
            [],
        )
        .expect("Failed to insert row");

    let details = inventory.list("").expect("Failed to list");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0].area.value(), 10000.0);

    let removed = inventory.delete(details[0].id).expect("Failed to delete");
    assert_eq!(removed.name, "Big");
    assert_eq!(inventory.count().expect("Failed to count"), 0);
    assert!(!inventory.layout().images_dir().join("big.png").exists());
}

#[test]
fn test_windows_separators_resolve() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let inventory = open_inventory(&temp_dir);
    write_photo(&inventory.layout().images_dir(), "b1.png", b"b");

    let location = inventory
        .image_location("images\\b1.png")
        .expect("Failed to resolve image");
    assert!(location.is_file());
}
