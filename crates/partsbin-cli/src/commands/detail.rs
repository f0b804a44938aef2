//! Detail CLI commands
//!
//! Handles: partsbin list/show/add/edit/delete

use anyhow::{Context, Result};
use partsbin_core::{Area, Detail, DetailInput, Inventory};
use std::io::{self, Write};
use std::path::PathBuf;

/// Fields for a new detail, as given on the command line
pub struct NewDetail {
    pub name: String,
    pub description: Option<String>,
    pub area: Area,
    pub image: PathBuf,
}

/// Field changes for an existing detail; `None` keeps the current value
pub struct DetailChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub area: Option<Area>,
    pub image: Option<PathBuf>,
}

/// List details whose name contains `filter`
///
/// # Errors
/// Returns an error if the details cannot be listed
pub fn list(inventory: &Inventory, filter: &str, json: bool) -> Result<()> {
    let details = inventory.list(filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    if details.is_empty() {
        if filter.is_empty() {
            println!("No details found.");
        } else {
            println!("No details matching '{filter}'.");
        }
        return Ok(());
    }

    println!("Details:");
    for d in &details {
        println!("  {:>4}  {}  ({} dm²)", d.id, d.name, d.area);
    }
    Ok(())
}

/// Print every field of one detail
///
/// # Errors
/// Returns an error if the detail does not exist
pub fn show(inventory: &Inventory, id: i64, json: bool) -> Result<()> {
    let detail = inventory.get(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    print_detail(inventory, &detail);
    Ok(())
}

/// Import the photo and store a new detail
///
/// # Errors
/// Returns an error if the photo cannot be imported or the detail is invalid
pub fn add(inventory: &Inventory, new: NewDetail) -> Result<()> {
    let image_path = inventory
        .import_image(&new.image)
        .with_context(|| format!("Could not import image {}", new.image.display()))?;

    let created = DetailInput::new(&new.name, new.description.as_deref(), new.area, &image_path)
        .map_err(anyhow::Error::from)
        .and_then(|input| Ok(inventory.create(&input)?));

    match created {
        Ok(id) => {
            println!("Created detail {id}: {}", new.name.trim());
            Ok(())
        }
        Err(e) => {
            discard_quietly(inventory, &image_path);
            Err(e)
        }
    }
}

/// Apply field changes to an existing detail
///
/// # Errors
/// Returns an error if the detail does not exist or the result is invalid
pub fn edit(inventory: &Inventory, id: i64, changes: DetailChanges) -> Result<()> {
    let current = inventory.get(id)?;

    let imported = changes
        .image
        .as_deref()
        .map(|image| {
            inventory
                .import_image(image)
                .with_context(|| format!("Could not import image {}", image.display()))
        })
        .transpose()?;

    let name = changes.name.unwrap_or_else(|| current.name.clone());
    let description = changes.description.or_else(|| current.description.clone());
    let area = changes.area.unwrap_or(current.area);
    let image_path = imported.clone().unwrap_or_else(|| current.image_path.clone());

    let replaced = DetailInput::new(&name, description.as_deref(), area, &image_path)
        .map_err(anyhow::Error::from)
        .and_then(|input| Ok(inventory.replace(id, &input)?));

    match replaced {
        Ok(detail) => {
            println!("Updated detail {id}.");
            print_detail(inventory, &detail);
            Ok(())
        }
        Err(e) => {
            if let Some(path) = imported.filter(|p| *p != current.image_path) {
                discard_quietly(inventory, &path);
            }
            Err(e)
        }
    }
}

/// Delete a detail and its photo, asking first unless `force`
///
/// # Errors
/// Returns an error if the detail does not exist or cannot be removed
pub fn delete(inventory: &Inventory, id: i64, force: bool) -> Result<()> {
    let detail = inventory.get(id)?;

    if !force && !confirm(&format!("Delete detail '{}' (ID: {id})?", detail.name))? {
        println!("Cancelled.");
        return Ok(());
    }

    inventory.delete(id)?;
    println!("Deleted detail {id}: {}", detail.name);
    Ok(())
}

fn print_detail(inventory: &Inventory, detail: &Detail) {
    println!("Detail: {}", detail.name);
    println!("ID: {}", detail.id);
    println!(
        "Description: {}",
        detail.description.as_deref().unwrap_or("No description")
    );
    println!("Area: {} dm²", detail.area);
    match inventory.image_location(&detail.image_path) {
        Ok(location) if location.is_file() => {
            println!("Image: {}", location.display());
        }
        _ => println!("Image: {} (missing)", detail.image_path),
    }
}

fn discard_quietly(inventory: &Inventory, image_path: &str) {
    if let Err(e) = inventory.discard_image(image_path) {
        log::warn!("could not discard imported image {image_path}: {e}");
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
