//! Shared helpers for command handlers.

use std::io::IsTerminal;

use prodman_core::{EntityId, Product};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, `--yes` is required.
pub fn confirm(message: &str, yes_flag: bool, action: &str) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Identifier of a product for plain output; unsaved products print empty.
pub fn product_id(product: &Product) -> String {
    product
        .id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default()
}

pub fn product_not_found(id: &EntityId) -> CliError {
    CliError::NotFound {
        resource_type: "product".into(),
        identifier: id.to_string(),
        list_command: "products list".into(),
    }
}
