//! Form-to-SQL builders for the admin and guest console flows.
//!
//! Each builder takes raw form input (strings, as a form would deliver
//! them), validates it, formats the catalog template, and returns the final
//! SQL string. Validation failures never reach the network.

use crate::catalog::{CatalogError, QueryCatalog};
use crate::sanitize::{escape_sql_string, to_number};
use crate::template::{format_template, TemplateError, TemplateValue};
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced while preparing a query from form input.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// A form field failed validation; no query was built.
    #[error("{0}")]
    Validation(String),

    /// The template referenced a parameter the builder did not supply.
    #[error("Failed to prepare query: {0}")]
    Template(#[from] TemplateError),

    /// The catalog could not supply the named template.
    #[error("Failed to prepare query: {0}")]
    Catalog(#[from] CatalogError),
}

/// Raw input for one race-result row of the add-race form.
#[derive(Debug, Clone, Default)]
pub struct RaceResultForm {
    pub horse_id: String,
    pub result: String,
    pub prize: String,
}

/// Raw input for the add-race form.
#[derive(Debug, Clone, Default)]
pub struct AddRaceForm {
    pub race_id: String,
    pub race_name: String,
    pub track_name: String,
    pub race_date: String,
    pub race_time: String,
    pub results: Vec<RaceResultForm>,
}

fn require_number(raw: &str, message: &str) -> Result<f64, ConsoleError> {
    to_number(raw).ok_or_else(|| ConsoleError::Validation(message.to_string()))
}

/// Builds the add-race statement pair: the race insert followed by a batched
/// results insert, joined into one string.
pub fn build_add_race_query(
    catalog: &QueryCatalog,
    form: &AddRaceForm,
) -> Result<String, ConsoleError> {
    let race_id = require_number(&form.race_id, "Race ID must be a valid number.")?;

    if form.results.is_empty() {
        return Err(ConsoleError::Validation(
            "Please add at least one race result row.".to_string(),
        ));
    }

    let mut value_tuples = Vec::with_capacity(form.results.len());
    for row in &form.results {
        let (Some(horse_id), Some(result)) = (to_number(&row.horse_id), to_number(&row.result))
        else {
            return Err(ConsoleError::Validation(
                "Every race result row must include numeric horse ID and finish position."
                    .to_string(),
            ));
        };
        let prize = to_number(&row.prize).unwrap_or(0.0);
        value_tuples.push(format!("({race_id}, {horse_id}, {result}, {prize})"));
    }

    let race_insert = format_template(
        catalog.template("admin.addRace.raceInsert")?,
        &HashMap::from([
            ("raceId".to_string(), TemplateValue::Float(race_id)),
            (
                "raceName".to_string(),
                TemplateValue::Text(escape_sql_string(&form.race_name)),
            ),
            (
                "trackName".to_string(),
                TemplateValue::Text(escape_sql_string(&form.track_name)),
            ),
            (
                "raceDate".to_string(),
                TemplateValue::Text(form.race_date.clone()),
            ),
            (
                "raceTime".to_string(),
                TemplateValue::Text(form.race_time.clone()),
            ),
        ]),
    )?;

    let results_insert = format_template(
        catalog.template("admin.addRace.resultsInsert")?,
        &HashMap::from([(
            "values".to_string(),
            TemplateValue::Text(value_tuples.join(", ")),
        )]),
    )?;

    Ok(format!("{race_insert} {results_insert}"))
}

/// Builds the delete-owner stored-procedure call.
///
/// The procedure name is stripped to `[A-Za-z0-9_]` and defaults to
/// `DeleteOwnerCascade` when the field is left empty.
pub fn build_delete_owner_query(
    catalog: &QueryCatalog,
    owner_id: &str,
    procedure_name: &str,
) -> Result<String, ConsoleError> {
    let owner_id = require_number(owner_id, "Owner ID must be a valid number.")?;

    let procedure: String = if procedure_name.trim().is_empty() {
        "DeleteOwnerCascade".to_string()
    } else {
        procedure_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect()
    };

    let sql = format_template(
        catalog.template("admin.deleteOwner")?,
        &HashMap::from([
            ("procedureName".to_string(), TemplateValue::Text(procedure)),
            ("ownerId".to_string(), TemplateValue::Float(owner_id)),
        ]),
    )?;
    Ok(sql)
}

/// Builds the move-horse update.
pub fn build_move_horse_query(
    catalog: &QueryCatalog,
    horse_id: &str,
    stable_id: &str,
) -> Result<String, ConsoleError> {
    let (Some(horse_id), Some(stable_id)) = (to_number(horse_id), to_number(stable_id)) else {
        return Err(ConsoleError::Validation(
            "Horse ID and Stable ID must both be numbers.".to_string(),
        ));
    };

    let sql = format_template(
        catalog.template("admin.moveHorse")?,
        &HashMap::from([
            ("horseId".to_string(), TemplateValue::Float(horse_id)),
            ("stableId".to_string(), TemplateValue::Float(stable_id)),
        ]),
    )?;
    Ok(sql)
}

/// Builds the approve-trainer insert.
pub fn build_approve_trainer_query(
    catalog: &QueryCatalog,
    trainer_id: &str,
    first_name: &str,
    last_name: &str,
    stable_id: &str,
) -> Result<String, ConsoleError> {
    let (Some(trainer_id), Some(stable_id)) = (to_number(trainer_id), to_number(stable_id)) else {
        return Err(ConsoleError::Validation(
            "Trainer ID and Stable ID must both be numbers.".to_string(),
        ));
    };

    let sql = format_template(
        catalog.template("admin.approveTrainer")?,
        &HashMap::from([
            ("trainerId".to_string(), TemplateValue::Float(trainer_id)),
            (
                "firstName".to_string(),
                TemplateValue::Text(escape_sql_string(first_name)),
            ),
            (
                "lastName".to_string(),
                TemplateValue::Text(escape_sql_string(last_name)),
            ),
            ("stableId".to_string(), TemplateValue::Float(stable_id)),
        ]),
    )?;
    Ok(sql)
}

/// Builds the owners'-horses report for a given owner last name.
pub fn build_owners_horses_query(
    catalog: &QueryCatalog,
    owner_last_name: &str,
) -> Result<String, ConsoleError> {
    let last_name = escape_sql_string(owner_last_name);
    if last_name.is_empty() {
        return Err(ConsoleError::Validation(
            "Owner last name is required.".to_string(),
        ));
    }

    let sql = format_template(
        catalog.template("guest.ownersHorses")?,
        &HashMap::from([("ownerLastName".to_string(), TemplateValue::Text(last_name))]),
    )?;
    Ok(sql)
}

/// Fetches a fixed no-input guest report (`winningTrainers`,
/// `trainerWinnings`, `trackActivity`) from the catalog.
pub fn guest_report_query(catalog: &QueryCatalog, name: &str) -> Result<String, ConsoleError> {
    Ok(catalog.template(&format!("guest.{name}"))?.to_string())
}
