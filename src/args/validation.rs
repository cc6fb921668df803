use serde_json::Value;
use std::{fs, path::PathBuf};

use super::types::Args;

const SEED_SECTIONS: [&str; 4] = ["settings", "courses", "members", "schedule"];
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// # Errors
///
/// Will return `Err` if any of the `;`-separated files is not readable
pub fn check_readable_file(file: &str) -> Result<String, String> {
    for file in file.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let path = PathBuf::from(file);
        if !path.is_file() || fs::metadata(&path).is_err() {
            return Err(format!("The sql startup script '{file}' is not readable."));
        }
    }
    Ok(file.to_string())
}

/// # Errors
///
/// Will return `Err` if the file is not readable, is not valid json, or is not a seed object
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents =
        fs::read_to_string(&path).map_err(|e| format!("The json file '{file}' is not readable: {e}"))?;
    let json: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("The json file '{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// Expected shape:
/// `{ "settings": {..}, "courses": [..], "members": [..], "schedule": [..] }`,
/// every key optional.
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
pub fn validate_json_format(json: &Value) -> Result<(), String> {
    let Some(object) = json.as_object() else {
        return Err("The json file is not in the correct format, expected an object.".to_string());
    };
    for (key, value) in object {
        if !SEED_SECTIONS.contains(&key.as_str()) {
            return Err(format!(
                "Unexpected key '{key}', expected one of {}.",
                SEED_SECTIONS.join(", ")
            ));
        }
        let shape_ok = if key == "settings" {
            value.is_object()
        } else {
            value.is_array()
        };
        if !shape_ok {
            return Err(format!("'{key}' is not in the correct format."));
        }
    }
    Ok(())
}

impl Args {
    /// # Errors
    ///
    /// Will return `Err` if the database name is empty or the log level is unknown
    pub fn validate(&self) -> Result<(), String> {
        if self.db_name.trim().is_empty() {
            return Err("A database name is required".to_string());
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Unknown log level '{}', expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}
