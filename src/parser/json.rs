use crate::error::{Result, SchedulerError};
use crate::types::{Faculty, LabRoom, MasterScheduleEntry, Section, SolveInput, Subject, TimetableConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// The §6 wire shape: a single JSON document with faculties/sections/lab_rooms
/// keyed by id and subjects/master_schedule as flat arrays.
#[derive(Debug, Deserialize)]
struct RawSolveInput {
    subjects: Vec<Subject>,
    #[serde(default)]
    faculties: HashMap<String, Faculty>,
    #[serde(default)]
    sections: HashMap<String, Section>,
    #[serde(default)]
    lab_rooms: HashMap<String, LabRoom>,
    #[serde(default)]
    master_schedule: Vec<MasterScheduleEntry>,
    #[serde(default)]
    config: TimetableConfig,
}

impl From<RawSolveInput> for SolveInput {
    fn from(raw: RawSolveInput) -> Self {
        Self {
            subjects: raw.subjects,
            faculties: raw.faculties.into_values().collect(),
            sections: raw.sections.into_values().collect(),
            lab_rooms: raw.lab_rooms.into_values().collect(),
            master_schedule: raw.master_schedule,
            config: raw.config,
        }
    }
}

/// Parses one §6 wire-format JSON document (the CLI's stdin surface).
pub fn load_input_from_str(content: &str) -> Result<SolveInput> {
    let raw: RawSolveInput = serde_json::from_str(content).map_err(|e| SchedulerError::JsonParse {
        file: "<stdin>".to_string(),
        message: e.to_string(),
    })?;
    Ok(raw.into())
}

/// Reads a wire-format JSON document from any reader (stdin in the CLI).
pub fn load_input_from_reader<R: Read>(mut reader: R) -> Result<SolveInput> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| SchedulerError::FileRead {
            path: "<stdin>".to_string(),
            source: e,
        })?;
    load_input_from_str(&content)
}

/// Loads the same wire data split across one file per entity, the shape
/// test fixtures and offline tooling tend to use.
pub fn load_input_from_dir(dir: &Path) -> Result<SolveInput> {
    let subjects = load_subjects(&dir.join("subjects.json"))?;
    let faculties = load_faculties(&dir.join("faculties.json"))?;
    let sections = load_sections(&dir.join("sections.json"))?;
    let lab_rooms = load_lab_rooms(&dir.join("lab_rooms.json"))?;
    let master_schedule = load_master_schedule(&dir.join("master_schedule.json"))?;
    let config = load_config_or_default(&dir.join("config.toml"));

    Ok(SolveInput {
        subjects,
        faculties,
        sections,
        lab_rooms,
        master_schedule,
        config,
    })
}

pub fn load_subjects(path: &Path) -> Result<Vec<Subject>> {
    load_json_file(path)
}

pub fn load_faculties(path: &Path) -> Result<Vec<Faculty>> {
    let map: HashMap<String, Faculty> = load_json_file(path)?;
    Ok(map.into_values().collect())
}

pub fn load_sections(path: &Path) -> Result<Vec<Section>> {
    let map: HashMap<String, Section> = load_json_file(path)?;
    Ok(map.into_values().collect())
}

pub fn load_lab_rooms(path: &Path) -> Result<Vec<LabRoom>> {
    let map: HashMap<String, LabRoom> = load_json_file(path)?;
    Ok(map.into_values().collect())
}

/// The master schedule is optional; a fresh term has none.
pub fn load_master_schedule(path: &Path) -> Result<Vec<MasterScheduleEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_json_file(path)
}

pub fn load_config_or_default(path: &Path) -> TimetableConfig {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => TimetableConfig::default(),
        }
    } else {
        TimetableConfig::default()
    }
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let path_str = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| SchedulerError::FileRead {
        path: path_str.clone(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| {
        SchedulerError::JsonParse {
            file: path_str,
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_wire_document() {
        let doc = r#"{
            "subjects": [],
            "faculties": {},
            "sections": {},
            "lab_rooms": {},
            "master_schedule": []
        }"#;
        let input = load_input_from_str(doc).unwrap();
        assert!(input.subjects.is_empty());
        assert_eq!(input.config.days_per_week, 6);
    }

    #[test]
    fn rejects_malformed_document() {
        let result = load_input_from_str("{ not json");
        assert!(result.is_err());
    }
}
