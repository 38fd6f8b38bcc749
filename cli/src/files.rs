use std::{fs, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use skirmish::api::{self, EncounterData};
use skirmish::ActorSpec;

/// Read a text file, honouring a UTF-8/UTF-16 byte order mark if present.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))
    }
}

pub fn opponent_file(path: &Path) -> Result<ActorSpec> {
    let text = read_text_auto(path)?;
    api::parse_opponent(&path.to_string_lossy(), &text)
}

pub fn encounter_file(path: &Path) -> Result<EncounterData> {
    let text = read_text_auto(path)?;
    api::parse_encounter(&path.to_string_lossy(), &text)
}

/// A builtin id wins over a file.
pub fn opponent(id: Option<&str>, file: Option<&Path>) -> Result<ActorSpec> {
    match (id, file) {
        (Some(id), _) => api::builtin_opponent(id),
        (None, Some(path)) => opponent_file(path),
        (None, None) => anyhow::bail!("pass --opponent <id> or --opponent-file <path>"),
    }
}

pub fn encounter(id: Option<&str>, file: Option<&Path>) -> Result<EncounterData> {
    match (id, file) {
        (Some(id), _) => api::builtin_encounter(id),
        (None, Some(path)) => encounter_file(path),
        (None, None) => anyhow::bail!("pass --id <id> or --file <path>"),
    }
}
