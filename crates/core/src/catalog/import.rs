//! Custom script import
//!
//! Accepts the community script-tool JSON format: an array whose
//! `{"id": "_meta", ...}` element names the script and whose remaining
//! elements are role ids, role references, or custom role definitions.
//! An import is validated completely before anything is returned.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::{BuiltinScript, CustomRole, CustomScript, Role, Team};
use crate::error::{Error, Result};

/// Result of a successful import
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptImport {
    pub script: CustomScript,
    /// Characters defined inline by the script
    pub custom_roles: Vec<CustomRole>,
}

/// Lower-case, underscores instead of spaces, dashes and apostrophes dropped
pub fn normalize_id(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Parse and validate a script-tool JSON document
pub fn import_custom_script(json: &str) -> Result<ScriptImport> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Error::import(0, format!("invalid JSON: {}", e)))?;

    let entries = value
        .as_array()
        .ok_or_else(|| Error::import(0, "expected a JSON array of script entries"))?;

    let mut meta: Option<(String, Option<String>)> = None;
    let mut custom_roles: Vec<CustomRole> = Vec::new();
    let mut role_ids: Vec<String> = Vec::new();
    let mut references: Vec<(usize, String)> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Value::String(raw) => {
                let id = normalize_id(raw);
                push_unique(index, &id, &mut seen, &mut role_ids)?;
                references.push((index, id));
            }
            Value::Object(fields) => {
                let raw_id = fields
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| Error::import(index, "entry is missing a string 'id'"))?;

                if raw_id == "_meta" {
                    if meta.is_some() {
                        return Err(Error::import(index, "duplicate _meta entry"));
                    }
                    meta = Some(parse_meta(index, fields)?);
                    continue;
                }

                let id = normalize_id(raw_id);
                push_unique(index, &id, &mut seen, &mut role_ids)?;

                if fields.contains_key("name") || fields.contains_key("team") {
                    if Role::from_id(&id).is_some() {
                        return Err(Error::import(
                            index,
                            format!("custom role '{}' shadows a built-in role", id),
                        ));
                    }
                    custom_roles.push(parse_custom_role(index, id, fields)?);
                } else {
                    references.push((index, id));
                }
            }
            _ => {
                return Err(Error::import(
                    index,
                    "entry must be a role id string or an object",
                ))
            }
        }
    }

    for (index, id) in &references {
        let defined = custom_roles.iter().any(|r| &r.id == id);
        if Role::from_id(id).is_none() && !defined {
            return Err(Error::import(*index, format!("unknown role '{}'", id)));
        }
    }

    let (name, author) = meta.ok_or_else(|| {
        Error::import(entries.len(), "missing _meta entry with a script name")
    })?;

    if role_ids.is_empty() {
        return Err(Error::import(entries.len(), "script lists no roles"));
    }

    let mut script_id = normalize_id(&name);
    if BuiltinScript::from_name(&script_id).is_some() {
        script_id = format!("custom_{}", script_id);
    }

    tracing::debug!(script_id = %script_id, roles = role_ids.len(), "Imported custom script");

    Ok(ScriptImport {
        script: CustomScript {
            id: script_id,
            name,
            author,
            roles: role_ids,
            jinxes: Vec::new(),
        },
        custom_roles,
    })
}

fn push_unique(
    index: usize,
    id: &str,
    seen: &mut HashSet<String>,
    role_ids: &mut Vec<String>,
) -> Result<()> {
    if id.is_empty() {
        return Err(Error::import(index, "role id is empty"));
    }
    if !seen.insert(id.to_string()) {
        return Err(Error::import(index, format!("duplicate role '{}'", id)));
    }
    role_ids.push(id.to_string());
    Ok(())
}

fn parse_meta(index: usize, fields: &Map<String, Value>) -> Result<(String, Option<String>)> {
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::import(index, "_meta entry needs a non-empty 'name'"))?;

    let author = match fields.get("author") {
        None | Some(Value::Null) => None,
        Some(Value::String(a)) => Some(a.clone()),
        Some(_) => return Err(Error::import(index, "_meta 'author' must be a string")),
    };

    Ok((name.to_string(), author))
}

fn parse_custom_role(index: usize, id: String, fields: &Map<String, Value>) -> Result<CustomRole> {
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| Error::import(index, format!("custom role '{}' needs a 'name'", id)))?;

    let team_raw = fields
        .get("team")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::import(index, format!("custom role '{}' needs a 'team'", id)))?;
    let team = Team::from_str_or_shorthand(team_raw).ok_or_else(|| {
        Error::import(index, format!("custom role '{}' has unknown team '{}'", id, team_raw))
    })?;

    let ability = match fields.get("ability") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(a)) => a.clone(),
        Some(_) => {
            return Err(Error::import(
                index,
                format!("custom role '{}' has a non-string 'ability'", id),
            ))
        }
    };

    Ok(CustomRole {
        first_night: night_flag(index, &id, fields.get("firstNight"))?,
        other_night: night_flag(index, &id, fields.get("otherNight"))?,
        id,
        name: name.to_string(),
        team,
        ability,
    })
}

/// The script tool stores night positions as numbers; zero means "does not wake"
fn night_flag(index: usize, id: &str, value: Option<&Value>) -> Result<bool> {
    match value {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::Number(n)) => Ok(n.as_f64().map(|v| v > 0.0).unwrap_or(false)),
        Some(_) => Err(Error::import(
            index,
            format!("custom role '{}' has an invalid night value", id),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(result: Result<ScriptImport>) -> (usize, String) {
        match result {
            Err(Error::MalformedImport { index, reason }) => (index, reason),
            other => panic!("expected malformed import, got {:?}", other),
        }
    }

    #[test]
    fn test_import_plain_ids() {
        let json = r#"[
            {"id": "_meta", "name": "Tiny Town", "author": "sam"},
            "imp", "poisoner", "Fortune Teller", {"id": "saint"}
        ]"#;
        let import = import_custom_script(json).unwrap();
        assert_eq!(import.script.id, "tiny_town");
        assert_eq!(import.script.author.as_deref(), Some("sam"));
        assert_eq!(
            import.script.roles,
            vec!["imp", "poisoner", "fortune_teller", "saint"]
        );
        assert!(import.custom_roles.is_empty());
    }

    #[test]
    fn test_import_custom_role() {
        let json = r#"[
            {"id": "_meta", "name": "Homebrew"},
            {"id": "hermit", "name": "Hermit", "team": "outsider",
             "ability": "You have all Outsider abilities.", "firstNight": 12, "otherNight": 0},
            "imp"
        ]"#;
        let import = import_custom_script(json).unwrap();
        assert_eq!(import.custom_roles.len(), 1);
        let hermit = &import.custom_roles[0];
        assert_eq!(hermit.team, Team::Outsider);
        assert!(hermit.first_night);
        assert!(!hermit.other_night);
        assert_eq!(import.script.roles, vec!["hermit", "imp"]);
    }

    #[test]
    fn test_builtin_name_gets_prefixed() {
        let json = r#"[{"id": "_meta", "name": "Trouble Brewing"}, "imp"]"#;
        let import = import_custom_script(json).unwrap();
        assert_eq!(import.script.id, "custom_trouble_brewing");
    }

    #[test]
    fn test_rejects_non_array() {
        let (index, reason) = reason(import_custom_script(r#"{"id": "_meta"}"#));
        assert_eq!(index, 0);
        assert!(reason.contains("array"));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let (_, reason) = reason(import_custom_script("[not json"));
        assert!(reason.contains("invalid JSON"));
    }

    #[test]
    fn test_rejects_missing_meta() {
        let (index, reason) = reason(import_custom_script(r#"["imp", "saint"]"#));
        assert_eq!(index, 2);
        assert!(reason.contains("_meta"));
    }

    #[test]
    fn test_rejects_unknown_role() {
        let json = r#"[{"id": "_meta", "name": "X"}, "imp", "wizard_of_oz"]"#;
        let (index, reason) = reason(import_custom_script(json));
        assert_eq!(index, 2);
        assert!(reason.contains("wizard_of_oz"));
    }

    #[test]
    fn test_rejects_duplicate_role() {
        let json = r#"[{"id": "_meta", "name": "X"}, "imp", "imp"]"#;
        let (index, _) = reason(import_custom_script(json));
        assert_eq!(index, 2);
    }

    #[test]
    fn test_rejects_bad_team() {
        let json = r#"[{"id": "_meta", "name": "X"}, {"id": "oddball", "name": "Oddball", "team": "fabled"}]"#;
        let (index, reason) = reason(import_custom_script(json));
        assert_eq!(index, 1);
        assert!(reason.contains("fabled"));
    }

    #[test]
    fn test_rejects_shadowing_builtin() {
        let json = r#"[{"id": "_meta", "name": "X"}, {"id": "imp", "name": "Imp 2", "team": "demon"}]"#;
        let (_, reason) = reason(import_custom_script(json));
        assert!(reason.contains("shadows"));
    }

    #[test]
    fn test_rejects_wrong_entry_type() {
        let json = r#"[{"id": "_meta", "name": "X"}, 42]"#;
        let (index, _) = reason(import_custom_script(json));
        assert_eq!(index, 1);
    }

    #[test]
    fn test_rejects_empty_script() {
        let json = r#"[{"id": "_meta", "name": "Empty"}]"#;
        let (_, reason) = reason(import_custom_script(json));
        assert!(reason.contains("no roles"));
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("Devil's Advocate"), "devils_advocate");
        assert_eq!(normalize_id(" Tea-Lady "), "tea_lady");
    }
}
