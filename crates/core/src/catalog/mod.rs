//! Role and script catalog
//!
//! Built-in characters are a closed enum ([`Role`]). Tables may extend the
//! catalog with user-authored roles and scripts; [`Catalog`] merges both
//! views at lookup time without ever letting a custom id shadow a built-in.

mod import;
mod roles;
mod scripts;

use serde::{Deserialize, Serialize};

pub use import::{import_custom_script, ScriptImport};
pub use roles::Role;
pub use scripts::{BuiltinScript, CustomScript, Jinx, ScriptView};

use crate::error::{Error, Result};

/// Character type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
    Traveller,
}

impl Team {
    pub fn alignment(&self) -> Alignment {
        match self {
            Team::Townsfolk | Team::Outsider | Team::Traveller => Alignment::Good,
            Team::Minion | Team::Demon => Alignment::Evil,
        }
    }

    /// Parse a team name, accepting the usual shorthands
    pub fn from_str_or_shorthand(s: &str) -> Option<Team> {
        match s.trim().to_lowercase().as_str() {
            "townsfolk" | "tf" => Some(Team::Townsfolk),
            "outsider" | "os" => Some(Team::Outsider),
            "minion" | "mn" => Some(Team::Minion),
            "demon" | "dm" => Some(Team::Demon),
            "traveller" | "traveler" => Some(Team::Traveller),
            _ => None,
        }
    }

    /// Teams that make up the standard composition, in draw order
    pub const fn standard() -> [Team; 4] {
        [Team::Townsfolk, Team::Outsider, Team::Minion, Team::Demon]
    }
}

/// Good or evil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Alignment {
    Good,
    Evil,
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Good => write!(f, "Good"),
            Alignment::Evil => write!(f, "Evil"),
        }
    }
}

/// Nights on which a character is woken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightWake {
    Never,
    First,
    Other,
    Both,
}

impl NightWake {
    pub const fn first_night(&self) -> bool {
        matches!(self, NightWake::First | NightWake::Both)
    }

    pub const fn other_nights(&self) -> bool {
        matches!(self, NightWake::Other | NightWake::Both)
    }

    pub const fn from_flags(first_night: bool, other_nights: bool) -> Self {
        match (first_night, other_nights) {
            (true, true) => NightWake::Both,
            (true, false) => NightWake::First,
            (false, true) => NightWake::Other,
            (false, false) => NightWake::Never,
        }
    }

    /// Whether the character wakes on the given kind of night
    pub const fn wakes(&self, is_first_night: bool) -> bool {
        if is_first_night {
            self.first_night()
        } else {
            self.other_nights()
        }
    }
}

/// Changes a character makes to the standard composition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupModifier {
    /// Baron: removes 2 townsfolk, adds 2 outsiders
    AdjustCounts {
        remove_townsfolk: u8,
        add_outsiders: u8,
    },
}

/// A user-authored character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRole {
    pub id: String,
    pub name: String,
    pub team: Team,
    #[serde(default)]
    pub ability: String,
    #[serde(default)]
    pub first_night: bool,
    #[serde(default)]
    pub other_night: bool,
}

/// A character resolved from either the built-in or the custom catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoleEntry<'a> {
    Builtin(Role),
    Custom(&'a CustomRole),
}

impl<'a> RoleEntry<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            RoleEntry::Builtin(role) => role.id(),
            RoleEntry::Custom(role) => role.id.as_str(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            RoleEntry::Builtin(role) => role.name(),
            RoleEntry::Custom(role) => role.name.as_str(),
        }
    }

    pub fn team(&self) -> Team {
        match self {
            RoleEntry::Builtin(role) => role.team(),
            RoleEntry::Custom(role) => role.team,
        }
    }

    pub fn ability(&self) -> &'a str {
        match self {
            RoleEntry::Builtin(role) => role.ability(),
            RoleEntry::Custom(role) => role.ability.as_str(),
        }
    }

    pub fn night(&self) -> NightWake {
        match self {
            RoleEntry::Builtin(role) => role.night(),
            RoleEntry::Custom(role) => NightWake::from_flags(role.first_night, role.other_night),
        }
    }

    pub fn setup_modifier(&self) -> Option<SetupModifier> {
        match self {
            RoleEntry::Builtin(role) => role.setup_modifier(),
            RoleEntry::Custom(_) => None,
        }
    }

    pub fn disguise(&self) -> Option<Team> {
        match self {
            RoleEntry::Builtin(role) => role.disguise(),
            RoleEntry::Custom(_) => None,
        }
    }

    pub fn sees_grimoire(&self) -> bool {
        match self {
            RoleEntry::Builtin(role) => role.sees_grimoire(),
            RoleEntry::Custom(_) => false,
        }
    }
}

/// Read-only lookup over built-in plus custom roles and scripts
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    custom_roles: &'a [CustomRole],
    custom_scripts: &'a [CustomScript],
}

impl Catalog<'static> {
    /// Catalog with only the built-in editions
    pub fn builtin() -> Self {
        Self {
            custom_roles: &[],
            custom_scripts: &[],
        }
    }
}

impl<'a> Catalog<'a> {
    pub fn new(custom_roles: &'a [CustomRole], custom_scripts: &'a [CustomScript]) -> Self {
        Self {
            custom_roles,
            custom_scripts,
        }
    }

    /// Resolve a role id; built-ins win over custom roles with the same id
    pub fn role(&self, id: &str) -> Option<RoleEntry<'a>> {
        if let Some(role) = Role::from_id(id) {
            return Some(RoleEntry::Builtin(role));
        }
        self.custom_roles
            .iter()
            .find(|r| r.id == id)
            .map(RoleEntry::Custom)
    }

    /// Custom roles in the order they were imported
    pub fn custom_roles(&self) -> &'a [CustomRole] {
        self.custom_roles
    }

    pub fn team_of(&self, id: &str) -> Option<Team> {
        self.role(id).map(|r| r.team())
    }

    /// Resolve a script by id (built-in aliases accepted)
    pub fn script(&self, id: &str) -> Option<ScriptView<'a>> {
        if let Some(script) = BuiltinScript::from_name(id) {
            return Some(script.view());
        }
        self.custom_scripts
            .iter()
            .find(|s| s.id == id)
            .map(CustomScript::view)
    }

    /// Every role a script offers, resolved; unknown ids are a configuration error
    pub fn role_pool(&self, script_id: &str) -> Result<Vec<RoleEntry<'a>>> {
        let script = self
            .script(script_id)
            .ok_or_else(|| Error::ScriptNotFound(script_id.to_string()))?;

        script
            .role_ids
            .iter()
            .map(|id| {
                self.role(id).ok_or_else(|| {
                    Error::Configuration(format!(
                        "Script '{}' lists unknown role '{}'",
                        script_id, id
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: &str, team: Team) -> CustomRole {
        CustomRole {
            id: id.to_string(),
            name: id.to_string(),
            team,
            ability: String::new(),
            first_night: false,
            other_night: false,
        }
    }

    #[test]
    fn test_builtin_lookup() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.team_of("imp"), Some(Team::Demon));
        assert_eq!(catalog.team_of("saint"), Some(Team::Outsider));
        assert_eq!(catalog.team_of("nobody"), None);
    }

    #[test]
    fn test_custom_role_lookup() {
        let roles = vec![custom("hermit", Team::Outsider)];
        let catalog = Catalog::new(&roles, &[]);
        assert_eq!(catalog.team_of("hermit"), Some(Team::Outsider));
        assert!(matches!(catalog.role("hermit"), Some(RoleEntry::Custom(_))));
    }

    #[test]
    fn test_custom_cannot_shadow_builtin() {
        let roles = vec![custom("imp", Team::Townsfolk)];
        let catalog = Catalog::new(&roles, &[]);
        assert_eq!(catalog.team_of("imp"), Some(Team::Demon));
    }

    #[test]
    fn test_role_pool_for_builtin_script() {
        let pool = Catalog::builtin().role_pool("trouble_brewing").unwrap();
        assert_eq!(pool.len(), 22);
        assert_eq!(pool.iter().filter(|r| r.team() == Team::Demon).count(), 1);
    }

    #[test]
    fn test_role_pool_unknown_script() {
        let result = Catalog::builtin().role_pool("no_such_script");
        assert!(matches!(result, Err(Error::ScriptNotFound(_))));
    }

    #[test]
    fn test_team_alignment() {
        assert_eq!(Team::Outsider.alignment(), Alignment::Good);
        assert_eq!(Team::Minion.alignment(), Alignment::Evil);
        assert_eq!(Team::from_str_or_shorthand("DM"), Some(Team::Demon));
        assert_eq!(Team::from_str_or_shorthand("fabled"), None);
    }
}
