//! Script definitions

use serde::{Deserialize, Serialize};

use super::Role;

/// A documented rules interaction between two characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jinx {
    pub role_a: String,
    pub role_b: String,
    pub reason: String,
    /// Both characters may not be drawn into the same game
    #[serde(default)]
    pub setup_forbidden: bool,
}

impl Jinx {
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.role_a == a && self.role_b == b) || (self.role_a == b && self.role_b == a)
    }
}

/// A user-authored script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomScript {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub roles: Vec<String>,
    #[serde(default)]
    pub jinxes: Vec<Jinx>,
}

impl CustomScript {
    pub fn view(&self) -> ScriptView<'_> {
        ScriptView {
            id: &self.id,
            name: &self.name,
            role_ids: self.roles.iter().map(String::as_str).collect(),
            jinxes: &self.jinxes,
        }
    }
}

/// Borrowed view over a built-in or custom script
#[derive(Debug, Clone)]
pub struct ScriptView<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub role_ids: Vec<&'a str>,
    pub jinxes: &'a [Jinx],
}

/// Editions shipped with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScript {
    TroubleBrewing,
    BadMoonRising,
}

const TROUBLE_BREWING: &[Role] = &[
    Role::Washerwoman,
    Role::Librarian,
    Role::Investigator,
    Role::Chef,
    Role::Empath,
    Role::FortuneTeller,
    Role::Undertaker,
    Role::Monk,
    Role::Ravenkeeper,
    Role::Virgin,
    Role::Slayer,
    Role::Soldier,
    Role::Mayor,
    Role::Butler,
    Role::Drunk,
    Role::Recluse,
    Role::Saint,
    Role::Poisoner,
    Role::Spy,
    Role::ScarletWoman,
    Role::Baron,
    Role::Imp,
];

const BAD_MOON_RISING: &[Role] = &[
    Role::Grandmother,
    Role::Sailor,
    Role::Chambermaid,
    Role::Exorcist,
    Role::Innkeeper,
    Role::Gambler,
    Role::Gossip,
    Role::Courtier,
    Role::Professor,
    Role::Minstrel,
    Role::TeaLady,
    Role::Pacifist,
    Role::Fool,
    Role::Tinker,
    Role::Moonchild,
    Role::Goon,
    Role::Lunatic,
    Role::Godfather,
    Role::DevilsAdvocate,
    Role::Assassin,
    Role::Mastermind,
    Role::Zombuul,
    Role::Pukka,
    Role::Shabaloth,
    Role::Po,
];

impl BuiltinScript {
    pub const fn id(&self) -> &'static str {
        match self {
            BuiltinScript::TroubleBrewing => "trouble_brewing",
            BuiltinScript::BadMoonRising => "bad_moon_rising",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            BuiltinScript::TroubleBrewing => "Trouble Brewing",
            BuiltinScript::BadMoonRising => "Bad Moon Rising",
        }
    }

    pub const fn roles(&self) -> &'static [Role] {
        match self {
            BuiltinScript::TroubleBrewing => TROUBLE_BREWING,
            BuiltinScript::BadMoonRising => BAD_MOON_RISING,
        }
    }

    pub const fn all() -> &'static [BuiltinScript] {
        &[BuiltinScript::TroubleBrewing, BuiltinScript::BadMoonRising]
    }

    /// Accepts ids, display names and short aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(&[' ', '-', '_'][..], "").as_str() {
            "troublebrewing" | "tb" => Some(BuiltinScript::TroubleBrewing),
            "badmoonrising" | "bmr" => Some(BuiltinScript::BadMoonRising),
            _ => None,
        }
    }

    pub fn view(&self) -> ScriptView<'static> {
        ScriptView {
            id: self.id(),
            name: self.name(),
            role_ids: self.roles().iter().map(|r| r.id()).collect(),
            jinxes: &[],
        }
    }
}
