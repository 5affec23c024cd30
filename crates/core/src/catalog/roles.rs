//! Built-in role definitions
//!
//! Every built-in character is a variant of the closed [`Role`] enum.
//! Lookups by id go through [`Role::from_id`], so adding a role means
//! adding one entry to the table below.

use super::{NightWake, SetupModifier, Team};

macro_rules! define_roles {
    (
        $(
            $role:ident: $id:literal, $name:literal => {
                team: $team:ident,
                ability: $ability:literal
                $(, night: $night:ident)?
                $(, setup: $setup:expr)?
                $(, disguise: $disguise:ident)?
                $(, sees_grimoire: $sees:literal)?
            }
        ),* $(,)?
    ) => {
        /// A built-in character
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Role {
            $($role,)*
        }

        impl Role {
            /// Stable id used in game state and scripts
            pub const fn id(&self) -> &'static str {
                match self {
                    $(Role::$role => $id,)*
                }
            }

            pub const fn name(&self) -> &'static str {
                match self {
                    $(Role::$role => $name,)*
                }
            }

            pub const fn team(&self) -> Team {
                match self {
                    $(Role::$role => Team::$team,)*
                }
            }

            pub const fn ability(&self) -> &'static str {
                match self {
                    $(Role::$role => $ability,)*
                }
            }

            /// Which nights this character wakes on
            pub const fn night(&self) -> NightWake {
                match self {
                    $(Role::$role => define_roles!(@night $($night)?),)*
                }
            }

            /// Changes this character makes to the standard composition
            pub fn setup_modifier(&self) -> Option<SetupModifier> {
                match self {
                    $(Role::$role => define_roles!(@setup $($setup)?),)*
                }
            }

            /// Team the holder is told they belong to, when it differs from the truth
            pub const fn disguise(&self) -> Option<Team> {
                match self {
                    $(Role::$role => define_roles!(@disguise $($disguise)?),)*
                }
            }

            /// Whether the holder sees the whole grimoire
            pub const fn sees_grimoire(&self) -> bool {
                match self {
                    $(Role::$role => define_roles!(@sees $($sees)?),)*
                }
            }

            pub const fn all() -> &'static [Role] {
                &[$(Role::$role,)*]
            }

            /// Look up a built-in character by id
            pub fn from_id(id: &str) -> Option<Role> {
                match id {
                    $($id => Some(Role::$role),)*
                    _ => None,
                }
            }
        }
    };

    (@night $night:ident) => { NightWake::$night };
    (@night) => { NightWake::Never };

    (@setup $val:expr) => { Some($val) };
    (@setup) => { None };

    (@disguise $team:ident) => { Some(Team::$team) };
    (@disguise) => { None };

    (@sees $val:literal) => { $val };
    (@sees) => { false };
}

define_roles! {
    // Trouble Brewing: Townsfolk
    Washerwoman: "washerwoman", "Washerwoman" => {
        team: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Townsfolk.",
        night: First
    },
    Librarian: "librarian", "Librarian" => {
        team: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Outsider. (Or that zero are in play.)",
        night: First
    },
    Investigator: "investigator", "Investigator" => {
        team: Townsfolk,
        ability: "You start knowing that 1 of 2 players is a particular Minion.",
        night: First
    },
    Chef: "chef", "Chef" => {
        team: Townsfolk,
        ability: "You start knowing how many pairs of evil players there are.",
        night: First
    },
    Empath: "empath", "Empath" => {
        team: Townsfolk,
        ability: "Each night, you learn how many of your 2 alive neighbours are evil.",
        night: Both
    },
    FortuneTeller: "fortune_teller", "Fortune Teller" => {
        team: Townsfolk,
        ability: "Each night, choose 2 players: you learn if either is a Demon. There is a good player that registers as a Demon to you.",
        night: Both
    },
    Undertaker: "undertaker", "Undertaker" => {
        team: Townsfolk,
        ability: "Each night*, you learn which character died by execution today.",
        night: Other
    },
    Monk: "monk", "Monk" => {
        team: Townsfolk,
        ability: "Each night*, choose a player (not yourself): they are safe from the Demon tonight.",
        night: Other
    },
    Ravenkeeper: "ravenkeeper", "Ravenkeeper" => {
        team: Townsfolk,
        ability: "If you die at night, you are woken to choose a player: you learn their character.",
        night: Other
    },
    Virgin: "virgin", "Virgin" => {
        team: Townsfolk,
        ability: "The 1st time you are nominated, if the nominator is a Townsfolk, they are executed immediately."
    },
    Slayer: "slayer", "Slayer" => {
        team: Townsfolk,
        ability: "Once per game, during the day, publicly choose a player: if they are the Demon, they die."
    },
    Soldier: "soldier", "Soldier" => {
        team: Townsfolk,
        ability: "You are safe from the Demon."
    },
    Mayor: "mayor", "Mayor" => {
        team: Townsfolk,
        ability: "If only 3 players live & no execution occurs, your team wins. If you die at night, another player might die instead."
    },

    // Trouble Brewing: Outsiders
    Butler: "butler", "Butler" => {
        team: Outsider,
        ability: "Each night, choose a player (not yourself): tomorrow, you may only vote if they are voting too.",
        night: Both
    },
    Drunk: "drunk", "Drunk" => {
        team: Outsider,
        ability: "You do not know you are the Drunk. You think you are a Townsfolk character, but you are not.",
        disguise: Townsfolk
    },
    Recluse: "recluse", "Recluse" => {
        team: Outsider,
        ability: "You might register as evil & as a Minion or Demon, even if dead."
    },
    Saint: "saint", "Saint" => {
        team: Outsider,
        ability: "If you die by execution, your team loses."
    },

    // Trouble Brewing: Minions
    Poisoner: "poisoner", "Poisoner" => {
        team: Minion,
        ability: "Each night, choose a player: they are poisoned tonight and tomorrow day.",
        night: Both
    },
    Spy: "spy", "Spy" => {
        team: Minion,
        ability: "Each night, you see the Grimoire. You might register as good & as a Townsfolk or Outsider, even if dead.",
        night: Both,
        sees_grimoire: true
    },
    ScarletWoman: "scarlet_woman", "Scarlet Woman" => {
        team: Minion,
        ability: "If there are 5 or more players alive & the Demon dies, you become the Demon.",
        night: Other
    },
    Baron: "baron", "Baron" => {
        team: Minion,
        ability: "There are extra Outsiders in play. [+2 Outsiders]",
        setup: SetupModifier::AdjustCounts { remove_townsfolk: 2, add_outsiders: 2 }
    },

    // Trouble Brewing: Demon
    Imp: "imp", "Imp" => {
        team: Demon,
        ability: "Each night*, choose a player: they die. If you kill yourself this way, a Minion becomes the Imp.",
        night: Other
    },

    // Bad Moon Rising: Townsfolk
    Grandmother: "grandmother", "Grandmother" => {
        team: Townsfolk,
        ability: "You start knowing a good player & their character. If the Demon kills them, you die too.",
        night: Both
    },
    Sailor: "sailor", "Sailor" => {
        team: Townsfolk,
        ability: "Each night, choose an alive player: either you or they are drunk until dusk. You can't die.",
        night: Both
    },
    Chambermaid: "chambermaid", "Chambermaid" => {
        team: Townsfolk,
        ability: "Each night, choose 2 alive players (not yourself): you learn how many woke tonight due to their ability.",
        night: Both
    },
    Exorcist: "exorcist", "Exorcist" => {
        team: Townsfolk,
        ability: "Each night*, choose a player (different to last night): the Demon, if chosen, learns who you are then doesn't wake tonight.",
        night: Other
    },
    Innkeeper: "innkeeper", "Innkeeper" => {
        team: Townsfolk,
        ability: "Each night*, choose 2 players: they can't die tonight, but 1 is drunk until dusk.",
        night: Other
    },
    Gambler: "gambler", "Gambler" => {
        team: Townsfolk,
        ability: "Each night*, choose a player & guess their character: if you guess wrong, you die.",
        night: Other
    },
    Gossip: "gossip", "Gossip" => {
        team: Townsfolk,
        ability: "Each day, you may make a public statement. Tonight, if it was true, a player dies.",
        night: Other
    },
    Courtier: "courtier", "Courtier" => {
        team: Townsfolk,
        ability: "Once per game, at night, choose a character: they are drunk for 3 nights & 3 days.",
        night: Both
    },
    Professor: "professor", "Professor" => {
        team: Townsfolk,
        ability: "Once per game, at night*, choose a dead player: if they are a Townsfolk, they are resurrected.",
        night: Other
    },
    Minstrel: "minstrel", "Minstrel" => {
        team: Townsfolk,
        ability: "When a Minion dies by execution, all other players (except Travellers) are drunk until dusk tomorrow."
    },
    TeaLady: "tea_lady", "Tea Lady" => {
        team: Townsfolk,
        ability: "If both your alive neighbours are good, they can't die."
    },
    Pacifist: "pacifist", "Pacifist" => {
        team: Townsfolk,
        ability: "Executed good players might not die."
    },
    Fool: "fool", "Fool" => {
        team: Townsfolk,
        ability: "The first time you die, you don't."
    },

    // Bad Moon Rising: Outsiders
    Tinker: "tinker", "Tinker" => {
        team: Outsider,
        ability: "You might die at any time.",
        night: Other
    },
    Moonchild: "moonchild", "Moonchild" => {
        team: Outsider,
        ability: "When you learn that you died, publicly choose 1 alive player. Tonight, if it was a good player, they die.",
        night: Other
    },
    Goon: "goon", "Goon" => {
        team: Outsider,
        ability: "Each night, the 1st player to choose you with their ability is drunk until dusk. You become their alignment."
    },
    Lunatic: "lunatic", "Lunatic" => {
        team: Outsider,
        ability: "You think you are a Demon, but you are not. The Demon knows who you are & who you choose at night.",
        night: Both,
        disguise: Demon
    },

    // Bad Moon Rising: Minions
    Godfather: "godfather", "Godfather" => {
        team: Minion,
        ability: "You start knowing which Outsiders are in play. If 1 died today, choose a player tonight: they die. [-1 or +1 Outsider]",
        night: Both
    },
    DevilsAdvocate: "devils_advocate", "Devil's Advocate" => {
        team: Minion,
        ability: "Each night, choose a living player (different to last night): if executed tomorrow, they don't die.",
        night: Both
    },
    Assassin: "assassin", "Assassin" => {
        team: Minion,
        ability: "Once per game, at night*, choose a player: they die, even if for some reason they could not.",
        night: Other
    },
    Mastermind: "mastermind", "Mastermind" => {
        team: Minion,
        ability: "If the Demon dies by execution (ending the game), play for 1 more day. If a player is then executed, their team loses."
    },

    // Bad Moon Rising: Demons
    Zombuul: "zombuul", "Zombuul" => {
        team: Demon,
        ability: "Each night*, if no-one died today, choose a player: they die. The 1st time you die, you live but register as dead.",
        night: Other
    },
    Pukka: "pukka", "Pukka" => {
        team: Demon,
        ability: "Each night, choose a player: they are poisoned. The previously poisoned player dies then becomes healthy.",
        night: Both
    },
    Shabaloth: "shabaloth", "Shabaloth" => {
        team: Demon,
        ability: "Each night*, choose 2 players: they die. A dead player you chose last night might be regurgitated.",
        night: Other
    },
    Po: "po", "Po" => {
        team: Demon,
        ability: "Each night*, you may choose a player: they die. If your last choice was no-one, choose 3 players tonight.",
        night: Other
    },
}
