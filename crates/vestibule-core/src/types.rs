use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Grid row width; every grid is a whole number of rows.
pub const ROW_WIDTH: usize = 9;
/// Maximum number of rows a grid may have.
pub const MAX_ROWS: usize = 6;
/// Largest valid grid size, also the documented fallback for invalid sizes.
pub const MAX_GRID_SIZE: usize = ROW_WIDTH * MAX_ROWS;

// ---------------------------------------------------------------------------
// ActorId
// ---------------------------------------------------------------------------

/// Opaque identifier of a connected actor, stable for the connection lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(Uuid);

impl ActorId {
    pub fn new() -> Self {
        ActorId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        ActorId(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ActorId {
    fn default() -> Self {
        ActorId::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ActorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ActorId(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// Every individually toggleable behavior of the welcome layer.
///
/// `BroadcastGreetings` is a delivery modifier rather than a pipeline step of
/// its own; `Commands` and `Handbook` have no menu toggle but keep config
/// flags like everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Greetings,
    DepartureNotices,
    FirstEncounter,
    Titles,
    Sounds,
    Effects,
    BroadcastGreetings,
    Fireworks,
    Kit,
    Commands,
    StatusBar,
    Ticker,
    Handbook,
}

impl Feature {
    pub fn all() -> &'static [Feature] {
        &[
            Feature::Greetings,
            Feature::DepartureNotices,
            Feature::FirstEncounter,
            Feature::Titles,
            Feature::Sounds,
            Feature::Effects,
            Feature::BroadcastGreetings,
            Feature::Fireworks,
            Feature::Kit,
            Feature::Commands,
            Feature::StatusBar,
            Feature::Ticker,
            Feature::Handbook,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Greetings => "greetings",
            Feature::DepartureNotices => "departure_notices",
            Feature::FirstEncounter => "first_encounter",
            Feature::Titles => "titles",
            Feature::Sounds => "sounds",
            Feature::Effects => "effects",
            Feature::BroadcastGreetings => "broadcast_greetings",
            Feature::Fireworks => "fireworks",
            Feature::Kit => "kit",
            Feature::Commands => "commands",
            Feature::StatusBar => "status_bar",
            Feature::Ticker => "ticker",
            Feature::Handbook => "handbook",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Feature {
    type Err = crate::error::VestibuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| crate::error::VestibuleError::UnknownFeature(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Icon
// ---------------------------------------------------------------------------

/// Visual token placed in a menu slot. Rendering is the UI surface's concern;
/// the core only validates names against this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    ToggleOn,
    ToggleOff,
    Gold,
    Slate,
    Scroll,
    Note,
    Mute,
    Spark,
    Ash,
    Bell,
    Bars,
    Rocket,
    Powder,
    Chest,
    Crown,
    Skull,
    Tag,
    Ledger,
    Cycle,
    Pane,
    Barrier,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::ToggleOn => "toggle_on",
            Icon::ToggleOff => "toggle_off",
            Icon::Gold => "gold",
            Icon::Slate => "slate",
            Icon::Scroll => "scroll",
            Icon::Note => "note",
            Icon::Mute => "mute",
            Icon::Spark => "spark",
            Icon::Ash => "ash",
            Icon::Bell => "bell",
            Icon::Bars => "bars",
            Icon::Rocket => "rocket",
            Icon::Powder => "powder",
            Icon::Chest => "chest",
            Icon::Crown => "crown",
            Icon::Skull => "skull",
            Icon::Tag => "tag",
            Icon::Ledger => "ledger",
            Icon::Cycle => "cycle",
            Icon::Pane => "pane",
            Icon::Barrier => "barrier",
        }
    }

    fn all() -> &'static [Icon] {
        &[
            Icon::ToggleOn,
            Icon::ToggleOff,
            Icon::Gold,
            Icon::Slate,
            Icon::Scroll,
            Icon::Note,
            Icon::Mute,
            Icon::Spark,
            Icon::Ash,
            Icon::Bell,
            Icon::Bars,
            Icon::Rocket,
            Icon::Powder,
            Icon::Chest,
            Icon::Crown,
            Icon::Skull,
            Icon::Tag,
            Icon::Ledger,
            Icon::Cycle,
            Icon::Pane,
            Icon::Barrier,
        ]
    }

    /// Look up a configured icon name, falling back to `default` with a
    /// warning when the name is unknown. The fallback is always the caller's
    /// choice; unknown names never abort anything.
    pub fn resolve(name: &str, default: Icon) -> Icon {
        match name.parse() {
            Ok(icon) => icon,
            Err(_) => {
                tracing::warn!(icon = name, fallback = default.as_str(), "unknown icon name");
                default
            }
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Icon {
    type Err = crate::error::VestibuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::all()
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| crate::error::VestibuleError::UnknownIcon(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Cue
// ---------------------------------------------------------------------------

/// Audio cue identifier handed to the UI surface or the sound renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Click,
    Sparkle,
    Chime,
    Fanfare,
}

impl Cue {
    pub fn as_str(self) -> &'static str {
        match self {
            Cue::Click => "click",
            Cue::Sparkle => "sparkle",
            Cue::Chime => "chime",
            Cue::Fanfare => "fanfare",
        }
    }

    pub fn resolve(name: &str, default: Cue) -> Cue {
        match name.parse() {
            Ok(cue) => cue,
            Err(_) => {
                tracing::warn!(cue = name, fallback = default.as_str(), "unknown audio cue");
                default
            }
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Cue {
    type Err = crate::error::VestibuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(Cue::Click),
            "sparkle" => Ok(Cue::Sparkle),
            "chime" => Ok(Cue::Chime),
            "fanfare" => Ok(Cue::Fanfare),
            _ => Err(crate::error::VestibuleError::UnknownCue(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// Particle effect identifier handed to the effect renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    Sparkles,
    Confetti,
    Embers,
    Hearts,
}

impl Effect {
    pub fn as_str(self) -> &'static str {
        match self {
            Effect::Sparkles => "sparkles",
            Effect::Confetti => "confetti",
            Effect::Embers => "embers",
            Effect::Hearts => "hearts",
        }
    }

    pub fn resolve(name: &str, default: Effect) -> Effect {
        match name.parse() {
            Ok(effect) => effect,
            Err(_) => {
                tracing::warn!(effect = name, fallback = default.as_str(), "unknown effect name");
                default
            }
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Effect {
    type Err = crate::error::VestibuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sparkles" => Ok(Effect::Sparkles),
            "confetti" => Ok(Effect::Confetti),
            "embers" => Ok(Effect::Embers),
            "hearts" => Ok(Effect::Hearts),
            _ => Err(crate::error::VestibuleError::UnknownEffect(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// KitItem
// ---------------------------------------------------------------------------

/// One item grant in the welcome kit, parsed from `"name"` or `"name:count"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitItem {
    pub name: String,
    pub count: u32,
}

impl KitItem {
    pub fn parse(spec: &str) -> crate::error::Result<KitItem> {
        let mut parts = spec.splitn(2, ':');
        let name = parts.next().unwrap_or("").trim();
        if name.is_empty() {
            return Err(crate::error::VestibuleError::InvalidKitItem(spec.to_string()));
        }
        let count = match parts.next() {
            None => 1,
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|c| *c >= 1)
                .ok_or_else(|| crate::error::VestibuleError::InvalidKitItem(spec.to_string()))?,
        };
        Ok(KitItem {
            name: name.to_string(),
            count,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
