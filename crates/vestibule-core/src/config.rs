use crate::error::Result;
use crate::text;
use crate::types::{Cue, Effect, Feature, Icon, KitItem, MAX_GRID_SIZE, ROW_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

fn warning(warnings: &mut Vec<ConfigWarning>, message: String) {
    warnings.push(ConfigWarning {
        level: WarnLevel::Warning,
        message,
    });
}

// ---------------------------------------------------------------------------
// FeatureToggles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureToggles {
    #[serde(default = "default_true")]
    pub greetings: bool,
    #[serde(default = "default_true")]
    pub departure_notices: bool,
    #[serde(default = "default_true")]
    pub first_encounter: bool,
    #[serde(default = "default_true")]
    pub titles: bool,
    #[serde(default = "default_true")]
    pub sounds: bool,
    #[serde(default = "default_true")]
    pub effects: bool,
    #[serde(default)]
    pub broadcast_greetings: bool,
    #[serde(default)]
    pub broadcast_departures: bool,
    #[serde(default = "default_true")]
    pub fireworks: bool,
    #[serde(default = "default_true")]
    pub kit: bool,
    #[serde(default = "default_true")]
    pub commands: bool,
    #[serde(default = "default_true")]
    pub status_bar: bool,
    #[serde(default = "default_true")]
    pub ticker: bool,
    #[serde(default = "default_true")]
    pub handbook: bool,
}

fn default_true() -> bool {
    true
}

impl Default for FeatureToggles {
    fn default() -> Self {
        FeatureToggles {
            greetings: true,
            departure_notices: true,
            first_encounter: true,
            titles: true,
            sounds: true,
            effects: true,
            broadcast_greetings: false,
            broadcast_departures: false,
            fireworks: true,
            kit: true,
            commands: true,
            status_bar: true,
            ticker: true,
            handbook: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Messages {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_first_encounter_greeting")]
    pub first_encounter: String,
    #[serde(default = "default_departure")]
    pub departure: String,
    #[serde(default = "default_kit_received")]
    pub kit_received: String,
}

fn default_greeting() -> String {
    "Welcome to %server_name%, %player_name%!".to_string()
}

fn default_first_encounter_greeting() -> String {
    "Welcome %player_name% — first time on %server_name%!".to_string()
}

fn default_departure() -> String {
    "%player_name% left %server_name%.".to_string()
}

fn default_kit_received() -> String {
    "You received a welcome kit, %player_name%!".to_string()
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            greeting: default_greeting(),
            first_encounter: default_first_encounter_greeting(),
            departure: default_departure(),
            kit_received: default_kit_received(),
        }
    }
}

// ---------------------------------------------------------------------------
// Feature sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitlesConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    #[serde(default = "default_fade_in")]
    pub fade_in: u32,
    #[serde(default = "default_stay")]
    pub stay: u32,
    #[serde(default = "default_fade_out")]
    pub fade_out: u32,
}

fn default_title() -> String {
    "Welcome!".to_string()
}

fn default_subtitle() -> String {
    "Enjoy your stay, %player_name%!".to_string()
}

fn default_fade_in() -> u32 {
    10
}

fn default_stay() -> u32 {
    70
}

fn default_fade_out() -> u32 {
    20
}

impl Default for TitlesConfig {
    fn default() -> Self {
        TitlesConfig {
            title: default_title(),
            subtitle: default_subtitle(),
            fade_in: default_fade_in(),
            stay: default_stay(),
            fade_out: default_fade_out(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_arrival_cue")]
    pub cue: String,
    #[serde(default = "default_volume")]
    pub volume: f32,
    #[serde(default = "default_pitch")]
    pub pitch: f32,
    #[serde(default = "default_first_encounter_cue")]
    pub first_encounter_cue: String,
    #[serde(default = "default_volume")]
    pub first_encounter_volume: f32,
    #[serde(default = "default_pitch")]
    pub first_encounter_pitch: f32,
}

fn default_arrival_cue() -> String {
    Cue::Chime.as_str().to_string()
}

fn default_first_encounter_cue() -> String {
    Cue::Fanfare.as_str().to_string()
}

fn default_volume() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

impl Default for SoundsConfig {
    fn default() -> Self {
        SoundsConfig {
            cue: default_arrival_cue(),
            volume: default_volume(),
            pitch: default_pitch(),
            first_encounter_cue: default_first_encounter_cue(),
            first_encounter_volume: default_volume(),
            first_encounter_pitch: default_pitch(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(default = "default_effect")]
    pub effect: String,
    #[serde(default = "default_effect_count")]
    pub count: u32,
    #[serde(default = "default_first_encounter_effect")]
    pub first_encounter_effect: String,
    #[serde(default = "default_first_encounter_effect_count")]
    pub first_encounter_count: u32,
}

fn default_effect() -> String {
    Effect::Sparkles.as_str().to_string()
}

fn default_effect_count() -> u32 {
    20
}

fn default_first_encounter_effect() -> String {
    Effect::Confetti.as_str().to_string()
}

fn default_first_encounter_effect_count() -> u32 {
    50
}

impl Default for EffectsConfig {
    fn default() -> Self {
        EffectsConfig {
            effect: default_effect(),
            count: default_effect_count(),
            first_encounter_effect: default_first_encounter_effect(),
            first_encounter_count: default_first_encounter_effect_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireworksConfig {
    #[serde(default = "default_true")]
    pub first_encounter_only: bool,
    #[serde(default = "default_fireworks_delay")]
    pub delay_ticks: i64,
    #[serde(default = "default_fireworks_count")]
    pub count: u32,
    #[serde(default = "default_fireworks_power")]
    pub power: u32,
}

fn default_fireworks_delay() -> i64 {
    20
}

fn default_fireworks_count() -> u32 {
    3
}

fn default_fireworks_power() -> u32 {
    2
}

impl Default for FireworksConfig {
    fn default() -> Self {
        FireworksConfig {
            first_encounter_only: true,
            delay_ticks: default_fireworks_delay(),
            count: default_fireworks_count(),
            power: default_fireworks_power(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitConfig {
    #[serde(default = "default_true")]
    pub first_encounter_only: bool,
    #[serde(default = "default_kit_delay")]
    pub delay_ticks: i64,
    #[serde(default = "default_kit_items")]
    pub items: Vec<String>,
}

fn default_kit_delay() -> i64 {
    40
}

fn default_kit_items() -> Vec<String> {
    vec!["ration:5".to_string(), "lantern:2".to_string()]
}

impl Default for KitConfig {
    fn default() -> Self {
        KitConfig {
            first_encounter_only: true,
            delay_ticks: default_kit_delay(),
            items: default_kit_items(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default)]
    pub first_encounter_only: bool,
    #[serde(default = "default_commands_delay")]
    pub delay_ticks: i64,
    #[serde(default)]
    pub commands: Vec<String>,
    /// Used instead of `commands` for first encounters; falls back to
    /// `commands` when empty.
    #[serde(default)]
    pub first_encounter_commands: Vec<String>,
}

fn default_commands_delay() -> i64 {
    10
}

impl Default for CommandsConfig {
    fn default() -> Self {
        CommandsConfig {
            first_encounter_only: false,
            delay_ticks: default_commands_delay(),
            commands: Vec::new(),
            first_encounter_commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBarConfig {
    #[serde(default)]
    pub first_encounter_only: bool,
    #[serde(default = "default_status_bar_message")]
    pub message: String,
    #[serde(default = "default_status_bar_duration")]
    pub duration_ticks: u64,
}

fn default_status_bar_message() -> String {
    "Welcome %player_name% to %server_name%!".to_string()
}

fn default_status_bar_duration() -> u64 {
    100
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        StatusBarConfig {
            first_encounter_only: false,
            message: default_status_bar_message(),
            duration_ticks: default_status_bar_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    #[serde(default)]
    pub first_encounter_only: bool,
    #[serde(default = "default_ticker_message")]
    pub message: String,
    #[serde(default = "default_ticker_delay")]
    pub delay_ticks: i64,
    #[serde(default = "default_ticker_duration")]
    pub duration_ticks: u64,
}

fn default_ticker_message() -> String {
    "Welcome! Ask an operator if you need help.".to_string()
}

fn default_ticker_delay() -> i64 {
    30
}

fn default_ticker_duration() -> u64 {
    60
}

impl Default for TickerConfig {
    fn default() -> Self {
        TickerConfig {
            first_encounter_only: false,
            message: default_ticker_message(),
            delay_ticks: default_ticker_delay(),
            duration_ticks: default_ticker_duration(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandbookConfig {
    #[serde(default = "default_true")]
    pub first_encounter_only: bool,
    #[serde(default = "default_handbook_title")]
    pub title: String,
    #[serde(default = "default_handbook_author")]
    pub author: String,
    #[serde(default)]
    pub pages: Vec<String>,
}

fn default_handbook_title() -> String {
    "Welcome to %server_name%!".to_string()
}

fn default_handbook_author() -> String {
    "Server Staff".to_string()
}

impl Default for HandbookConfig {
    fn default() -> Self {
        HandbookConfig {
            first_encounter_only: true,
            title: default_handbook_title(),
            author: default_handbook_author(),
            pages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// FeedConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Store capacity `C`; independent of `display_count`.
    #[serde(default = "default_feed_capacity")]
    pub capacity: usize,
    /// How many entries the menu shows.
    #[serde(default = "default_feed_display_count")]
    pub display_count: usize,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_join_label")]
    pub join_label: String,
    #[serde(default = "default_leave_label")]
    pub leave_label: String,
    #[serde(default = "default_feed_header")]
    pub header: String,
    #[serde(default = "default_feed_empty_message")]
    pub empty_message: String,
    #[serde(default = "default_feed_refresh_hint")]
    pub refresh_hint: String,
    #[serde(default = "default_feed_entry_format")]
    pub entry_format: String,
}

fn default_feed_capacity() -> usize {
    10
}

fn default_feed_display_count() -> usize {
    5
}

fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

fn default_join_label() -> String {
    "joined".to_string()
}

fn default_leave_label() -> String {
    "left".to_string()
}

fn default_feed_header() -> String {
    "Recent server activity:".to_string()
}

fn default_feed_empty_message() -> String {
    "No recent activity".to_string()
}

fn default_feed_refresh_hint() -> String {
    "Click to refresh".to_string()
}

fn default_feed_entry_format() -> String {
    "[%time%] %player% %action%".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            enabled: true,
            capacity: default_feed_capacity(),
            display_count: default_feed_display_count(),
            time_format: default_time_format(),
            join_label: default_join_label(),
            leave_label: default_leave_label(),
            header: default_feed_header(),
            empty_message: default_feed_empty_message(),
            refresh_hint: default_feed_refresh_hint(),
            entry_format: default_feed_entry_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// CueConfig (menu click feedback)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueConfig {
    #[serde(default = "default_click_cue")]
    pub click: String,
    #[serde(default = "default_volume")]
    pub click_volume: f32,
    #[serde(default = "default_pitch")]
    pub click_pitch: f32,
    #[serde(default = "default_refresh_cue")]
    pub refresh: String,
    #[serde(default = "default_refresh_volume")]
    pub refresh_volume: f32,
    #[serde(default = "default_refresh_pitch")]
    pub refresh_pitch: f32,
}

fn default_click_cue() -> String {
    Cue::Click.as_str().to_string()
}

fn default_refresh_cue() -> String {
    Cue::Sparkle.as_str().to_string()
}

fn default_refresh_volume() -> f32 {
    0.5
}

fn default_refresh_pitch() -> f32 {
    1.5
}

impl Default for CueConfig {
    fn default() -> Self {
        CueConfig {
            click: default_click_cue(),
            click_volume: default_volume(),
            click_pitch: default_pitch(),
            refresh: default_refresh_cue(),
            refresh_volume: default_refresh_volume(),
            refresh_pitch: default_refresh_pitch(),
        }
    }
}

// ---------------------------------------------------------------------------
// Menu configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleConfig {
    pub slot: usize,
    pub icon_enabled: String,
    pub icon_disabled: String,
    pub label: String,
    #[serde(default)]
    pub detail: Vec<String>,
}

fn toggle(slot: usize, on: Icon, off: Icon, label: &str, detail: &[&str]) -> ToggleConfig {
    ToggleConfig {
        slot,
        icon_enabled: on.as_str().to_string(),
        icon_disabled: off.as_str().to_string(),
        label: label.to_string(),
        detail: detail.iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleTable {
    #[serde(default = "default_greetings_toggle")]
    pub greetings: ToggleConfig,
    #[serde(default = "default_departure_toggle")]
    pub departure_notices: ToggleConfig,
    #[serde(default = "default_first_encounter_toggle")]
    pub first_encounter: ToggleConfig,
    #[serde(default = "default_titles_toggle")]
    pub titles: ToggleConfig,
    #[serde(default = "default_sounds_toggle")]
    pub sounds: ToggleConfig,
    #[serde(default = "default_effects_toggle")]
    pub effects: ToggleConfig,
    #[serde(default = "default_broadcast_toggle")]
    pub broadcast_greetings: ToggleConfig,
    #[serde(default = "default_fireworks_toggle")]
    pub fireworks: ToggleConfig,
    #[serde(default = "default_kit_toggle")]
    pub kit: ToggleConfig,
    #[serde(default = "default_status_bar_toggle")]
    pub status_bar: ToggleConfig,
    #[serde(default = "default_ticker_toggle")]
    pub ticker: ToggleConfig,
}

fn default_greetings_toggle() -> ToggleConfig {
    toggle(20, Icon::ToggleOn, Icon::ToggleOff, "Greeting messages", &[
        "Greets every actor who arrives.",
    ])
}

fn default_departure_toggle() -> ToggleConfig {
    toggle(21, Icon::ToggleOn, Icon::ToggleOff, "Departure notices", &[
        "Announces actors leaving.",
    ])
}

fn default_first_encounter_toggle() -> ToggleConfig {
    toggle(22, Icon::Gold, Icon::Slate, "First-encounter greeting", &[
        "Extra greeting for brand-new actors.",
    ])
}

fn default_titles_toggle() -> ToggleConfig {
    toggle(23, Icon::Scroll, Icon::Barrier, "Welcome titles", &[
        "Title overlay on arrival.",
    ])
}

fn default_sounds_toggle() -> ToggleConfig {
    toggle(24, Icon::Note, Icon::Mute, "Welcome sounds", &[
        "Audio cue on arrival.",
    ])
}

fn default_effects_toggle() -> ToggleConfig {
    toggle(29, Icon::Spark, Icon::Ash, "Welcome effects", &[
        "Particle burst on arrival.",
    ])
}

fn default_broadcast_toggle() -> ToggleConfig {
    toggle(30, Icon::Bell, Icon::Bars, "Broadcast greetings", &[
        "Send greetings to everyone",
        "instead of only the arriving actor.",
    ])
}

fn default_fireworks_toggle() -> ToggleConfig {
    toggle(31, Icon::Rocket, Icon::Powder, "Welcome fireworks", &[
        "Firework burst after arrival.",
    ])
}

fn default_kit_toggle() -> ToggleConfig {
    toggle(32, Icon::Chest, Icon::Barrier, "Welcome kit", &[
        "Starter items for new actors.",
    ])
}

fn default_status_bar_toggle() -> ToggleConfig {
    toggle(33, Icon::Crown, Icon::Skull, "Status bar", &[
        "Timed banner across the screen.",
    ])
}

fn default_ticker_toggle() -> ToggleConfig {
    toggle(40, Icon::Tag, Icon::Barrier, "Ticker message", &[
        "Marquee above the action row.",
    ])
}

impl Default for ToggleTable {
    fn default() -> Self {
        ToggleTable {
            greetings: default_greetings_toggle(),
            departure_notices: default_departure_toggle(),
            first_encounter: default_first_encounter_toggle(),
            titles: default_titles_toggle(),
            sounds: default_sounds_toggle(),
            effects: default_effects_toggle(),
            broadcast_greetings: default_broadcast_toggle(),
            fireworks: default_fireworks_toggle(),
            kit: default_kit_toggle(),
            status_bar: default_status_bar_toggle(),
            ticker: default_ticker_toggle(),
        }
    }
}

impl ToggleTable {
    /// The features that carry a menu toggle, in declared composition order.
    pub const FEATURES: [Feature; 11] = [
        Feature::Greetings,
        Feature::DepartureNotices,
        Feature::FirstEncounter,
        Feature::Titles,
        Feature::Sounds,
        Feature::Effects,
        Feature::BroadcastGreetings,
        Feature::Fireworks,
        Feature::Kit,
        Feature::StatusBar,
        Feature::Ticker,
    ];

    pub fn get(&self, feature: Feature) -> Option<&ToggleConfig> {
        match feature {
            Feature::Greetings => Some(&self.greetings),
            Feature::DepartureNotices => Some(&self.departure_notices),
            Feature::FirstEncounter => Some(&self.first_encounter),
            Feature::Titles => Some(&self.titles),
            Feature::Sounds => Some(&self.sounds),
            Feature::Effects => Some(&self.effects),
            Feature::BroadcastGreetings => Some(&self.broadcast_greetings),
            Feature::Fireworks => Some(&self.fireworks),
            Feature::Kit => Some(&self.kit),
            Feature::StatusBar => Some(&self.status_bar),
            Feature::Ticker => Some(&self.ticker),
            Feature::Commands | Feature::Handbook => None,
        }
    }

    fn get_mut(&mut self, feature: Feature) -> Option<&mut ToggleConfig> {
        match feature {
            Feature::Greetings => Some(&mut self.greetings),
            Feature::DepartureNotices => Some(&mut self.departure_notices),
            Feature::FirstEncounter => Some(&mut self.first_encounter),
            Feature::Titles => Some(&mut self.titles),
            Feature::Sounds => Some(&mut self.sounds),
            Feature::Effects => Some(&mut self.effects),
            Feature::BroadcastGreetings => Some(&mut self.broadcast_greetings),
            Feature::Fireworks => Some(&mut self.fireworks),
            Feature::Kit => Some(&mut self.kit),
            Feature::StatusBar => Some(&mut self.status_bar),
            Feature::Ticker => Some(&mut self.ticker),
            Feature::Commands | Feature::Handbook => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadButtonConfig {
    #[serde(default = "default_reload_slot")]
    pub slot: usize,
    #[serde(default = "default_reload_icon")]
    pub icon: String,
    #[serde(default = "default_reload_label")]
    pub label: String,
    #[serde(default = "default_reload_detail")]
    pub detail: Vec<String>,
}

fn default_reload_slot() -> usize {
    53
}

fn default_reload_icon() -> String {
    Icon::Cycle.as_str().to_string()
}

fn default_reload_label() -> String {
    "Reload configuration".to_string()
}

fn default_reload_detail() -> Vec<String> {
    vec![
        "Reloads the configuration file".to_string(),
        "without a restart.".to_string(),
    ]
}

impl Default for ReloadButtonConfig {
    fn default() -> Self {
        ReloadButtonConfig {
            slot: default_reload_slot(),
            icon: default_reload_icon(),
            label: default_reload_label(),
            detail: default_reload_detail(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    #[serde(default = "default_menu_title")]
    pub title: String,
    /// Must be a positive multiple of the row width, at most six rows.
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_feed_slot")]
    pub feed_slot: usize,
    #[serde(default = "default_feed_icon")]
    pub feed_icon: String,
    #[serde(default = "default_feed_label")]
    pub feed_label: String,
    #[serde(default)]
    pub reload: ReloadButtonConfig,
    #[serde(default = "default_filler_icon")]
    pub filler_icon: String,
    #[serde(default)]
    pub toggles: ToggleTable,
}

fn default_menu_title() -> String {
    "Welcome Setup".to_string()
}

fn default_grid_size() -> usize {
    MAX_GRID_SIZE
}

fn default_feed_slot() -> usize {
    13
}

fn default_feed_icon() -> String {
    Icon::Ledger.as_str().to_string()
}

fn default_feed_label() -> String {
    "Live Feed".to_string()
}

fn default_filler_icon() -> String {
    Icon::Pane.as_str().to_string()
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            title: default_menu_title(),
            grid_size: default_grid_size(),
            feed_slot: default_feed_slot(),
            feed_icon: default_feed_icon(),
            feed_label: default_feed_label(),
            reload: ReloadButtonConfig::default(),
            filler_icon: default_filler_icon(),
            toggles: ToggleTable::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// WelcomeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeConfig {
    #[serde(default = "default_server_name")]
    pub server_name: String,
    /// Ticks between an arrival trigger and the welcome pipeline run.
    #[serde(default)]
    pub arrival_delay_ticks: i64,
    #[serde(default)]
    pub features: FeatureToggles,
    #[serde(default)]
    pub messages: Messages,
    #[serde(default)]
    pub titles: TitlesConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub fireworks: FireworksConfig,
    #[serde(default)]
    pub kit: KitConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub status_bar: StatusBarConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub handbook: HandbookConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub cues: CueConfig,
    #[serde(default)]
    pub menu: MenuConfig,
}

fn default_server_name() -> String {
    "Server".to_string()
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        WelcomeConfig {
            server_name: default_server_name(),
            arrival_delay_ticks: 0,
            features: FeatureToggles::default(),
            messages: Messages::default(),
            titles: TitlesConfig::default(),
            sounds: SoundsConfig::default(),
            effects: EffectsConfig::default(),
            fireworks: FireworksConfig::default(),
            kit: KitConfig::default(),
            commands: CommandsConfig::default(),
            status_bar: StatusBarConfig::default(),
            ticker: TickerConfig::default(),
            handbook: HandbookConfig::default(),
            feed: FeedConfig::default(),
            cues: CueConfig::default(),
            menu: MenuConfig::default(),
        }
    }
}

impl WelcomeConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: WelcomeConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn feature_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::Greetings => self.features.greetings,
            Feature::DepartureNotices => self.features.departure_notices,
            Feature::FirstEncounter => self.features.first_encounter,
            Feature::Titles => self.features.titles,
            Feature::Sounds => self.features.sounds,
            Feature::Effects => self.features.effects,
            Feature::BroadcastGreetings => self.features.broadcast_greetings,
            Feature::Fireworks => self.features.fireworks,
            Feature::Kit => self.features.kit,
            Feature::Commands => self.features.commands,
            Feature::StatusBar => self.features.status_bar,
            Feature::Ticker => self.features.ticker,
            Feature::Handbook => self.features.handbook,
        }
    }

    pub fn set_feature_enabled(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::Greetings => self.features.greetings = enabled,
            Feature::DepartureNotices => self.features.departure_notices = enabled,
            Feature::FirstEncounter => self.features.first_encounter = enabled,
            Feature::Titles => self.features.titles = enabled,
            Feature::Sounds => self.features.sounds = enabled,
            Feature::Effects => self.features.effects = enabled,
            Feature::BroadcastGreetings => self.features.broadcast_greetings = enabled,
            Feature::Fireworks => self.features.fireworks = enabled,
            Feature::Kit => self.features.kit = enabled,
            Feature::Commands => self.features.commands = enabled,
            Feature::StatusBar => self.features.status_bar = enabled,
            Feature::Ticker => self.features.ticker = enabled,
            Feature::Handbook => self.features.handbook = enabled,
        }
    }

    /// Correct every out-of-range or unknown value to its documented default
    /// and report what was changed. Call once after loading; afterwards the
    /// config is safe to use without per-read validation.
    pub fn normalize(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let grid = self.menu.grid_size;
        if grid < ROW_WIDTH || grid > MAX_GRID_SIZE || grid % ROW_WIDTH != 0 {
            warning(
                &mut warnings,
                format!(
                    "menu.grid_size {grid} must be a multiple of {ROW_WIDTH} between \
                     {ROW_WIDTH} and {MAX_GRID_SIZE}; using {MAX_GRID_SIZE}"
                ),
            );
            self.menu.grid_size = MAX_GRID_SIZE;
        }

        if self.feed.capacity < 1 {
            warning(&mut warnings, "feed.capacity must be at least 1; using 1".to_string());
            self.feed.capacity = 1;
        }
        if self.feed.display_count < 1 {
            warning(
                &mut warnings,
                "feed.display_count must be at least 1; using 1".to_string(),
            );
            self.feed.display_count = 1;
        }
        if !text::time_format_is_valid(&self.feed.time_format) {
            warning(
                &mut warnings,
                format!(
                    "feed.time_format '{}' is not a valid pattern; using {}",
                    self.feed.time_format,
                    default_time_format()
                ),
            );
            self.feed.time_format = default_time_format();
        }
        if self.feed.join_label.is_empty() {
            warning(&mut warnings, "feed.join_label is empty; using 'joined'".to_string());
            self.feed.join_label = default_join_label();
        }
        if self.feed.leave_label.is_empty() {
            warning(&mut warnings, "feed.leave_label is empty; using 'left'".to_string());
            self.feed.leave_label = default_leave_label();
        }

        for (name, delay) in [
            ("arrival_delay_ticks", &mut self.arrival_delay_ticks),
            ("fireworks.delay_ticks", &mut self.fireworks.delay_ticks),
            ("kit.delay_ticks", &mut self.kit.delay_ticks),
            ("commands.delay_ticks", &mut self.commands.delay_ticks),
            ("ticker.delay_ticks", &mut self.ticker.delay_ticks),
        ] {
            if *delay < 0 {
                warning(&mut warnings, format!("{name} cannot be negative; using 0"));
                *delay = 0;
            }
        }

        self.normalize_resource_names(&mut warnings);
        self.normalize_slots(&mut warnings);

        warnings
    }

    fn normalize_resource_names(&mut self, warnings: &mut Vec<ConfigWarning>) {
        let mut fix = |field: &str, value: &mut String, fallback: String, known: bool| {
            if !known {
                warning(warnings, format!("{field} '{value}' is unknown; using '{fallback}'"));
                *value = fallback;
            }
        };

        let ok = self.sounds.cue.parse::<Cue>().is_ok();
        fix("sounds.cue", &mut self.sounds.cue, default_arrival_cue(), ok);
        let ok = self.sounds.first_encounter_cue.parse::<Cue>().is_ok();
        fix(
            "sounds.first_encounter_cue",
            &mut self.sounds.first_encounter_cue,
            default_first_encounter_cue(),
            ok,
        );
        let ok = self.effects.effect.parse::<Effect>().is_ok();
        fix("effects.effect", &mut self.effects.effect, default_effect(), ok);
        let ok = self.effects.first_encounter_effect.parse::<Effect>().is_ok();
        fix(
            "effects.first_encounter_effect",
            &mut self.effects.first_encounter_effect,
            default_first_encounter_effect(),
            ok,
        );
        let ok = self.cues.click.parse::<Cue>().is_ok();
        fix("cues.click", &mut self.cues.click, default_click_cue(), ok);
        let ok = self.cues.refresh.parse::<Cue>().is_ok();
        fix("cues.refresh", &mut self.cues.refresh, default_refresh_cue(), ok);
        let ok = self.menu.feed_icon.parse::<Icon>().is_ok();
        fix("menu.feed_icon", &mut self.menu.feed_icon, default_feed_icon(), ok);
        let ok = self.menu.filler_icon.parse::<Icon>().is_ok();
        fix("menu.filler_icon", &mut self.menu.filler_icon, default_filler_icon(), ok);
        let ok = self.menu.reload.icon.parse::<Icon>().is_ok();
        fix("menu.reload.icon", &mut self.menu.reload.icon, default_reload_icon(), ok);

        let defaults = ToggleTable::default();
        for feature in ToggleTable::FEATURES {
            let fallback = defaults.get(feature).map(|t| {
                (t.icon_enabled.clone(), t.icon_disabled.clone())
            });
            let Some(tc) = self.menu.toggles.get_mut(feature) else {
                continue;
            };
            let Some((fallback_on, fallback_off)) = fallback else {
                continue;
            };
            if tc.icon_enabled.parse::<Icon>().is_err() {
                warning(
                    warnings,
                    format!(
                        "menu.toggles.{feature}.icon_enabled '{}' is unknown; using '{fallback_on}'",
                        tc.icon_enabled
                    ),
                );
                tc.icon_enabled = fallback_on;
            }
            if tc.icon_disabled.parse::<Icon>().is_err() {
                warning(
                    warnings,
                    format!(
                        "menu.toggles.{feature}.icon_disabled '{}' is unknown; using '{fallback_off}'",
                        tc.icon_disabled
                    ),
                );
                tc.icon_disabled = fallback_off;
            }
        }

        for item in &self.kit.items {
            if let Err(err) = KitItem::parse(item) {
                warning(warnings, format!("kit.items: {err}; the item will be skipped"));
            }
        }
    }

    fn normalize_slots(&mut self, warnings: &mut Vec<ConfigWarning>) {
        let grid = self.menu.grid_size;
        for feature in ToggleTable::FEATURES {
            if let Some(tc) = self.menu.toggles.get(feature) {
                if tc.slot >= grid {
                    warning(
                        warnings,
                        format!(
                            "menu.toggles.{feature}.slot {} is outside the {grid}-slot grid; \
                             the toggle will not be shown",
                            tc.slot
                        ),
                    );
                }
            }
        }
        if self.menu.feed_slot >= grid {
            warning(
                warnings,
                format!(
                    "menu.feed_slot {} is outside the {grid}-slot grid; the feed will not be shown",
                    self.menu.feed_slot
                ),
            );
        }
        if self.menu.reload.slot >= grid {
            warning(
                warnings,
                format!(
                    "menu.reload.slot {} is outside the {grid}-slot grid; \
                     the reload button will not be shown",
                    self.menu.reload.slot
                ),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_normalizes_clean() {
        let mut config = WelcomeConfig::default();
        assert!(config.normalize().is_empty());
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: WelcomeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.menu.grid_size, 54);
        assert_eq!(config.menu.feed_slot, 13);
        assert_eq!(config.menu.reload.slot, 53);
        assert!(config.features.greetings);
        assert!(!config.features.broadcast_greetings);
    }

    #[test]
    fn invalid_grid_size_corrected_with_warning() {
        let mut config = WelcomeConfig::default();
        config.menu.grid_size = 50;
        let warnings = config.normalize();
        assert_eq!(config.menu.grid_size, 54);
        assert!(warnings.iter().any(|w| w.message.contains("grid_size")));
    }

    #[test]
    fn zero_counts_clamped_to_one() {
        let mut config = WelcomeConfig::default();
        config.feed.capacity = 0;
        config.feed.display_count = 0;
        let warnings = config.normalize();
        assert_eq!(config.feed.capacity, 1);
        assert_eq!(config.feed.display_count, 1);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn negative_delays_corrected() {
        let mut config = WelcomeConfig::default();
        config.arrival_delay_ticks = -7;
        config.kit.delay_ticks = -1;
        config.normalize();
        assert_eq!(config.arrival_delay_ticks, 0);
        assert_eq!(config.kit.delay_ticks, 0);
    }

    #[test]
    fn unknown_resource_names_fall_back() {
        let mut config = WelcomeConfig::default();
        config.sounds.cue = "kazoo".to_string();
        config.menu.toggles.kit.icon_enabled = "crate".to_string();
        let warnings = config.normalize();
        assert_eq!(config.sounds.cue, "chime");
        assert_eq!(config.menu.toggles.kit.icon_enabled, "chest");
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn bad_time_format_falls_back() {
        let mut config = WelcomeConfig::default();
        config.feed.time_format = "%Q%Q".to_string();
        config.normalize();
        assert_eq!(config.feed.time_format, "%H:%M:%S");
    }

    #[test]
    fn out_of_grid_slot_warns_but_keeps_value() {
        let mut config = WelcomeConfig::default();
        config.menu.toggles.ticker.slot = 60;
        let warnings = config.normalize();
        assert!(warnings.iter().any(|w| w.message.contains("ticker")));
        assert_eq!(config.menu.toggles.ticker.slot, 60);
    }

    #[test]
    fn feature_toggle_round_trip() {
        let mut config = WelcomeConfig::default();
        assert!(config.feature_enabled(Feature::Fireworks));
        config.set_feature_enabled(Feature::Fireworks, false);
        assert!(!config.feature_enabled(Feature::Fireworks));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("welcome.yml");
        let mut config = WelcomeConfig::default();
        config.server_name = "Hub".to_string();
        config.set_feature_enabled(Feature::Kit, false);
        config.save(&path).unwrap();

        let loaded = WelcomeConfig::load(&path).unwrap();
        assert_eq!(loaded.server_name, "Hub");
        assert!(!loaded.feature_enabled(Feature::Kit));
    }
}
