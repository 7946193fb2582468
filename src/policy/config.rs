use crate::policy::client::Client;
use crate::policy::focus::FocusPreventionLevel;
use crate::winsys::window::StateMask;
use crate::winsys::window::TypeMask;
use crate::winsys::window::Window;

use std::collections::HashMap;
use std::convert::TryFrom;
use std::time::Duration;

pub const FOCUS_PREVENTION_LEVEL: &str = "focus_prevention_level";
pub const FOCUS_PREVENTION_MATCH: &str = "focus_prevention_match";
pub const IGNORE_HINTS_WHEN_MAXIMIZED: &str = "ignore_hints_when_maximized";
pub const CLICK_TO_FOCUS: &str = "click_to_focus";
pub const SYNC_TIMEOUT_MIN: &str = "sync_timeout_min";
pub const SYNC_TIMEOUT_MAX: &str = "sync_timeout_max";
pub const PING_DELAY: &str = "ping_delay";

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Match(Match),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Match> for OptionValue {
    fn from(value: Match) -> Self {
        Self::Match(value)
    }
}

/// Read-only access to named options.
pub trait Config {
    fn lookup(
        &self,
        name: &str,
    ) -> Option<OptionValue>;
}

/// A boolean expression evaluated against a window record.
pub trait MatchPredicate {
    fn evaluate(
        &self,
        client: &Client,
    ) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    Any,
    Never,
    Window(Window),
    State(StateMask),
    Type(TypeMask),
    OverrideRedirect(bool),
    Alpha(bool),
    And(Vec<Match>),
    Or(Vec<Match>),
    Not(Box<Match>),
}

impl MatchPredicate for Match {
    fn evaluate(
        &self,
        client: &Client,
    ) -> bool {
        match self {
            Match::Any => true,
            Match::Never => false,
            Match::Window(window) => client.window() == *window,
            Match::State(state) => client.state().contains(*state),
            Match::Type(mask) => client.is_type(*mask),
            Match::OverrideRedirect(override_redirect) => {
                client.is_override_redirect() == *override_redirect
            },
            Match::Alpha(alpha) => client.has_alpha() == *alpha,
            Match::And(matches) => matches.iter().all(|m| m.evaluate(client)),
            Match::Or(matches) => matches.iter().any(|m| m.evaluate(client)),
            Match::Not(m) => !m.evaluate(client),
        }
    }
}

/// A `HashMap`-backed option store.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, OptionValue>,
}

impl MapConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) {
        self.values.insert(name.to_owned(), value.into());
    }
}

impl Config for MapConfig {
    fn lookup(
        &self,
        name: &str,
    ) -> Option<OptionValue> {
        self.values.get(name).cloned()
    }
}

/// The options the core consults, resolved once against a `Config`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub focus_prevention_level: FocusPreventionLevel,
    pub focus_prevention_match: Match,
    pub ignore_hints_when_maximized: bool,
    pub click_to_focus: bool,
    pub sync_timeout_min: Duration,
    pub sync_timeout_max: Duration,
    pub ping_delay: Duration,
}

impl Settings {
    pub const FOCUS_PREVENTION_LEVEL: FocusPreventionLevel = FocusPreventionLevel::Low;
    pub const IGNORE_HINTS_WHEN_MAXIMIZED: bool = true;
    pub const CLICK_TO_FOCUS: bool = true;
    pub const SYNC_TIMEOUT_MIN_MS: i32 = 1000;
    pub const SYNC_TIMEOUT_MAX_MS: i32 = 1200;
    pub const PING_DELAY_MS: i32 = 5000;

    pub fn load(config: &dyn Config) -> Self {
        let level = read_int(config, FOCUS_PREVENTION_LEVEL, Self::FOCUS_PREVENTION_LEVEL as i32);

        Self {
            focus_prevention_level: FocusPreventionLevel::try_from(level).unwrap_or_else(|_| {
                warn!("focus prevention level {} out of range", level);
                Self::FOCUS_PREVENTION_LEVEL
            }),
            focus_prevention_match: match config.lookup(FOCUS_PREVENTION_MATCH) {
                Some(OptionValue::Match(m)) => m,
                Some(value) => {
                    warn!("option {} is not a match: {:?}", FOCUS_PREVENTION_MATCH, value);
                    Match::Never
                },
                None => Match::Never,
            },
            ignore_hints_when_maximized: read_bool(
                config,
                IGNORE_HINTS_WHEN_MAXIMIZED,
                Self::IGNORE_HINTS_WHEN_MAXIMIZED,
            ),
            click_to_focus: read_bool(config, CLICK_TO_FOCUS, Self::CLICK_TO_FOCUS),
            sync_timeout_min: read_millis(config, SYNC_TIMEOUT_MIN, Self::SYNC_TIMEOUT_MIN_MS),
            sync_timeout_max: read_millis(config, SYNC_TIMEOUT_MAX, Self::SYNC_TIMEOUT_MAX_MS),
            ping_delay: read_millis(config, PING_DELAY, Self::PING_DELAY_MS),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load(&MapConfig::new())
    }
}

fn read_bool(
    config: &dyn Config,
    name: &str,
    default: bool,
) -> bool {
    match config.lookup(name) {
        Some(OptionValue::Bool(value)) => value,
        Some(value) => {
            warn!("option {} is not a boolean: {:?}", name, value);
            default
        },
        None => default,
    }
}

fn read_int(
    config: &dyn Config,
    name: &str,
    default: i32,
) -> i32 {
    match config.lookup(name) {
        Some(OptionValue::Int(value)) => value,
        Some(value) => {
            warn!("option {} is not an integer: {:?}", name, value);
            default
        },
        None => default,
    }
}

fn read_millis(
    config: &dyn Config,
    name: &str,
    default: i32,
) -> Duration {
    Duration::from_millis(std::cmp::max(read_int(config, name, default), 0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::winsys::connection::WindowAttributes;
    use crate::winsys::window::WindowType;

    fn dock() -> Client {
        let client = Client::new(0x400, WindowAttributes {
            override_redirect: false,
            alpha: true,
            ..Default::default()
        });

        client.set_wm_type(WindowType::Dock);
        client.set_state(StateMask::STICKY | StateMask::ABOVE);
        client.recalc_type();
        client
    }

    #[test]
    fn defaults_apply_to_empty_config() {
        let settings = Settings::default();

        assert_eq!(settings.focus_prevention_level, FocusPreventionLevel::Low);
        assert_eq!(settings.focus_prevention_match, Match::Never);
        assert!(settings.ignore_hints_when_maximized);
        assert!(settings.click_to_focus);
        assert_eq!(settings.sync_timeout_min, Duration::from_millis(1000));
        assert_eq!(settings.sync_timeout_max, Duration::from_millis(1200));
        assert_eq!(settings.ping_delay, Duration::from_millis(5000));
    }

    #[test]
    fn options_override_defaults() {
        let config = options! {
            FOCUS_PREVENTION_LEVEL => 3,
            CLICK_TO_FOCUS => false,
            SYNC_TIMEOUT_MIN => 250,
        };

        let settings = Settings::load(&config);

        assert_eq!(settings.focus_prevention_level, FocusPreventionLevel::High);
        assert!(!settings.click_to_focus);
        assert_eq!(settings.sync_timeout_min, Duration::from_millis(250));
    }

    #[test]
    fn mistyped_options_fall_back() {
        let config = options! {
            FOCUS_PREVENTION_LEVEL => 9,
            IGNORE_HINTS_WHEN_MAXIMIZED => 0,
            FOCUS_PREVENTION_MATCH => true,
        };

        let settings = Settings::load(&config);

        assert_eq!(settings.focus_prevention_level, Settings::FOCUS_PREVENTION_LEVEL);
        assert!(settings.ignore_hints_when_maximized);
        assert_eq!(settings.focus_prevention_match, Match::Never);
    }

    #[test]
    fn match_expressions() {
        let client = dock();

        assert!(Match::Any.evaluate(&client));
        assert!(!Match::Never.evaluate(&client));
        assert!(Match::Window(0x400).evaluate(&client));
        assert!(Match::State(StateMask::ABOVE).evaluate(&client));
        assert!(!Match::State(StateMask::ABOVE | StateMask::SHADED).evaluate(&client));
        assert!(Match::Type(TypeMask::DOCK_LAYER).evaluate(&client));
        assert!(Match::Alpha(true).evaluate(&client));

        let expr = Match::And(vec![
            Match::Type(TypeMask::DOCK),
            Match::Not(Box::new(Match::OverrideRedirect(true))),
        ]);
        assert!(expr.evaluate(&client));

        let expr = Match::Or(vec![Match::Never, Match::Window(0x999)]);
        assert!(!expr.evaluate(&client));
    }
}
