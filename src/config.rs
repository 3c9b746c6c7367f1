use std::fmt;

use worker::Env;

use crate::deeplink::BotUsername;

const DEFAULT_REDIRECT_DELAY_SECS: u8 = 3;
const MAX_REDIRECT_DELAY_SECS: u8 = 30;

/// How a resolved deep link is handed back to the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// 302 with a `Location` header and a meta-refresh body.
    Redirect,
    /// 200 page that shows the payment status and redirects after a delay.
    Page,
    /// 200 page listing what was received and computed. Never redirects.
    Debug,
}

/// What to do when no usable reference was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// 400 page explaining the problem, with a link to the bot profile.
    ErrorPage,
    /// 302 straight to the bot profile.
    Redirect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBotUsername(String),
    InvalidResponseMode(String),
    InvalidFallback(String),
    InvalidRedirectDelay(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBotUsername(v) => write!(f, "BOT_USERNAME {v:?} is not a valid Telegram username"),
            ConfigError::InvalidResponseMode(v) => {
                write!(f, "RESPONSE_MODE {v:?} must be one of redirect, page, debug")
            }
            ConfigError::InvalidFallback(v) => write!(f, "FALLBACK {v:?} must be error_page or redirect"),
            ConfigError::InvalidRedirectDelay(v) => {
                write!(f, "REDIRECT_DELAY_SECS {v:?} must be a whole number from 0 to {MAX_REDIRECT_DELAY_SECS}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_username: BotUsername,
    pub response_mode: ResponseMode,
    pub fallback: FallbackPolicy,
    pub redirect_delay_secs: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bot_username: BotUsername::default(),
            response_mode: ResponseMode::Redirect,
            fallback: FallbackPolicy::ErrorPage,
            redirect_delay_secs: DEFAULT_REDIRECT_DELAY_SECS,
        }
    }
}

/// Parses one variable when it is set. Unset stays `None`.
fn parse_var<T, F>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    errors: &mut Vec<ConfigError>,
    parse: F,
) -> Option<T>
where
    F: FnOnce(String) -> Result<T, ConfigError>,
{
    match parse(lookup(name)?) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn parse_response_mode(raw: String) -> Result<ResponseMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "redirect" => Ok(ResponseMode::Redirect),
        "page" => Ok(ResponseMode::Page),
        "debug" => Ok(ResponseMode::Debug),
        _ => Err(ConfigError::InvalidResponseMode(raw)),
    }
}

fn parse_fallback(raw: String) -> Result<FallbackPolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "error_page" => Ok(FallbackPolicy::ErrorPage),
        "redirect" => Ok(FallbackPolicy::Redirect),
        _ => Err(ConfigError::InvalidFallback(raw)),
    }
}

fn parse_redirect_delay(raw: String) -> Result<u8, ConfigError> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|&secs| secs <= MAX_REDIRECT_DELAY_SECS)
        .ok_or(ConfigError::InvalidRedirectDelay(raw))
}

impl Config {
    /// Reads the Worker's `[vars]`. See [`Config::from_lookup`].
    pub fn from_env(env: &Env) -> (Self, Vec<ConfigError>) {
        Self::from_lookup(|name| env.var(name).ok().map(|v| v.to_string()))
    }

    /// Builds a config one variable at a time. Unset or invalid variables
    /// take their defaults; every invalid one is reported in the returned list.
    pub fn from_lookup<F>(lookup: F) -> (Self, Vec<ConfigError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();
        let defaults = Config::default();

        let config = Config {
            bot_username: parse_var(&lookup, "BOT_USERNAME", &mut errors, |raw| {
                BotUsername::parse(&raw).ok_or(ConfigError::InvalidBotUsername(raw))
            })
            .unwrap_or(defaults.bot_username),
            response_mode: parse_var(&lookup, "RESPONSE_MODE", &mut errors, parse_response_mode)
                .unwrap_or(defaults.response_mode),
            fallback: parse_var(&lookup, "FALLBACK", &mut errors, parse_fallback)
                .unwrap_or(defaults.fallback),
            redirect_delay_secs: parse_var(&lookup, "REDIRECT_DELAY_SECS", &mut errors, parse_redirect_delay)
                .unwrap_or(defaults.redirect_delay_secs),
        };

        (config, errors)
    }
}
