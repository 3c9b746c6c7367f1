use std::fmt;

use url::Url;

const TELEGRAM_BASE: &str = "https://t.me/";
const DEFAULT_BOT_USERNAME: &str = "PremiumtelenovelasBot";

/// Longest `start` value Telegram will deliver to a bot.
pub const MAX_START_LEN: usize = 64;

/// A validated Telegram bot username, stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotUsername(String);

impl BotUsername {
    /// Accepts `name` or `@name`. Telegram usernames are 5-32 characters of
    /// ASCII letters, digits and `_`, starting with a letter.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        let name = name.strip_prefix('@').unwrap_or(name);
        let valid_len = (5..=32).contains(&name.len());
        let valid_chars = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());

        if valid_len && valid_chars && starts_with_letter {
            Some(BotUsername(name.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BotUsername {
    fn default() -> Self {
        BotUsername(DEFAULT_BOT_USERNAME.to_string())
    }
}

impl fmt::Display for BotUsername {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the browser is sent: the bot profile, optionally with a `start` payload.
#[derive(Debug, Clone)]
pub struct DeepLink<'a> {
    bot: &'a BotUsername,
    start: Option<&'a str>,
}

impl<'a> DeepLink<'a> {
    /// Bare profile link with no `start` parameter.
    pub fn profile(bot: &'a BotUsername) -> Self {
        DeepLink { bot, start: None }
    }

    pub fn with_start(bot: &'a BotUsername, payload: &'a str) -> Self {
        DeepLink { bot, start: Some(payload) }
    }

    pub fn to_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("{}{}", TELEGRAM_BASE, self.bot.as_str()))?;
        if let Some(payload) = self.start {
            url.query_pairs_mut().append_pair("start", payload);
        }
        Ok(url)
    }
}
