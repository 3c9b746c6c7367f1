use url::Url;
use worker::*;

use crate::config::{Config, FallbackPolicy, ResponseMode};
use crate::deeplink::{
    build_payload, direct_payload, extract_reference, payment_status, sanitize, BotUsername,
    DeepLink, PayloadOutcome, PaymentStatus, QueryParams, MAX_START_LEN, TRANSACTION_ID_PARAM,
};
use crate::templates::debug_html::{render_debug_page, DebugReport};
use crate::templates::error_html::{render_error_page, ErrorReason};
use crate::templates::redirect_html::{render_redirect_fallback, render_success_page};

/// The deep link computed for one request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub outcome: PayloadOutcome,
    /// `start` value actually sent: the verify payload, or a sanitized
    /// `payload` parameter when no `tx_ref` was given.
    pub start: Option<String>,
    pub status: Option<PaymentStatus>,
    pub target: Url,
}

impl Resolution {
    /// Telegram silently drops `start` values longer than [`MAX_START_LEN`].
    pub fn start_too_long(&self) -> bool {
        self.start.as_deref().is_some_and(|s| s.len() > MAX_START_LEN)
    }
}

pub fn resolve(params: &QueryParams, bot: &BotUsername) -> std::result::Result<Resolution, url::ParseError> {
    let outcome = build_payload(params);
    let start = match outcome {
        PayloadOutcome::MissingReference => direct_payload(params),
        _ => outcome.payload().map(str::to_string),
    };
    let link = match start.as_deref() {
        Some(payload) => DeepLink::with_start(bot, payload),
        None => DeepLink::profile(bot),
    };
    let target = link.to_url()?;

    Ok(Resolution {
        outcome,
        start,
        status: payment_status(params),
        target,
    })
}

/// Response shape chosen for a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Redirect,
    SuccessPage,
    ErrorPage(ErrorReason),
    Debug,
}

pub fn choose_reply(resolution: &Resolution, config: &Config) -> Reply {
    if config.response_mode == ResponseMode::Debug {
        return Reply::Debug;
    }
    if resolution.start.is_some() {
        return match config.response_mode {
            ResponseMode::Page => Reply::SuccessPage,
            _ => Reply::Redirect,
        };
    }
    match config.fallback {
        FallbackPolicy::Redirect => Reply::Redirect,
        FallbackPolicy::ErrorPage => Reply::ErrorPage(match resolution.outcome {
            PayloadOutcome::EmptyAfterSanitize => ErrorReason::UnusableReference,
            _ => ErrorReason::MissingReference,
        }),
    }
}

/// Status code and `Location` for a reply. Only redirects carry a `Location`.
pub fn response_parts(reply: Reply, resolution: &Resolution) -> (u16, Option<&Url>) {
    match reply {
        Reply::Redirect => (302, Some(&resolution.target)),
        Reply::SuccessPage | Reply::Debug => (200, None),
        Reply::ErrorPage(_) => (400, None),
    }
}

/// Headers sent with every HTML reply.
pub fn response_headers(location: Option<&Url>) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        ("Content-Type", "text/html; charset=utf-8".to_string()),
        ("Cache-Control", "no-store".to_string()),
    ];
    if let Some(url) = location {
        headers.push(("Location", url.to_string()));
    }
    headers
}

fn html_response(html: String, reply: Reply, resolution: &Resolution) -> Result<Response> {
    let (status, location) = response_parts(reply, resolution);
    let headers = Headers::new();
    for (name, value) in response_headers(location) {
        headers.set(name, &value)?;
    }
    Ok(Response::from_html(html)?.with_status(status).with_headers(headers))
}

fn respond(params: &QueryParams, config: &Config) -> Result<Response> {
    let resolution =
        resolve(params, &config.bot_username).map_err(|e| Error::RustError(e.to_string()))?;
    let reply = choose_reply(&resolution, config);

    console_log!(
        "[redirect] bot={} outcome={} start={:?} reply={:?} keys=[{}]",
        config.bot_username.as_str(),
        resolution.outcome.kind(),
        resolution.start,
        reply,
        params.keys().collect::<Vec<_>>().join(",")
    );
    if resolution.start_too_long() {
        console_warn!(
            "[redirect] start payload is {} chars, Telegram only delivers {}",
            resolution.start.as_deref().map_or(0, str::len),
            MAX_START_LEN
        );
    }

    let html = match reply {
        Reply::Redirect => render_redirect_fallback(&resolution.target),
        Reply::SuccessPage => render_success_page(
            &resolution.target,
            resolution.status.as_ref(),
            config.redirect_delay_secs,
        ),
        Reply::ErrorPage(reason) => render_error_page(&resolution.target, reason, params.keys()),
        Reply::Debug => {
            let raw_reference = extract_reference(params);
            let report = DebugReport {
                params: params.pairs().collect(),
                raw_reference,
                sanitized_reference: raw_reference.map(sanitize),
                transaction_id: params.first(TRANSACTION_ID_PARAM),
                status: resolution.status.as_ref(),
                outcome: &resolution.outcome,
                start: resolution.start.as_deref(),
                start_too_long: resolution.start_too_long(),
                target: resolution.target.as_str(),
            };
            render_debug_page(&report)
        }
    };

    html_response(html, reply, &resolution)
}

/// Plain 302 to the bot profile, used when building the real response failed.
fn fallback_redirect(config: &Config) -> Result<Response> {
    let url = DeepLink::profile(&config.bot_username)
        .to_url()
        .map_err(|e| Error::RustError(e.to_string()))?;
    Response::redirect(url)
}

pub fn handle(req: Request, ctx: RouteContext<Config>) -> Result<Response> {
    let config = &ctx.data;
    let result = req
        .url()
        .and_then(|url| respond(&QueryParams::from_url(&url), config));

    match result {
        Ok(response) => Ok(response),
        Err(e) => {
            console_error!("[redirect] failed to build response: {:?}", e);
            fallback_redirect(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: ResponseMode, fallback: FallbackPolicy) -> Config {
        Config {
            response_mode: mode,
            fallback,
            ..Config::default()
        }
    }

    fn resolve_query(query: &str) -> Resolution {
        resolve(&QueryParams::from_query(query), &BotUsername::default()).unwrap()
    }

    #[test]
    fn resolves_provider_redirect() {
        let r = resolve_query("status=successful&tx_ref=TX-2024+%28ref%231%29&transaction_id=4417");
        assert_eq!(r.outcome, PayloadOutcome::Success("verify_TX-2024_ref_1".to_string()));
        assert_eq!(r.status, Some(PaymentStatus::Successful));
        assert_eq!(
            r.target.as_str(),
            "https://t.me/PremiumtelenovelasBot?start=verify_TX-2024_ref_1"
        );
    }

    #[test]
    fn missing_reference_targets_bare_profile() {
        let r = resolve_query("status=successful");
        assert_eq!(r.outcome, PayloadOutcome::MissingReference);
        assert_eq!(r.start, None);
        assert_eq!(r.target.as_str(), "https://t.me/PremiumtelenovelasBot");
    }

    #[test]
    fn unusable_reference_targets_bare_profile() {
        let r = resolve_query("tx_ref=%28%29&payload=promo");
        assert_eq!(r.outcome, PayloadOutcome::EmptyAfterSanitize);
        assert_eq!(r.start, None);
        assert_eq!(r.target.as_str(), "https://t.me/PremiumtelenovelasBot");
    }

    #[test]
    fn payload_param_used_only_without_tx_ref() {
        let r = resolve_query("payload=promo+7");
        assert_eq!(r.outcome, PayloadOutcome::MissingReference);
        assert_eq!(r.start.as_deref(), Some("promo_7"));
        assert_eq!(r.target.as_str(), "https://t.me/PremiumtelenovelasBot?start=promo_7");

        let r = resolve_query("payload=promo&tx_ref=abc");
        assert_eq!(r.start.as_deref(), Some("verify_abc"));
    }

    #[test]
    fn same_query_resolves_to_same_target() {
        let a = resolve_query("tx_ref=flw-123&tx_ref=other");
        let b = resolve_query("tx_ref=flw-123");
        assert_eq!(a.target, b.target);
    }

    #[test]
    fn reply_follows_response_mode_on_success() {
        let r = resolve_query("tx_ref=abc");
        let cases = [
            (ResponseMode::Redirect, Reply::Redirect),
            (ResponseMode::Page, Reply::SuccessPage),
            (ResponseMode::Debug, Reply::Debug),
        ];
        for (mode, expected) in cases {
            assert_eq!(choose_reply(&r, &config(mode, FallbackPolicy::ErrorPage)), expected);
        }
    }

    #[test]
    fn reply_follows_fallback_policy_without_start() {
        let missing = resolve_query("");
        let unusable = resolve_query("tx_ref=___");

        let error_page = config(ResponseMode::Page, FallbackPolicy::ErrorPage);
        assert_eq!(
            choose_reply(&missing, &error_page),
            Reply::ErrorPage(ErrorReason::MissingReference)
        );
        assert_eq!(
            choose_reply(&unusable, &error_page),
            Reply::ErrorPage(ErrorReason::UnusableReference)
        );

        let redirect = config(ResponseMode::Redirect, FallbackPolicy::Redirect);
        assert_eq!(choose_reply(&missing, &redirect), Reply::Redirect);
        assert_eq!(choose_reply(&unusable, &redirect), Reply::Redirect);
    }

    #[test]
    fn redirect_reply_is_302_to_target() {
        let r = resolve_query("tx_ref=abc");
        let (status, location) = response_parts(Reply::Redirect, &r);
        assert_eq!(status, 302);
        assert_eq!(
            location.map(Url::as_str),
            Some("https://t.me/PremiumtelenovelasBot?start=verify_abc")
        );

        let missing = resolve_query("");
        let (status, location) = response_parts(Reply::Redirect, &missing);
        assert_eq!(status, 302);
        assert_eq!(location.map(Url::as_str), Some("https://t.me/PremiumtelenovelasBot"));
    }

    #[test]
    fn page_replies_have_no_location() {
        let r = resolve_query("tx_ref=abc");
        assert_eq!(response_parts(Reply::SuccessPage, &r), (200, None));
        assert_eq!(response_parts(Reply::Debug, &r), (200, None));
        assert_eq!(
            response_parts(Reply::ErrorPage(ErrorReason::MissingReference), &r),
            (400, None)
        );
        assert_eq!(
            response_parts(Reply::ErrorPage(ErrorReason::UnusableReference), &r),
            (400, None)
        );
    }

    #[test]
    fn every_reply_is_uncached_html() {
        let r = resolve_query("tx_ref=abc");
        let replies = [
            Reply::Redirect,
            Reply::SuccessPage,
            Reply::ErrorPage(ErrorReason::MissingReference),
            Reply::Debug,
        ];
        for reply in replies {
            let (_, location) = response_parts(reply, &r);
            let headers = response_headers(location);
            assert!(headers.contains(&("Cache-Control", "no-store".to_string())));
            assert!(headers.contains(&("Content-Type", "text/html; charset=utf-8".to_string())));
            assert_eq!(
                headers.iter().any(|(name, _)| *name == "Location"),
                reply == Reply::Redirect
            );
        }
    }

    #[test]
    fn flags_start_values_telegram_would_drop() {
        let exact = "a".repeat(MAX_START_LEN - "verify_".len());
        assert!(!resolve_query(&format!("tx_ref={exact}")).start_too_long());
        assert!(resolve_query(&format!("tx_ref={exact}b")).start_too_long());
        assert!(!resolve_query("").start_too_long());
    }

    #[test]
    fn debug_mode_wins_over_fallback() {
        let missing = resolve_query("");
        let debug = config(ResponseMode::Debug, FallbackPolicy::Redirect);
        assert_eq!(choose_reply(&missing, &debug), Reply::Debug);
    }
}
