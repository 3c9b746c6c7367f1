use worker::*;

mod config;
mod deeplink;
mod handlers;
mod templates;
mod utils;

use crate::config::Config;

fn load_config(env: &Env) -> Config {
    let (config, errors) = Config::from_env(env);
    for e in errors {
        console_error!("[config] {}; using the default for this variable", e);
    }
    config
}

#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let config = load_config(&env);

    // Strip trailing slash (except root) and re-route the rewritten request
    let url = req.url()?;
    let path = url.path().to_string();

    if path.len() > 1 && path.ends_with('/') {
        let mut new_url = url.clone();
        new_url.set_path(path.trim_end_matches('/'));
        let new_req = Request::new_with_init(
            new_url.as_str(),
            &RequestInit {
                method: req.method(),
                headers: req.headers().clone(),
                ..Default::default()
            },
        )?;
        return build_router(config).run(new_req, env).await;
    }

    build_router(config).run(req, env).await
}

fn build_router(config: Config) -> Router<'static, Config> {
    Router::with_data(config)
        .get("/", handlers::redirect::handle)
        .get("/api/redirect", handlers::redirect::handle)
}
