use bytes::Bytes;
use reqwest::Url;
use tracing::debug;

use crate::config::RunConfig;
use crate::domain::On;
use crate::environment::VariableStore;
use crate::error::CallError;
use crate::http::HttpRequest;
use crate::storage;

/// Turn a declared request into a concrete one.
///
/// Header values, query values and the body have `{variable}` placeholders
/// substituted from `vars`. The URL is only resolved against the base host.
/// A `bodyFile` is read relative to the suite directory and replaces the
/// inline body; failing to read it fails the call before anything is sent.
pub fn build_request(
    on: &On,
    suite_dir: &str,
    vars: &VariableStore,
    config: &RunConfig,
) -> Result<HttpRequest, CallError> {
    let body = match on.body_file.as_deref().filter(|file| !file.is_empty()) {
        Some(file) => {
            let path = storage::asset_path(&config.suite_root, suite_dir, file);
            debug!(path = %path.display(), "reading body file");
            String::from_utf8_lossy(&storage::read_asset(&path)?).into_owned()
        }
        None => on.inline_body(),
    };

    let target = config.absolute_url(&on.url);
    let mut url = Url::parse(&target)
        .map_err(|e| CallError::Transport(format!("Invalid URL `{target}`: {e}")))?;

    if !on.params.is_empty() {
        let mut query_pairs = url.query_pairs_mut();
        for (key, value) in &on.params {
            query_pairs.append_pair(key, &vars.interpolate(value));
        }
    }

    let headers = on
        .headers
        .iter()
        .map(|(name, value)| (name.clone(), vars.interpolate(value)))
        .collect();

    Ok(HttpRequest {
        method: on.method,
        url: url.to_string(),
        headers,
        body: Bytes::from(vars.interpolate(&body)),
    })
}
