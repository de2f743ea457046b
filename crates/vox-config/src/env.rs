use std::sync::OnceLock;

use regex::Regex;

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `{{ env.VAR }}` with an optional `| default("fallback")` clause
    RE.get_or_init(|| {
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
            .expect("must be valid regex")
    })
}

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// A placeholder without a `default("...")` clause fails when the
/// variable is unset; with one, the fallback is substituted instead.
pub fn expand_env(input: &str) -> Result<String, String> {
    let mut output = String::with_capacity(input.len());
    let mut last_end = 0;

    for captures in placeholder().captures_iter(input) {
        let whole = captures.get(0).expect("capture 0 always present");
        let var_name = &captures[1];
        let fallback = captures.get(2).map(|m| m.as_str());

        output.push_str(&input[last_end..whole.start()]);

        match std::env::var(var_name) {
            Ok(value) => output.push_str(&value),
            Err(_) => match fallback {
                Some(default) => output.push_str(default),
                None => return Err(format!("environment variable not found: `{var_name}`")),
            },
        }

        last_end = whole.end();
    }

    output.push_str(&input[last_end..]);
    Ok(output)
}
