use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// A fallback may be supplied with `{{ env.VAR | default("fallback") }}`; it is
/// used only when the variable is unset. Lines whose first non-blank character
/// is `#` are copied through untouched so commented-out secrets never have to
/// resolve.
pub fn expand_env(input: &str) -> Result<String, String> {
    fn placeholder() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        // 1: dotted key, 2: optional default literal
        RE.get_or_init(|| {
            Regex::new(r#"\{\{\s*([a-zA-Z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#)
                .expect("must be valid regex")
        })
    }

    let mut output = String::with_capacity(input.len());

    for (i, line) in input.lines().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut cursor = 0;

        for captures in placeholder().captures_iter(line) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            output.push_str(&line[cursor..whole.start()]);
            output.push_str(&resolve(key.as_str(), captures.get(2).map(|m| m.as_str()))?);
            cursor = whole.end();
        }

        output.push_str(&line[cursor..]);
    }

    if input.ends_with('\n') {
        output.push('\n');
    }

    Ok(output)
}

/// Resolve a single `env.NAME` key, honouring an optional fallback
fn resolve(key: &str, fallback: Option<&str>) -> Result<String, String> {
    let Some(var_name) = key.strip_prefix("env.").filter(|rest| !rest.contains('.')) else {
        return Err(format!("only variables scoped with 'env.' are supported: `{key}`"));
    };

    match (std::env::var(var_name), fallback) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => Err(format!("environment variable not found: `{var_name}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let input = "model = \"gpt-4o\"";
        assert_eq!(expand_env(input).unwrap(), input);
    }

    #[test]
    fn api_key_from_environment() {
        temp_env::with_var("PARLEY_TEST_KEY", Some("sk-test"), || {
            let result = expand_env("api_key = \"{{ env.PARLEY_TEST_KEY }}\"").unwrap();
            assert_eq!(result, "api_key = \"sk-test\"");
        });
    }

    #[test]
    fn several_placeholders_across_lines() {
        let vars = [("PARLEY_A", Some("a-key")), ("PARLEY_B", Some("b-key"))];
        temp_env::with_vars(vars, || {
            let result = expand_env("[openai]\napi_key = \"{{ env.PARLEY_A }}\"\n[anthropic]\napi_key = \"{{env.PARLEY_B}}\"\n")
                .unwrap();
            assert_eq!(
                result,
                "[openai]\napi_key = \"a-key\"\n[anthropic]\napi_key = \"b-key\"\n"
            );
        });
    }

    #[test]
    fn unset_variable_is_an_error() {
        temp_env::with_var_unset("PARLEY_MISSING", || {
            let err = expand_env("api_key = \"{{ env.PARLEY_MISSING }}\"").unwrap_err();
            assert!(err.contains("PARLEY_MISSING"));
        });
    }

    #[test]
    fn non_env_scope_is_rejected() {
        let err = expand_env("api_key = \"{{ vault.KEY }}\"").unwrap_err();
        assert!(err.contains("only variables scoped with 'env.'"));
    }

    #[test]
    fn comment_lines_are_not_expanded() {
        temp_env::with_var_unset("PARLEY_MISSING", || {
            let input = "  # api_key = \"{{ env.PARLEY_MISSING }}\"";
            assert_eq!(expand_env(input).unwrap(), input);
        });
    }

    #[test]
    fn fallback_applies_only_when_unset() {
        temp_env::with_var_unset("PARLEY_OPTIONAL", || {
            let result = expand_env("model = \"{{ env.PARLEY_OPTIONAL | default(\"gpt-4o\") }}\"").unwrap();
            assert_eq!(result, "model = \"gpt-4o\"");
        });

        temp_env::with_var("PARLEY_OPTIONAL", Some("gpt-4o-mini"), || {
            let result = expand_env("model = \"{{ env.PARLEY_OPTIONAL | default(\"gpt-4o\") }}\"").unwrap();
            assert_eq!(result, "model = \"gpt-4o-mini\"");
        });
    }
}
