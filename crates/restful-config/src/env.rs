use std::sync::LazyLock;

use regex::Regex;

/// `{{ env.VAR }}` or `{{ env.VAR | default("fallback") }}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*([A-Za-z0-9_.]+)\s*(?:\|\s*default\("([^"]*)"\))?\s*\}\}"#).expect("valid placeholder regex")
});

/// Substitute environment placeholders in raw config text
///
/// Runs before TOML parsing, so config structs only ever see plain strings.
/// Comment lines are copied as-is, which lets a commented-out setting refer
/// to a variable that is not set.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut copied_to = 0;
        for captures in PLACEHOLDER.captures_iter(line) {
            let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
                continue;
            };

            output.push_str(&line[copied_to..whole.start()]);
            output.push_str(&resolve(key.as_str(), captures.get(2).map(|m| m.as_str()))?);
            copied_to = whole.end();
        }
        output.push_str(&line[copied_to..]);
    }

    Ok(output)
}

fn resolve(key: &str, default: Option<&str>) -> anyhow::Result<String> {
    let Some(var) = key.strip_prefix("env.").filter(|var| !var.contains('.')) else {
        anyhow::bail!("only variables scoped with 'env.' are supported: `{key}`");
    };

    match (std::env::var(var), default) {
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_owned()),
        (Err(_), None) => anyhow::bail!("environment variable not found: `{var}`"),
    }
}
