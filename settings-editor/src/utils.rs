//! Common helper functions.

use std::env;

use anyhow::bail;

/// Replaces `${env:VAR_NAME}` placeholders with the variable's value.
///
/// Text that is not a complete `${env:...}` placeholder is copied unchanged.
/// A placeholder naming an unset variable is an error.
///
/// # Example
///
/// ```rust
/// use settings_editor::utils::replace_env_placeholders;
///
/// unsafe { std::env::set_var("SETTINGS_ROOT", "/srv/rig"); }
/// let result = replace_env_placeholders("${env:SETTINGS_ROOT}/tests").unwrap();
/// assert_eq!(result, "/srv/rig/tests");
/// ```
pub fn replace_env_placeholders(input: &str) -> anyhow::Result<String> {
    const OPEN: &str = "${env:";

    let mut result = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find(OPEN) {
        result.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find('}') else {
            // Unterminated, keep the remainder verbatim.
            result.push_str(&rest[start..]);
            return Ok(result);
        };

        let name = &after[..end];
        if name.is_empty() {
            bail!("empty variable name in {input:?}");
        }
        match env::var(name) {
            Ok(value) => {
                debug!("expanding ${{env:{name}}} to {value:?}");
                result.push_str(&value);
            }
            Err(e) => bail!("cannot expand ${{env:{name}}}: {e}"),
        }
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_env_placeholders() {
        unsafe {
            env::set_var("SE_TEST_HOME", "/home/test");
            env::set_var("SE_TEST_SUB", "rig");
        }

        assert_eq!(
            replace_env_placeholders("${env:SE_TEST_HOME}").unwrap(),
            "/home/test"
        );
        assert_eq!(
            replace_env_placeholders("${env:SE_TEST_HOME}/${env:SE_TEST_SUB}/settings").unwrap(),
            "/home/test/rig/settings"
        );
        assert_eq!(
            replace_env_placeholders("Just a normal string").unwrap(),
            "Just a normal string"
        );
        assert_eq!(replace_env_placeholders("").unwrap(), "");
    }

    #[test]
    fn test_other_placeholders_are_kept() {
        assert_eq!(
            replace_env_placeholders("${workspaceFolder}/x").unwrap(),
            "${workspaceFolder}/x"
        );
        assert_eq!(replace_env_placeholders("$").unwrap(), "$");
        assert_eq!(replace_env_placeholders("${env:VAR").unwrap(), "${env:VAR");
    }

    #[test]
    fn test_unset_variable_is_an_error() {
        assert!(replace_env_placeholders("${env:SE_TEST_DEFINITELY_UNSET}").is_err());
        assert!(replace_env_placeholders("${env:}").is_err());
    }
}
