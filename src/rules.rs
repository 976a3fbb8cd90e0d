use std::fmt;
use std::fs;
use std::io;
use std::path;

use regex;
use serde::Deserialize;
use serde_json;

/// One text substitution, applied to tag strings before they become
/// folder and file names. The pattern is stored compiled, so a rule
/// that exists is always applicable.
#[derive(Debug)]
pub struct RenameRule {
    pub from : regex::Regex,
    pub to : String,
}

#[derive(Deserialize)]
struct RawRule {
    from : String,
    to : String,
}

#[derive(Debug)]
pub enum RulesError {
    Read(io::Error),
    Format(serde_json::Error),
    Pattern { index : usize, source : regex::Error },
}

impl fmt::Display for RulesError {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(err) => write!(f, "cannot read rules file: {}", err),
            Self::Format(err) => {
                write!(f, "rules file is not a list of {{from, to}} pairs: {}", err)
            },
            Self::Pattern { index, source } => {
                write!(f, "rule {} has an invalid pattern: {}", index + 1, source)
            },
        }
    }
}

impl std::error::Error for RulesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Pattern { source, .. } => Some(source),
        }
    }
}

/// Loads the ordered rule list from `path`. A missing file just means
/// no rules; anything else wrong with the file rejects the whole list,
/// so a load never yields a partial rule set.
pub fn load(path : &path::Path) -> Result<Vec<RenameRule>, RulesError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(RulesError::Read(err)),
    };
    let raw : Vec<RawRule> = serde_json::from_str(&data).map_err(RulesError::Format)?;
    let mut rules = Vec::with_capacity(raw.len());
    for (index, rule) in raw.into_iter().enumerate() {
        let from = regex::Regex::new(&rule.from)
            .map_err(|source| RulesError::Pattern { index, source })?;
        rules.push(RenameRule { from, to : rule.to });
    }
    Ok(rules)
}

/// Applies every rule in declaration order; rule i's output is rule
/// i+1's input. Replacements may reference capture groups with `$1`,
/// `${name}`, etc.
pub fn apply(rules : &[RenameRule], input : &str) -> String {
    apply_with(rules, input, |_, _, _| ())
}

/// Like [`apply`], but calls `on_change(index, before, after)` for each
/// rule that altered the value. The observer is for reporting only and
/// never affects the result.
pub fn apply_with<F>(rules : &[RenameRule], input : &str, mut on_change : F) -> String
where F : FnMut(usize, &str, &str) {
    let mut value = input.to_string();
    for (index, rule) in rules.iter().enumerate() {
        let next = rule.from.replace_all(&value, rule.to.as_str()).into_owned();
        if next != value {
            on_change(index, &value, &next);
        }
        value = next;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn rule(from : &str, to : &str) -> RenameRule {
        RenameRule {
            from : regex::Regex::new(from).unwrap(),
            to : to.to_string(),
        }
    }

    #[test]
    fn no_rules_leaves_input_unchanged() {
        assert_eq!(apply(&[], "Woman's Hour"), "Woman's Hour");
    }

    #[test]
    fn rules_apply_in_declaration_order() {
        let rules = [rule("a", "b"), rule("b", "c")];
        assert_eq!(apply(&rules, "a"), "c");
    }

    #[test]
    fn every_match_is_replaced() {
        let rules = [rule(r"\s+", " ")];
        assert_eq!(apply(&rules, "The  Archers   Omnibus"), "The Archers Omnibus");
    }

    #[test]
    fn replacements_expand_capture_groups() {
        let rules = [rule(r"Series (\d+): ", "S$1 ")];
        assert_eq!(
            apply(&rules, "Series 3: The Hidden Depths"),
            "S3 The Hidden Depths"
        );
    }

    #[test]
    fn observer_sees_only_rules_that_changed_the_value() {
        let rules = [rule("x", "y"), rule("^The ", ""), rule("qq", "z")];
        let mut changed = Vec::new();
        let out = apply_with(&rules, "The News Quiz", |index, _, _| changed.push(index));
        assert_eq!(out, "News Quiz");
        assert_eq!(changed, vec![1]);
    }

    #[test]
    fn missing_rules_file_means_no_rules() {
        let dir = tempdir().expect("tempdir");
        let rules = load(&dir.path().join("rules.json")).expect("load should succeed");
        assert!(rules.is_empty());
    }

    #[test]
    fn rules_load_in_file_order() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        fs::write(&path, concat!(
            "[{\"from\": \"Desert Island Discs\", \"to\": \"DID\"},\n",
            " {\"from\": \" \\\\(Omnibus\\\\)\", \"to\": \"\"}]",
        )).expect("write rules");
        let rules = load(&path).expect("load should succeed");
        assert_eq!(rules.len(), 2);
        assert_eq!(apply(&rules, "Desert Island Discs (Omnibus)"), "DID");
    }

    #[test]
    fn malformed_rules_file_is_rejected() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        fs::write(&path, "{\"from\": \"a\", \"to\": \"b\"}").expect("write rules");
        match load(&path) {
            Err(RulesError::Format(_)) => (),
            other => panic!("expected a format error, got {:?}", other),
        }
    }

    #[test]
    fn invalid_pattern_rejects_the_whole_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("rules.json");
        fs::write(&path, concat!(
            "[{\"from\": \"fine\", \"to\": \"ok\"},\n",
            " {\"from\": \"(unclosed\", \"to\": \"x\"}]",
        )).expect("write rules");
        match load(&path) {
            Err(RulesError::Pattern { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected a pattern error, got {:?}", other),
        }
    }
}
