//! Rule pattern compilation
//!
//! Shield patterns are either shell-style globs or regexes anchored at the
//! start of the path. `PatternKind::Auto` picks regex when the pattern uses
//! syntax a glob never would. Braces count as regex only in quantifier form
//! (`{3}`, `{2,}`, `{2,4}`); `{a,b}` is glob alternation.

use globset::{GlobBuilder, GlobMatcher};
use once_cell::sync::Lazy;
use regex::Regex;

use mfc_core::{CheckError, PatternKind};

static REGEX_SYNTAX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\^$+()|\\]|\.[*+]|\{\d+(,\d*)?\}").expect("static regex"));

/// Group references in a mapping template, in any accepted spelling
static TEMPLATE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\$|\$\{[^}]*\}|\$(\d+)|\$([A-Za-z_]\w*)|\\(\d+)|\\g<(\w+)>|\$")
        .expect("static regex")
});

/// Whether an `auto` pattern should be compiled as a regex
pub fn looks_like_regex(pattern: &str) -> bool {
    REGEX_SYNTAX.is_match(pattern)
}

/// Compile `pattern` so it only matches at the start of a path
pub fn anchored_regex(rule_id: &str, pattern: &str) -> Result<Regex, CheckError> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|e| CheckError::InvalidRulePattern {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Rewrite group references into the braced `${1}` / `${name}` form.
///
/// `$1`, `$name`, `\1` and `\g<name>` are accepted. A numbered reference
/// ends at its last digit, so `$1_impl` means group 1 followed by `_impl`.
/// `$$` and `${..}` pass through; a `$` that starts no reference is literal.
pub fn convert_template(template: &str) -> String {
    TEMPLATE_REF
        .replace_all(template, |caps: &regex::Captures| {
            let group = (1..=4).find_map(|i| caps.get(i)).map(|m| m.as_str());
            match group {
                Some(group) => format!("${{{}}}", group),
                None if &caps[0] == "$" => "$$".to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// A compiled shield pattern
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Glob(GlobMatcher),
    Regex(Regex),
}

impl PathMatcher {
    pub fn compile(rule_id: &str, pattern: &str, kind: PatternKind) -> Result<Self, CheckError> {
        let use_regex = match kind {
            PatternKind::Regex => true,
            PatternKind::Glob => false,
            PatternKind::Auto => looks_like_regex(pattern),
        };

        if use_regex {
            return anchored_regex(rule_id, pattern).map(PathMatcher::Regex);
        }

        // `*` crosses directory separators, as in fnmatch
        GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map(|glob| PathMatcher::Glob(glob.compile_matcher()))
            .map_err(|e| CheckError::InvalidRulePattern {
                rule_id: rule_id.to_string(),
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn is_match(&self, path: &str) -> bool {
        match self {
            PathMatcher::Glob(glob) => glob.is_match(path),
            PathMatcher::Regex(regex) => regex.is_match(path),
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            PathMatcher::Glob(_) => PatternKind::Glob,
            PathMatcher::Regex(_) => PatternKind::Regex,
        }
    }
}
