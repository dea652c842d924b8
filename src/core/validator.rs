//! Filename grammar for captioned artwork files.
//!
//! Two naming forms are accepted, tried in this order:
//!
//! * **A**: `Subject[, Descriptor] [(YYYY) ]- Attribution (Medium).ext`
//! * **B**: `Subject (ca. YYYY) - Attribution (Medium).ext`, also with `c. ` or a
//!   year range `YYYY-YY` inside the parentheses
//!
//! Extensions are `jpg`, `jpeg`, `png` and `gif`, matched case-sensitively.

use regex::Regex;
use std::sync::LazyLock;

/// Characters allowed in free-text fields. Parentheses are reserved for the year and medium.
const TEXT_CLASS: &str = concat!(
    "[",
    "A-Za-z0-9",
    "çñáàãéèêíìîóòõúùûÇÑÁÀÃÉÈÊÍÌÎÓÒÕÚÙÛ",
    r"\.\+\-_\[\]\{\}!\?¿¡,':;&%\$#@\*/",
    " ",
    "]"
);

const EXTENSIONS: &str = r"\.(?:jpg|jpeg|png|gif)";

static GRAMMAR_A: LazyLock<Regex> = LazyLock::new(|| {
    let t = TEXT_CLASS;
    Regex::new(&format!(
        r"^{t}+(?:, {t}+)? (?:\(\d{{4}}\) )?- {t}+ \({t}+\){EXTENSIONS}$"
    ))
    .expect("grammar A is a valid regex")
});

static GRAMMAR_B: LazyLock<Regex> = LazyLock::new(|| {
    let t = TEXT_CLASS;
    Regex::new(&format!(
        r"^{t}+ \((?:(?:ca\. |c\. )*\d{{4}}|\d{{4}}-\d{{2}})\) - {t}+ \({t}+\){EXTENSIONS}$"
    ))
    .expect("grammar B is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMatch {
    MatchedA,
    MatchedB,
    NoMatch,
}

impl PatternMatch {
    pub fn is_match(self) -> bool {
        self != PatternMatch::NoMatch
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameValidator;

impl FilenameValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, file_name: &str) -> PatternMatch {
        if GRAMMAR_A.is_match(file_name) {
            PatternMatch::MatchedA
        } else if GRAMMAR_B.is_match(file_name) {
            PatternMatch::MatchedB
        } else {
            PatternMatch::NoMatch
        }
    }

    pub fn is_valid(&self, file_name: &str) -> bool {
        self.classify(file_name).is_match()
    }
}
