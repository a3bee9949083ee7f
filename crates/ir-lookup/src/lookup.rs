use crate::model::IrDocument;
use serde_json::{json, Value};

/// How a symbol name is compared against the needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Case-sensitive substring containment.
    #[default]
    Substring,
    /// Whole-name equality.
    Exact,
}

impl MatchMode {
    pub fn accepts(self, needle: &str, name: &str) -> bool {
        match self {
            MatchMode::Substring => name.contains(needle),
            MatchMode::Exact => name == needle,
        }
    }
}

/// A symbol whose name matched the needle, borrowed from its entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub file_name: Option<&'a str>,
    pub name: &'a str,
    pub type_descriptor: &'a Value,
    pub crf: Option<&'a Value>,
}

impl Match<'_> {
    /// Output object: `file`, `name`, `type`, `match_count`, and `crf` when present.
    pub fn to_json_value(&self, match_count: usize) -> Value {
        let mut out = json!({
            "file": self.file_name,
            "name": self.name,
            "type": self.type_descriptor,
            "match_count": match_count,
        });
        if let (Some(crf), Value::Object(map)) = (self.crf, &mut out) {
            map.insert("crf".to_string(), crf.clone());
        }
        out
    }
}

/// The match that gets reported, plus how many candidates there were.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub chosen: Match<'a>,
    pub match_count: usize,
}

impl Selection<'_> {
    pub fn to_json_value(&self) -> Value {
        self.chosen.to_json_value(self.match_count)
    }

    pub fn is_ambiguous(&self) -> bool {
        self.match_count > 1
    }

    /// Diagnostic line for stderr when more than one symbol matched.
    pub fn ambiguity_note(&self) -> Option<String> {
        self.is_ambiguous().then(|| {
            format!(
                "note: {} matches; showing {} (from {})",
                self.match_count,
                self.chosen.name,
                self.chosen.file_name.unwrap_or("unknown")
            )
        })
    }
}

/// Prefer a match named exactly `needle`, else the first in scan order.
pub fn select<'a>(needle: &str, matches: &[Match<'a>]) -> Option<Selection<'a>> {
    let chosen = matches
        .iter()
        .find(|m| m.name == needle)
        .or_else(|| matches.first())?;
    Some(Selection {
        chosen: *chosen,
        match_count: matches.len(),
    })
}

impl IrDocument {
    /// Substring scan over every entry, in document then key order.
    pub fn find_matches(&self, needle: &str) -> Vec<Match<'_>> {
        self.find_matches_with(needle, MatchMode::Substring)
    }

    pub fn find_matches_with(&self, needle: &str, mode: MatchMode) -> Vec<Match<'_>> {
        let matches: Vec<Match<'_>> = self
            .entries()
            .iter()
            .flat_map(|entry| {
                entry
                    .messages
                    .iter()
                    .filter(move |(name, _)| mode.accepts(needle, name))
                    .map(move |(name, descriptor)| Match {
                        file_name: entry.file_name.as_deref(),
                        name,
                        type_descriptor: descriptor,
                        crf: entry.crf_for(name),
                    })
            })
            .collect();
        log::debug!("{} symbols matched {needle:?} ({mode:?})", matches.len());
        matches
    }

    pub fn lookup(&self, needle: &str) -> Option<Selection<'_>> {
        self.lookup_with(needle, MatchMode::Substring)
    }

    pub fn lookup_with(&self, needle: &str, mode: MatchMode) -> Option<Selection<'_>> {
        select(needle, &self.find_matches_with(needle, mode))
    }
}
