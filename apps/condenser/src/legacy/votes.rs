use serde::{Deserialize, Serialize};

/// One entry of a legacy `active_votes` list. Values stay as the strings
/// stored in the cache. A short CSV line leaves trailing fields unset, and
/// unset fields are omitted from the wire object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rshares: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reputation: Option<String>,
}

impl Vote {
    /// Positional decode of `voter,rshares,percent,reputation`.
    /// Fields past the fourth are ignored.
    fn from_csv_line(line: &str) -> Self {
        let mut cols = line.split(',').map(str::to_string);
        Vote {
            voter: cols.next(),
            rshares: cols.next(),
            percent: cols.next(),
            reputation: cols.next(),
        }
    }
}

/// Expands the cache's minimal vote CSV into steemd-style vote objects.
pub fn hydrate_active_votes(vote_csv: Option<&str>) -> Vec<Vote> {
    match vote_csv {
        None | Some("") => Vec::new(),
        Some(csv) => csv.split('\n').map(Vote::from_csv_line).collect(),
    }
}
