//! # Command Resolver
//!
//! Suggests the closest known command signatures for an invocation that matched nothing.
//! Every signature is compared against the full input and against each shorter prefix
//! obtained by dropping trailing words, so extra arguments never make a match worse.

/// Edit distance between two strings (insert, delete, substitute each cost 1).
/// Case-sensitive and char-based.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row of the DP matrix.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Smallest distance between `signature` and the input or any of its word-truncated prefixes.
pub fn prefix_distance(signature: &str, input: &str) -> usize {
    let mut best = usize::MAX;
    let mut current = input;
    while let Some(idx) = current.rfind(' ') {
        best = best.min(levenshtein(signature, current));
        current = &current[..idx];
    }
    best.min(levenshtein(signature, current))
}

/// Result of a resolution: all signatures sharing the smallest distance, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions<'a> {
    pub distance: usize,
    pub signatures: Vec<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct CommandResolver {
    signatures: Vec<String>,
}

impl CommandResolver {
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            signatures: signatures.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolves a raw message; its first character (the invocation prefix) is dropped.
    pub fn resolve(&self, raw: &str) -> Option<Suggestions<'_>> {
        let mut chars = raw.chars();
        chars.next();
        self.closest(chars.as_str())
    }

    /// Resolves an input whose prefix was already stripped.
    /// Returns `None` only when there are no signatures at all.
    pub fn closest(&self, input: &str) -> Option<Suggestions<'_>> {
        let scored: Vec<(&str, usize)> = self
            .signatures
            .iter()
            .map(|s| (s.as_str(), prefix_distance(s, input)))
            .collect();

        let distance = scored.iter().map(|(_, d)| *d).min()?;
        let signatures = scored
            .into_iter()
            .filter(|(_, d)| *d == distance)
            .map(|(s, _)| s)
            .collect();

        tracing::debug!("Resolved '{}' at distance {}", input, distance);
        Some(Suggestions {
            distance,
            signatures,
        })
    }
}
