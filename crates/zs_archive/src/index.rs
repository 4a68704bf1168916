use std::cmp::Ordering;
use std::collections::HashMap;
use zs_core::{SearchHit, SearchMode, SearchResults};

/// Lower-cased alphanumeric terms of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(|term| term.to_lowercase())
        .collect()
}

#[derive(Debug, Clone)]
struct IndexedDoc {
    path: String,
    title: String,
}

/// Inverted index from term to per-document frequency.
#[derive(Debug, Default, Clone)]
pub struct FullTextIndex {
    docs: Vec<IndexedDoc>,
    postings: HashMap<String, Vec<(usize, u32)>>,
}

impl FullTextIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn add(&mut self, path: &str, title: &str, text: &str) {
        let doc_id = self.docs.len();
        self.docs.push(IndexedDoc {
            path: path.to_string(),
            title: title.to_string(),
        });

        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in tokenize(title).into_iter().chain(tokenize(text)) {
            *counts.entry(term).or_insert(0) += 1;
        }
        for (term, count) in counts {
            self.postings.entry(term).or_default().push((doc_id, count));
        }
    }

    /// Documents containing any query term, best first: more distinct terms
    /// matched, then higher total frequency, then title order.
    pub fn search(&self, query: &str, limit: usize) -> SearchResults {
        let mut terms = tokenize(query);
        terms.sort();
        terms.dedup();
        if terms.is_empty() {
            return SearchResults::empty(SearchMode::FullText);
        }

        let mut scores: HashMap<usize, (usize, u32)> = HashMap::new();
        for term in &terms {
            let Some(postings) = self.postings.get(term) else {
                continue;
            };
            for &(doc_id, count) in postings {
                let score = scores.entry(doc_id).or_insert((0, 0));
                score.0 += 1;
                score.1 += count;
            }
        }

        let mut ranked: Vec<(usize, (usize, u32))> = scores.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            b.0.cmp(&a.0)
                .then(b.1.cmp(&a.1))
                .then_with(|| self.docs[*a_id].title.cmp(&self.docs[*b_id].title))
        });

        SearchResults {
            mode: SearchMode::FullText,
            estimated_total: ranked.len(),
            hits: ranked
                .into_iter()
                .take(limit)
                .map(|(doc_id, _)| {
                    let doc = &self.docs[doc_id];
                    SearchHit::new(doc.path.clone(), doc.title.clone())
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TitleMatch {
    Exact,
    Prefix,
    WordPrefix,
    Substring,
}

fn match_title(title: &str, query: &str) -> Option<TitleMatch> {
    let title = title.to_lowercase();
    if title == query {
        Some(TitleMatch::Exact)
    } else if title.starts_with(query) {
        Some(TitleMatch::Prefix)
    } else if title
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| !word.is_empty() && word.starts_with(query))
    {
        Some(TitleMatch::WordPrefix)
    } else if title.contains(query) {
        Some(TitleMatch::Substring)
    } else {
        None
    }
}

/// Case-insensitive title suggestions over `(path, title)` pairs.
pub fn suggest_titles<'a, I>(entries: I, query: &str, limit: usize) -> SearchResults
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchResults::empty(SearchMode::Title);
    }

    let mut matches: Vec<(TitleMatch, &str, &str)> = entries
        .into_iter()
        .filter_map(|(path, title)| match_title(title, &query).map(|m| (m, path, title)))
        .collect();
    matches.sort_by(|a, b| match a.0.cmp(&b.0) {
        Ordering::Equal => a.2.len().cmp(&b.2.len()).then_with(|| a.2.cmp(b.2)),
        other => other,
    });

    SearchResults {
        mode: SearchMode::Title,
        estimated_total: matches.len(),
        hits: matches
            .into_iter()
            .take(limit)
            .map(|(_, path, title)| SearchHit::new(path, title))
            .collect(),
    }
}
