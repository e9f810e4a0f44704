//! Fuzzy name search over clients and pets.
//!
//! Exact substring matches score 1.0; everything else falls back to a
//! Jaro-Winkler / Levenshtein blend, cut off below a minimum score and
//! ranked descending.

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::{Client, Pet};
use crate::services::{Repository, ServiceResult};
use crate::store::Store;

/// Minimum score to appear in results.
const MIN_SCORE: f64 = 0.55;

/// Search clients by name or email.
pub fn search_clients(store: &Store, query: &str, limit: usize) -> ServiceResult<Vec<Client>> {
    let clients = Repository::<Client>::new(store).list()?;
    Ok(rank(clients, limit, |client| {
        best_score(
            query,
            &[
                &client.first_name,
                &client.last_name,
                &client.full_name(),
                &client.email,
            ],
        )
    }))
}

/// Search pets by name, optionally restricted to one client.
pub fn search_pets(
    store: &Store,
    query: &str,
    client_id: Option<&str>,
    limit: usize,
) -> ServiceResult<Vec<Pet>> {
    let pets: Vec<Pet> = Repository::<Pet>::new(store)
        .list()?
        .into_iter()
        .filter(|pet| client_id.map_or(true, |c| pet.client_id == c))
        .collect();
    Ok(rank(pets, limit, |pet| best_score(query, &[&pet.name])))
}

fn rank<T>(records: Vec<T>, limit: usize, score: impl Fn(&T) -> f64) -> Vec<T> {
    let mut scored: Vec<(f64, T)> = records
        .into_iter()
        .map(|record| (score(&record), record))
        .filter(|(s, _)| *s >= MIN_SCORE)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().take(limit).map(|(_, r)| r).collect()
}

fn best_score(query: &str, fields: &[&str]) -> f64 {
    let query_lower = query.to_lowercase();
    fields
        .iter()
        .map(|field| {
            let field_lower = field.to_lowercase();
            if field_lower.contains(&query_lower) {
                1.0
            } else {
                fuzzy_match(&query_lower, &field_lower)
            }
        })
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or(0.0)
}

/// Combined similarity: Jaro-Winkler weighted for prefixes and typos,
/// Levenshtein for overall shape.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    jw * 0.6 + lev * 0.4
}
