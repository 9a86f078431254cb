use std::collections::HashSet;

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::db::Question;

/// The category a quiz is restricted to. A missing id or `0` means the quiz
/// draws from every category.
pub fn restricted_category(id: Option<i64>) -> Option<i64> {
    id.filter(|&id| id != 0)
}

/// Picks uniformly among `candidates` whose id is not in `previous`.
/// `None` means the quiz has run out of questions.
pub fn pick_unasked<R>(candidates: Vec<Question>, previous: &[i64], rng: &mut R) -> Option<Question>
where
    R: Rng + ?Sized,
{
    let asked: HashSet<i64> = previous.iter().copied().collect();
    let remaining: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !asked.contains(&q.id))
        .collect();
    remaining.choose(rng).cloned()
}
