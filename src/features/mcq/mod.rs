//! Chapter quizzes. Options are shuffled per attempt; the answer index is
//! remapped so it keeps pointing at the same option text.

pub mod client;
pub mod types;

pub use types::Mcq;

use rand::{Rng, seq::SliceRandom};

/// Returns a copy of `mcq` with its options in random order.
pub fn shuffle_options<R: Rng + ?Sized>(mcq: &Mcq, rng: &mut R) -> Mcq {
    let mut order: Vec<usize> = (0..mcq.options.len()).collect();
    order.shuffle(rng);

    let options = order
        .iter()
        .filter_map(|&index| mcq.options.get(index).cloned())
        .collect();
    let correct_option = order
        .iter()
        .position(|&index| index == mcq.correct_option)
        .unwrap_or(mcq.correct_option);

    Mcq {
        id: mcq.id.clone(),
        question: mcq.question.clone(),
        options,
        correct_option,
    }
}

/// Shuffles question order and the options of every question.
pub fn shuffle_quiz<R: Rng + ?Sized>(mcqs: &[Mcq], rng: &mut R) -> Vec<Mcq> {
    let mut quiz: Vec<Mcq> = mcqs.iter().map(|mcq| shuffle_options(mcq, &mut *rng)).collect();
    quiz.shuffle(rng);
    quiz
}

/// Number of answers matching the correct option, by question id.
#[must_use]
pub fn score(quiz: &[Mcq], answers: &[(String, usize)]) -> usize {
    answers
        .iter()
        .filter(|(id, choice)| {
            quiz.iter()
                .any(|mcq| &mcq.id == id && mcq.correct_option == *choice)
        })
        .count()
}
