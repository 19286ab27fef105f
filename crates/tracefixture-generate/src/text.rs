//! Free-text fields backed by the `fake` crate's English data sets.

use fake::Fake;
use fake::faker::company::en::{Bs, CatchPhrase};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;

/// A sentence of exactly `words` words, capitalized and ending with a period.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let raw: String = Sentence(words..words + 1).fake_with_rng(rng);
    finish_sentence(&raw)
}

/// A sentence whose length varies around `words`, without the closing period.
pub fn title<R: Rng + ?Sized>(rng: &mut R, words: usize) -> String {
    let low = words.saturating_sub(words * 2 / 5).max(1);
    let high = words + words * 2 / 5;
    let raw: String = Sentence(low..high + 1).fake_with_rng(rng);
    finish_sentence(&raw).trim_end_matches('.').to_string()
}

pub fn paragraph<R: Rng + ?Sized>(rng: &mut R, sentences: usize) -> String {
    Paragraph(sentences..sentences + 1).fake_with_rng(rng)
}

/// Business-speak phrase, e.g. "integrate bleeding-edge channels".
pub fn business_phrase<R: Rng + ?Sized>(rng: &mut R) -> String {
    Bs().fake_with_rng(rng)
}

pub fn catch_phrase<R: Rng + ?Sized>(rng: &mut R) -> String {
    CatchPhrase().fake_with_rng(rng)
}

pub fn first_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    FirstName().fake_with_rng(rng)
}

pub fn last_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    LastName().fake_with_rng(rng)
}

pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn finish_sentence(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('.');
    format!("{}.", capitalize(trimmed))
}
