use std::collections::BTreeSet;

use rand::Rng;

use crate::text::{first_name, last_name};

const MAX_ATTEMPTS_PER_USER: usize = 50;

/// Build `size` distinct user handles of the form `First_L`.
///
/// Name collisions are retried; once the attempts run out the handle gets a
/// numeric suffix so the roster always reaches the requested size.
pub fn build_user_roster<R: Rng + ?Sized>(rng: &mut R, size: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut roster = Vec::with_capacity(size);

    while roster.len() < size {
        let mut handle = None;
        for _ in 0..MAX_ATTEMPTS_PER_USER {
            let candidate = user_handle(rng);
            if !seen.contains(&candidate) {
                handle = Some(candidate);
                break;
            }
        }
        let handle = match handle {
            Some(handle) => handle,
            None => format!("{}{}", user_handle(rng), roster.len() + 1),
        };
        if seen.insert(handle.clone()) {
            roster.push(handle);
        }
    }

    roster
}

fn user_handle<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = first_name(rng);
    let last = last_name(rng);
    let initial: String = last.chars().take(1).collect();
    format!("{first}_{initial}")
}
