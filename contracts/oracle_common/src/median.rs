use soroban_sdk::Vec;

use crate::types::OracleError;

/// Fails with `NotSorted` unless `answers` is non-decreasing.
pub fn ensure_sorted(answers: &Vec<i128>) -> Result<(), OracleError> {
    let mut previous: Option<i128> = None;
    for answer in answers.iter() {
        if let Some(prev) = previous {
            if answer < prev {
                return Err(OracleError::NotSorted);
            }
        }
        previous = Some(answer);
    }
    Ok(())
}

/// Median of an already sorted list: the middle element for odd lengths,
/// the mean of the two middle elements (truncated toward zero) for even
/// lengths. `None` for an empty list.
pub fn of_sorted(sorted: &Vec<i128>) -> Option<i128> {
    let len = sorted.len();
    if len == 0 {
        return None;
    }

    let middle = len / 2;
    if len % 2 == 1 {
        return sorted.get(middle);
    }

    let low = sorted.get(middle - 1)?;
    let high = sorted.get(middle)?;
    Some(midpoint(low, high))
}

/// `(a + b) / 2` without overflowing `i128`.
pub fn midpoint(a: i128, b: i128) -> i128 {
    match a.checked_add(b) {
        Some(sum) => sum / 2,
        // Only reachable when both share a sign, so the halves cannot
        // disagree on rounding direction.
        None => a / 2 + b / 2 + (a % 2 + b % 2) / 2,
    }
}
