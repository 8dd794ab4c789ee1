//! Brazilian taxpayer id (CPF) normalization and check-digit validation.

/// Strip the usual `000.000.000-00` punctuation. Returns `None` unless exactly
/// eleven digits remain.
pub fn normalize(raw: &str) -> Option<String> {
    let mut digits = String::with_capacity(11);
    for c in raw.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '.' | '-' | ' ' => {}
            _ => return None,
        }
    }
    (digits.len() == 11).then_some(digits)
}

/// `true` if `raw` normalizes to eleven digits with both mod-11 check digits
/// correct. Sequences of one repeated digit pass the arithmetic but are not
/// issued, so they are rejected.
pub fn is_valid(raw: &str) -> bool {
    let Some(normalized) = normalize(raw) else {
        return false;
    };
    let digits: Vec<u32> = normalized.bytes().map(|b| u32::from(b - b'0')).collect();

    if digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

fn check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    (sum * 10) % 11 % 10
}

/// Render eleven digits as `000.000.000-00`.
pub fn format(normalized: &str) -> String {
    if normalized.len() != 11 || !normalized.bytes().all(|b| b.is_ascii_digit()) {
        return normalized.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &normalized[..3],
        &normalized[3..6],
        &normalized[6..9],
        &normalized[9..]
    )
}
