/// Brazilian CPF checksum validation.
///
/// Digits may be separated by `.` and `-` and surrounded by whitespace.
pub fn is_valid_cpf(cpf: &str) -> bool {
    normalize_cpf(cpf).is_some()
}

/// Canonical `000.000.000-00` form of a valid CPF, `None` when invalid.
pub fn normalize_cpf(cpf: &str) -> Option<String> {
    let mut digits: Vec<u32> = Vec::with_capacity(11);
    for c in cpf.trim().chars() {
        match c {
            '.' | '-' => continue,
            _ => digits.push(c.to_digit(10)?),
        }
    }
    if digits.len() != 11 {
        return None;
    }
    // 000.000.000-00, 111.111.111-11, ... satisfy the checksum but are not issued
    if digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
        return None;
    }
    let text: String = digits.iter().map(|d| d.to_string()).collect();
    Some(format!(
        "{}.{}.{}-{}",
        &text[0..3],
        &text[3..6],
        &text[6..9],
        &text[9..11]
    ))
}

fn check_digit(digits: &[u32]) -> u32 {
    let first_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(idx, d)| d * (first_weight - idx as u32))
        .sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}
