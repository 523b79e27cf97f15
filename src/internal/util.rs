/// Parse a run of ASCII digits, clamping anything too large to `usize::MAX`.
pub fn saturating_count(digits: &str) -> usize {
    digits.parse::<usize>().unwrap_or(usize::MAX)
}

/// Convert an optional 1-based ordinal capture ("2" from "2nd") into a
/// 0-based container index. A missing ordinal addresses container 0.
pub fn container_index(ordinal: Option<&str>) -> Result<usize, String> {
    match ordinal {
        None => Ok(0),
        Some(digits) => match saturating_count(digits) {
            0 => Err("Container ordinals start at 1st".to_string()),
            n => Ok(n - 1),
        },
    }
}

/// Does `verbed` read as the past tense of `verb`?
pub fn is_past_tense_of(verbed: &str, verb: &str) -> bool {
    let verb = verb.to_lowercase();
    let verbed = verbed.to_lowercase();
    if verbed == format!("{}d", verb) || verbed == format!("{}ed", verb) {
        return true;
    }
    if let Some(last) = verb.chars().last() {
        if verbed == format!("{}{}ed", verb, last) {
            return true;
        }
        if last == 'y' && verbed == format!("{}ied", &verb[..verb.len() - 1]) {
            return true;
        }
    }
    false
}
