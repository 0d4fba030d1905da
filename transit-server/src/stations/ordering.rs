//! Station name ordering.

use std::cmp::Ordering;

/// Compare two station names for the index sort order.
///
/// Spaces are ignored and letters compare case-insensitively. When both names
/// open with a number (up to three digits), the numbers are compared by value
/// first, so `"3 Av"` comes before `"36 St"` and `"9 Av"` before `"25 St"`.
/// Otherwise characters compare by code point, and when one name is a prefix
/// of the other the longer name comes first.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use transit_server::stations::compare_names;
///
/// assert_eq!(compare_names("3 Av", "36 St"), Ordering::Less);
/// assert_eq!(compare_names("9 Av", "25 St"), Ordering::Less);
/// assert_eq!(compare_names("Canal St", "canalst"), Ordering::Equal);
/// assert_eq!(compare_names("Grand St", "Grand"), Ordering::Less);
/// ```
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let a = normalise(a);
    let b = normalise(b);

    if let (Some(x), Some(y)) = (leading_number(&a), leading_number(&b)) {
        match x.cmp(&y) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        match ca.cmp(&cb) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    b.chars().count().cmp(&a.chars().count())
}

/// The name as the sort order sees it: spaces removed, lowercased.
pub(super) fn normalise(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Value of the leading run of digits, capped at three digits.
fn leading_number(name: &str) -> Option<u16> {
    let digits: String = name
        .chars()
        .take_while(char::is_ascii_digit)
        .take(3)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(compare_names("3 Av", "36 St"), Ordering::Less);
        assert_eq!(compare_names("36 St", "3 Av"), Ordering::Greater);
        assert_eq!(compare_names("155 St", "36 St"), Ordering::Greater);
        assert_eq!(compare_names("8 Av", "8 St"), Ordering::Less);
    }

    #[test]
    fn only_three_digits_count() {
        assert_eq!(leading_number("1234 St"), Some(123));
        assert_eq!(leading_number("7"), Some(7));
        assert_eq!(leading_number("Av 7"), None);
    }

    #[test]
    fn spaces_and_case_are_ignored() {
        assert_eq!(compare_names("Grand St", "grandst"), Ordering::Equal);
        assert_eq!(compare_names("A  B", "ab"), Ordering::Equal);
    }

    #[test]
    fn letters_compare_by_code_point() {
        assert_eq!(compare_names("Avenue H", "Avenue J"), Ordering::Less);
        assert_eq!(compare_names("Graham Av", "Grand St"), Ordering::Less);
        assert_eq!(compare_names("Tottenville", "Arthur Kill"), Ordering::Greater);
    }

    #[test]
    fn numbered_names_sort_before_lettered() {
        assert_eq!(compare_names("45 St", "Astoria Blvd"), Ordering::Less);
    }

    #[test]
    fn longer_name_sorts_before_its_prefix() {
        assert_eq!(compare_names("Grand Central", "Grand"), Ordering::Less);
        assert_eq!(compare_names("Grand", "Grand Central"), Ordering::Greater);
    }

    #[test]
    fn stable_sort_keeps_equal_names_in_input_order() {
        let mut names = vec![("Grand St", 1), ("Canal St", 2), ("grand st", 3)];
        names.sort_by(|a, b| compare_names(a.0, b.0));
        assert_eq!(
            names.iter().map(|n| n.1).collect::<Vec<_>>(),
            vec![2, 1, 3]
        );
    }
}
