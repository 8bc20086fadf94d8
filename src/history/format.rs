//! Display labels for reading sessions.

use crate::model::ChapterMark;

/// Render the chapter-range label for one session.
///
/// - one chapter: `Chapter 5`
/// - a consecutive run: `Chapters 3-5`
/// - up to three non-consecutive chapters: `Chapters 1, 3, 7`
/// - more than three non-consecutive: `Chapters 1, 3 ... 11` — the middle
///   of the list is intentionally elided, not an error.
#[must_use]
pub fn session_label(chapters: &[ChapterMark]) -> String {
    let mut numbers: Vec<i64> = chapters.iter().map(|c| c.chapter_number).collect();
    numbers.sort_unstable();
    numbers.dedup();

    match numbers.as_slice() {
        [] => String::new(),
        [only] => format!("Chapter {only}"),
        [first, .., last] if is_consecutive(&numbers) => format!("Chapters {first}-{last}"),
        [first, second, .., last] if numbers.len() > 3 => {
            format!("Chapters {first}, {second} ... {last}")
        }
        _ => format!("Chapters {}", join_numbers(&numbers)),
    }
}

fn is_consecutive(numbers: &[i64]) -> bool {
    numbers.windows(2).all(|w| w[1] == w[0] + 1)
}

fn join_numbers(numbers: &[i64]) -> String {
    numbers
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn marks(numbers: &[i64]) -> Vec<ChapterMark> {
        numbers
            .iter()
            .map(|n| {
                serde_json::from_str(&format!(
                    r#"{{"chapterId": "ch-{n}", "chapterNumber": {n}, "readAt": "2026-08-01T10:00:00Z"}}"#
                ))
                .unwrap()
            })
            .collect()
    }

    #[rstest]
    #[case(&[5], "Chapter 5")]
    #[case(&[3, 4, 5], "Chapters 3-5")]
    #[case(&[1, 3, 7], "Chapters 1, 3, 7")]
    #[case(&[1, 3, 5, 9, 11], "Chapters 1, 3 ... 11")]
    #[case(&[1, 2], "Chapters 1-2")]
    #[case(&[2, 9], "Chapters 2, 9")]
    fn test_session_label(#[case] numbers: &[i64], #[case] expected: &str) {
        assert_eq!(session_label(&marks(numbers)), expected);
    }

    #[test]
    fn test_unsorted_input_is_normalized() {
        assert_eq!(session_label(&marks(&[5, 3, 4])), "Chapters 3-5");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(session_label(&[]), "");
    }
}
