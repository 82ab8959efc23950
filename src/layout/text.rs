use crate::font::Font;
use crate::units::Pt;

const ELLIPSIS: char = '…';

/// Calculate the width of a given string of text given the font and font size
pub fn width_of_text(text: &str, font: &Font, size: Pt) -> Pt {
    text.chars().map(|ch| font.char_width(ch, size)).sum()
}

/// Greedily wraps `text` into lines no wider than `max_width`.
///
/// Words are separated by any whitespace, and joined by a single space within a
/// line. A word that is wider than a whole line on its own is split by character;
/// its last fragment starts the next line. A lone character wider than the line is
/// kept on a line by itself, so no empty lines are ever produced. Empty or
/// whitespace-only text produces no lines at all.
pub fn wrap_text(text: &str, max_width: Pt, font: &Font, size: Pt) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if width_of_text(&candidate, font, size) <= max_width {
            line = candidate;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if width_of_text(word, font, size) <= max_width {
            line = word.to_string();
            continue;
        }

        // the word alone doesn't fit, break it up by character
        let mut fragment = String::new();
        for ch in word.chars() {
            let mut next = fragment.clone();
            next.push(ch);
            if fragment.is_empty() || width_of_text(&next, font, size) <= max_width {
                fragment = next;
            } else {
                lines.push(std::mem::take(&mut fragment));
                fragment.push(ch);
            }
        }
        line = fragment;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Shortens `text` from the end, appending an ellipsis, until it fits in `max_width`.
/// Text that already fits is returned unchanged; when not even the ellipsis fits,
/// the result is empty.
pub fn ellipsize(text: &str, max_width: Pt, font: &Font, size: Pt) -> String {
    if width_of_text(text, font, size) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = font.char_width(ELLIPSIS, size);
    if ellipsis_width > max_width {
        return String::new();
    }
    let mut shortened = text.to_string();
    while !shortened.is_empty()
        && width_of_text(&shortened, font, size) + ellipsis_width > max_width
    {
        shortened.pop();
    }
    format!("{}{ELLIPSIS}", shortened.trim_end())
}

/// Wraps `text` but keeps at most `max_lines` lines. When text had to be cut, the
/// last kept line ends in an ellipsis. Every returned line fits `max_width`, with
/// over-wide lines ellipsized.
pub fn wrap_text_clamped(
    text: &str,
    max_width: Pt,
    font: &Font,
    size: Pt,
    max_lines: usize,
) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }
    let mut lines = wrap_text(text, max_width, font, size);
    if lines.len() > max_lines {
        let rest = lines.split_off(max_lines - 1).join(" ");
        lines.push(ellipsize(&rest, max_width, font, size));
    }
    lines
        .into_iter()
        .map(|line| ellipsize(&line, max_width, font, size))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn font() -> Font {
        Font::helvetica()
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_text("", Pt(100.0), &font(), Pt(10.0)).is_empty());
        assert!(wrap_text("   \n\t ", Pt(100.0), &font(), Pt(10.0)).is_empty());
    }

    #[test]
    fn wraps_at_word_boundaries() {
        let f = font();
        let width = width_of_text("alpha beta", &f, Pt(10.0));
        let lines = wrap_text("alpha beta gamma delta", width, &f, Pt(10.0));
        assert_eq!(lines, vec!["alpha beta", "gamma", "delta"]);
    }

    #[test]
    fn splits_over_wide_words_and_continues_after_the_fragment() {
        let f = font();
        let width = width_of_text("mmmm", &f, Pt(10.0));
        let lines = wrap_text("mmmmmmmmmm x", width, &f, Pt(10.0));
        assert_eq!(lines, vec!["mmmm", "mmmm", "mm x"]);
    }

    #[test]
    fn lone_wide_characters_get_their_own_line() {
        let lines = wrap_text("WW", Pt(1.0), &font(), Pt(10.0));
        assert_eq!(lines, vec!["W", "W"]);
    }

    #[test]
    fn ellipsize_keeps_short_text() {
        assert_eq!(ellipsize("hola", Pt(200.0), &font(), Pt(9.0)), "hola");
    }

    #[test]
    fn ellipsize_shortens_long_text() {
        let f = font();
        let max = Pt(60.0);
        let out = ellipsize("Limpieza a enfriadores aire/aceite", max, &f, Pt(9.0));
        assert!(out.ends_with('…'));
        assert!(width_of_text(&out, &f, Pt(9.0)) <= max);
    }

    #[test]
    fn clamped_wrapping_marks_cut_text() {
        let f = font();
        let text = lipsum::lipsum(60);
        let max = Pt(120.0);
        let lines = wrap_text_clamped(&text, max, &f, Pt(8.0), 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
        for line in lines {
            assert!(width_of_text(&line, &f, Pt(8.0)) <= max);
        }
    }

    #[test]
    fn ellipsize_gives_up_when_the_ellipsis_does_not_fit() {
        let f = font();
        let narrow = f.char_width('…', Pt(10.0)) - Pt(0.5);
        assert_eq!(ellipsize("Compresor", narrow, &f, Pt(10.0)), "");
        let exact = f.char_width('…', Pt(10.0));
        assert_eq!(ellipsize("Compresor", exact, &f, Pt(10.0)), "…");
    }

    proptest! {
        #[test]
        fn lines_fit_and_rewrapping_is_stable(
            words in prop::collection::vec("[a-zA-Z]{1,12}", 0..40),
            width in 40.0f32..300.0,
        ) {
            let f = font();
            let text = words.join(" ");
            let lines = wrap_text(&text, Pt(width), &f, Pt(9.0));
            for line in &lines {
                prop_assert!(width_of_text(line, &f, Pt(9.0)) <= Pt(width));
                prop_assert_eq!(wrap_text(line, Pt(width), &f, Pt(9.0)), vec![line.clone()]);
            }
        }

        #[test]
        fn joining_lines_restores_fitting_text(
            words in prop::collection::vec("[a-z]{1,8}", 0..40),
        ) {
            // every generated word fits comfortably, so nothing is force-split
            let f = font();
            let text = words.join("  \n");
            let lines = wrap_text(&text, Pt(150.0), &f, Pt(9.0));
            prop_assert_eq!(lines.join(" "), words.join(" "));
        }
    }
}
