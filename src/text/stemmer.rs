//! Indonesian stemming.
//!
//! [`IndonesianStemmer`] is a dictionary-free affix stripper following the
//! Snowball Indonesian algorithm: particles (`-kah`, `-lah`, `-pun`), then
//! possessive pronouns (`-ku`, `-mu`, `-nya`), then derivational prefixes and
//! suffixes. Stripping stops as soon as the word would drop to two syllables.

/// A morphological stemmer over whole texts.
pub trait Stemmer {
    /// Stem a single lowercase token.
    fn stem_word(&self, word: &str) -> String;

    /// Lowercase `text`, replace characters other than letters, digits,
    /// whitespace and `-` with spaces, and stem every remaining token.
    fn stem_text(&self, text: &str) -> String {
        let lowered: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || c == '-' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        lowered
            .split_whitespace()
            .map(|token| self.stem_word(token))
            .filter(|stem| !stem.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndonesianStemmer;

impl Stemmer for IndonesianStemmer {
    fn stem_word(&self, word: &str) -> String {
        // Reduplicated forms: "buku-buku" -> "buku".
        if word.contains('-') {
            let stems: Vec<String> = word
                .split('-')
                .filter(|part| !part.is_empty())
                .map(|part| self.stem_word(part))
                .collect();
            return match stems.split_first() {
                None => String::new(),
                Some((first, rest)) if rest.iter().all(|s| s == first) => first.clone(),
                Some(_) => stems.join("-"),
            };
        }

        if !word.bytes().all(|b| b.is_ascii_lowercase()) {
            return word.to_string();
        }

        let mut state = StemState::new(word);
        state.stem();
        state.word
    }
}

const FIRST_ORDER_DELETE: &[(&str, u8)] = &[
    ("meng", 1),
    ("peng", 3),
    ("men", 1),
    ("pen", 3),
    ("ter", 1),
    ("di", 1),
    ("me", 1),
    ("ke", 3),
];

fn is_vowel(b: u8) -> bool {
    matches!(b, b'a' | b'e' | b'i' | b'o' | b'u')
}

struct StemState {
    word: String,
    measure: usize,
    prefix: u8,
}

impl StemState {
    fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            measure: word.bytes().filter(|b| is_vowel(*b)).count(),
            prefix: 0,
        }
    }

    fn stem(&mut self) {
        if self.measure <= 2 {
            return;
        }
        self.remove_particle();
        if self.measure > 2 {
            self.remove_possessive_pronoun();
        }
        if self.measure <= 2 {
            return;
        }

        if self.remove_first_order_prefix() {
            if self.measure > 2 && self.remove_suffix() && self.measure > 2 {
                self.remove_second_order_prefix();
            }
        } else {
            self.remove_second_order_prefix();
            if self.measure > 2 {
                self.remove_suffix();
            }
        }
    }

    fn byte_at(&self, i: usize) -> Option<u8> {
        self.word.as_bytes().get(i).copied()
    }

    fn strip_suffix(&mut self, suffix: &str) -> bool {
        if self.word.len() > suffix.len() && self.word.ends_with(suffix) {
            self.word.truncate(self.word.len() - suffix.len());
            self.measure -= 1;
            true
        } else {
            false
        }
    }

    fn replace_prefix(&mut self, prefix: &str, with: &str) {
        self.word = format!("{}{}", with, &self.word[prefix.len()..]);
        self.measure -= 1;
    }

    fn remove_particle(&mut self) -> bool {
        ["kah", "lah", "pun"].iter().any(|s| self.strip_suffix(s))
    }

    fn remove_possessive_pronoun(&mut self) -> bool {
        ["nya", "ku", "mu"].iter().any(|s| self.strip_suffix(s))
    }

    fn remove_suffix(&mut self) -> bool {
        let prefix = self.prefix;
        if self.word.ends_with("kan") && prefix != 3 && prefix != 2 {
            return self.strip_suffix("kan");
        }
        if self.word.ends_with("an") && prefix != 1 {
            return self.strip_suffix("an");
        }
        if self.word.ends_with('i') && prefix <= 2 {
            let before = self.word.len().checked_sub(2).and_then(|i| self.byte_at(i));
            if before != Some(b's') {
                return self.strip_suffix("i");
            }
        }
        false
    }

    fn remove_first_order_prefix(&mut self) -> bool {
        // "meny"/"peny" + vowel become "s"; "mem"/"pem" + vowel become "p".
        for (head, prefix, len) in [("meny", 1, 4), ("peny", 3, 4), ("mem", 1, 3), ("pem", 3, 3)] {
            if !self.word.starts_with(head) || self.word.len() <= len {
                continue;
            }
            let next_is_vowel = self.byte_at(len).is_some_and(is_vowel);
            match (len, next_is_vowel) {
                (4, true) => {
                    self.replace_prefix(head, "s");
                    self.prefix = prefix;
                    return true;
                }
                // "meny" + consonant falls through to the shorter "men".
                (4, false) => continue,
                (_, true) => {
                    self.replace_prefix(head, "p");
                    self.prefix = prefix;
                    return true;
                }
                (_, false) => {
                    self.replace_prefix(head, "");
                    self.prefix = prefix;
                    return true;
                }
            }
        }

        for (head, prefix) in FIRST_ORDER_DELETE {
            if self.word.len() > head.len() && self.word.starts_with(head) {
                self.replace_prefix(head, "");
                self.prefix = *prefix;
                return true;
            }
        }
        false
    }

    fn remove_second_order_prefix(&mut self) -> bool {
        if self.word.starts_with("pelajar") {
            self.replace_prefix("pelajar", "ajar");
            return true;
        }
        if self.word.starts_with("belajar") {
            self.replace_prefix("belajar", "ajar");
            self.prefix = 4;
            return true;
        }
        for (head, prefix) in [("ber", 4), ("per", 2)] {
            if self.word.len() > head.len() && self.word.starts_with(head) {
                self.replace_prefix(head, "");
                self.prefix = prefix;
                return true;
            }
        }
        // "be" + consonant + "er", as in "bekerja".
        if self.word.starts_with("be")
            && self.byte_at(2).is_some_and(|b| !is_vowel(b))
            && self.word.get(3..5) == Some("er")
        {
            self.replace_prefix("be", "");
            self.prefix = 4;
            return true;
        }
        if self.word.len() > 2 && self.word.starts_with("pe") {
            self.replace_prefix("pe", "");
            self.prefix = 2;
            return true;
        }
        false
    }
}
