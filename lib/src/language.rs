/// Describes the letters and word length of one flavour of the game, plus how words should be
/// presented to and read from a person.
///
/// Words inside a [`WordBank`](crate::WordBank) and everything the solver computes use the
/// canonical spelling. `normalize` converts between the canonical spelling and the one a person
/// types or expects to see, and is its own inverse.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    pub name: &'static str,
    /// Every letter a word may contain.
    pub alphabet: &'static str,
    pub word_length: usize,
    pub normalize: fn(&str) -> String,
}

const ENGLISH_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
const HEBREW_LETTERS: &str = "אבגדהוזחטיכלמנסעפצקרשת";

/// Pairs of (final form, regular form) for the Hebrew letters that change shape at the end of a
/// word.
const HEBREW_FINAL_FORMS: [(char, char); 5] = [
    ('ך', 'כ'),
    ('ם', 'מ'),
    ('ן', 'נ'),
    ('ף', 'פ'),
    ('ץ', 'צ'),
];

impl Language {
    pub fn english() -> Language {
        Language {
            name: "english",
            alphabet: ENGLISH_LETTERS,
            word_length: 5,
            normalize: str::to_owned,
        }
    }

    /// Hebrew words are stored with only the 22 regular letters. When a word is shown to or typed
    /// by a person, its last letter switches between regular and final form.
    ///
    /// ```
    /// use wordle_entropy_solver::Language;
    ///
    /// let hebrew = Language::hebrew();
    /// assert_eq!(hebrew.display("מילות"), "מילות");
    /// assert_eq!(hebrew.display("שלומ"), "שלום");
    /// assert_eq!(hebrew.display("שלום"), "שלומ");
    /// ```
    pub fn hebrew() -> Language {
        Language {
            name: "hebrew",
            alphabet: HEBREW_LETTERS,
            word_length: 5,
            normalize: toggle_hebrew_final_letter,
        }
    }

    /// Looks up a built-in language by name, ignoring case.
    pub fn by_name(name: &str) -> Option<Language> {
        [Language::english(), Language::hebrew()]
            .into_iter()
            .find(|language| language.name.eq_ignore_ascii_case(name))
    }

    /// Returns `true` iff `letter` is part of this language's alphabet.
    pub fn contains(&self, letter: char) -> bool {
        self.alphabet.contains(letter)
    }

    /// Applies this language's normalization to `word`.
    pub fn display(&self, word: &str) -> String {
        (self.normalize)(word)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::english()
    }
}

fn toggle_hebrew_final_letter(word: &str) -> String {
    let mut chars = word.chars();
    let Some(last) = chars.next_back() else {
        return String::new();
    };
    let toggled = HEBREW_FINAL_FORMS.iter().find_map(|(final_form, regular)| {
        if last == *final_form {
            Some(*regular)
        } else if last == *regular {
            Some(*final_form)
        } else {
            None
        }
    });
    let mut normalized: String = chars.collect();
    normalized.push(toggled.unwrap_or(last));
    normalized
}
