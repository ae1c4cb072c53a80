//! Field name tokenizing.
//!
//! Converts source field names into upper-case, underscore-separated
//! constant names and derives enum variant names from those.

#[derive(Clone, Copy)]
enum State {
    FirstLetter,
    LowerCase,
    UpperCase,
}

/// Converts a field name into its constant form.
///
/// A separator goes before an upper-case letter that follows a lower-case
/// letter or a digit, and before an upper-case letter that is itself followed
/// by a lower-case letter. Runs of upper-case letters stay together:
/// `someDTOCrazy` becomes `SOME_DTO_CRAZY`. Existing underscores are kept,
/// so `last_name` becomes `LAST_NAME`.
pub fn constant_case(name: &str) -> String {
    let characters: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);
    let mut state = State::FirstLetter;

    for (index, &character) in characters.iter().enumerate() {
        match state {
            State::FirstLetter => {
                state = if character.is_uppercase() {
                    State::UpperCase
                } else {
                    State::LowerCase
                };
            }
            State::UpperCase => {
                if character.is_uppercase() {
                    let next_is_lower = characters
                        .get(index + 1)
                        .is_some_and(|next| next.is_lowercase());
                    if next_is_lower {
                        result.push('_');
                    }
                } else {
                    state = State::LowerCase;
                }
            }
            State::LowerCase => {
                if character.is_uppercase() {
                    result.push('_');
                    state = State::UpperCase;
                }
            }
        }
        result.extend(character.to_uppercase());
    }

    result
}

/// Converts a constant name (`LAST_NAME`) into a variant name (`LastName`).
pub fn pascal_case(constant_name: &str) -> String {
    constant_name
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut characters = word.chars();
            characters.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(characters.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect()
}
