// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic wildcard detection
//!
//! A topic name is treated as a pattern when it contains one of `*`, `?` or `.`
//! that is not preceded by the escape marker `\`.
//!
//! The scan compares each character from index 1 onwards with its predecessor, so a
//! special character in the first position is never reported.

const WILDCARD_CHARS: [char; 3] = ['*', '?', '.'];
const ESCAPE: char = '\\';

/// Returns true when `topic` contains an unescaped wildcard character
pub fn has_wildcard(topic: &str) -> bool {
    let chars: Vec<char> = topic.chars().collect();
    let Some(&first) = chars.first() else {
        return false;
    };

    let mut found = false;
    for special in WILDCARD_CHARS {
        let mut prev = first;
        for &current in &chars[1..] {
            if current == special && prev != ESCAPE {
                found = true;
                break;
            }
            prev = current;
        }
    }
    found
}
