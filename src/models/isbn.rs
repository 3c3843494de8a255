//! ISBN checksum validation

use std::borrow::Cow;

use validator::ValidationError;

/// Strip the separators allowed inside an ISBN
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Check an ISBN-10 (the last character may be `X`)
pub fn is_isbn10(isbn: &str) -> bool {
    let digits = normalize_isbn(isbn);
    if digits.len() != 10 {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in digits.chars().enumerate() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'X' | 'x' if i == 9 => 10,
            _ => return false,
        };
        sum += (10 - i as u32) * value;
    }
    sum % 11 == 0
}

/// Check an ISBN-13
pub fn is_isbn13(isbn: &str) -> bool {
    let digits = normalize_isbn(isbn);
    if digits.len() != 13 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = digits
        .bytes()
        .enumerate()
        .map(|(i, b)| {
            let d = (b - b'0') as u32;
            if i % 2 == 0 { d } else { d * 3 }
        })
        .sum();
    sum % 10 == 0
}

fn isbn_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("isbn");
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validator hook: ISBN-13 only
pub fn validate_isbn13(isbn: &str) -> Result<(), ValidationError> {
    if is_isbn13(isbn) {
        Ok(())
    } else {
        Err(isbn_error("ISBN must be a valid 13-digit number"))
    }
}

/// Validator hook: ISBN-10 or ISBN-13
pub fn validate_isbn(isbn: &str) -> Result<(), ValidationError> {
    if is_isbn13(isbn) || is_isbn10(isbn) {
        Ok(())
    } else {
        Err(isbn_error("isbn must be an ISBN"))
    }
}
