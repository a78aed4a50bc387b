//! User profile details.
//!
//! A profile belongs to exactly one user. Optional fields arrive as free text
//! from the settings form; blanks clear the field, everything else is
//! normalized before it is stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted full name, in characters.
pub const MAX_NAME_CHARS: usize = 120;

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

/// Profile validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Full name is blank.
    #[error("O nome completo é obrigatório.")]
    NameRequired,

    /// Full name exceeds [`MAX_NAME_CHARS`].
    #[error("O nome completo deve ter no máximo {MAX_NAME_CHARS} caracteres.")]
    NameTooLong,

    /// Birth date is after today.
    #[error("A data de nascimento não pode estar no futuro.")]
    BirthDateInFuture,

    /// Phone has foreign characters or a bad digit count.
    #[error("Telefone inválido.")]
    InvalidPhone,

    /// Not a CPF or CNPJ with matching verifier digits.
    #[error("CPF ou CNPJ inválido.")]
    InvalidDocument,

    /// Avatar URL is not http(s).
    #[error("A URL do avatar deve começar com http:// ou https://.")]
    InvalidAvatarUrl,
}

/// Raw values from the settings form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProfileDraft {
    /// Display name; required.
    pub full_name: String,
    /// Birth date.
    pub date_of_birth: Option<NaiveDate>,
    /// Phone as typed.
    pub phone_number: Option<String>,
    /// CPF or CNPJ as typed.
    pub document_number: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
}

/// Validated profile values, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInput {
    /// Trimmed display name.
    pub full_name: String,
    /// Birth date, never after the validation day.
    pub date_of_birth: Option<NaiveDate>,
    /// Digits only, with a leading `+` when one was typed.
    pub phone_number: Option<String>,
    /// CPF (11 digits) or CNPJ (14 digits), digits only.
    pub document_number: Option<String>,
    /// Trimmed http(s) URL.
    pub avatar_url: Option<String>,
}

impl ProfileDraft {
    /// Validates and normalizes the draft against `today`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProfileError`] found.
    pub fn validate(self, today: NaiveDate) -> Result<ProfileInput, ProfileError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ProfileError::NameRequired);
        }
        if full_name.chars().count() > MAX_NAME_CHARS {
            return Err(ProfileError::NameTooLong);
        }

        if self.date_of_birth.is_some_and(|birth| birth > today) {
            return Err(ProfileError::BirthDateInFuture);
        }

        let phone_number = non_blank(self.phone_number)
            .map(|raw| normalize_phone(&raw).ok_or(ProfileError::InvalidPhone))
            .transpose()?;

        let document_number = non_blank(self.document_number)
            .map(|raw| normalize_document(&raw).ok_or(ProfileError::InvalidDocument))
            .transpose()?;

        let avatar_url = non_blank(self.avatar_url);
        if avatar_url
            .as_deref()
            .is_some_and(|url| !url.starts_with("https://") && !url.starts_with("http://"))
        {
            return Err(ProfileError::InvalidAvatarUrl);
        }

        Ok(ProfileInput {
            full_name: full_name.to_string(),
            date_of_birth: self.date_of_birth,
            phone_number,
            document_number,
            avatar_url,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Strips formatting from a phone number. Accepts 10 to 15 digits with an
/// optional leading `+`.
#[must_use]
pub fn normalize_phone(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let (plus, rest) = match raw.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", raw),
    };
    if rest
        .chars()
        .any(|c| !c.is_ascii_digit() && !matches!(c, ' ' | '-' | '(' | ')' | '.'))
    {
        return None;
    }
    let digits: String = rest.chars().filter(char::is_ascii_digit).collect();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS)
        .contains(&digits.len())
        .then(|| format!("{plus}{digits}"))
}

/// Strips formatting from a CPF or CNPJ and checks its verifier digits.
#[must_use]
pub fn normalize_document(raw: &str) -> Option<String> {
    if raw
        .chars()
        .any(|c| !c.is_ascii_digit() && !matches!(c, ' ' | '.' | '-' | '/'))
    {
        return None;
    }
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    let valid = match digits.len() {
        11 => cpf_is_valid(&digits),
        14 => cnpj_is_valid(&digits),
        _ => false,
    };
    valid.then(|| digits.iter().map(u32::to_string).collect())
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn cpf_is_valid(digits: &[u32]) -> bool {
    if all_same(digits) {
        return false;
    }
    let check = |len: usize| {
        let sum: u32 = digits[..len].iter().rev().zip(2u32..).map(|(d, w)| d * w).sum();
        (sum * 10 % 11) % 10
    };
    check(9) == digits[9] && check(10) == digits[10]
}

fn cnpj_is_valid(digits: &[u32]) -> bool {
    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    if all_same(digits) {
        return false;
    }
    let check = |weights: &[u32]| {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            0 | 1 => 0,
            r => 11 - r,
        }
    };
    check(&FIRST) == digits[12] && check(&SECOND) == digits[13]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn draft(name: &str) -> ProfileDraft {
        ProfileDraft {
            full_name: name.to_string(),
            ..ProfileDraft::default()
        }
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let input = ProfileDraft {
            full_name: "  Maria Souza ".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 3, 1),
            phone_number: Some("+55 (11) 98765-4321".to_string()),
            document_number: Some("529.982.247-25".to_string()),
            avatar_url: Some(" https://cdn.example.com/a.png ".to_string()),
        }
        .validate(today())
        .unwrap();

        assert_eq!(input.full_name, "Maria Souza");
        assert_eq!(input.phone_number.as_deref(), Some("+5511987654321"));
        assert_eq!(input.document_number.as_deref(), Some("52998224725"));
        assert_eq!(input.avatar_url.as_deref(), Some("https://cdn.example.com/a.png"));
    }

    #[test]
    fn test_blank_optionals_clear() {
        let input = ProfileDraft {
            phone_number: Some("   ".to_string()),
            document_number: Some(String::new()),
            avatar_url: Some(" ".to_string()),
            ..draft("Ana")
        }
        .validate(today())
        .unwrap();

        assert_eq!(input.phone_number, None);
        assert_eq!(input.document_number, None);
        assert_eq!(input.avatar_url, None);
    }

    #[rstest]
    #[case("", ProfileError::NameRequired)]
    #[case("   ", ProfileError::NameRequired)]
    fn test_name_required(#[case] name: &str, #[case] expected: ProfileError) {
        assert_eq!(draft(name).validate(today()), Err(expected));
    }

    #[test]
    fn test_name_too_long() {
        let name = "a".repeat(MAX_NAME_CHARS + 1);
        assert_eq!(draft(&name).validate(today()), Err(ProfileError::NameTooLong));
    }

    #[test]
    fn test_birth_date_today_ok_tomorrow_rejected() {
        let ok = ProfileDraft {
            date_of_birth: Some(today()),
            ..draft("Ana")
        };
        assert!(ok.validate(today()).is_ok());

        let future = ProfileDraft {
            date_of_birth: today().succ_opt(),
            ..draft("Ana")
        };
        assert_eq!(future.validate(today()), Err(ProfileError::BirthDateInFuture));
    }

    #[rstest]
    #[case("11987654321", Some("11987654321"))]
    #[case("(11) 3333-4444", Some("1133334444"))]
    #[case("+1 202 555 0100", Some("+12025550100"))]
    #[case("123456789", None)]
    #[case("1234567890123456", None)]
    #[case("11 9876x4321", None)]
    #[case("++5511987654321", None)]
    fn test_normalize_phone(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_phone(raw).as_deref(), expected);
    }

    #[rstest]
    #[case("529.982.247-25", Some("52998224725"))]
    #[case("52998224725", Some("52998224725"))]
    #[case("11.222.333/0001-81", Some("11222333000181"))]
    #[case("529.982.247-24", None)]
    #[case("11.222.333/0001-80", None)]
    #[case("111.111.111-11", None)]
    #[case("1234567", None)]
    #[case("529.982.247-2a", None)]
    fn test_normalize_document(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(normalize_document(raw).as_deref(), expected);
    }

    #[test]
    fn test_invalid_avatar_url() {
        let d = ProfileDraft {
            avatar_url: Some("ftp://host/a.png".to_string()),
            ..draft("Ana")
        };
        assert_eq!(d.validate(today()), Err(ProfileError::InvalidAvatarUrl));
    }
}
