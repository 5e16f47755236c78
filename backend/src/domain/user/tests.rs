//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn ada() -> User {
    User::new(
        UserId::new(7),
        Username::new("ada").expect("valid username"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        FullName::from_parts(Some("Ada"), Some("Lovelace")).expect("valid name"),
    )
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
fn username_rejects_blank(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(input), Err(expected));
}

#[test]
fn username_rejects_overlong_values() {
    let err = Username::new("a".repeat(USERNAME_MAX + 1)).expect_err("too long");
    assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
}

#[test]
fn username_is_trimmed() {
    let username = Username::new("  grace  ").expect("valid username");
    assert_eq!(username.as_ref(), "grace");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("  ", UserValidationError::EmptyEmail)]
fn email_rejects_blank(#[case] input: &str, #[case] expected: UserValidationError) {
    assert_eq!(EmailAddress::new(input), Err(expected));
}

#[rstest]
#[case(Some("Jo"), None)]
#[case(None, Some("Doe"))]
fn name_requires_both_parts(#[case] first: Option<&str>, #[case] last: Option<&str>) {
    assert_eq!(
        FullName::from_parts(first, last),
        Err(UserValidationError::IncompleteName)
    );
}

#[rstest]
#[case(Some("Jo3"), Some("Doe"), NameField::First)]
#[case(Some("Jo"), Some("D0e"), NameField::Last)]
#[case(Some("Jo"), Some("Doe٣"), NameField::Last)]
fn name_rejects_digits(
    #[case] first: Option<&str>,
    #[case] last: Option<&str>,
    #[case] field: NameField,
) {
    assert_eq!(
        FullName::from_parts(first, last),
        Err(UserValidationError::NameContainsDigit { field })
    );
}

#[test]
fn stored_empty_names_are_absent() {
    assert_eq!(FullName::from_stored("", ""), Ok(None));
    assert!(matches!(FullName::from_stored("Ada", "Lovelace"), Ok(Some(_))));
}

#[rstest]
fn user_serialises_with_flat_names(ada: User) {
    let value = serde_json::to_value(&ada).expect("serialise user");
    assert_eq!(
        value,
        json!({
            "id": 7,
            "username": "ada",
            "email": "ada@example.com",
            "first_name": "Ada",
            "last_name": "Lovelace",
        })
    );
}

#[test]
fn user_without_name_serialises_empty_strings() {
    let user = User::new(
        UserId::new(1),
        Username::new("bob").expect("valid username"),
        EmailAddress::new("bob@example.com").expect("valid email"),
        None,
    );
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(value["first_name"], "");
    assert_eq!(value["last_name"], "");
}

#[test]
fn validation_errors_become_invalid_request() {
    let err: Error = UserValidationError::NameContainsDigit {
        field: NameField::First,
    }
    .into();
    assert_eq!(err.code(), crate::domain::ErrorCode::InvalidRequest);
    assert_eq!(
        err.details(),
        Some(&json!({ "field": "first_name", "code": "contains_digit" }))
    );
}
