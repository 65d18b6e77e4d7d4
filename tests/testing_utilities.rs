//! Tests and examples for the testing utilities.
//!
//! This suite shows the patterns the `testing` module supports for code
//! built on outcomes.

use upshot::prelude::*;
use upshot::testing::CountingResource;
use upshot::{assert_failure, assert_failure_message, assert_success};

// Example domain types for testing
#[derive(Debug, Clone, PartialEq)]
struct User {
    email: String,
    age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SignupError {
    None,
    BadEmail,
    Underage,
}

impl FailureCode for SignupError {
    const NONE: Self = SignupError::None;
}

// Validation functions
fn validate_email(email: &str) -> Outcome<String> {
    if email.contains('@') && email.contains('.') {
        Outcome::success(email.to_string())
    } else {
        Outcome::failure("Email must contain @ and .")
    }
}

fn validate_age(age: u32) -> Outcome<u32> {
    if age >= 18 {
        Outcome::success(age)
    } else {
        Outcome::failure("Must be 18 or older")
    }
}

fn validate_user(email: &str, age: u32) -> Outcome<User> {
    validate_email(email)
        .and(validate_age(age))
        .map(|(email, age)| User { email, age })
}

fn coded_signup(email: &str, age: u32) -> CodedOutcome<User, SignupError> {
    validate_email(email)
        .to_coded(SignupError::BadEmail)
        .bind(|email| {
            validate_age(age)
                .to_coded(SignupError::Underage)
                .map(|age| User { email, age })
        })
}

// Tests demonstrating assertion macros

#[test]
fn test_assert_success_with_valid_email() {
    let email = assert_success!(validate_email("user@example.com"));
    assert_eq!(email, "user@example.com");
}

#[test]
fn test_assert_failure_with_invalid_email() {
    let failure = assert_failure!(validate_email("invalid"));
    assert_eq!(failure.message(), "Email must contain @ and .");
}

#[test]
fn test_assert_failure_message() {
    assert_failure_message!(validate_age(15), "Must be 18 or older");
}

#[test]
fn test_accumulating_multiple_failures() {
    let failure = assert_failure!(validate_user("invalid", 15));
    assert_eq!(
        failure.message(),
        "Email must contain @ and .\nMust be 18 or older"
    );
}

#[test]
fn test_successful_user_validation() {
    let user = assert_success!(validate_user("user@example.com", 25));
    assert_eq!(user.email, "user@example.com");
    assert_eq!(user.age, 25);
}

#[test]
fn test_assertion_macros_on_coded_outcomes() {
    let failure = assert_failure!(coded_signup("user@example.com", 12));
    assert_eq!(failure.code(), SignupError::Underage);

    assert_failure_message!(coded_signup("nobody", 30), "Email must contain @ and .");
    assert_success!(coded_signup("user@example.com", 30));
}

#[test]
#[should_panic(expected = "Expected Failure with message")]
fn test_assert_failure_message_rejects_success() {
    assert_failure_message!(validate_age(30), "Must be 18 or older");
}

// Tests demonstrating CountingResource

#[test]
fn test_counting_resource_released_once_by_using() {
    let (resource, released) = CountingResource::tracked("users-db");

    let outcome = using(
        move || resource,
        |db| match db.read() {
            Ok(label) => Outcome::success(label),
            Err(fault) => Outcome::from_fault(&fault, ""),
        },
    );

    assert_eq!(assert_success!(outcome), "users-db");
    assert_eq!(released.count(), 1);
}

#[test]
fn test_counting_resource_released_when_body_panics() {
    let (resource, released) = CountingResource::tracked("users-db");

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        using(move || resource, |_| -> Outcome<()> { panic!("body blew up") })
    }));

    assert!(result.is_err());
    assert_eq!(released.count(), 1);
}

#[test]
fn test_failing_resource_caught_as_failure() {
    let (resource, released) = CountingResource::failing("archive");

    let outcome = catch_value::<std::io::Error, _, Failure, _>(
        || using(move || resource, |r| r.read()),
        "opening archive",
    )
    .unwrap();

    assert_failure!(outcome.as_ref());
    assert!(outcome.error_message().contains("archive is unreadable"));
    assert_eq!(released.count(), 1);
}

#[cfg(feature = "proptest")]
mod arbitrary_outcomes {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bind_never_runs_on_generated_failures(outcome in any::<Outcome<u8>>()) {
            let mut ran = false;
            let next = outcome.clone().bind(|x| {
                ran = true;
                Outcome::success(u16::from(x))
            });
            prop_assert_eq!(ran, outcome.is_success());
            prop_assert_eq!(next.error_message(), outcome.error_message());
        }
    }
}
