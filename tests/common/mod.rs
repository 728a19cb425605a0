use mentorship_portal_server::models::{Mentor, Student};
use mentorship_portal_server::storage::Storage;

/// A minimal contract test suite every `Storage` backend must satisfy.
///
/// Keeps backend parity honest should another backend join the SQLx one.
pub async fn run_storage_contract(storage: &dyn Storage) -> Result<(), Box<dyn std::error::Error>> {
    // Student roundtrip
    let student = Student::new(
        "octocat".to_string(),
        "The Octocat".to_string(),
        "octocat@example.com".to_string(),
    );

    storage
        .save_student(&student)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let fetched = storage
        .get_student_by_username("octocat")
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
        .ok_or_else(|| std::io::Error::other("student should exist"))?;

    assert_eq!(fetched.username, student.username);
    assert_eq!(fetched.name, student.name);
    assert_eq!(fetched.email, student.email);

    // Unknown username is absent, not an error.
    let missing = storage
        .get_student_by_username("nobody")
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    assert!(missing.is_none());

    // Uniqueness parity: saving the same username twice should fail.
    let dup = Student::new(
        "octocat".to_string(),
        "Impostor".to_string(),
        "impostor@example.com".to_string(),
    );
    assert!(
        storage.save_student(&dup).await.is_err(),
        "saving the same student username twice should fail"
    );

    // Mentor roundtrip
    let mentor = Mentor::new(
        "hubber".to_string(),
        "Hubber".to_string(),
        "hubber@example.com".to_string(),
    );

    storage
        .save_mentor(&mentor)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let fetched_mentor = storage
        .get_mentor_by_username("hubber")
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?
        .ok_or_else(|| std::io::Error::other("mentor should exist"))?;

    assert_eq!(fetched_mentor.username, mentor.username);

    // Role separation: a mentor row must not satisfy a student lookup and
    // vice versa.
    let cross = storage
        .get_student_by_username("hubber")
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    assert!(cross.is_none(), "mentor row leaked into student lookup");

    let cross = storage
        .get_mentor_by_username("octocat")
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    assert!(cross.is_none(), "student row leaked into mentor lookup");

    storage
        .healthcheck()
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    Ok(())
}
