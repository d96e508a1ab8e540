//! Database repository for student record operations.
//!
//! Provides CRUD, search/pagination, and aggregate-count queries over the
//! `students` table. Uniqueness of email and enrollment number is enforced
//! here through explicit existence checks backed by UNIQUE constraints.

use crate::api::common::StudentListFilter;
use crate::database::models::{Student, StudentStatus};
use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// Repository for student database operations.
pub struct StudentRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> StudentRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a fully-populated student row.
    pub async fn insert(&self, student: &Student) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO students (
                id, name, email, enrollment_number, password_hash,
                mother_name, course, mother_tongue, year,
                religion, caste, nationality, place_of_birth, date_of_birth,
                institute_last_attended, date_of_admission, branch, class_and_year,
                status, personal_details, certificate_generated,
                certificate_generated_date, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.enrollment_number)
        .bind(&student.password_hash)
        .bind(&student.mother_name)
        .bind(&student.course)
        .bind(&student.mother_tongue)
        .bind(&student.year)
        .bind(&student.religion)
        .bind(&student.caste)
        .bind(&student.nationality)
        .bind(&student.place_of_birth)
        .bind(student.date_of_birth)
        .bind(&student.institute_last_attended)
        .bind(student.date_of_admission)
        .bind(&student.branch)
        .bind(&student.class_and_year)
        .bind(student.status)
        .bind(&student.personal_details)
        .bind(student.certificate_generated)
        .bind(student.certificate_generated_date)
        .bind(student.created_at)
        .bind(student.updated_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Writes back every mutable column of an existing row. Last write wins;
    /// there is no optimistic concurrency token.
    pub async fn save(&self, student: &Student) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE students SET
                name = ?, email = ?, enrollment_number = ?, password_hash = ?,
                mother_name = ?, course = ?, mother_tongue = ?, year = ?,
                religion = ?, caste = ?, nationality = ?, place_of_birth = ?,
                date_of_birth = ?, institute_last_attended = ?, date_of_admission = ?,
                branch = ?, class_and_year = ?, status = ?, personal_details = ?,
                certificate_generated = ?, certificate_generated_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.enrollment_number)
        .bind(&student.password_hash)
        .bind(&student.mother_name)
        .bind(&student.course)
        .bind(&student.mother_tongue)
        .bind(&student.year)
        .bind(&student.religion)
        .bind(&student.caste)
        .bind(&student.nationality)
        .bind(&student.place_of_birth)
        .bind(student.date_of_birth)
        .bind(&student.institute_last_attended)
        .bind(student.date_of_admission)
        .bind(&student.branch)
        .bind(&student.class_and_year)
        .bind(student.status)
        .bind(&student.personal_details)
        .bind(student.certificate_generated)
        .bind(student.certificate_generated_date)
        .bind(student.updated_at)
        .bind(&student.id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(student)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE email = ?")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(student)
    }

    /// Checks whether a student already claims the email or enrollment
    /// number. Both are globally unique.
    pub async fn email_or_enrollment_exists(
        &self,
        email: &str,
        enrollment_number: &str,
    ) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students WHERE email = ? OR enrollment_number = ?",
        )
        .bind(email)
        .bind(enrollment_number)
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Retrieves a page of students matching the filter, newest first.
    pub async fn list(&self, filter: &StudentListFilter) -> Result<Vec<Student>> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM students");
        Self::push_filter(&mut builder, filter);

        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(filter.limit() as i64);
        builder.push(" OFFSET ");
        builder.push_bind(filter.offset() as i64);

        let students = builder
            .build_query_as::<Student>()
            .fetch_all(self.pool)
            .await?;

        Ok(students)
    }

    /// Total count of students matching the filter, ignoring pagination.
    pub async fn count(&self, filter: &StudentListFilter) -> Result<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM students");
        Self::push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(self.pool).await?;
        Ok(count as u64)
    }

    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &StudentListFilter) {
        let mut has_where = false;

        if let Some(search) = filter.search_pattern() {
            builder.push(" WHERE (LOWER(name) LIKE ");
            builder.push_bind(search.clone());
            builder.push(" OR LOWER(email) LIKE ");
            builder.push_bind(search.clone());
            builder.push(" OR LOWER(enrollment_number) LIKE ");
            builder.push_bind(search);
            builder.push(")");
            has_where = true;
        }

        if let Some(status) = filter.status {
            builder.push(if has_where { " AND " } else { " WHERE " });
            builder.push("status = ");
            builder.push_bind(status);
        }
    }

    /// Hard delete. Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_all(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
            .fetch_one(self.pool)
            .await?;
        Ok(count as u64)
    }

    pub async fn count_by_status(&self, status: StudentStatus) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE status = ?")
            .bind(status)
            .fetch_one(self.pool)
            .await?;
        Ok(count as u64)
    }

    pub async fn count_certificates_generated(&self) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE certificate_generated = 1")
                .fetch_one(self.pool)
                .await?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::PersonalDetails;
    use crate::database::test_pool;
    use chrono::Utc;
    use sqlx::types::Json;

    fn fixture(id: &str, email: &str, enrollment: &str) -> Student {
        let now = Utc::now();
        Student {
            id: id.to_string(),
            name: "ALICE".to_string(),
            email: email.to_string(),
            enrollment_number: enrollment.to_string(),
            password_hash: "hash".to_string(),
            mother_name: "MOTHER".to_string(),
            course: "CS".to_string(),
            mother_tongue: "Gujarati".to_string(),
            year: "2024".to_string(),
            religion: "Hindu".to_string(),
            caste: "OBC".to_string(),
            nationality: "Indian".to_string(),
            place_of_birth: "Mumbai".to_string(),
            date_of_birth: now,
            institute_last_attended: "ABC High School, Mumbai".to_string(),
            date_of_admission: now,
            branch: "CS".to_string(),
            class_and_year: "2024".to_string(),
            status: StudentStatus::Pending,
            personal_details: Json(PersonalDetails::default()),
            certificate_generated: false,
            certificate_generated_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch_roundtrip() {
        let pool = test_pool().await;
        let repo = StudentRepository::new(&pool);

        let student = fixture("s1", "a@b.com", "EN001");
        repo.insert(&student).await.unwrap();

        let fetched = repo.get_by_id("s1").await.unwrap().unwrap();
        assert_eq!(fetched.name, "ALICE");
        assert_eq!(fetched.email, "a@b.com");
        assert_eq!(fetched.enrollment_number, "EN001");
        assert_eq!(fetched.status, StudentStatus::Pending);
        assert!(!fetched.certificate_generated);

        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_uniqueness_check() {
        let pool = test_pool().await;
        let repo = StudentRepository::new(&pool);

        repo.insert(&fixture("s1", "a@b.com", "EN001"))
            .await
            .unwrap();

        assert!(
            repo.email_or_enrollment_exists("a@b.com", "EN999")
                .await
                .unwrap()
        );
        assert!(
            repo.email_or_enrollment_exists("x@y.com", "EN001")
                .await
                .unwrap()
        );
        assert!(
            !repo
                .email_or_enrollment_exists("x@y.com", "EN999")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_delete_is_hard() {
        let pool = test_pool().await;
        let repo = StudentRepository::new(&pool);

        repo.insert(&fixture("s1", "a@b.com", "EN001"))
            .await
            .unwrap();

        assert!(repo.delete("s1").await.unwrap());
        assert!(repo.get_by_id("s1").await.unwrap().is_none());
        assert!(!repo.delete("s1").await.unwrap());
    }
}
