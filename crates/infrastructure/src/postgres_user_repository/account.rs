use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUserRecord) -> AppResult<UserId> {
        let user_id = UserId::new();

        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, password_hash)
            VALUES ($1, $2, LOWER($3), $4)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(user.full_name)
        .bind(user.email.as_str())
        .bind(user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        Ok(user_id)
    }

    pub(super) async fn update_password_impl(
        &self,
        email: &str,
        password_hash: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{email}' does not exist")));
        }

        Ok(())
    }
}
