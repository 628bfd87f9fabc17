use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::warn;

use crate::errors::AppError;
use crate::jobs::query::ListQuery;
use crate::models::job::{JobRow, NewJob};

/// Builds the list statement. The status filter is always a bound parameter;
/// only the whitelisted sort column and direction are spliced into the text.
pub fn build_list_query(query: &ListQuery) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("SELECT * FROM jobs");
    if let Some(status) = &query.status {
        builder.push(" WHERE status = ").push_bind(status.clone());
    }
    builder.push(format!(
        " ORDER BY {} {}, id ASC",
        query.sort_key.column(),
        query.order.as_sql()
    ));
    builder
}

/// Returns every job matching the filter, in the requested order.
pub async fn list_jobs(pool: &SqlitePool, query: &ListQuery) -> Result<Vec<JobRow>, AppError> {
    let mut builder = build_list_query(query);
    let jobs = builder.build_query_as::<JobRow>().fetch_all(pool).await?;
    Ok(jobs)
}

pub async fn get_job(pool: &SqlitePool, id: i64) -> Result<JobRow, AppError> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// Inserts a new job and returns the id SQLite assigned to it.
pub async fn insert_job(pool: &SqlitePool, job: &NewJob) -> Result<i64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO jobs
            (company, job_title, status, application_link, notes, date_applied, location, source)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&job.company)
    .bind(&job.job_title)
    .bind(&job.status)
    .bind(&job.application_link)
    .bind(&job.notes)
    .bind(job.date_applied_str())
    .bind(&job.location)
    .bind(&job.source)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Overwrites every mutable column of an existing job. No partial merge:
/// optional fields absent from `job` are cleared.
pub async fn update_job(pool: &SqlitePool, id: i64, job: &NewJob) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        UPDATE jobs SET
            company = ?,
            job_title = ?,
            status = ?,
            application_link = ?,
            notes = ?,
            date_applied = ?,
            location = ?,
            source = ?
        WHERE id = ?
        "#,
    )
    .bind(&job.company)
    .bind(&job.job_title)
    .bind(&job.status)
    .bind(&job.application_link)
    .bind(&job.notes)
    .bind(job.date_applied_str())
    .bind(&job.location)
    .bind(&job.source)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(())
}

/// Sets only the status column, inside an explicit transaction that is rolled
/// back if the statement fails.
pub async fn update_status(pool: &SqlitePool, id: i64, status: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let outcome = sqlx::query("UPDATE jobs SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(&mut *tx)
        .await;

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed status update of job {id} failed: {rollback_err}");
            }
            return Err(AppError::Database(e));
        }
    };

    tx.commit().await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(())
}

/// Permanently removes a job. `NotFound` if nothing was deleted.
pub async fn delete_job(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::db::test_pool;
    use crate::jobs::query::{SortKey, SortOrder};

    fn new_job(company: &str, title: &str, status: &str, date: &str) -> NewJob {
        NewJob {
            company: company.to_string(),
            job_title: title.to_string(),
            status: status.to_string(),
            application_link: None,
            notes: None,
            date_applied: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            location: None,
            source: None,
        }
    }

    async fn seed(pool: &SqlitePool) {
        for job in [
            new_job("Initech", "Analyst", "Applied", "2024-02-10"),
            new_job("Acme", "Engineer", "Interview", "2024-01-01"),
            new_job("Globex", "Designer", "Rejected", "2024-03-05"),
            new_job("Hooli", "Engineer", "Applied", "2023-12-24"),
        ] {
            insert_job(pool, &job).await.unwrap();
        }
    }

    fn list_query(sort_key: SortKey, order: SortOrder) -> ListQuery {
        ListQuery {
            status: None,
            sort_key,
            order,
        }
    }

    fn column_value(job: &JobRow, key: SortKey) -> &str {
        match key {
            SortKey::Company => &job.company,
            SortKey::JobTitle => &job.job_title,
            SortKey::Status => &job.status,
            SortKey::DateApplied => &job.date_applied,
        }
    }

    #[test]
    fn test_list_query_binds_status() {
        let query = ListQuery {
            status: Some("x' OR '1'='1".to_string()),
            ..Default::default()
        };
        let builder = build_list_query(&query);
        let sql = builder.sql();
        assert!(sql.contains("WHERE status = ?"));
        assert!(!sql.contains("OR '1'='1"));
        assert!(sql.ends_with("ORDER BY date_applied DESC, id ASC"));
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let pool = test_pool().await;
        let mut job = new_job("Acme", "Engineer", "Applied", "2024-01-01");
        job.application_link = Some("https://acme.example/careers/42".to_string());
        job.notes = Some("Phone screen booked".to_string());
        job.location = Some("Berlin".to_string());
        job.source = Some("Referral".to_string());

        let id = insert_job(&pool, &job).await.unwrap();
        assert_eq!(id, 1);

        let row = get_job(&pool, id).await.unwrap();
        assert_eq!(
            row,
            JobRow {
                id: 1,
                company: "Acme".to_string(),
                job_title: "Engineer".to_string(),
                status: "Applied".to_string(),
                application_link: Some("https://acme.example/careers/42".to_string()),
                notes: Some("Phone screen booked".to_string()),
                date_applied: "2024-01-01".to_string(),
                location: Some("Berlin".to_string()),
                source: Some("Referral".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_identical_inserts_get_distinct_ids() {
        let pool = test_pool().await;
        let job = new_job("Acme", "Engineer", "Applied", "2024-01-01");
        let first = insert_job(&pool, &job).await.unwrap();
        let second = insert_job(&pool, &job).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(list_jobs(&pool, &ListQuery::default()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let pool = test_pool().await;
        let job = new_job("Acme", "Engineer", "Applied", "2024-01-01");
        let first = insert_job(&pool, &job).await.unwrap();
        delete_job(&pool, first).await.unwrap();
        let second = insert_job(&pool, &job).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(get_job(&pool, 99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_every_sort_is_monotonic() {
        let pool = test_pool().await;
        seed(&pool).await;

        for key in SortKey::ALL {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let jobs = list_jobs(&pool, &list_query(key, order)).await.unwrap();
                assert_eq!(jobs.len(), 4);
                for pair in jobs.windows(2) {
                    let (a, b) = (column_value(&pair[0], key), column_value(&pair[1], key));
                    match order {
                        SortOrder::Asc => assert!(a <= b, "{key:?} ASC: {a} > {b}"),
                        SortOrder::Desc => assert!(a >= b, "{key:?} DESC: {a} < {b}"),
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_default_order_is_newest_first() {
        let pool = test_pool().await;
        seed(&pool).await;
        let jobs = list_jobs(&pool, &ListQuery::default()).await.unwrap();
        let dates: Vec<_> = jobs.iter().map(|j| j.date_applied.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2024-03-05", "2024-02-10", "2024-01-01", "2023-12-24"]
        );
    }

    #[tokio::test]
    async fn test_status_filter_returns_exact_subset() {
        let pool = test_pool().await;
        seed(&pool).await;
        let query = ListQuery {
            status: Some("Applied".to_string()),
            sort_key: SortKey::Company,
            order: SortOrder::Asc,
        };
        let jobs = list_jobs(&pool, &query).await.unwrap();
        let companies: Vec<_> = jobs.iter().map(|j| j.company.as_str()).collect();
        assert_eq!(companies, vec!["Hooli", "Initech"]);
        assert!(jobs.iter().all(|j| j.status == "Applied"));
    }

    #[tokio::test]
    async fn test_status_filter_is_exact_match() {
        let pool = test_pool().await;
        seed(&pool).await;
        let query = ListQuery {
            status: Some("applied".to_string()),
            ..Default::default()
        };
        assert!(list_jobs(&pool, &query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_job_overwrites_all_fields() {
        let pool = test_pool().await;
        let mut original = new_job("Acme", "Engineer", "Applied", "2024-01-01");
        original.notes = Some("first notes".to_string());
        original.location = Some("Berlin".to_string());
        let id = insert_job(&pool, &original).await.unwrap();

        let mut edited = new_job("Acme Corp", "Senior Engineer", "Offer", "2024-01-15");
        edited.source = Some("Careers page".to_string());
        update_job(&pool, id, &edited).await.unwrap();

        let row = get_job(&pool, id).await.unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.company, "Acme Corp");
        assert_eq!(row.job_title, "Senior Engineer");
        assert_eq!(row.status, "Offer");
        assert_eq!(row.date_applied, "2024-01-15");
        assert_eq!(row.notes, None);
        assert_eq!(row.location, None);
        assert_eq!(row.source.as_deref(), Some("Careers page"));
    }

    #[tokio::test]
    async fn test_update_unknown_job_is_not_found() {
        let pool = test_pool().await;
        let job = new_job("Acme", "Engineer", "Applied", "2024-01-01");
        assert!(matches!(
            update_job(&pool, 5, &job).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status_changes_only_status() {
        let pool = test_pool().await;
        let id = insert_job(&pool, &new_job("Acme", "Engineer", "Applied", "2024-01-01"))
            .await
            .unwrap();

        update_status(&pool, id, "Interview").await.unwrap();

        let row = get_job(&pool, id).await.unwrap();
        assert_eq!(row.status, "Interview");
        assert_eq!(row.company, "Acme");
        assert_eq!(row.date_applied, "2024-01-01");
    }

    #[tokio::test]
    async fn test_update_status_unknown_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            update_status(&pool, 3, "Offer").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_status_storage_failure_is_database_error() {
        let pool = test_pool().await;
        sqlx::query("DROP TABLE jobs").execute(&pool).await.unwrap();
        assert!(matches!(
            update_status(&pool, 1, "Offer").await,
            Err(AppError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let pool = test_pool().await;
        seed(&pool).await;
        delete_job(&pool, 2).await.unwrap();

        let jobs = list_jobs(&pool, &ListQuery::default()).await.unwrap();
        assert_eq!(jobs.len(), 3);
        assert!(jobs.iter().all(|j| j.id != 2));
    }

    #[tokio::test]
    async fn test_delete_unknown_leaves_table_unchanged() {
        let pool = test_pool().await;
        seed(&pool).await;
        assert!(matches!(delete_job(&pool, 42).await, Err(AppError::NotFound(_))));
        assert_eq!(list_jobs(&pool, &ListQuery::default()).await.unwrap().len(), 4);
    }
}
