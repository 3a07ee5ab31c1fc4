//! Shows repository (primary database)

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::{NewShow, ShowRow};
use crate::models::ShowFilter;

const COLUMNS: &str = "id, title, year, difficulty, duration, description, thumbnail_url, \
                       composer, song_title, created_at";

/// Insert a show and return the stored row
pub async fn insert(pool: &PgPool, show: &NewShow) -> Result<ShowRow, sqlx::Error> {
    let row = sqlx::query_as::<_, ShowRow>(
        r#"
        INSERT INTO shows (title, year, difficulty, duration, description,
                           thumbnail_url, composer, song_title)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, title, year, difficulty, duration, description,
                  thumbnail_url, composer, song_title, created_at
        "#,
    )
    .bind(&show.title)
    .bind(show.year)
    .bind(&show.difficulty)
    .bind(&show.duration)
    .bind(&show.description)
    .bind(&show.thumbnail_url)
    .bind(&show.composer)
    .bind(&show.song_title)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Get a show by id
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<ShowRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, ShowRow>(&format!("SELECT {} FROM shows WHERE id = $1", COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Check whether a show exists
pub async fn exists(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM shows WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// List shows, newest first
pub async fn list(pool: &PgPool, filter: &ShowFilter) -> Result<Vec<ShowRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM shows", COLUMNS));
    push_filters(&mut builder, filter);
    builder
        .push(" ORDER BY created_at DESC, id DESC LIMIT ")
        .push_bind(filter.pagination.limit())
        .push(" OFFSET ")
        .push_bind(filter.pagination.offset());

    let rows = builder.build_query_as::<ShowRow>().fetch_all(pool).await?;

    Ok(rows)
}

/// Count shows matching a filter
pub async fn count(pool: &PgPool, filter: &ShowFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM shows");
    push_filters(&mut builder, filter);

    let count: (i64,) = builder.build_query_as().fetch_one(pool).await?;

    Ok(count.0)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ShowFilter) {
    builder.push(" WHERE TRUE");

    if let Some(pattern) = filter.like_pattern() {
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(difficulty) = filter.difficulty {
        builder
            .push(" AND difficulty = ")
            .push_bind(difficulty.as_str());
    }

    if let Some(year) = filter.year {
        builder.push(" AND year = ").push_bind(year);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageLimits;
    use crate::models::ShowListParams;

    #[test]
    fn test_show_filters() {
        let filter = ShowFilter::from_params(
            ShowListParams {
                q: Some("sky".into()),
                year: Some(2022),
                ..Default::default()
            },
            PageLimits::default(),
        )
        .unwrap();

        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM shows");
        push_filters(&mut builder, &filter);
        assert_eq!(
            builder.sql(),
            "SELECT 1 FROM shows WHERE TRUE AND (title ILIKE $1 OR description ILIKE $2) AND year = $3"
        );
    }
}
