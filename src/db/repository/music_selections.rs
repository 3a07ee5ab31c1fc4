//! Music selections repository (music_selections bind)

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::models::{MusicSelectionRow, NewMusicSelection};
use crate::models::SearchFilter;

const COLUMNS: &str = "id, show_id, title, composer, arranger, lyricist, song_title, \
                       difficulty, duration, bpm, instrumentation, notes, created_at";

/// Insert a validated selection and return the stored row
pub async fn insert(
    pool: &PgPool,
    selection: &NewMusicSelection,
) -> Result<MusicSelectionRow, sqlx::Error> {
    let row = sqlx::query_as::<_, MusicSelectionRow>(
        r#"
        INSERT INTO music_selections (id, show_id, title, composer, arranger, lyricist,
                                      song_title, difficulty, duration, bpm,
                                      instrumentation, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, show_id, title, composer, arranger, lyricist, song_title,
                  difficulty, duration, bpm, instrumentation, notes, created_at
        "#,
    )
    .bind(selection.id)
    .bind(selection.show_id)
    .bind(&selection.title)
    .bind(&selection.composer)
    .bind(&selection.arranger)
    .bind(&selection.lyricist)
    .bind(&selection.song_title)
    .bind(&selection.difficulty)
    .bind(&selection.duration)
    .bind(selection.bpm)
    .bind(&selection.instrumentation)
    .bind(&selection.notes)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Get a single selection by id
pub async fn find_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<MusicSelectionRow>, sqlx::Error> {
    let row = sqlx::query_as::<_, MusicSelectionRow>(&format!(
        "SELECT {} FROM music_selections WHERE id = $1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Get every selection linked to a show, ordered by title
pub async fn find_by_show(
    pool: &PgPool,
    show_id: i32,
) -> Result<Vec<MusicSelectionRow>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MusicSelectionRow>(&format!(
        "SELECT {} FROM music_selections WHERE show_id = $1 ORDER BY lower(title), id",
        COLUMNS
    ))
    .bind(show_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete a selection
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM music_selections WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Search selections: case-insensitive substring match over title,
/// composer, arranger and song title, plus exact filters
pub async fn search(
    pool: &PgPool,
    filter: &SearchFilter,
) -> Result<Vec<MusicSelectionRow>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM music_selections",
        COLUMNS
    ));
    push_filters(&mut builder, filter);
    builder
        .push(" ORDER BY ")
        .push(filter.sort.order_by())
        .push(" LIMIT ")
        .push_bind(filter.pagination.limit())
        .push(" OFFSET ")
        .push_bind(filter.pagination.offset());

    let rows = builder
        .build_query_as::<MusicSelectionRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Count selections matching a search, ignoring pagination
pub async fn count_search(pool: &PgPool, filter: &SearchFilter) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM music_selections");
    push_filters(&mut builder, filter);

    let count: (i64,) = builder.build_query_as().fetch_one(pool).await?;

    Ok(count.0)
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    builder.push(" WHERE TRUE");

    if let Some(pattern) = filter.like_pattern() {
        builder.push(" AND (");
        for (i, column) in ["title", "composer", "arranger", "song_title"]
            .iter()
            .enumerate()
        {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(*column)
                .push(" ILIKE ")
                .push_bind(pattern.clone());
        }
        builder.push(")");
    }

    if let Some(difficulty) = filter.difficulty {
        builder
            .push(" AND difficulty = ")
            .push_bind(difficulty.as_str());
    }

    if let Some(show_id) = filter.show_id {
        builder.push(" AND show_id = ").push_bind(show_id);
    }
}
