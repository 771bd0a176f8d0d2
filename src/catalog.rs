//! Book Catalog
//!
//! CRUD over the shared book list. Titles are the primary key, so every
//! operation that introduces a title checks for collisions before the
//! schema constraint gets the final word.

use crate::error::Error;
use crate::models::{Book, CreateBookRequest, UpdateBookRequest};

use sqlx::SqlitePool;

/// Book catalog service
pub struct BookCatalog {
    db: SqlitePool,
}

impl BookCatalog {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Add a book; fails if the title is already present
    pub async fn add(&self, req: CreateBookRequest) -> Result<Book, Error> {
        if req.title.trim().is_empty() {
            return Err(Error::Validation("Title is required".to_string()));
        }
        if let Some(rating) = req.rating {
            if !rating.is_finite() {
                return Err(Error::InvalidRating);
            }
        }

        if self.find(&req.title).await?.is_some() {
            return Err(Error::DuplicateTitle);
        }

        let book: Book = sqlx::query_as(
            r#"
            INSERT INTO books (title, description, rating)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.rating)
        .fetch_one(&self.db)
        .await
        .map_err(|e| Error::from_unique_violation(&e).unwrap_or_else(|| e.into()))?;

        tracing::info!(title = %book.title, "book added");

        Ok(book)
    }

    /// List all books, in no guaranteed order
    pub async fn list(&self) -> Result<Vec<Book>, Error> {
        let books = sqlx::query_as("SELECT * FROM books")
            .fetch_all(&self.db)
            .await?;
        Ok(books)
    }

    /// Single-record lookup for detail views
    pub async fn find(&self, title: &str) -> Result<Option<Book>, Error> {
        let book = sqlx::query_as("SELECT * FROM books WHERE title = $1")
            .bind(title)
            .fetch_optional(&self.db)
            .await?;
        Ok(book)
    }

    /// Change a book's title in place
    ///
    /// Fails with `BookNotFound` if `old_title` does not exist and with
    /// `DuplicateTitle` if `new_title` is already taken by another book.
    pub async fn rename(&self, old_title: &str, new_title: &str) -> Result<Book, Error> {
        self.update(
            old_title,
            UpdateBookRequest {
                title: Some(new_title.to_string()),
                ..UpdateBookRequest::default()
            },
        )
        .await
    }

    /// Update a book's title, description, and/or rating
    ///
    /// Absent fields are left unchanged.
    pub async fn update(&self, title: &str, req: UpdateBookRequest) -> Result<Book, Error> {
        if let Some(rating) = req.rating {
            if !rating.is_finite() {
                return Err(Error::InvalidRating);
            }
        }

        let new_title = req.title.as_deref().unwrap_or(title);
        if new_title.trim().is_empty() {
            return Err(Error::Validation("Title is required".to_string()));
        }
        if new_title != title && self.find(new_title).await?.is_some() {
            return Err(Error::DuplicateTitle);
        }

        let book: Book = sqlx::query_as(
            r#"
            UPDATE books SET
                title = $1,
                description = COALESCE($2, description),
                rating = COALESCE($3, rating)
            WHERE title = $4
            RETURNING *
            "#,
        )
        .bind(new_title)
        .bind(&req.description)
        .bind(req.rating)
        .bind(title)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| Error::from_unique_violation(&e).unwrap_or_else(|| e.into()))?
        .ok_or(Error::BookNotFound)?;

        Ok(book)
    }

    /// Delete a book by title
    pub async fn remove(&self, title: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM books WHERE title = $1")
            .bind(title)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::BookNotFound);
        }

        tracing::info!(title, "book removed");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn catalog() -> BookCatalog {
        BookCatalog::new(db::test_pool().await)
    }

    fn dune() -> CreateBookRequest {
        CreateBookRequest {
            title: "Dune".to_string(),
            description: Some("Desert planet intrigue".to_string()),
            rating: Some(4.5),
        }
    }

    #[tokio::test]
    async fn test_add_then_duplicate_rejected() {
        let catalog = catalog().await;

        catalog.add(dune()).await.unwrap();

        let err = catalog.add(dune()).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateTitle));
    }

    #[tokio::test]
    async fn test_non_finite_rating_rejected() {
        let catalog = catalog().await;

        let err = catalog
            .add(CreateBookRequest {
                rating: Some(f64::NAN),
                ..dune()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRating));

        let err = catalog
            .add(CreateBookRequest {
                rating: Some(f64::INFINITY),
                ..dune()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRating));
    }

    #[tokio::test]
    async fn test_rename_preserves_other_fields() {
        let catalog = catalog().await;
        catalog.add(dune()).await.unwrap();

        catalog.rename("Dune", "Dune Messiah").await.unwrap();

        assert!(catalog.find("Dune").await.unwrap().is_none());
        let renamed = catalog.find("Dune Messiah").await.unwrap().unwrap();
        assert_eq!(
            renamed.description.as_deref(),
            Some("Desert planet intrigue")
        );
        assert_eq!(renamed.rating, Some(4.5));
    }

    #[tokio::test]
    async fn test_rename_missing_book() {
        let catalog = catalog().await;

        let err = catalog.rename("NoSuchBook", "Whatever").await.unwrap_err();
        assert!(matches!(err, Error::BookNotFound));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_title_rejected() {
        let catalog = catalog().await;
        catalog.add(dune()).await.unwrap();
        catalog
            .add(CreateBookRequest {
                title: "Hyperion".to_string(),
                description: Some("Pilgrims and a Shrike".to_string()),
                rating: Some(4.0),
            })
            .await
            .unwrap();

        let err = catalog.rename("Hyperion", "Dune").await.unwrap_err();
        assert!(matches!(err, Error::DuplicateTitle));

        // Both records untouched
        let dune = catalog.find("Dune").await.unwrap().unwrap();
        assert_eq!(dune.rating, Some(4.5));
        let hyperion = catalog.find("Hyperion").await.unwrap().unwrap();
        assert_eq!(hyperion.rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_update_fields_without_rename() {
        let catalog = catalog().await;
        catalog.add(dune()).await.unwrap();

        let updated = catalog
            .update(
                "Dune",
                UpdateBookRequest {
                    rating: Some(5.0),
                    ..UpdateBookRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Dune");
        assert_eq!(updated.rating, Some(5.0));
        assert_eq!(
            updated.description.as_deref(),
            Some("Desert planet intrigue")
        );
    }

    #[tokio::test]
    async fn test_remove() {
        let catalog = catalog().await;
        catalog.add(dune()).await.unwrap();

        let err = catalog.remove("NoSuchBook").await.unwrap_err();
        assert!(matches!(err, Error::BookNotFound));

        catalog.remove("Dune").await.unwrap();
        assert!(catalog.find("Dune").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let catalog = catalog().await;
        catalog.add(dune()).await.unwrap();
        catalog
            .add(CreateBookRequest {
                title: "Hyperion".to_string(),
                description: None,
                rating: None,
            })
            .await
            .unwrap();

        let books = catalog.list().await.unwrap();
        assert_eq!(books.len(), 2);

        let mut titles: Vec<_> = books.iter().map(|b| b.title.as_str()).collect();
        titles.sort_unstable();
        assert_eq!(titles, ["Dune", "Hyperion"]);
    }
}
