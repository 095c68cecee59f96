//! Builder for [`LoanRecord`].

use chrono::{DateTime, NaiveDate, Utc};

use super::LoanRecord;

impl LoanRecord {
    /// Returns a new builder with the required fields set.
    #[must_use]
    pub fn builder(title: impl Into<String>, first_seen: DateTime<Utc>) -> LoanRecordBuilder {
        LoanRecordBuilder::new(title.into(), first_seen)
    }
}

/// Builder for constructing [`LoanRecord`] instances.
#[derive(Debug, Clone)]
pub struct LoanRecordBuilder {
    title: String,
    author: Option<String>,
    collection: Option<String>,
    cover_ref: Option<String>,
    due_date: Option<NaiveDate>,
    first_seen: DateTime<Utc>,
}

impl LoanRecordBuilder {
    #[must_use]
    fn new(title: String, first_seen: DateTime<Utc>) -> Self {
        Self { title, author: None, collection: None, cover_ref: None, due_date: None, first_seen }
    }

    #[must_use]
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn maybe_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    #[must_use]
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    #[must_use]
    pub fn maybe_collection(mut self, collection: Option<String>) -> Self {
        self.collection = collection;
        self
    }

    #[must_use]
    pub fn cover_ref(mut self, cover_ref: impl Into<String>) -> Self {
        self.cover_ref = Some(cover_ref.into());
        self
    }

    #[must_use]
    pub fn maybe_cover_ref(mut self, cover_ref: Option<String>) -> Self {
        self.cover_ref = cover_ref;
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn maybe_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    #[must_use]
    pub fn build(self) -> LoanRecord {
        LoanRecord {
            title: self.title,
            author: self.author,
            collection: self.collection,
            cover_ref: self.cover_ref,
            due_date: self.due_date,
            first_seen: self.first_seen,
        }
    }
}
